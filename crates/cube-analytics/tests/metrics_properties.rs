//! 성과 지표 불변식 속성 테스트.
//!
//! proptest로 임의의 수익률/자산 곡선을 생성해 지표가 지켜야 할 성질을 검증합니다.

use cube_analytics::{
    beta, correlation_matrix, drawdown_series, max_drawdown, portfolio_metrics, sector_allocation,
    sharpe_ratio, volatility, PortfolioMetrics, Position,
};
use proptest::prelude::*;
use rust_decimal::Decimal;

fn returns_strategy() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-0.1f64..0.1, 2..200)
}

fn equity_strategy() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1_000.0f64..1_000_000.0, 2..200)
}

proptest! {
    #[test]
    fn volatility_is_invariant_under_negation(returns in returns_strategy()) {
        let negated: Vec<f64> = returns.iter().map(|r| -r).collect();
        prop_assert!((volatility(&returns, 252) - volatility(&negated, 252)).abs() < 1e-9);
    }

    #[test]
    fn volatility_is_invariant_under_shift(
        returns in returns_strategy(),
        shift in -0.05f64..0.05,
    ) {
        let shifted: Vec<f64> = returns.iter().map(|r| r + shift).collect();
        prop_assert!((volatility(&returns, 252) - volatility(&shifted, 252)).abs() < 1e-6);
    }

    #[test]
    fn volatility_is_non_negative(returns in returns_strategy()) {
        prop_assert!(volatility(&returns, 252) >= 0.0);
    }

    #[test]
    fn beta_against_itself_is_one(returns in returns_strategy()) {
        prop_assert_eq!(beta(&returns, &returns), 1.0);
    }

    #[test]
    fn identical_returns_have_zero_sharpe(value in -0.1f64..0.1, len in 2usize..100) {
        let returns = vec![value; len];
        prop_assert_eq!(sharpe_ratio(&returns, 0.05, 252), 0.0);
    }

    #[test]
    fn max_drawdown_is_never_positive(curve in equity_strategy()) {
        prop_assert!(max_drawdown(&curve) <= 0.0);
    }

    #[test]
    fn non_decreasing_curve_has_no_drawdown(
        start in 1_000.0f64..100_000.0,
        steps in prop::collection::vec(0.0f64..1_000.0, 1..200),
    ) {
        let mut curve = vec![start];
        for step in steps {
            let last = curve[curve.len() - 1];
            curve.push(last + step);
        }
        prop_assert_eq!(max_drawdown(&curve), 0.0);
    }

    #[test]
    fn drawdown_series_minimum_matches_max_drawdown(curve in equity_strategy()) {
        let series = drawdown_series(&curve);
        let min = series.iter().copied().fold(f64::INFINITY, f64::min);
        prop_assert_eq!(series.len(), curve.len());
        prop_assert_eq!(min, max_drawdown(&curve));
    }

    #[test]
    fn short_curves_yield_neutral_record(curve in prop::collection::vec(1.0f64..1e6, 0..2)) {
        prop_assert_eq!(portfolio_metrics(&curve, None), PortfolioMetrics::neutral());
    }

    #[test]
    fn total_return_matches_endpoints(curve in equity_strategy()) {
        let metrics = portfolio_metrics(&curve, None);
        prop_assert_eq!(metrics.total_return, curve[curve.len() - 1] - curve[0]);
    }

    #[test]
    fn sector_weights_sum_to_hundred(
        holdings in prop::collection::vec((1u32..1_000, 1u32..10_000, 0usize..4), 1..30),
    ) {
        const SECTORS: [Option<&str>; 4] = [Some("Technology"), Some("Energy"), Some("Consumer"), None];

        let positions: Vec<Position> = holdings
            .iter()
            .enumerate()
            .map(|(i, (shares, price, sector))| {
                let position = Position::new(
                    format!("SYM{i}"),
                    format!("Asset {i}"),
                    Decimal::from(*shares),
                    Decimal::new(i64::from(*price), 2),
                );
                match SECTORS[*sector] {
                    Some(name) => position.with_sector(name),
                    None => position,
                }
            })
            .collect();

        let slices = sector_allocation(&positions);
        let total: Decimal = slices.iter().map(|s| s.weight_pct).sum();
        // 구간별 반올림 오차 (최대 0.005 × 섹터 수)
        let tolerance = Decimal::new(5, 3) * Decimal::from(slices.len());
        prop_assert!((total - Decimal::from(100)).abs() <= tolerance);
    }

    #[test]
    fn correlation_matrix_is_symmetric_with_unit_diagonal(
        series in prop::collection::vec(prop::collection::vec(-0.1f64..0.1, 10), 2..6),
    ) {
        let input: Vec<(String, Vec<f64>)> = series
            .into_iter()
            .enumerate()
            .map(|(i, r)| (format!("S{i}"), r))
            .collect();

        let matrix = correlation_matrix(&input).expect("two or more symbols");
        let n = matrix.symbols.len();
        for i in 0..n {
            prop_assert_eq!(matrix.matrix[i][i], 1.0);
            for j in 0..n {
                prop_assert_eq!(matrix.matrix[i][j], matrix.matrix[j][i]);
                prop_assert!(matrix.matrix[i][j].abs() <= 1.0);
            }
        }
    }
}
