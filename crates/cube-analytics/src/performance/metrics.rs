//! 성과 지표 계산 모듈
//!
//! 자산 곡선(equity curve)과 수익률 시계열로부터 위험 조정 성과 지표를 계산합니다:
//! - 샤프 비율 (Sharpe Ratio): 변동성 대비 초과 수익
//! - 소르티노 비율 (Sortino Ratio): 하방 변동성 대비 초과 수익
//! - 최대 낙폭 (Maximum Drawdown): 고점 대비 최대 하락률
//! - 연율화 변동성 (Volatility)
//! - 베타 (Beta): 벤치마크 대비 민감도
//!
//! 모든 함수는 데이터가 부족하거나 분모가 0이면 에러 대신 중립값을 반환합니다
//! (비율/변동성/낙폭은 0.0, 베타는 1.0). 표준편차와 공분산은 표본 통계
//! (n-1로 나눔)를 사용합니다.
//!
//! # 사용 예시
//!
//! ```
//! use cube_analytics::performance::metrics::portfolio_metrics;
//!
//! let equity = [100_000.0, 101_000.0, 99_000.0, 102_000.0, 105_000.0];
//! let metrics = portfolio_metrics(&equity, None);
//!
//! assert_eq!(metrics.total_return, 5_000.0);
//! assert_eq!(metrics.beta, 1.0);
//! ```

use serde::{Deserialize, Serialize};

/// 연간 거래일 수 (연율화 계산에 사용)
///
/// 주식 시장은 연간 약 252일 거래됩니다.
/// 암호화폐 시장(365일)의 경우 [`MetricsConfig::periods_per_year`]를 조정합니다.
pub const TRADING_DAYS_PER_YEAR: u32 = 252;

/// 기본 무위험 이자율 (연간, 0.05 = 5%)
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.05;

/// 중립 베타 (시장과 동일한 민감도)
const NEUTRAL_BETA: f64 = 1.0;

/// 성과 지표 계산 상수.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// 연간 무위험 이자율 (예: 0.05 = 5%)
    pub risk_free_rate: f64,
    /// 연간 기간 수 (일간 수익률이면 252)
    pub periods_per_year: u32,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            periods_per_year: TRADING_DAYS_PER_YEAR,
        }
    }
}

impl MetricsConfig {
    /// 새 계산 설정을 생성합니다.
    pub fn new(risk_free_rate: f64, periods_per_year: u32) -> Self {
        Self {
            risk_free_rate,
            periods_per_year,
        }
    }
}

/// 포트폴리오 성과 지표
///
/// 자산 곡선 하나(선택적으로 벤치마크 곡선 하나)에서 계산되는 고정 레코드입니다.
/// 호출할 때마다 새로 계산되며 저장되지 않습니다.
///
/// # 필드 단위
///
/// - `max_drawdown`, `volatility`, `total_return_percent`: 백분율 (5.0 = 5%)
/// - `total_return`: 자산 곡선과 같은 통화 단위
/// - 나머지: 무차원 비율
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PortfolioMetrics {
    /// 연율화 샤프 비율
    pub sharpe_ratio: f64,

    /// 연율화 소르티노 비율
    pub sortino_ratio: f64,

    /// 최대 낙폭 (%), 항상 0 이하
    ///
    /// 예: -20.0 = 고점 대비 20% 하락
    pub max_drawdown: f64,

    /// 연율화 변동성 (%), 항상 0 이상
    pub volatility: f64,

    /// 벤치마크 대비 베타 (벤치마크가 없으면 1.0)
    pub beta: f64,

    /// 총 수익 (마지막 값 - 첫 값)
    pub total_return: f64,

    /// 총 수익률 (%)
    pub total_return_percent: f64,
}

impl Default for PortfolioMetrics {
    fn default() -> Self {
        Self::neutral()
    }
}

impl PortfolioMetrics {
    /// 데이터가 부족할 때 반환되는 중립 레코드.
    ///
    /// 모든 값이 0이고 베타만 1.0입니다.
    pub fn neutral() -> Self {
        Self {
            sharpe_ratio: 0.0,
            sortino_ratio: 0.0,
            max_drawdown: 0.0,
            volatility: 0.0,
            beta: NEUTRAL_BETA,
            total_return: 0.0,
            total_return_percent: 0.0,
        }
    }

    /// 표시용으로 모든 필드를 소수점 `decimals` 자리로 반올림한 사본을 반환합니다.
    ///
    /// 원본 레코드는 변경하지 않습니다.
    #[must_use]
    pub fn rounded(&self, decimals: u32) -> Self {
        Self {
            sharpe_ratio: round_to(self.sharpe_ratio, decimals),
            sortino_ratio: round_to(self.sortino_ratio, decimals),
            max_drawdown: round_to(self.max_drawdown, decimals),
            volatility: round_to(self.volatility, decimals),
            beta: round_to(self.beta, decimals),
            total_return: round_to(self.total_return, decimals),
            total_return_percent: round_to(self.total_return_percent, decimals),
        }
    }
}

/// 2^52: 이 이상인 f64는 소수 부분이 없습니다.
const INTEGRAL_F64_THRESHOLD: f64 = 4_503_599_627_370_496.0;

/// 값을 소수점 `decimals` 자리로 반올림합니다.
///
/// 정확히 중간인 값은 짝수 쪽으로 반올림합니다 (0.125 → 0.12).
/// 자릿수를 곱한 값이 오버플로하거나 이미 소수 부분이 없을 만큼 크면
/// 원래 값을 그대로 반환하므로, 유한한 입력은 항상 유한한 결과를 냅니다.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    let scaled = value * factor;
    if !scaled.is_finite() || scaled.abs() >= INTEGRAL_F64_THRESHOLD {
        return value;
    }
    scaled.round_ties_even() / factor
}

/// 자산 곡선을 단순 수익률 시계열로 변환합니다.
///
/// `r[i] = (e[i] - e[i-1]) / e[i-1]`
///
/// 결과 길이는 `equity_curve.len() - 1`이며, 점이 2개 미만이면 빈 벡터입니다.
/// 직전 값이 0인 구간의 수익률은 0.0으로 처리합니다.
pub fn simple_returns(equity_curve: &[f64]) -> Vec<f64> {
    equity_curve
        .windows(2)
        .map(|w| {
            if w[0] == 0.0 {
                0.0
            } else {
                (w[1] - w[0]) / w[0]
            }
        })
        .collect()
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// 표본 공분산 (n-1로 나눔).
///
/// 길이가 다르거나 2 미만이면 0.0. 한쪽 시계열의 값이 모두 같으면
/// 부동소수점 잔차 없이 정확히 0.0을 반환합니다.
fn sample_covariance(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.len() < 2 || is_constant(x) || is_constant(y) {
        return 0.0;
    }

    let mean_x = mean(x);
    let mean_y = mean(y);

    let sum: f64 = x
        .iter()
        .zip(y)
        .map(|(a, b)| (a - mean_x) * (b - mean_y))
        .sum();

    sum / (x.len() - 1) as f64
}

/// 표본 분산 (ddof=1).
fn sample_variance(values: &[f64]) -> f64 {
    sample_covariance(values, values)
}

/// 표본 표준편차 (ddof=1).
fn sample_std(values: &[f64]) -> f64 {
    sample_variance(values).sqrt()
}

fn is_constant(values: &[f64]) -> bool {
    match values.first() {
        Some(first) => values.iter().all(|v| v == first),
        None => true,
    }
}

/// 기간별 초과 수익률 (수익률 - 기간 무위험 수익률).
fn excess_returns(returns: &[f64], risk_free_rate: f64, periods_per_year: u32) -> Vec<f64> {
    let period_rf = risk_free_rate / periods_per_year as f64;
    returns.iter().map(|r| r - period_rf).collect()
}

/// 샤프 비율을 계산합니다.
///
/// # 계산 공식
///
/// Sharpe = mean(초과 수익률) / std(초과 수익률) × √(연간 기간 수)
///
/// 초과 수익률 = 수익률 - 무위험 이자율 / 연간 기간 수
///
/// # 매개변수
///
/// * `returns` - 기간별 수익률 (비율, 0.01 = 1%)
/// * `risk_free_rate` - 연간 무위험 이자율 (예: 0.05)
/// * `periods_per_year` - 연간 기간 수 (예: 252)
///
/// # 중립값
///
/// 수익률이 2개 미만이거나 표준편차가 0이면 0.0을 반환합니다.
pub fn sharpe_ratio(returns: &[f64], risk_free_rate: f64, periods_per_year: u32) -> f64 {
    if returns.len() < 2 || periods_per_year == 0 {
        return 0.0;
    }

    let excess = excess_returns(returns, risk_free_rate, periods_per_year);
    let std = sample_std(&excess);

    if std == 0.0 {
        return 0.0;
    }

    mean(&excess) / std * (periods_per_year as f64).sqrt()
}

/// 소르티노 비율을 계산합니다.
///
/// 분자는 샤프 비율과 같은 평균 초과 수익률이고, 분모는 **원 수익률** 중
/// 음수인 값들만의 표본 표준편차(하방 편차)입니다. 하방 편차는 초과 수익률이
/// 아닌 원 수익률 기준입니다.
///
/// # 중립값
///
/// - 수익률이 2개 미만이면 0.0
/// - 음수 수익률이 2개 미만이면 하방 편차를 0으로 보고 0.0
pub fn sortino_ratio(returns: &[f64], risk_free_rate: f64, periods_per_year: u32) -> f64 {
    if returns.len() < 2 || periods_per_year == 0 {
        return 0.0;
    }

    let excess = excess_returns(returns, risk_free_rate, periods_per_year);
    let downside: Vec<f64> = returns.iter().copied().filter(|r| *r < 0.0).collect();

    let downside_std = if downside.len() > 1 {
        sample_std(&downside)
    } else {
        0.0
    };

    if downside_std == 0.0 {
        return 0.0;
    }

    mean(&excess) / downside_std * (periods_per_year as f64).sqrt()
}

/// 자산 곡선에서 최대 낙폭(MDD)을 계산합니다.
///
/// # 계산 공식
///
/// 각 시점의 낙폭 = (현재 값 - 누적 고점) / 누적 고점, MDD = min(낙폭) × 100
///
/// # 예시
///
/// 100 → 90 → 95 → 80 → 120: 고점 100에서 저점 80까지 -20.0.
/// 이후 새 고점 120은 이미 기록된 최솟값에 영향을 주지 않습니다.
///
/// 점이 2개 미만이면 0.0을 반환합니다. 결과는 항상 0 이하입니다.
pub fn max_drawdown(equity_curve: &[f64]) -> f64 {
    if equity_curve.len() < 2 {
        return 0.0;
    }

    let mut peak = equity_curve[0];
    let mut worst = 0.0_f64;

    for &value in equity_curve {
        if value > peak {
            peak = value;
        }

        if peak != 0.0 {
            let drawdown = (value - peak) / peak;
            if drawdown < worst {
                worst = drawdown;
            }
        }
    }

    worst * 100.0
}

/// 연율화 변동성을 백분율로 계산합니다.
///
/// volatility = std(수익률) × √(연간 기간 수) × 100
///
/// 상수를 더해도 결과가 변하지 않습니다 (분산만 반영). 수익률이 2개 미만이면 0.0.
pub fn volatility(returns: &[f64], periods_per_year: u32) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }

    sample_std(returns) * (periods_per_year as f64).sqrt() * 100.0
}

/// 벤치마크 대비 베타를 계산합니다.
///
/// beta = cov(포트폴리오, 벤치마크) / var(벤치마크)
///
/// # 중립값
///
/// 두 시계열의 길이가 다르거나 2 미만이면, 또는 벤치마크 분산이 0이면
/// 시장 중립값 1.0을 반환합니다.
pub fn beta(portfolio_returns: &[f64], benchmark_returns: &[f64]) -> f64 {
    if portfolio_returns.len() != benchmark_returns.len() || portfolio_returns.len() < 2 {
        return NEUTRAL_BETA;
    }

    let variance = sample_variance(benchmark_returns);
    if variance == 0.0 {
        return NEUTRAL_BETA;
    }

    sample_covariance(portfolio_returns, benchmark_returns) / variance
}

/// 기본 상수(무위험 이자율 5%, 연 252 기간)로 포트폴리오 지표를 계산합니다.
///
/// 자세한 규칙은 [`portfolio_metrics_with_config`]를 참고하세요.
pub fn portfolio_metrics(equity_curve: &[f64], benchmark_curve: Option<&[f64]>) -> PortfolioMetrics {
    portfolio_metrics_with_config(equity_curve, benchmark_curve, &MetricsConfig::default())
}

/// 자산 곡선에서 모든 포트폴리오 지표를 계산합니다.
///
/// # 계산 순서
///
/// 1. 자산 곡선을 단순 수익률로 변환
/// 2. 샤프/소르티노/변동성은 수익률로, 최대 낙폭은 자산 곡선으로 계산
/// 3. 총 수익 = 마지막 값 - 첫 값, 총 수익률 = 총 수익 / 첫 값 × 100
/// 4. 벤치마크 곡선이 자산 곡선과 길이가 같을 때만 벤치마크 수익률로 베타 계산,
///    그렇지 않으면 1.0
///
/// 자산 곡선의 점이 2개 미만이면 [`PortfolioMetrics::neutral`]을 반환합니다.
/// 반환값은 반올림하지 않은 원시 값입니다.
pub fn portfolio_metrics_with_config(
    equity_curve: &[f64],
    benchmark_curve: Option<&[f64]>,
    config: &MetricsConfig,
) -> PortfolioMetrics {
    if equity_curve.len() < 2 {
        return PortfolioMetrics::neutral();
    }

    let returns = simple_returns(equity_curve);

    let first = equity_curve[0];
    let last = equity_curve[equity_curve.len() - 1];
    let total_return = last - first;
    let total_return_percent = if first != 0.0 {
        total_return / first * 100.0
    } else {
        0.0
    };

    let beta = match benchmark_curve {
        Some(benchmark) if benchmark.len() == equity_curve.len() => {
            beta(&returns, &simple_returns(benchmark))
        }
        _ => NEUTRAL_BETA,
    };

    PortfolioMetrics {
        sharpe_ratio: sharpe_ratio(&returns, config.risk_free_rate, config.periods_per_year),
        sortino_ratio: sortino_ratio(&returns, config.risk_free_rate, config.periods_per_year),
        max_drawdown: max_drawdown(equity_curve),
        volatility: volatility(&returns, config.periods_per_year),
        beta,
        total_return,
        total_return_percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    #[test]
    fn test_simple_returns() {
        let returns = simple_returns(&[100.0, 110.0, 99.0]);
        assert_eq!(returns.len(), 2);
        assert!(approx(returns[0], 0.1));
        assert!(approx(returns[1], -0.1));

        assert!(simple_returns(&[100.0]).is_empty());
        assert!(simple_returns(&[]).is_empty());

        // 직전 값이 0이면 0.0
        assert_eq!(simple_returns(&[0.0, 10.0]), vec![0.0]);
    }

    #[test]
    fn test_sharpe_ratio_known_value() {
        let returns = [0.01, 0.02, -0.01, 0.03];
        let rf = 0.05;
        let ppy = 252;

        // 수동 계산
        let daily_rf = rf / ppy as f64;
        let excess: Vec<f64> = returns.iter().map(|r| r - daily_rf).collect();
        let m = excess.iter().sum::<f64>() / 4.0;
        let var = excess.iter().map(|e| (e - m).powi(2)).sum::<f64>() / 3.0;
        let expected = m / var.sqrt() * (252f64).sqrt();

        assert!(approx(sharpe_ratio(&returns, rf, ppy), expected));
    }

    #[test]
    fn test_sharpe_ratio_short_series() {
        assert_eq!(sharpe_ratio(&[], 0.05, 252), 0.0);
        assert_eq!(sharpe_ratio(&[0.02], 0.05, 252), 0.0);
    }

    #[test]
    fn test_sharpe_ratio_zero_volatility() {
        assert_eq!(sharpe_ratio(&[0.1, 0.1, 0.1], 0.05, 252), 0.0);
        assert_eq!(sharpe_ratio(&[0.01; 20], 0.0, 252), 0.0);
    }

    #[test]
    fn test_sortino_ratio_uses_raw_negative_returns() {
        let returns = [0.02, -0.01, 0.015, -0.03, 0.005];
        let rf = 0.05;
        let ppy = 252;

        let daily_rf = rf / ppy as f64;
        let mean_excess = returns.iter().map(|r| r - daily_rf).sum::<f64>() / 5.0;
        // 하방 편차: 원 수익률 [-0.01, -0.03]의 표본 표준편차
        let downside_mean: f64 = (-0.01 - 0.03) / 2.0;
        let downside_var =
            ((-0.01 - downside_mean).powi(2) + (-0.03 - downside_mean).powi(2)) / 1.0;
        let expected = mean_excess / downside_var.sqrt() * (252f64).sqrt();

        assert!(approx(sortino_ratio(&returns, rf, ppy), expected));
    }

    #[test]
    fn test_sortino_ratio_without_enough_losses() {
        // 음수 수익률 없음
        assert_eq!(sortino_ratio(&[0.01, 0.02, 0.03], 0.05, 252), 0.0);
        // 음수 수익률 1개
        assert_eq!(sortino_ratio(&[0.01, -0.02, 0.03], 0.05, 252), 0.0);
        // 같은 값의 음수 수익률 (하방 편차 0)
        assert_eq!(sortino_ratio(&[0.01, -0.02, -0.02], 0.05, 252), 0.0);
        assert_eq!(sortino_ratio(&[-0.02], 0.05, 252), 0.0);
    }

    #[test]
    fn test_max_drawdown() {
        assert!(approx(max_drawdown(&[100.0, 90.0, 95.0, 80.0, 120.0]), -20.0));
    }

    #[test]
    fn test_max_drawdown_monotonic() {
        assert_eq!(max_drawdown(&[100.0, 100.0, 101.0, 150.0]), 0.0);
        assert_eq!(max_drawdown(&[100.0]), 0.0);
        assert_eq!(max_drawdown(&[]), 0.0);
    }

    #[test]
    fn test_volatility() {
        let returns = [0.01, -0.01, 0.02, -0.02];
        let m = 0.0;
        let var = returns.iter().map(|r: &f64| (r - m).powi(2)).sum::<f64>() / 3.0;
        let expected = var.sqrt() * (252f64).sqrt() * 100.0;

        assert!(approx(volatility(&returns, 252), expected));
        assert_eq!(volatility(&[0.01], 252), 0.0);
        assert_eq!(volatility(&[0.03, 0.03, 0.03], 252), 0.0);
    }

    #[test]
    fn test_beta() {
        let benchmark = [0.01, -0.02, 0.015, 0.005];
        let portfolio: Vec<f64> = benchmark.iter().map(|r| r * 2.0).collect();

        assert!(approx(beta(&portfolio, &benchmark), 2.0));
        assert_eq!(beta(&benchmark, &benchmark), 1.0);
    }

    #[test]
    fn test_beta_neutral_defaults() {
        // 길이 불일치
        assert_eq!(beta(&[0.01, 0.02, 0.03], &[0.01, 0.02]), 1.0);
        // 데이터 부족
        assert_eq!(beta(&[0.01], &[0.02]), 1.0);
        // 벤치마크 분산 0
        assert_eq!(beta(&[0.01, 0.05, -0.02], &[0.01, 0.01, 0.01]), 1.0);
    }

    #[test]
    fn test_portfolio_metrics_neutral() {
        let expected = PortfolioMetrics {
            sharpe_ratio: 0.0,
            sortino_ratio: 0.0,
            max_drawdown: 0.0,
            volatility: 0.0,
            beta: 1.0,
            total_return: 0.0,
            total_return_percent: 0.0,
        };

        assert_eq!(portfolio_metrics(&[], None), expected);
        assert_eq!(portfolio_metrics(&[100_000.0], None), expected);
        assert_eq!(portfolio_metrics(&[100_000.0], Some(&[100_000.0])), expected);
    }

    #[test]
    fn test_portfolio_metrics_scenario() {
        let equity = [100_000.0, 101_000.0, 99_000.0, 102_000.0, 105_000.0];
        let metrics = portfolio_metrics(&equity, None);

        assert_eq!(metrics.total_return, 5_000.0);
        assert!(approx(metrics.total_return_percent, 5.0));
        // (99000 - 101000) / 101000 × 100
        assert!(approx(metrics.max_drawdown, -2_000.0 / 101_000.0 * 100.0));
        assert_eq!(metrics.rounded(2).max_drawdown, -1.98);
        assert_eq!(metrics.beta, 1.0);
        assert!(metrics.volatility > 0.0);
        assert!(metrics.sharpe_ratio > 0.0);
    }

    #[test]
    fn test_portfolio_metrics_with_benchmark() {
        let equity = [100.0, 102.0, 101.0, 104.0, 103.0];
        let benchmark = [100.0, 101.0, 100.5, 102.0, 101.5];
        let metrics = portfolio_metrics(&equity, Some(&benchmark));

        let expected = beta(&simple_returns(&equity), &simple_returns(&benchmark));
        assert_eq!(metrics.beta, expected);
        assert!(metrics.beta > 1.0);

        // 길이가 다른 벤치마크는 무시
        let short = [100.0, 101.0, 100.5];
        assert_eq!(portfolio_metrics(&equity, Some(&short)).beta, 1.0);
    }

    #[test]
    fn test_portfolio_metrics_with_config() {
        let equity = [100.0, 101.0, 99.5, 102.0, 101.0, 104.0];
        let default = portfolio_metrics(&equity, None);
        let zero_rf = portfolio_metrics_with_config(&equity, None, &MetricsConfig::new(0.0, 252));

        // 무위험 이자율이 낮을수록 초과 수익이 커짐
        assert!(zero_rf.sharpe_ratio > default.sharpe_ratio);
        assert_eq!(zero_rf.volatility, default.volatility);
        assert_eq!(zero_rf.max_drawdown, default.max_drawdown);
    }

    #[test]
    fn test_portfolio_metrics_does_not_mutate_input() {
        let equity = vec![100.0, 95.0, 110.0];
        let before = equity.clone();
        let _ = portfolio_metrics(&equity, Some(&equity));
        assert_eq!(equity, before);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(-1.980_198, 2), -1.98);
        assert_eq!(round_to(5.0, 2), 5.0);
        assert_eq!(round_to(1.234_56, 3), 1.235);
    }

    #[test]
    fn test_round_to_ties_to_even() {
        assert_eq!(round_to(0.125, 2), 0.12);
        assert_eq!(round_to(0.375, 2), 0.38);
        assert_eq!(round_to(-0.125, 2), -0.12);
        assert_eq!(round_to(2.5, 0), 2.0);
    }

    #[test]
    fn test_round_to_large_values_stay_finite() {
        assert_eq!(round_to(5e306, 2), 5e306);
        assert_eq!(round_to(f64::MAX, 2), f64::MAX);
        assert_eq!(round_to(-1e300, 4), -1e300);
        assert_eq!(round_to(1e15 + 0.5, 2), 1e15 + 0.5);
    }

    #[test]
    fn test_rounded_huge_curve_is_finite() {
        let metrics = portfolio_metrics(&[1e307, 1.5e307], None).rounded(2);
        assert!(metrics.total_return.is_finite());
        assert_eq!(metrics.total_return_percent, 50.0);
    }
}
