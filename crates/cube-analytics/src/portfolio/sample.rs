//! 데모 포트폴리오 데이터.
//!
//! 실제 계좌 연동 전까지 대시보드에 표시되는 결정적(deterministic) 샘플입니다.
//! 같은 인자로 호출하면 항상 같은 값을 반환합니다.

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use super::position::Position;

/// 기본 이력 일수
pub const DEFAULT_HISTORY_DAYS: usize = 365;

/// 데모 시리즈의 시작일 (2024-01-01)
pub const DEFAULT_START_DATE: NaiveDate = match NaiveDate::from_ymd_opt(2024, 1, 1) {
    Some(date) => date,
    None => panic!("invalid start date"),
};

/// 상관행렬 데모에 쓰이는 종목별 수익률 배수
const ASSET_BETAS: [(&str, f64); 5] = [
    ("AAPL", 1.0),
    ("MSFT", 0.9),
    ("NVDA", 1.3),
    ("GOOGL", 0.85),
    ("AMZN", 0.95),
];

/// 포트폴리오 자산 곡선: `194000 + 148i + 520((i mod 7) - 3)`
pub fn equity_curve(days: usize) -> Vec<f64> {
    (0..days)
        .map(|i| 194_000.0 + i as f64 * 148.0 + ((i % 7) as f64 - 3.0) * 520.0)
        .collect()
}

/// 벤치마크 곡선: `194000 + 90i + 310((i mod 5) - 2)`
pub fn benchmark_curve(days: usize) -> Vec<f64> {
    (0..days)
        .map(|i| 194_000.0 + i as f64 * 90.0 + ((i % 5) as f64 - 2.0) * 310.0)
        .collect()
}

/// 일간 수익률: `0.001((i mod 10) - 4.5) + 0.0005(i mod 7)`
pub fn daily_returns(days: usize) -> Vec<f64> {
    (0..days)
        .map(|i| 0.001 * ((i % 10) as f64 - 4.5) + 0.0005 * (i % 7) as f64)
        .collect()
}

/// 보유 종목별 수익률 (기준 수익률에 종목별 배수를 곱한 값).
pub fn asset_returns(days: usize) -> Vec<(String, Vec<f64>)> {
    let base = daily_returns(days);
    ASSET_BETAS
        .iter()
        .map(|(symbol, factor)| {
            (
                symbol.to_string(),
                base.iter().map(|r| r * factor).collect(),
            )
        })
        .collect()
}

/// 데모 보유 포지션.
pub fn positions() -> Vec<Position> {
    vec![
        Position::new("AAPL", "Apple Inc.", dec!(150), dec!(142.5)).with_sector("Technology"),
        Position::new("MSFT", "Microsoft Corp.", dec!(80), dec!(310.25)).with_sector("Technology"),
        Position::new("NVDA", "NVIDIA Corp.", dec!(45), dec!(450.0)).with_sector("Technology"),
        Position::new("VOO", "Vanguard S&P 500 ETF", dec!(60), dec!(380.0))
            .with_sector("Index Fund"),
        Position::new("GOOGL", "Alphabet Inc.", dec!(100), dec!(105.0)).with_sector("Technology"),
        Position::new("AMZN", "Amazon.com Inc.", dec!(55), dec!(127.5)).with_sector("Consumer"),
    ]
}
