//! 포트폴리오 차트 데이터 구조
//!
//! 웹 대시보드에서 사용할 차트 데이터를 생성합니다.
//! 렌더링은 프론트엔드가 담당하며, 여기서는 그려질 값만 계산합니다.
//!
//! # 제공 차트
//!
//! - 자산 곡선 비교 (포트폴리오 vs 벤치마크)
//! - 낙폭 (Underwater) 차트
//! - 일간 수익률 분포 히스토그램
//! - 롤링 변동성
//! - 섹터 비중

use chrono::{Duration, NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::position::Position;
use crate::performance::metrics::{round_to, volatility};

/// 수익률 분포 히스토그램 기본 구간 수
pub const DEFAULT_HISTOGRAM_BINS: usize = 30;

/// 롤링 변동성 기본 윈도우 (거래일)
pub const DEFAULT_VOLATILITY_WINDOW: usize = 20;

/// 차트 데이터 포인트
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// X축 값 (타임스탬프, 밀리초)
    pub x: i64,

    /// Y축 값
    pub y: f64,
}

impl ChartPoint {
    /// 시작일로부터 `offset`일 뒤 자정(UTC)의 포인트를 생성합니다.
    pub fn at_day(start: NaiveDate, offset: usize, value: f64) -> Self {
        let date = start + Duration::days(offset as i64);
        Self {
            x: date.and_time(NaiveTime::MIN).and_utc().timestamp_millis(),
            y: value,
        }
    }
}

/// 일별 값 시리즈를 차트 포인트로 변환합니다.
pub fn dated_series(start: NaiveDate, values: &[f64]) -> Vec<ChartPoint> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| ChartPoint::at_day(start, i, *v))
        .collect()
}

/// 자산 곡선 비교 차트의 한 점
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityComparisonPoint {
    /// 날짜 (YYYY-MM-DD)
    pub date: String,
    /// 포트폴리오 평가액
    pub portfolio: f64,
    /// 벤치마크 평가액
    pub benchmark: f64,
}

/// 포트폴리오와 벤치마크 곡선을 날짜별로 묶습니다.
///
/// 첫 점은 `start_date`이고 이후 하루씩 증가합니다. 값은 소수점 2자리로
/// 반올림되며, 길이는 두 곡선 중 짧은 쪽에 맞춰집니다.
pub fn equity_comparison(
    start_date: NaiveDate,
    portfolio: &[f64],
    benchmark: &[f64],
) -> Vec<EquityComparisonPoint> {
    portfolio
        .iter()
        .zip(benchmark)
        .enumerate()
        .map(|(i, (p, b))| EquityComparisonPoint {
            date: (start_date + Duration::days(i as i64))
                .format("%Y-%m-%d")
                .to_string(),
            portfolio: round_to(*p, 2),
            benchmark: round_to(*b, 2),
        })
        .collect()
}

/// 각 시점의 누적 고점 대비 낙폭(%)을 계산합니다.
///
/// 모든 값은 0 이하이며, 최솟값은 [`max_drawdown`](crate::max_drawdown)과 같습니다.
/// 고점이 0이면 해당 시점의 낙폭은 0입니다.
pub fn drawdown_series(equity_curve: &[f64]) -> Vec<f64> {
    let Some(&first) = equity_curve.first() else {
        return Vec::new();
    };

    let mut peak = first;
    equity_curve
        .iter()
        .map(|&value| {
            if value > peak {
                peak = value;
            }
            if peak == 0.0 {
                0.0
            } else {
                (value - peak) / peak * 100.0
            }
        })
        .collect()
}

/// 히스토그램 구간
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    /// 구간 시작 (포함)
    pub start: f64,
    /// 구간 끝 (마지막 구간만 포함)
    pub end: f64,
    /// 관측 수
    pub count: usize,
}

/// 수익률 분포 히스토그램
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnsHistogram {
    /// 구간 목록 (오름차순)
    pub bins: Vec<HistogramBin>,
    /// 평균 수익률 (평균선 표시용)
    pub mean: f64,
}

impl ReturnsHistogram {
    /// 전체 관측 수.
    pub fn total_count(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }
}

/// 수익률을 등간격 구간으로 집계합니다.
///
/// 수익률이 2개 미만이거나 `bins`가 0이면 None.
/// 모든 값이 같으면 전체를 담은 구간 하나를 반환합니다.
pub fn returns_histogram(returns: &[f64], bins: usize) -> Option<ReturnsHistogram> {
    if returns.len() < 2 || bins == 0 {
        return None;
    }

    let mean = returns.iter().sum::<f64>() / returns.len() as f64;
    let min = returns.iter().copied().fold(f64::INFINITY, f64::min);
    let max = returns.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if min == max {
        return Some(ReturnsHistogram {
            bins: vec![HistogramBin {
                start: min,
                end: max,
                count: returns.len(),
            }],
            mean,
        });
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];

    for r in returns {
        // 최댓값은 마지막 구간에 포함
        let idx = (((r - min) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    let bins = counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: min + width * i as f64,
            end: if i + 1 == bins {
                max
            } else {
                min + width * (i + 1) as f64
            },
            count,
        })
        .collect();

    Some(ReturnsHistogram { bins, mean })
}

/// 롤링 연율화 변동성(%)을 계산합니다.
///
/// 결과 길이는 수익률 길이와 같고, 윈도우가 채워지지 않은 앞의
/// `window - 1`개는 None입니다. 수익률이 윈도우보다 적거나
/// 윈도우가 2 미만이면 빈 벡터를 반환합니다.
pub fn rolling_volatility(
    returns: &[f64],
    window: usize,
    periods_per_year: u32,
) -> Vec<Option<f64>> {
    if window < 2 || returns.len() < window {
        return Vec::new();
    }

    let mut series = vec![None; window - 1];
    series.extend(
        returns
            .windows(window)
            .map(|w| Some(volatility(w, periods_per_year))),
    );
    series
}

/// 섹터별 비중
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorSlice {
    /// 섹터 이름
    pub sector: String,
    /// 섹터 합계 금액 (수량 × 평균 단가)
    pub value: Decimal,
    /// 전체 대비 비중 (%, 소수점 2자리)
    pub weight_pct: Decimal,
}

/// 포지션을 섹터별로 집계합니다.
///
/// 섹터는 처음 등장한 순서를 유지하며, 섹터가 없는 포지션은 "Other"로
/// 묶습니다. 전체 금액이 0이면 비중은 모두 0입니다.
pub fn sector_allocation(positions: &[Position]) -> Vec<SectorSlice> {
    let mut totals: Vec<(String, Decimal)> = Vec::new();

    for position in positions {
        let sector = position.sector_or_default();
        let value = position.cost_value();
        match totals.iter_mut().find(|(name, _)| name == sector) {
            Some((_, total)) => *total += value,
            None => totals.push((sector.to_string(), value)),
        }
    }

    let grand_total: Decimal = totals.iter().map(|(_, v)| *v).sum();

    totals
        .into_iter()
        .map(|(sector, value)| {
            let weight_pct = if grand_total.is_zero() {
                Decimal::ZERO
            } else {
                (value / grand_total * dec!(100)).round_dp(2)
            };
            SectorSlice {
                sector,
                value,
                weight_pct,
            }
        })
        .collect()
}
