//! API 핸들러에서 공유하는 애플리케이션 상태.
//!
//! 서버 시작 시 한 번 생성되어 `Arc`로 공유됩니다. 시작 이후에는 변경되지
//! 않으므로 핸들러는 잠금 없이 읽기만 합니다.

use chrono::NaiveDate;
use cube_analytics::portfolio::sample;
use cube_analytics::{MetricsConfig, Position};
use cube_core::{AppConfig, CubeError, CubeResult};

/// 대시보드에 표시되는 포트폴리오 데이터.
#[derive(Debug, Clone)]
pub struct PortfolioData {
    /// 첫 관측일
    pub start_date: NaiveDate,
    /// 일별 포트폴리오 평가액
    pub equity_curve: Vec<f64>,
    /// 일별 벤치마크 평가액 (자산 곡선과 같은 길이)
    pub benchmark_curve: Vec<f64>,
    /// 일간 수익률 (분포/변동성 차트용)
    pub daily_returns: Vec<f64>,
    /// 종목별 수익률 (상관행렬용)
    pub asset_returns: Vec<(String, Vec<f64>)>,
    /// 보유 포지션
    pub positions: Vec<Position>,
}

impl PortfolioData {
    /// 포트폴리오 데이터를 생성합니다.
    ///
    /// # Errors
    ///
    /// 자산 곡선이 2점 미만이거나 벤치마크 곡선과 길이가 다르면
    /// `CubeError::InvalidInput`을 반환합니다.
    pub fn new(
        start_date: NaiveDate,
        equity_curve: Vec<f64>,
        benchmark_curve: Vec<f64>,
        daily_returns: Vec<f64>,
        asset_returns: Vec<(String, Vec<f64>)>,
        positions: Vec<Position>,
    ) -> CubeResult<Self> {
        if equity_curve.len() < 2 {
            return Err(CubeError::InvalidInput(format!(
                "자산 곡선은 최소 2개의 점이 필요합니다 (현재 {}개)",
                equity_curve.len()
            )));
        }
        if benchmark_curve.len() != equity_curve.len() {
            return Err(CubeError::InvalidInput(format!(
                "벤치마크 길이({})가 자산 곡선 길이({})와 다릅니다",
                benchmark_curve.len(),
                equity_curve.len()
            )));
        }

        Ok(Self {
            start_date,
            equity_curve,
            benchmark_curve,
            daily_returns,
            asset_returns,
            positions,
        })
    }

    /// 데모 포트폴리오 (1년치).
    pub fn demo() -> Self {
        let days = sample::DEFAULT_HISTORY_DAYS;
        Self {
            start_date: sample::DEFAULT_START_DATE,
            equity_curve: sample::equity_curve(days),
            benchmark_curve: sample::benchmark_curve(days),
            daily_returns: sample::daily_returns(days),
            asset_returns: sample::asset_returns(days),
            positions: sample::positions(),
        }
    }

    /// 최신 평가액.
    pub fn net_liquidity(&self) -> f64 {
        self.equity_curve.last().copied().unwrap_or_default()
    }

    /// 전일 대비 손익과 손익률(%).
    pub fn daily_pnl(&self) -> (f64, f64) {
        match self.equity_curve.as_slice() {
            [.., prev, last] => {
                let pnl = last - prev;
                let pct = if *prev != 0.0 { pnl / prev * 100.0 } else { 0.0 };
                (pnl, pct)
            }
            _ => (0.0, 0.0),
        }
    }
}

/// 애플리케이션 공유 상태.
#[derive(Debug, Clone)]
pub struct AppState {
    /// 포트폴리오 데이터 소스
    pub portfolio: PortfolioData,

    /// 지표 계산 상수 (무위험 이자율, 연간 기간 수)
    pub metrics_config: MetricsConfig,

    /// 서버 시작 시간
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// 새로운 AppState 생성.
    pub fn new(portfolio: PortfolioData, metrics_config: MetricsConfig) -> Self {
        Self {
            portfolio,
            metrics_config,
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 설정의 분석 상수와 데모 포트폴리오로 상태를 생성합니다.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            PortfolioData::demo(),
            MetricsConfig::new(
                config.analytics.risk_free_rate,
                config.analytics.periods_per_year,
            ),
        )
    }

    /// 서버 업타임(초).
    pub fn uptime_secs(&self) -> i64 {
        chrono::Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds()
    }
}

/// 테스트용 AppState 생성 (데모 포트폴리오, 기본 계산 상수).
#[cfg(test)]
pub fn create_test_state() -> AppState {
    AppState::new(PortfolioData::demo(), MetricsConfig::default())
}
