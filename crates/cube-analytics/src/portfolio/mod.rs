//! 포트폴리오 분석 모듈
//!
//! 보유 포지션과 자산 곡선을 대시보드 차트용 데이터로 가공합니다.
//!
//! # 모듈 구성
//!
//! - [`position`]: 보유 포지션
//! - [`charts`]: 차트 데이터 시리즈 (자산 곡선 비교, 낙폭, 수익률 분포, 롤링 변동성, 섹터 비중)
//! - [`sample`]: 데모 포트폴리오 데이터
//!
//! # 사용 예시
//!
//! ```
//! use cube_analytics::portfolio::{drawdown_series, sample};
//!
//! let equity = sample::equity_curve(30);
//! let drawdown = drawdown_series(&equity);
//!
//! assert_eq!(drawdown.len(), equity.len());
//! assert!(drawdown.iter().all(|d| *d <= 0.0));
//! ```

pub mod charts;
pub mod position;
pub mod sample;

pub use charts::*;
pub use position::*;
