//! 성과 분석 모듈
//!
//! 자산 곡선과 수익률 시계열로부터 위험 조정 성과 지표를 계산합니다.
//!
//! # 모듈 구성
//!
//! - [`metrics`]: 성과 지표 계산 (샤프비율, 소르티노비율, 최대낙폭, 변동성, 베타)

pub mod metrics;

pub use metrics::*;
