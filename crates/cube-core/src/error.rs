//! Cube Trade 공통 에러 타입.

use thiserror::Error;

/// 핵심 에러.
///
/// 성과 지표 계산은 에러를 반환하지 않습니다 (데이터 부족 시 중립값).
/// 이 타입은 설정 로드, 입력 검증 등 경계 계층에서만 사용됩니다.
#[derive(Debug, Error)]
pub enum CubeError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 잘못된 입력
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 내부 에러
    #[error("내부 에러: {0}")]
    Internal(String),
}

/// Cube 작업을 위한 Result 타입.
pub type CubeResult<T> = Result<T, CubeError>;

impl From<config::ConfigError> for CubeError {
    fn from(err: config::ConfigError) -> Self {
        CubeError::Config(err.to_string())
    }
}
