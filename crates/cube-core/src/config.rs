//! 설정 관리.
//!
//! 설정은 다음 순서로 병합됩니다 (뒤에 오는 값이 우선):
//! 1. 구조체 기본값
//! 2. TOML 설정 파일 (선택, 기본 `config/default.toml`)
//! 3. `CUBE__` 접두사 환경 변수 (예: `CUBE__SERVER__PORT=8080`)

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

use crate::error::{CubeError, CubeResult};

/// 기본 설정 파일 경로.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// 설정 파일 경로를 지정하는 환경 변수.
pub const CONFIG_PATH_ENV: &str = "CUBE_CONFIG";

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// 서버 설정
    pub server: ServerConfig,
    /// 로깅 설정
    pub logging: LoggingConfig,
    /// 성과 분석 설정
    pub analytics: AnalyticsConfig,
    /// CORS 설정
    pub cors: CorsConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
    /// 요청 타임아웃 (초)
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            request_timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    /// 소켓 주소 반환.
    ///
    /// # Errors
    /// `host:port` 형식이 유효하지 않으면 `AddrParseError`를 반환합니다.
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
    /// span 진입/종료 이벤트 출력
    pub span_events: bool,
    /// 파일명과 줄 번호 출력
    pub file_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            span_events: false,
            file_location: false,
        }
    }
}

/// 성과 분석 설정.
///
/// 샤프/소르티노 비율과 연율화 변동성 계산에 쓰이는 상수입니다.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// 연간 무위험 이자율 (예: 0.05 = 5%)
    pub risk_free_rate: f64,
    /// 연간 기간 수 (일봉 기준 252)
    pub periods_per_year: u32,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: 0.05,
            periods_per_year: 252,
        }
    }
}

/// CORS 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// 허용할 Origin 목록
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 기본값과 환경 변수만 사용합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> CubeResult<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix("CUBE")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// 기본 경로(또는 `CUBE_CONFIG`)에서 설정을 로드합니다.
    pub fn load_default() -> CubeResult<Self> {
        let path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load(path)
    }

    /// 설정 값의 유효성을 검사합니다.
    pub fn validate(&self) -> CubeResult<()> {
        if self.analytics.periods_per_year == 0 {
            return Err(CubeError::Config(
                "analytics.periods_per_year는 0보다 커야 합니다".to_string(),
            ));
        }
        if !self.analytics.risk_free_rate.is_finite() {
            return Err(CubeError::Config(
                "analytics.risk_free_rate가 유효한 숫자가 아닙니다".to_string(),
            ));
        }
        if self.server.request_timeout_secs == 0 {
            return Err(CubeError::Config(
                "server.request_timeout_secs는 0보다 커야 합니다".to_string(),
            ));
        }
        Ok(())
    }
}
