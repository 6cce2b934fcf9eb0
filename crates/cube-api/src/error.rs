//! 통합 API 에러 응답 타입.
//!
//! 모든 API 엔드포인트에서 일관된 에러 형식을 제공합니다.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::Json;
use cube_core::CubeError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// 입력 검증 실패 에러 코드
pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";

/// 통합 API 에러 응답.
///
/// # 예시
///
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "자산 곡선이 비어 있습니다",
///   "details": null,
///   "timestamp": 1738300800
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 에러 코드 (예: "VALIDATION_ERROR", "INTERNAL_ERROR")
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
    /// 추가 에러 상세 정보 (선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// 에러 발생 타임스탬프 (Unix timestamp, 선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl ApiErrorResponse {
    /// 기본 에러 생성 (타임스탬프 포함).
    ///
    /// # Example
    ///
    /// ```
    /// use cube_api::error::ApiErrorResponse;
    ///
    /// let error = ApiErrorResponse::new("VALIDATION_ERROR", "equity_curve is empty");
    /// assert_eq!(error.code, "VALIDATION_ERROR");
    /// ```
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            timestamp: Some(chrono::Utc::now().timestamp()),
        }
    }

    /// 상세 정보 포함 에러 생성.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Value,
    ) -> Self {
        Self {
            details: Some(details),
            ..Self::new(code, message)
        }
    }

    /// validator 검증 결과를 400 응답용 에러로 변환합니다.
    ///
    /// 필드별 메시지를 `; `로 연결하고, `details`에 실패한 필드 이름을 담습니다.
    pub fn from_validation(errors: &ValidationErrors) -> Self {
        let field_errors = errors.field_errors();

        let mut fields: Vec<&str> = field_errors.keys().map(|f| f.as_ref()).collect();
        fields.sort_unstable();

        let message = fields
            .iter()
            .flat_map(|field| {
                field_errors[*field].iter().map(move |e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{}: 유효하지 않은 값", field))
                })
            })
            .collect::<Vec<_>>()
            .join("; ");

        Self::with_details(
            VALIDATION_ERROR,
            message,
            serde_json::json!({ "fields": fields }),
        )
    }
}

impl std::fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiErrorResponse {}

/// API 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, (StatusCode, Json<ApiErrorResponse>)>;

/// 400 검증 에러 응답.
pub fn validation_error(errors: &ValidationErrors) -> (StatusCode, Json<ApiErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiErrorResponse::from_validation(errors)),
    )
}

/// JSON 본문 추출 실패를 에러 응답으로 변환합니다.
///
/// 형식이 맞지 않는 본문(타입 불일치, 필드 누락, 문법 오류)은 검증 실패와 같은
/// 400 `VALIDATION_ERROR`입니다. Content-Type 누락 등은 axum의 상태 코드를 유지합니다.
pub fn json_rejection(rejection: JsonRejection) -> (StatusCode, Json<ApiErrorResponse>) {
    match rejection {
        JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => (
            StatusCode::BAD_REQUEST,
            Json(ApiErrorResponse::new(VALIDATION_ERROR, rejection.body_text())),
        ),
        other => (
            other.status(),
            Json(ApiErrorResponse::new("INVALID_REQUEST", other.body_text())),
        ),
    }
}

/// 핵심 에러를 HTTP 응답으로 변환합니다.
///
/// 입력 에러는 400 `VALIDATION_ERROR`, 나머지는 500입니다.
pub fn cube_error(err: CubeError) -> (StatusCode, Json<ApiErrorResponse>) {
    match err {
        CubeError::InvalidInput(message) => (
            StatusCode::BAD_REQUEST,
            Json(ApiErrorResponse::new(VALIDATION_ERROR, message)),
        ),
        CubeError::Config(message) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiErrorResponse::new("CONFIG_ERROR", message)),
        ),
        CubeError::Internal(message) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiErrorResponse::new("INTERNAL_ERROR", message)),
        ),
    }
}
