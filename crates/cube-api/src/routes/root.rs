//! 서비스 정보 endpoint.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::state::AppState;

/// 서비스 이름
pub const SERVICE_NAME: &str = "Cube Trade API";

/// 서비스 정보 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    /// 서비스 이름
    pub name: String,
    /// API 버전
    pub version: String,
    /// 운영 상태
    pub status: String,
    /// 활성화된 분석 엔진 목록
    pub engines: Vec<String>,
}

/// 서비스 정보 조회.
///
/// GET /
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "서비스 정보", body = ServiceInfo)),
    tag = "service"
)]
pub async fn service_info(State(state): State<Arc<AppState>>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        name: SERVICE_NAME.to_string(),
        version: state.version.clone(),
        status: "operational".to_string(),
        engines: vec!["quant".to_string(), "charts".to_string()],
    })
}
