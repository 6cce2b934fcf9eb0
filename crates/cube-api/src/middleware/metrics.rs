//! 요청 단위 Prometheus 계측.

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

use crate::metrics::{
    normalize_path, record_http_duration, record_http_request, record_http_response,
};

/// 메트릭 라벨로 쓰이는 요청 식별 정보.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RouteLabels {
    method: String,
    /// 숫자 세그먼트가 `:id`로 치환된 경로
    path: String,
}

impl RouteLabels {
    fn of(request: &Request) -> Self {
        Self {
            method: request.method().as_str().to_owned(),
            path: normalize_path(request.uri().path()),
        }
    }
}

/// 모든 요청의 건수, 응답 상태, 처리 시간을 기록하는 미들웨어.
///
/// 기록되는 시리즈는 `http_requests_total`, `http_responses_total`,
/// `http_request_duration_seconds`이며 라벨은 method와 정규화된 path입니다.
/// 5xx 응답은 경고 로그를 남깁니다.
pub async fn metrics_layer(request: Request, next: Next) -> Response {
    let labels = RouteLabels::of(&request);
    record_http_request(&labels.method, &labels.path);

    let started = Instant::now();
    let response = next.run(request).await;
    let elapsed = started.elapsed();

    let status = response.status();
    record_http_response(&labels.method, &labels.path, status.as_u16());
    record_http_duration(&labels.method, &labels.path, elapsed.as_secs_f64());

    if status.is_server_error() {
        tracing::warn!(
            method = %labels.method,
            path = %labels.path,
            status = status.as_u16(),
            elapsed_ms = elapsed.as_millis() as u64,
            "request failed"
        );
    } else {
        tracing::debug!(
            method = %labels.method,
            path = %labels.path,
            status = status.as_u16(),
            elapsed_ms = elapsed.as_millis() as u64,
            "request completed"
        );
    }

    response
}
