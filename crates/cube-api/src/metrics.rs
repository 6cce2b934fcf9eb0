//! Prometheus 메트릭 설정 및 유틸리티.
//!
//! HTTP 요청 메트릭과 지표 계산 메트릭을 수집하고 `/metrics` 엔드포인트로 노출합니다.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};

/// HTTP 요청 지속 시간 히스토그램 버킷 (초)
const HTTP_DURATION_BUCKETS: &[f64] = &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];

/// 자산 곡선 길이 히스토그램 버킷 (점 개수)
const CURVE_LENGTH_BUCKETS: &[f64] = &[10.0, 100.0, 365.0, 1_000.0, 10_000.0, 100_000.0];

/// Prometheus 메트릭 레코더를 설정하고 핸들을 반환합니다.
///
/// # Errors
///
/// 버킷 설정이 잘못되었거나 레코더가 이미 설치되어 있으면 `BuildError`를 반환합니다.
pub fn setup_metrics_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            HTTP_DURATION_BUCKETS,
        )?
        .set_buckets_for_metric(
            Matcher::Full("portfolio_metrics_curve_points".to_string()),
            CURVE_LENGTH_BUCKETS,
        )?
        .install_recorder()
}

// ============================================================================
// HTTP 메트릭 헬퍼 함수
// ============================================================================

/// HTTP 요청 카운터 증가.
pub fn record_http_request(method: &str, path: &str) {
    counter!("http_requests_total", "method" => method.to_string(), "path" => path.to_string())
        .increment(1);
}

/// HTTP 응답 카운터 증가.
pub fn record_http_response(method: &str, path: &str, status: u16) {
    counter!(
        "http_responses_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// HTTP 요청 지속 시간 기록.
pub fn record_http_duration(method: &str, path: &str, duration_secs: f64) {
    histogram!(
        "http_request_duration_seconds",
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(duration_secs);
}

// ============================================================================
// 지표 계산 메트릭
// ============================================================================

/// 포트폴리오 지표 계산 기록.
///
/// `source`는 데이터 출처입니다 ("portfolio" = 서버 보유 데이터, "request" = 요청 본문).
pub fn record_metrics_computation(source: &'static str, curve_points: usize) {
    counter!("portfolio_metrics_computed_total", "source" => source).increment(1);
    histogram!("portfolio_metrics_curve_points", "source" => source).record(curve_points as f64);
}

// ============================================================================
// 경로 정규화 유틸리티
// ============================================================================

/// 경로에서 동적 파라미터를 정규화합니다.
///
/// 숫자만으로 된 세그먼트를 `:id`로 바꿔 라벨 카디널리티를 제한합니다.
///
/// 예: `/api/portfolio/positions/42` → `/api/portfolio/positions/:id`
pub fn normalize_path(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            if !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit()) {
                ":id"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_numeric() {
        assert_eq!(
            normalize_path("/api/portfolio/positions/12345"),
            "/api/portfolio/positions/:id"
        );
    }

    #[test]
    fn test_normalize_path_no_params() {
        assert_eq!(normalize_path("/api/charts/volatility"), "/api/charts/volatility");
        assert_eq!(normalize_path("/"), "/");
    }

    #[test]
    fn test_normalize_path_mixed() {
        assert_eq!(normalize_path("/api/v2/items/7/detail"), "/api/v2/items/:id/detail");
    }
}
