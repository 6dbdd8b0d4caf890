use axum::http::StatusCode;

/// Liveness probe for the load balancer.
pub async fn health_check() -> (StatusCode, String) {
    (StatusCode::OK, "Healthy!".to_string())
}
