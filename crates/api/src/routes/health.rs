use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the database is reachable.
    pub db_healthy: bool,
    /// AI vendor requests are sent to.
    pub vendor: &'static str,
}

/// Service banner returned at `/`.
#[derive(Serialize)]
pub struct ServiceInfo {
    pub service: &'static str,
    pub version: &'static str,
    pub endpoints: &'static [&'static str],
}

const ENDPOINTS: &[&str] = &[
    "/health",
    "/generate_summary",
    "/generate_test",
    "/extract_text_from_pic",
    "/extract_text_from_pics",
    "/extract_text_from_pdf",
    "/extract/{png,pdf,doc,txt}",
    "/upload_and_extract",
    "/extract_text_png",
    "/available_languages",
    "/summaries",
    "/parse_xml",
    "/create_summary_xml",
    "/create_test_xml",
];

/// GET / -- service name, version and the main endpoints.
async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: "scribe-api",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: ENDPOINTS,
    })
}

/// GET /health -- returns service and database health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = scribe_db::health_check(&state.pool).await.is_ok();

    let status = if db_healthy { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        vendor: state.ai.vendor().as_str(),
    })
}

/// Mount the banner and health check routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(service_info))
        .route("/health", get(health_check))
}
