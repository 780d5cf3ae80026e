//! Route definitions for text generation.

use axum::routing::post;
use axum::Router;

use crate::handlers::generation;
use crate::state::AppState;

/// Generation routes, each reachable under its legacy and grouped path.
///
/// ```text
/// POST /generate_summary   -> generate_summary
/// POST /generate/summary   -> generate_summary
/// POST /generate_test      -> generate_test
/// POST /generate/test      -> generate_test
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/generate_summary", post(generation::generate_summary))
        .route("/generate/summary", post(generation::generate_summary))
        .route("/generate_test", post(generation::generate_test))
        .route("/generate/test", post(generation::generate_test))
}
