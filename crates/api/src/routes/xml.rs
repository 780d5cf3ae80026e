use axum::routing::post;
use axum::Router;

use crate::handlers::xml;
use crate::state::AppState;

/// ```text
/// POST /parse_xml            -> parse_xml
/// POST /create_summary_xml   -> create_summary_xml
/// POST /create_test_xml      -> create_test_xml
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/parse_xml", post(xml::parse_xml))
        .route("/create_summary_xml", post(xml::create_summary_xml))
        .route("/create_test_xml", post(xml::create_test_xml))
}
