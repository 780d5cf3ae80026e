//! Route definitions for upload extraction.

use axum::routing::post;
use axum::Router;

use crate::handlers::extraction;
use crate::state::AppState;

/// ```text
/// POST /extract_text_from_pic    -> extract_text_from_pic
/// POST /extract_text_from_pics   -> extract_text_from_pics
/// POST /extract_text_from_pdf    -> extract_text_from_pdf
/// POST /extract/{kind}           -> extract
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/extract_text_from_pic",
            post(extraction::extract_text_from_pic),
        )
        .route(
            "/extract_text_from_pics",
            post(extraction::extract_text_from_pics),
        )
        .route(
            "/extract_text_from_pdf",
            post(extraction::extract_text_from_pdf),
        )
        .route("/extract/{kind}", post(extraction::extract))
}
