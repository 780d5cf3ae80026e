//! Route definitions for local OCR.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::ocr;
use crate::state::AppState;

/// ```text
/// POST /upload_and_extract    -> upload_and_extract
/// POST /extract_text_png      -> extract_text_png
/// GET  /available_languages   -> list_languages
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload_and_extract", post(ocr::upload_and_extract))
        .route("/extract_text_png", post(ocr::extract_text_png))
        .route("/available_languages", get(ocr::list_languages))
}
