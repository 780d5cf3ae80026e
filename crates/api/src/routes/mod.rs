pub mod extraction;
pub mod generation;
pub mod health;
pub mod ocr;
pub mod summaries;
pub mod xml;

use axum::Router;

use crate::state::AppState;

/// Build the API route tree.
///
/// Route hierarchy:
///
/// ```text
/// /generate_summary, /generate/summary             summarize text (POST)
/// /generate_test, /generate/test                   build a quiz (POST)
///
/// /extract_text_from_pic                           transcribe one picture (POST, multipart)
/// /extract_text_from_pics                          transcribe several pictures (POST, multipart)
/// /extract_text_from_pdf                           transcribe PDF pages (POST, multipart)
/// /extract/{kind}                                  png | pdf | doc | txt (POST, multipart)
///
/// /upload_and_extract                              local OCR of an upload (POST, multipart)
/// /extract_text_png                                local OCR of base64 (POST)
/// /available_languages                             installed OCR languages (GET)
///
/// /summaries                                       list, create
/// /summaries/{id}                                  get, update, delete
/// /summaries/subject/{subject}                     list by subject
/// /summaries/title/{title}                         list by title
/// /summaries/author/{author}                       list by author
///
/// /parse_xml                                       strip preamble (POST)
/// /create_summary_xml                              wrap in <summary> (POST)
/// /create_test_xml                                 wrap in <test> (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(generation::router())
        .merge(extraction::router())
        .merge(ocr::router())
        .nest("/summaries", summaries::router())
        .merge(xml::router())
}
