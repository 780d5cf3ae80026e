//! Handlers for local OCR. No AI vendor is involved.

use std::time::Instant;

use axum::extract::{Multipart, State};
use axum::Json;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use scribe_core::ingest::ocr::DEFAULT_OCR_LANGUAGE;
use scribe_core::ingest::{
    available_languages, decode_image, ocr_image, validate_size, validate_upload, OcrOptions,
    UploadKind,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::upload::UploadForm;

/// Response of the OCR endpoints.
#[derive(Debug, Serialize)]
pub struct OcrResponse {
    pub text: String,
    pub characters: usize,
    /// Language the text was recognized with, after any fallback.
    pub language: String,
    /// `uploaded_file` or `base64`.
    pub source_type: &'static str,
    /// Wall-clock seconds spent on the request.
    pub processing_time: f64,
}

/// Request body for `POST /extract_text_png`.
#[derive(Debug, Deserialize)]
pub struct Base64OcrRequest {
    pub base64_image: Option<String>,
    #[serde(default = "default_ocr_language")]
    pub language: String,
}

fn default_ocr_language() -> String {
    DEFAULT_OCR_LANGUAGE.to_string()
}

#[derive(Debug, Serialize)]
pub struct LanguagesResponse {
    pub available_languages: Vec<String>,
}

/// POST /upload_and_extract
///
/// Multipart: `file` (PNG/JPEG), optional `language` (default `eng`).
pub async fn upload_and_extract(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<OcrResponse>> {
    let started = Instant::now();
    let form = UploadForm::read(multipart).await?;
    let language = form
        .text("language")
        .unwrap_or(DEFAULT_OCR_LANGUAGE)
        .to_string();
    let file = form.single_file()?;
    validate_upload(&file, UploadKind::Png)?;

    tracing::info!(file_name = %file.file_name, language = %language, "OCR upload");

    recognize(&state, file.bytes, language, "uploaded_file", started).await
}

/// POST /extract_text_png
///
/// JSON: `base64_image`, optional `language` (default `eng`).
pub async fn extract_text_png(
    State(state): State<AppState>,
    Json(input): Json<Base64OcrRequest>,
) -> AppResult<Json<OcrResponse>> {
    let started = Instant::now();
    let encoded = input
        .base64_image
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest("base64_image must be provided".into()))?;

    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| AppError::BadRequest(format!("base64_image is not valid base64: {e}")))?;
    validate_size("base64_image", bytes.len())?;

    recognize(&state, bytes, input.language, "base64", started).await
}

/// GET /available_languages
pub async fn list_languages(State(state): State<AppState>) -> AppResult<Json<LanguagesResponse>> {
    let available_languages = available_languages(&state.config.ocr_engine).await?;
    Ok(Json(LanguagesResponse {
        available_languages,
    }))
}

/// Decode the image off the async runtime, then hand the normalized PNG to
/// the engine.
async fn recognize(
    state: &AppState,
    bytes: Vec<u8>,
    language: String,
    source_type: &'static str,
    started: Instant,
) -> AppResult<Json<OcrResponse>> {
    let decoded = tokio::task::spawn_blocking(move || decode_image(&bytes))
        .await
        .map_err(|e| AppError::InternalError(format!("image decoding task failed: {e}")))??;

    let options = OcrOptions {
        engine: state.config.ocr_engine.clone(),
        language,
    };
    let result = ocr_image(&decoded.png, &options).await?;
    let characters = result.text.chars().count();

    tracing::info!(
        source_type,
        characters,
        language = %result.language,
        "OCR completed",
    );

    Ok(Json(OcrResponse {
        text: result.text,
        characters,
        language: result.language,
        source_type,
        processing_time: started.elapsed().as_secs_f64(),
    }))
}

