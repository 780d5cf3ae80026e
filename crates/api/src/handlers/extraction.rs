//! Handlers for file uploads: text extraction and summarization.
//!
//! Every handler validates the upload (size, MIME type), converts it into
//! vendor-ready content and issues at most one AI request.

use axum::extract::{Multipart, Path, State};
use axum::Json;
use scribe_ai::{AiResponse, ImagePart, PromptContent};
use scribe_core::error::CoreError;
use scribe_core::ingest::{
    decode_image, decode_text, extract_docx_text, rasterize_pdf, validate_upload,
    PdfRenderOptions, UploadKind, UploadedFile,
};
use scribe_core::prompts::{
    PromptTask, DOCUMENT_INSTRUCTION, IMAGES_INSTRUCTION, PAGES_INSTRUCTION,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::upload::UploadForm;

/// Response of the `/extract_text_from_*` endpoints.
#[derive(Debug, Serialize)]
pub struct ImageTextResponse {
    pub text: String,
    pub language: String,
    pub raw_response: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<usize>,
}

// ---------------------------------------------------------------------------
// Picture and PDF transcription
// ---------------------------------------------------------------------------

/// POST /extract_text_from_pic
///
/// Multipart: `file` (PNG/JPEG), optional `language`.
pub async fn extract_text_from_pic(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<ImageTextResponse>> {
    let form = UploadForm::read(multipart).await?;
    let language = form.language();
    let file = form.single_file()?;

    let images = decode_images(vec![file]).await?;
    let response = send_images(&state, PromptTask::ExtractText, &language, IMAGES_INSTRUCTION, images)
        .await?;

    Ok(Json(image_text(response, language, None)))
}

/// POST /extract_text_from_pics
///
/// Multipart: one or more `files` (PNG/JPEG), optional `language`.
pub async fn extract_text_from_pics(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<ImageTextResponse>> {
    let form = UploadForm::read(multipart).await?;
    let language = form.language();
    let files = form.require_files()?;

    let images = decode_images(files).await?;
    let response = send_images(&state, PromptTask::ExtractText, &language, IMAGES_INSTRUCTION, images)
        .await?;

    Ok(Json(image_text(response, language, None)))
}

/// POST /extract_text_from_pdf
///
/// Multipart: `file` (PDF), optional `language`, `first_page`, `last_page`.
pub async fn extract_text_from_pdf(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<ImageTextResponse>> {
    let form = UploadForm::read(multipart).await?;
    let language = form.language();
    let options = render_options(&form)?;
    let file = form.single_file()?;

    let pages = pdf_pages(&file, &options).await?;
    let page_count = pages.len();
    let response = send_images(&state, PromptTask::ExtractText, &language, PAGES_INSTRUCTION, pages)
        .await?;

    Ok(Json(image_text(response, language, Some(page_count))))
}

// ---------------------------------------------------------------------------
// Generic extraction
// ---------------------------------------------------------------------------

/// POST /extract/{kind}
///
/// `kind` is one of `png`, `pdf`, `doc`, `txt`. Multipart fields:
/// `file` (or several `files` for png and txt), optional `language`, `summarize`;
/// pdf also takes `first_page`, `last_page` and `inline_pdf`.
///
/// `doc` and `txt` without `summarize` return the extracted text directly,
/// with no vendor call.
pub async fn extract(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    multipart: Multipart,
) -> AppResult<Json<AiResponse>> {
    let kind: UploadKind = kind.parse()?;
    let form = UploadForm::read(multipart).await?;
    let language = form.language();
    let summarize = form.flag("summarize")?;

    tracing::info!(
        kind = %kind,
        summarize,
        file_count = form.files.len(),
        "Extraction request",
    );

    match kind {
        UploadKind::Png => {
            let images = decode_images(form.require_files()?).await?;
            let task = PromptTask::for_pictures(summarize);
            let response = send_images(&state, task, &language, IMAGES_INSTRUCTION, images).await?;
            Ok(Json(response))
        }
        UploadKind::Pdf => {
            let inline = form.flag("inline_pdf")?;
            let options = render_options(&form)?;
            let file = form.single_file()?;
            let task = PromptTask::for_pictures(summarize);

            let response = if inline {
                validate_upload(&file, UploadKind::Pdf)?;
                let content = PromptContent::Document {
                    instruction: DOCUMENT_INSTRUCTION.to_string(),
                    mime_type: "application/pdf".to_string(),
                    bytes: file.bytes,
                };
                state
                    .ai
                    .send(&task.system_prompt(&language), content, None)
                    .await?
            } else {
                let pages = pdf_pages(&file, &options).await?;
                send_images(&state, task, &language, PAGES_INSTRUCTION, pages).await?
            };
            Ok(Json(response))
        }
        UploadKind::Doc => {
            let file = form.single_file()?;
            validate_upload(&file, UploadKind::Doc)?;
            let text = extract_docx_text(&file.bytes)?;
            text_result(&state, text, &language, summarize).await
        }
        UploadKind::Txt => {
            let files = form.require_files()?;
            for file in &files {
                validate_upload(file, UploadKind::Txt)?;
            }
            let text: String = files.iter().map(|file| decode_text(&file.bytes)).collect();
            if text.trim().is_empty() {
                return Err(CoreError::invalid_format("txt", "file contains no text").into());
            }
            text_result(&state, text, &language, summarize).await
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Validate and decode images off the async runtime.
async fn decode_images(files: Vec<UploadedFile>) -> AppResult<Vec<ImagePart>> {
    for file in &files {
        validate_upload(file, UploadKind::Png)?;
    }

    let decoded = tokio::task::spawn_blocking(move || {
        files
            .iter()
            .map(|file| decode_image(&file.bytes).map(ImagePart::from))
            .collect::<Result<Vec<_>, CoreError>>()
    })
    .await
    .map_err(|e| AppError::InternalError(format!("image decoding task failed: {e}")))??;

    Ok(decoded)
}

async fn pdf_pages(file: &UploadedFile, options: &PdfRenderOptions) -> AppResult<Vec<ImagePart>> {
    validate_upload(file, UploadKind::Pdf)?;
    let pages = rasterize_pdf(&file.bytes, options).await?;
    Ok(pages.into_iter().map(ImagePart::from).collect())
}

fn render_options(form: &UploadForm) -> AppResult<PdfRenderOptions> {
    let options = PdfRenderOptions::default()
        .with_page_range(form.page("first_page")?, form.page("last_page")?);
    options.validate()?;
    Ok(options)
}

async fn send_images(
    state: &AppState,
    task: PromptTask,
    language: &str,
    instruction: &str,
    images: Vec<ImagePart>,
) -> AppResult<AiResponse> {
    let content = PromptContent::Images {
        instruction: instruction.to_string(),
        images,
    };
    Ok(state
        .ai
        .send(&task.system_prompt(language), content, None)
        .await?)
}

/// Return extracted text as-is, or summarize it when asked.
async fn text_result(
    state: &AppState,
    text: String,
    language: &str,
    summarize: bool,
) -> AppResult<Json<AiResponse>> {
    if !summarize {
        return Ok(Json(AiResponse {
            raw_response: json!({ "response": text }),
            response: text,
        }));
    }

    let prompt = PromptTask::Summary.system_prompt(language);
    let response = state.ai.send(&prompt, PromptContent::Text(text), None).await?;
    Ok(Json(response))
}

fn image_text(response: AiResponse, language: String, page_count: Option<usize>) -> ImageTextResponse {
    ImageTextResponse {
        text: response.response,
        language,
        raw_response: response.raw_response,
        page_count,
    }
}
