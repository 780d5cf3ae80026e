//! Multipart form reading for the upload endpoints.
//!
//! File parts are read chunk by chunk so an oversized file is rejected as
//! soon as it crosses [`MAX_UPLOAD_BYTES`], before the rest is buffered and
//! before any vendor call.

use std::collections::HashMap;

use axum::extract::multipart::Field;
use axum::extract::Multipart;
use scribe_core::ingest::{validate_size, UploadedFile, MAX_UPLOAD_BYTES};
use scribe_core::types::DEFAULT_LANGUAGE;

use crate::error::{AppError, AppResult};

/// Field names that always carry files, even without a filename.
const FILE_FIELDS: &[&str] = &["file", "files"];

/// A parsed multipart form: uploaded files in order plus plain text fields.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub files: Vec<UploadedFile>,
    fields: HashMap<String, String>,
}

impl UploadForm {
    /// Drain `multipart` into memory, enforcing the per-file size limit.
    pub async fn read(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        {
            let name = field.name().unwrap_or("").to_string();
            let is_file = field.file_name().is_some() || FILE_FIELDS.contains(&name.as_str());

            if is_file {
                form.files.push(read_file(field).await?);
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                form.fields.insert(name, value);
            }
        }

        tracing::debug!(
            file_count = form.files.len(),
            bytes = form.files.iter().map(|f| f.bytes.len()).sum::<usize>(),
            "Read upload form",
        );
        Ok(form)
    }

    /// A text field, trimmed. Blank values count as absent.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// The `language` field, defaulting to `auto`.
    pub fn language(&self) -> String {
        self.text("language").unwrap_or(DEFAULT_LANGUAGE).to_string()
    }

    /// A boolean field. Absent means `false`.
    pub fn flag(&self, name: &str) -> AppResult<bool> {
        match self.text(name).map(str::to_ascii_lowercase).as_deref() {
            None => Ok(false),
            Some("true" | "1" | "yes" | "on") => Ok(true),
            Some("false" | "0" | "no" | "off") => Ok(false),
            Some(other) => Err(AppError::BadRequest(format!(
                "Field '{name}' must be a boolean (got '{other}')"
            ))),
        }
    }

    /// An optional positive page number.
    pub fn page(&self, name: &str) -> AppResult<Option<u32>> {
        self.text(name)
            .map(|raw| {
                raw.parse::<u32>().map_err(|_| {
                    AppError::BadRequest(format!(
                        "Field '{name}' must be a positive integer (got '{raw}')"
                    ))
                })
            })
            .transpose()
    }

    /// The only uploaded file. Zero or several files is a bad request.
    pub fn single_file(self) -> AppResult<UploadedFile> {
        let mut files = self.files;
        match files.len() {
            1 => Ok(files.remove(0)),
            0 => Err(AppError::BadRequest("Missing required 'file' field".into())),
            n => Err(AppError::BadRequest(format!(
                "Expected exactly one file, got {n}"
            ))),
        }
    }

    /// All uploaded files. At least one is required.
    pub fn require_files(self) -> AppResult<Vec<UploadedFile>> {
        if self.files.is_empty() {
            return Err(AppError::BadRequest("Missing required 'files' field".into()));
        }
        Ok(self.files)
    }
}

async fn read_file(mut field: Field<'_>) -> AppResult<UploadedFile> {
    let file_name = field.file_name().unwrap_or("upload").to_string();
    let content_type = field.content_type().map(str::to_string);

    let mut bytes = Vec::new();
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if let Err(err) = validate_size(&file_name, bytes.len() + chunk.len()) {
            tracing::warn!(file_name = %file_name, limit = MAX_UPLOAD_BYTES, "Rejected oversized upload");
            return Err(err.into());
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(UploadedFile::new(file_name, content_type, bytes))
}
