//! Upload validation and format conversion.
//!
//! Turns uploaded bytes into something a vendor payload can carry:
//! decoded images, rasterized PDF pages, or extracted text. Local OCR
//! produces text without a vendor. Every converter either yields content
//! or a [`CoreError::InvalidFormat`]; none returns an empty success.

pub mod docx;
pub mod image;
pub mod ocr;
pub mod pdf;
pub mod text;

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

pub use self::docx::extract_docx_text;
pub use self::image::{decode_image, DecodedImage};
pub use self::ocr::{available_languages, ocr_image, OcrOptions, OcrText};
pub use self::pdf::{rasterize_pdf, PdfRenderOptions};
pub use self::text::decode_text;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum accepted size of a single uploaded file, in megabytes.
pub const MAX_UPLOAD_MB: usize = 20;

/// Maximum accepted size of a single uploaded file, in bytes.
pub const MAX_UPLOAD_BYTES: usize = MAX_UPLOAD_MB * 1024 * 1024;

const PNG_MIME_TYPES: &[&str] = &["image/png", "image/jpeg", "image/jpg"];
const PDF_MIME_TYPES: &[&str] = &["application/pdf"];
const DOC_MIME_TYPES: &[&str] = &[
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/msword",
    "application/vnd.ms-word",
];
const TXT_MIME_TYPES: &[&str] = &["text/plain"];

// ---------------------------------------------------------------------------
// Upload kinds
// ---------------------------------------------------------------------------

/// Category of an upload, as named by the `/extract/{kind}` routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Png,
    Pdf,
    Doc,
    Txt,
}

impl UploadKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Pdf => "pdf",
            Self::Doc => "doc",
            Self::Txt => "txt",
        }
    }

    /// MIME types accepted for this kind.
    pub fn allowed_mime_types(&self) -> &'static [&'static str] {
        match self {
            Self::Png => PNG_MIME_TYPES,
            Self::Pdf => PDF_MIME_TYPES,
            Self::Doc => DOC_MIME_TYPES,
            Self::Txt => TXT_MIME_TYPES,
        }
    }
}

impl fmt::Display for UploadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UploadKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "pdf" => Ok(Self::Pdf),
            "doc" => Ok(Self::Doc),
            "txt" => Ok(Self::Txt),
            other => Err(CoreError::Validation(format!(
                "Unsupported upload kind '{other}'. Supported: png, pdf, doc, txt"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Uploaded files
// ---------------------------------------------------------------------------

/// Raw bytes of one uploaded file plus its declared metadata.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    /// MIME type declared by the client, or guessed from the extension.
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Build an upload, guessing the content type from the file name when
    /// the client did not declare one.
    pub fn new(file_name: String, content_type: Option<String>, bytes: Vec<u8>) -> Self {
        let content_type = content_type
            .filter(|ct| !ct.trim().is_empty())
            .or_else(|| guess_mime_type(&file_name).map(str::to_string));
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    /// Declared MIME type without parameters (`text/plain; charset=utf-8` -> `text/plain`).
    pub fn mime_essence(&self) -> Option<String> {
        self.content_type.as_deref().map(|ct| {
            ct.split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase()
        })
    }
}

/// Map a file extension to a MIME type from the allow-lists.
pub fn guess_mime_type(file_name: &str) -> Option<&'static str> {
    let (_, ext) = file_name.rsplit_once('.')?;
    match ext.to_ascii_lowercase().as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "pdf" => Some("application/pdf"),
        "docx" => Some(DOC_MIME_TYPES[0]),
        "doc" => Some("application/msword"),
        "txt" => Some("text/plain"),
        _ => None,
    }
}

/// Reject a file that exceeds [`MAX_UPLOAD_BYTES`].
pub fn validate_size(file_name: &str, size: usize) -> Result<(), CoreError> {
    if size > MAX_UPLOAD_BYTES {
        return Err(CoreError::Validation(format!(
            "File {file_name} is too big. Max size: {MAX_UPLOAD_MB}MB"
        )));
    }
    Ok(())
}

/// Full upload check: non-empty, size limit, MIME allow-list.
pub fn validate_upload(file: &UploadedFile, kind: UploadKind) -> Result<(), CoreError> {
    validate_size(&file.file_name, file.bytes.len())?;

    if file.bytes.is_empty() {
        return Err(CoreError::invalid_format(
            kind.as_str(),
            format!("file {} is empty", file.file_name),
        ));
    }

    let allowed = kind.allowed_mime_types();
    match file.mime_essence() {
        Some(mime) if allowed.contains(&mime.as_str()) => Ok(()),
        declared => {
            tracing::warn!(
                file_name = %file.file_name,
                content_type = ?declared,
                kind = %kind,
                "Rejected upload with disallowed content type",
            );
            Err(CoreError::Validation(format!(
                "Invalid file type: {}. Allowed types: {}",
                declared.as_deref().unwrap_or("unknown"),
                allowed.join(", ")
            )))
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
