//! Local OCR through the `tesseract` command-line engine.
//!
//! The image is written into a private temporary directory and recognized
//! with its text captured from stdout. As with PDF rendering, the directory
//! is held by a [`tempfile::TempDir`] guard and removed on every return path.
//!
//! Language packs are not managed here: a requested language that the engine
//! does not have installed falls back to [`DEFAULT_OCR_LANGUAGE`].

use std::path::{Path, PathBuf};

use crate::error::CoreError;

/// Default engine binary, resolved through `PATH`.
pub const DEFAULT_OCR_ENGINE: &str = "tesseract";

/// Language used when none is requested or the requested one is missing.
pub const DEFAULT_OCR_LANGUAGE: &str = "eng";

/// Options for [`ocr_image`].
#[derive(Debug, Clone)]
pub struct OcrOptions {
    /// Engine executable.
    pub engine: PathBuf,
    /// Tesseract language code, e.g. `eng`, `rus` or `eng+rus`.
    pub language: String,
}

impl Default for OcrOptions {
    fn default() -> Self {
        Self {
            engine: PathBuf::from(DEFAULT_OCR_ENGINE),
            language: DEFAULT_OCR_LANGUAGE.to_string(),
        }
    }
}

/// Recognized text and the language it was actually recognized with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcrText {
    pub text: String,
    pub language: String,
}

/// Check a language code: one or more `+`-joined names of ASCII letters,
/// digits and underscores.
pub fn validate_ocr_language(language: &str) -> Result<(), CoreError> {
    let valid = !language.is_empty()
        && language.split('+').all(|part| {
            !part.is_empty() && part.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        });
    if !valid {
        return Err(CoreError::Validation(format!(
            "Invalid OCR language '{language}'. Expected codes like 'eng' or 'eng+rus'"
        )));
    }
    Ok(())
}

/// Run OCR over one image (PNG or JPEG bytes).
pub async fn ocr_image(bytes: &[u8], options: &OcrOptions) -> Result<OcrText, CoreError> {
    validate_ocr_language(&options.language)?;
    let language = resolve_language(&options.engine, &options.language).await;

    let scratch = tempfile::Builder::new()
        .prefix("scribe-ocr-")
        .tempdir()
        .map_err(|e| CoreError::Internal(format!("failed to create temp dir: {e}")))?;

    let input = scratch.path().join("input.img");
    tokio::fs::write(&input, bytes)
        .await
        .map_err(|e| CoreError::Internal(format!("failed to write temp image: {e}")))?;

    let output = tokio::process::Command::new(&options.engine)
        .arg(&input)
        .arg("stdout")
        .arg("-l")
        .arg(&language)
        .output()
        .await
        .map_err(|e| {
            CoreError::Internal(format!(
                "failed to run OCR engine '{}': {e}",
                options.engine.display()
            ))
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(CoreError::invalid_format(
            "png",
            format!(
                "OCR engine exited with {:?}: {}",
                output.status.code(),
                stderr.trim()
            ),
        ));
    }

    // Tesseract ends each page with a form feed.
    let text = String::from_utf8_lossy(&output.stdout)
        .trim_end_matches(|c: char| c.is_whitespace() || c == '\u{c}')
        .to_string();

    if text.trim().is_empty() {
        return Err(CoreError::invalid_format("png", "no text was recognized"));
    }

    tracing::debug!(
        language = %language,
        characters = text.chars().count(),
        "OCR finished",
    );

    Ok(OcrText { text, language })
}

/// Languages the engine reports as installed, in its order.
pub async fn available_languages(engine: &Path) -> Result<Vec<String>, CoreError> {
    let output = tokio::process::Command::new(engine)
        .arg("--list-langs")
        .output()
        .await
        .map_err(|e| {
            CoreError::Internal(format!(
                "failed to run OCR engine '{}': {e}",
                engine.display()
            ))
        })?;

    if !output.status.success() {
        return Err(CoreError::Internal(format!(
            "OCR engine exited with {:?} while listing languages",
            output.status.code()
        )));
    }

    Ok(parse_language_list(&String::from_utf8_lossy(&output.stdout)))
}

/// Parse `--list-langs` output. The first line is a header such as
/// `List of available languages in "/usr/share/tessdata/" (3):`.
fn parse_language_list(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("List of"))
        .map(str::to_string)
        .collect()
}

/// Keep `requested` when every part of it is installed, else fall back.
async fn resolve_language(engine: &Path, requested: &str) -> String {
    if requested == DEFAULT_OCR_LANGUAGE {
        return requested.to_string();
    }

    let installed = match available_languages(engine).await {
        Ok(list) => list,
        Err(e) => {
            tracing::warn!(error = %e, "Could not list OCR languages");
            Vec::new()
        }
    };

    if requested.split('+').all(|part| installed.iter().any(|l| l == part)) {
        requested.to_string()
    } else {
        tracing::warn!(
            requested,
            fallback = DEFAULT_OCR_LANGUAGE,
            "OCR language not installed, falling back",
        );
        DEFAULT_OCR_LANGUAGE.to_string()
    }
}
