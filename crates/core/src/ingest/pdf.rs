//! PDF rasterization through poppler's `pdftoppm`.
//!
//! The PDF is written into a private temporary directory together with the
//! rendered pages. The directory is owned by a [`tempfile::TempDir`] guard,
//! so it is removed when this module returns, whether rendering succeeded
//! or not.

use std::path::{Path, PathBuf};

use super::image::DecodedImage;
use crate::error::CoreError;

/// Default rendering resolution in dots per inch.
pub const DEFAULT_DPI: u32 = 200;

/// Bounds for caller-supplied DPI values.
pub const MIN_DPI: u32 = 50;
pub const MAX_DPI: u32 = 600;

/// Default renderer binary, resolved through `PATH`.
pub const DEFAULT_RENDERER: &str = "pdftoppm";

const PDF_MAGIC: &[u8] = b"%PDF-";
const PAGE_PREFIX: &str = "page";

/// Options for [`rasterize_pdf`].
#[derive(Debug, Clone)]
pub struct PdfRenderOptions {
    pub dpi: u32,
    /// First page to render, 1-based. `None` starts at the first page.
    pub first_page: Option<u32>,
    /// Last page to render, 1-based and inclusive. `None` renders to the end.
    pub last_page: Option<u32>,
    /// Renderer executable.
    pub renderer: PathBuf,
}

impl Default for PdfRenderOptions {
    fn default() -> Self {
        Self {
            dpi: DEFAULT_DPI,
            first_page: None,
            last_page: None,
            renderer: PathBuf::from(DEFAULT_RENDERER),
        }
    }
}

impl PdfRenderOptions {
    pub fn with_page_range(mut self, first_page: Option<u32>, last_page: Option<u32>) -> Self {
        self.first_page = first_page;
        self.last_page = last_page;
        self
    }

    /// Check DPI bounds and the page range.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !(MIN_DPI..=MAX_DPI).contains(&self.dpi) {
            return Err(CoreError::Validation(format!(
                "dpi must be between {MIN_DPI} and {MAX_DPI} (got {})",
                self.dpi
            )));
        }
        if self.first_page == Some(0) || self.last_page == Some(0) {
            return Err(CoreError::Validation(
                "Page numbers start at 1".to_string(),
            ));
        }
        if let (Some(first), Some(last)) = (self.first_page, self.last_page) {
            if first > last {
                return Err(CoreError::Validation(format!(
                    "first_page ({first}) must not be greater than last_page ({last})"
                )));
            }
        }
        Ok(())
    }
}

/// Render the pages of a PDF into PNG images, in page order.
pub async fn rasterize_pdf(
    bytes: &[u8],
    options: &PdfRenderOptions,
) -> Result<Vec<DecodedImage>, CoreError> {
    options.validate()?;

    if !bytes.starts_with(PDF_MAGIC) {
        return Err(CoreError::invalid_format("pdf", "missing %PDF- header"));
    }

    let scratch = tempfile::Builder::new()
        .prefix("scribe-pdf-")
        .tempdir()
        .map_err(|e| CoreError::Internal(format!("failed to create temp dir: {e}")))?;

    let input = scratch.path().join("input.pdf");
    tokio::fs::write(&input, bytes)
        .await
        .map_err(|e| CoreError::Internal(format!("failed to write temp PDF: {e}")))?;

    run_renderer(&input, scratch.path(), options).await?;
    let pages = collect_pages(scratch.path()).await?;

    if pages.is_empty() {
        return Err(CoreError::invalid_format(
            "pdf",
            "no pages were rendered for the requested range",
        ));
    }

    tracing::debug!(
        page_count = pages.len(),
        dpi = options.dpi,
        "Rasterized PDF",
    );

    Ok(pages)
}

async fn run_renderer(
    input: &Path,
    out_dir: &Path,
    options: &PdfRenderOptions,
) -> Result<(), CoreError> {
    let mut cmd = tokio::process::Command::new(&options.renderer);
    cmd.arg("-r").arg(options.dpi.to_string()).arg("-png");
    if let Some(first) = options.first_page {
        cmd.arg("-f").arg(first.to_string());
    }
    if let Some(last) = options.last_page {
        cmd.arg("-l").arg(last.to_string());
    }
    cmd.arg(input).arg(out_dir.join(PAGE_PREFIX));

    let output = cmd.output().await.map_err(|e| {
        CoreError::Internal(format!(
            "failed to run PDF renderer '{}': {e}",
            options.renderer.display()
        ))
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(CoreError::invalid_format(
            "pdf",
            format!(
                "renderer exited with {:?}: {}",
                output.status.code(),
                stderr.trim()
            ),
        ));
    }
    Ok(())
}

/// Read `page-N.png` files back in page order.
async fn collect_pages(dir: &Path) -> Result<Vec<DecodedImage>, CoreError> {
    let io_err = |e: std::io::Error| CoreError::Internal(format!("failed to read rendered pages: {e}"));

    let mut paths = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await.map_err(io_err)?;
    while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
        let path = entry.path();
        if let Some(number) = page_number(&path) {
            paths.push((number, path));
        }
    }
    paths.sort_by_key(|(number, _)| *number);

    let mut pages = Vec::with_capacity(paths.len());
    for (_, path) in paths {
        let png = tokio::fs::read(&path).await.map_err(io_err)?;
        let (width, height) = image::image_dimensions(&path)
            .map_err(|e| CoreError::invalid_format("pdf", format!("unreadable page image: {e}")))?;
        pages.push(DecodedImage { width, height, png });
    }
    Ok(pages)
}

/// Parse the page number out of `page-007.png`.
fn page_number(path: &Path) -> Option<u32> {
    if path.extension()? != "png" {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    stem.strip_prefix(PAGE_PREFIX)?
        .strip_prefix('-')?
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn default_options_are_valid() {
        assert!(PdfRenderOptions::default().validate().is_ok());
    }

    #[test]
    fn inverted_range_rejected() {
        let opts = PdfRenderOptions::default().with_page_range(Some(5), Some(2));
        let err = opts.validate().unwrap_err();
        assert!(err.to_string().contains("must not be greater"));
    }

    #[test]
    fn zero_page_rejected() {
        let opts = PdfRenderOptions::default().with_page_range(Some(0), None);
        assert!(opts.validate().is_err());
    }

    #[test]
    fn dpi_out_of_bounds_rejected() {
        let opts = PdfRenderOptions {
            dpi: 10,
            ..PdfRenderOptions::default()
        };
        assert!(opts.validate().is_err());
    }

    #[test]
    fn page_numbers_parse_padded_names() {
        assert_eq!(page_number(Path::new("/tmp/x/page-1.png")), Some(1));
        assert_eq!(page_number(Path::new("/tmp/x/page-012.png")), Some(12));
        assert_eq!(page_number(Path::new("/tmp/x/input.pdf")), None);
        assert_eq!(page_number(Path::new("/tmp/x/other-1.png")), None);
    }

    #[tokio::test]
    async fn non_pdf_bytes_are_invalid_format() {
        let result = rasterize_pdf(b"hello world", &PdfRenderOptions::default()).await;
        assert_matches!(result, Err(CoreError::InvalidFormat { kind: "pdf", .. }));
    }

    #[tokio::test]
    async fn missing_renderer_is_internal_error() {
        let opts = PdfRenderOptions {
            renderer: PathBuf::from("/nonexistent/pdftoppm"),
            ..PdfRenderOptions::default()
        };
        let result = rasterize_pdf(b"%PDF-1.4\n%%EOF", &opts).await;
        assert_matches!(result, Err(CoreError::Internal(_)));
    }

    // -----------------------------------------------------------------------
    // Renderer stand-ins
    // -----------------------------------------------------------------------

    /// Write an executable shell script that records the output prefix it
    /// was given into `record`, then runs `body`.
    #[cfg(unix)]
    fn fake_renderer(dir: &Path, record: &Path, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let script = dir.join("renderer.sh");
        let text = format!(
            "#!/bin/sh\nfor last; do :; done\necho \"$last\" > '{}'\n{body}\n",
            record.display()
        );
        std::fs::write(&script, text).unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        script
    }

    #[cfg(unix)]
    fn write_png(path: &Path, side: u32) {
        image::RgbImage::new(side, side).save(path).unwrap();
    }

    /// The scratch directory the renderer wrote into.
    #[cfg(unix)]
    fn scratch_dir(record: &Path) -> PathBuf {
        let prefix = std::fs::read_to_string(record).unwrap();
        Path::new(prefix.trim()).parent().unwrap().to_path_buf()
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn pages_come_back_in_numeric_order_and_scratch_is_removed() {
        let fixtures = tempfile::tempdir().unwrap();
        write_png(&fixtures.path().join("two.png"), 2);
        write_png(&fixtures.path().join("ten.png"), 10);
        let record = fixtures.path().join("prefix.txt");

        let body = format!(
            "cp '{dir}/ten.png' \"$last-10.png\"\ncp '{dir}/two.png' \"$last-2.png\"",
            dir = fixtures.path().display()
        );
        let opts = PdfRenderOptions {
            renderer: fake_renderer(fixtures.path(), &record, &body),
            ..PdfRenderOptions::default()
        };

        let pages = rasterize_pdf(b"%PDF-1.4\n%%EOF", &opts).await.unwrap();

        let widths: Vec<u32> = pages.iter().map(|p| p.width).collect();
        assert_eq!(widths, vec![2, 10]);

        let scratch = scratch_dir(&record);
        assert!(scratch
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("scribe-pdf-"));
        assert!(!scratch.exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_renderer_is_invalid_format_and_scratch_is_removed() {
        let fixtures = tempfile::tempdir().unwrap();
        let record = fixtures.path().join("prefix.txt");
        let opts = PdfRenderOptions {
            renderer: fake_renderer(fixtures.path(), &record, "echo broken >&2\nexit 1"),
            ..PdfRenderOptions::default()
        };

        let result = rasterize_pdf(b"%PDF-1.4\n%%EOF", &opts).await;

        assert_matches!(result, Err(CoreError::InvalidFormat { kind: "pdf", .. }));
        assert!(!scratch_dir(&record).exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn renderer_without_output_is_invalid_format() {
        let fixtures = tempfile::tempdir().unwrap();
        let record = fixtures.path().join("prefix.txt");
        let opts = PdfRenderOptions {
            renderer: fake_renderer(fixtures.path(), &record, "exit 0"),
            ..PdfRenderOptions::default()
        };

        let result = rasterize_pdf(b"%PDF-1.4\n%%EOF", &opts).await;

        assert_matches!(result, Err(CoreError::InvalidFormat { kind: "pdf", .. }));
        assert!(!scratch_dir(&record).exists());
    }
}
