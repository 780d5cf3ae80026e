//! Raster image decoding.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat};

use crate::error::CoreError;

/// MIME type of every image produced by this module.
pub const TRANSPORT_MIME_TYPE: &str = "image/png";

/// A validated image, re-encoded as PNG for transport to a vendor.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    /// PNG-encoded pixels.
    pub png: Vec<u8>,
}

impl DecodedImage {
    pub fn mime_type(&self) -> &'static str {
        TRANSPORT_MIME_TYPE
    }

    pub(crate) fn from_dynamic(img: &DynamicImage) -> Result<Self, CoreError> {
        let mut png = Vec::new();
        img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|e| CoreError::Internal(format!("failed to encode PNG: {e}")))?;
        Ok(Self {
            width: img.width(),
            height: img.height(),
            png,
        })
    }
}

/// Decode PNG or JPEG bytes. Unreadable input is an `InvalidFormat` error.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, CoreError> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| CoreError::invalid_format("png", e.to_string()))?;
    DecodedImage::from_dynamic(&img)
}
