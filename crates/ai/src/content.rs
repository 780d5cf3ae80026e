//! User-turn content sent alongside the system prompt.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use scribe_core::ingest::DecodedImage;

/// One image ready for transport.
#[derive(Debug, Clone)]
pub struct ImagePart {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl ImagePart {
    pub fn base64(&self) -> String {
        STANDARD.encode(&self.data)
    }

    /// `data:` URI form used by OpenAI-compatible vendors.
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64())
    }
}

impl From<DecodedImage> for ImagePart {
    fn from(image: DecodedImage) -> Self {
        Self {
            mime_type: image.mime_type().to_string(),
            data: image.png,
        }
    }
}

/// What the user turn of a request carries.
#[derive(Debug, Clone)]
pub enum PromptContent {
    /// Plain text.
    Text(String),
    /// A short instruction followed by one or more images.
    Images {
        instruction: String,
        images: Vec<ImagePart>,
    },
    /// A whole document passed through to vendors that read it natively.
    Document {
        instruction: String,
        mime_type: String,
        bytes: Vec<u8>,
    },
}

impl PromptContent {
    /// Name used in logs and `UnsupportedContent` errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Images { .. } => "image",
            Self::Document { .. } => "document",
        }
    }

    /// Number of binary attachments.
    pub fn attachment_count(&self) -> usize {
        match self {
            Self::Text(_) => 0,
            Self::Images { images, .. } => images.len(),
            Self::Document { .. } => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_uri_format() {
        let part = ImagePart {
            mime_type: "image/png".into(),
            data: b"abc".to_vec(),
        };
        assert_eq!(part.data_uri(), "data:image/png;base64,YWJj");
    }

    #[test]
    fn decoded_image_converts_to_png_part() {
        let decoded = DecodedImage {
            width: 1,
            height: 1,
            png: vec![1, 2, 3],
        };
        let part = ImagePart::from(decoded);
        assert_eq!(part.mime_type, "image/png");
        assert_eq!(part.data, vec![1, 2, 3]);
    }
}
