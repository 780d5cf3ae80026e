use crate::config::Vendor;

/// Message returned when a vendor refuses requests from the caller's region.
pub const UNSUPPORTED_REGION_MESSAGE: &str = "The AI API is not available in your current location. \
     Please try using a VPN or check if the API is available in your region.";

/// Errors from the outbound AI call.
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    /// No API key is configured. Raised before any network activity.
    #[error("No API key configured for {vendor}")]
    MissingApiKey { vendor: Vendor },

    #[error("{}", UNSUPPORTED_REGION_MESSAGE)]
    UnsupportedRegion,

    #[error("Invalid API key. Please check your API key configuration.")]
    InvalidApiKey,

    /// The vendor reported an error. `status` is passed through to the client.
    #[error("AI API error ({status}): {message}")]
    Vendor { status: u16, message: String },

    /// The selected vendor cannot accept this kind of content.
    #[error("{vendor} does not support {content} input")]
    UnsupportedContent {
        vendor: Vendor,
        content: &'static str,
    },

    /// 2xx response without any generated text.
    #[error("AI API returned no text: {0}")]
    EmptyResponse(String),

    #[error("Unable to connect to AI API: {0}")]
    Connect(String),

    #[error("AI API request timed out: {0}")]
    Timeout(String),

    #[error("Error communicating with AI API: {0}")]
    Request(String),

    #[error("Invalid JSON response from AI API: {0}")]
    Decode(String),
}

impl AiError {
    /// HTTP status the API layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingApiKey { .. } | Self::InvalidApiKey => 401,
            Self::UnsupportedRegion | Self::UnsupportedContent { .. } => 400,
            Self::Vendor { status, .. } if (400..600).contains(status) => *status,
            Self::Vendor { .. } => 502,
            Self::EmptyResponse(_) | Self::Request(_) | Self::Decode(_) => 502,
            Self::Connect(_) => 503,
            Self::Timeout(_) => 504,
        }
    }

    /// Short machine-readable code for error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingApiKey { .. } => "MISSING_API_KEY",
            Self::UnsupportedRegion => "UNSUPPORTED_REGION",
            Self::InvalidApiKey => "INVALID_API_KEY",
            Self::Vendor { .. } => "VENDOR_ERROR",
            Self::UnsupportedContent { .. } => "UNSUPPORTED_CONTENT",
            Self::EmptyResponse(_) => "EMPTY_RESPONSE",
            Self::Connect(_) => "UPSTREAM_UNAVAILABLE",
            Self::Timeout(_) => "UPSTREAM_TIMEOUT",
            Self::Request(_) | Self::Decode(_) => "UPSTREAM_ERROR",
        }
    }
}

impl From<reqwest::Error> for AiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::Connect(err.to_string())
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Request(err.to_string())
        }
    }
}

/// Map a vendor-reported error onto an [`AiError`].
///
/// Region blocks are recognised by the word "location" in the message.
pub fn classify_vendor_error(status: u16, message: String) -> AiError {
    let lower = message.to_lowercase();
    if lower.contains("location") {
        AiError::UnsupportedRegion
    } else if status == 401
        || status == 403
        || lower.contains("api key not valid")
        || lower.contains("invalid api key")
    {
        AiError::InvalidApiKey
    } else {
        AiError::Vendor { status, message }
    }
}

/// Pull `error.message` out of a vendor error body, falling back to the raw text.
pub(crate) fn error_message_from_body(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| {
            json.get("error")
                .and_then(|e| e.get("message").or(Some(e)))
                .and_then(|m| m.as_str().map(str::to_string))
        })
        .unwrap_or_else(|| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn location_means_region_block() {
        let err = classify_vendor_error(
            400,
            "User location is not supported for the API use.".to_string(),
        );
        assert_matches!(err, AiError::UnsupportedRegion);
        assert_eq!(err.status_code(), 400);
        assert!(err.to_string().contains("VPN"));
    }

    #[test]
    fn bad_keys_are_401() {
        assert_matches!(
            classify_vendor_error(400, "API key not valid. Please pass a valid API key.".into()),
            AiError::InvalidApiKey
        );
        assert_matches!(
            classify_vendor_error(403, "Forbidden".into()),
            AiError::InvalidApiKey
        );
        assert_eq!(AiError::InvalidApiKey.status_code(), 401);
    }

    #[test]
    fn other_errors_pass_status_through() {
        let err = classify_vendor_error(429, "Resource exhausted".into());
        assert_matches!(err, AiError::Vendor { status: 429, .. });
        assert_eq!(err.status_code(), 429);
    }

    #[test]
    fn non_error_vendor_status_becomes_bad_gateway() {
        let err = AiError::Vendor {
            status: 200,
            message: "odd".into(),
        };
        assert_eq!(err.status_code(), 502);
    }

    #[test]
    fn transport_statuses() {
        assert_eq!(AiError::Connect("x".into()).status_code(), 503);
        assert_eq!(AiError::Timeout("x".into()).status_code(), 504);
        assert_eq!(AiError::Decode("x".into()).status_code(), 502);
    }

    #[test]
    fn error_message_extraction() {
        assert_eq!(
            error_message_from_body(r#"{"error": {"code": 400, "message": "bad thing"}}"#),
            "bad thing"
        );
        assert_eq!(error_message_from_body(r#"{"error": "flat"}"#), "flat");
        assert_eq!(error_message_from_body("  plain text "), "plain text");
    }
}
