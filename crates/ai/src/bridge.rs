//! Outbound request pipeline shared by every vendor.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::adapter::{adapter_for, VendorAdapter};
use crate::config::{AiConfig, Vendor};
use crate::content::PromptContent;
use crate::error::{classify_vendor_error, error_message_from_body, AiError};

/// Generated text plus the vendor's raw JSON body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiResponse {
    pub response: String,
    pub raw_response: Value,
}

/// HTTP client for the configured AI vendor.
///
/// Each [`send`](Self::send) issues exactly one request. There is no retry;
/// failures are classified into [`AiError`] and returned.
pub struct AiBridge {
    client: reqwest::Client,
    config: AiConfig,
    adapter: Box<dyn VendorAdapter>,
}

impl AiBridge {
    /// Build a bridge for `config`.
    ///
    /// The underlying client keeps no idle connections between requests and
    /// applies `config.timeout` to every call.
    pub fn new(config: AiConfig) -> Result<Self, AiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| AiError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            adapter: adapter_for(config.vendor),
            config,
        })
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    pub fn vendor(&self) -> Vendor {
        self.config.vendor
    }

    /// Send `system_prompt` and `content` to the vendor.
    pub async fn send(
        &self,
        system_prompt: &str,
        content: PromptContent,
        additional_params: Option<&Map<String, Value>>,
    ) -> Result<AiResponse, AiError> {
        let vendor = self.vendor();
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(AiError::MissingApiKey { vendor })?;

        let mut payload = self
            .adapter
            .build_payload(&self.config, system_prompt, &content)?;
        if let Some(params) = additional_params {
            self.adapter.merge_params(&mut payload, params);
        }

        let url = self.adapter.endpoint(&self.config);
        tracing::debug!(
            vendor = %vendor,
            model = %self.config.model,
            content = content.kind(),
            attachments = content.attachment_count(),
            "Sending AI request",
        );

        let started = Instant::now();
        let request = self.client.post(&url).json(&payload);
        let response = self
            .adapter
            .authorize(request, &self.config, api_key)
            .send()
            .await
            .map_err(|e| log_transport_error(vendor, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| log_transport_error(vendor, e))?;

        if !status.is_success() {
            let message = error_message_from_body(&body);
            tracing::warn!(
                vendor = %vendor,
                status = status.as_u16(),
                error = %message,
                "AI vendor returned an error",
            );
            return Err(classify_vendor_error(status.as_u16(), message));
        }

        let raw_response: Value =
            serde_json::from_str(&body).map_err(|e| AiError::Decode(e.to_string()))?;
        let text = self.adapter.parse_response(&raw_response)?;

        tracing::info!(
            vendor = %vendor,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            response_chars = text.chars().count(),
            "AI request completed",
        );

        Ok(AiResponse {
            response: text,
            raw_response,
        })
    }
}

fn log_transport_error(vendor: Vendor, err: reqwest::Error) -> AiError {
    let err = AiError::from(err);
    tracing::error!(vendor = %vendor, error = %err, "AI request failed");
    err
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[tokio::test]
    async fn missing_key_fails_before_network() {
        let mut config = AiConfig::for_vendor(Vendor::Gemini);
        // Unroutable; the call must not get this far.
        config.base_url = "http://127.0.0.1:1".into();
        let bridge = AiBridge::new(config).unwrap();

        let result = bridge
            .send("S", PromptContent::Text("t".into()), None)
            .await;
        assert_matches!(result, Err(AiError::MissingApiKey { vendor: Vendor::Gemini }));
    }

    #[tokio::test]
    async fn unsupported_content_fails_before_network() {
        let mut config = AiConfig::for_vendor(Vendor::DeepSeek);
        config.api_key = Some("k".into());
        config.base_url = "http://127.0.0.1:1".into();
        let bridge = AiBridge::new(config).unwrap();

        let content = PromptContent::Images {
            instruction: "Read".into(),
            images: Vec::new(),
        };
        let result = bridge.send("S", content, None).await;
        assert_matches!(result, Err(AiError::UnsupportedContent { .. }));
    }
}
