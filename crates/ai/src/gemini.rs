//! Google Gemini `generateContent` REST adapter.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::{json, Map, Value};

use crate::adapter::{merge_into, VendorAdapter};
use crate::config::{AiConfig, Vendor};
use crate::content::PromptContent;
use crate::error::{classify_vendor_error, AiError};

/// Returned in place of text when Gemini blocks output as recitation.
pub const RECITATION_NOTICE: &str =
    "The content could not be processed because of possible copyright restrictions.";

const GENERATE_SUFFIX: &str = ":generateContent";

pub struct GeminiAdapter;

impl VendorAdapter for GeminiAdapter {
    fn vendor(&self) -> Vendor {
        Vendor::Gemini
    }

    fn build_payload(
        &self,
        config: &AiConfig,
        system_prompt: &str,
        content: &PromptContent,
    ) -> Result<Value, AiError> {
        let parts = match content {
            PromptContent::Text(text) => vec![json!({ "text": text })],
            PromptContent::Images {
                instruction,
                images,
            } => {
                let mut parts = Vec::with_capacity(images.len() + 1);
                parts.push(json!({ "text": instruction }));
                parts.extend(images.iter().map(|image| {
                    json!({
                        "inlineData": {
                            "mimeType": image.mime_type,
                            "data": image.base64(),
                        }
                    })
                }));
                parts
            }
            PromptContent::Document {
                instruction,
                mime_type,
                bytes,
            } => vec![
                json!({ "text": instruction }),
                json!({
                    "inlineData": {
                        "mimeType": mime_type,
                        "data": STANDARD.encode(bytes),
                    }
                }),
            ],
        };

        Ok(json!({
            "systemInstruction": { "parts": [{ "text": system_prompt }] },
            "contents": [{ "role": "user", "parts": parts }],
            "generationConfig": {
                "temperature": config.temperature,
                "topP": config.top_p,
                "maxOutputTokens": config.max_tokens,
            },
        }))
    }

    fn merge_params(&self, payload: &mut Value, params: &Map<String, Value>) {
        merge_into(payload.get_mut("generationConfig"), params, &[]);
    }

    fn endpoint(&self, config: &AiConfig) -> String {
        if config.base_url.ends_with(GENERATE_SUFFIX) {
            return config.base_url.clone();
        }
        format!(
            "{}/v1beta/models/{}{GENERATE_SUFFIX}",
            config.base_url, config.model
        )
    }

    fn authorize(
        &self,
        request: reqwest::RequestBuilder,
        _config: &AiConfig,
        api_key: &str,
    ) -> reqwest::RequestBuilder {
        request.header("x-goog-api-key", api_key)
    }

    fn parse_response(&self, body: &Value) -> Result<String, AiError> {
        let candidate = body.get("candidates").and_then(|c| c.get(0));

        let text: String = candidate
            .and_then(|c| c.pointer("/content/parts"))
            .and_then(Value::as_array)
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|part| part.get("text").and_then(Value::as_str))
                    .collect()
            })
            .unwrap_or_default();

        if !text.is_empty() {
            return Ok(text);
        }

        if let Some(error) = body.get("error") {
            let status = error
                .get("code")
                .and_then(Value::as_u64)
                .and_then(|c| u16::try_from(c).ok())
                .unwrap_or(500);
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("Unknown error")
                .to_string();
            return Err(classify_vendor_error(status, message));
        }

        let finish_reason = candidate
            .and_then(|c| c.get("finishReason"))
            .and_then(Value::as_str);
        match finish_reason {
            Some("RECITATION") => Ok(RECITATION_NOTICE.to_string()),
            Some(reason) => Err(AiError::EmptyResponse(format!("finishReason {reason}"))),
            None => Err(AiError::EmptyResponse("no candidates in response".to_string())),
        }
    }
}
