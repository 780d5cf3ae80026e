//! OpenAI-compatible chat completions adapter (DeepSeek, OpenRouter).

use serde_json::{json, Map, Value};

use crate::adapter::{merge_into, VendorAdapter};
use crate::config::{AiConfig, Vendor};
use crate::content::PromptContent;
use crate::error::{classify_vendor_error, AiError};

const COMPLETIONS_PATH: &str = "/chat/completions";

/// Keys callers may not override. Responses are never streamed.
const FIXED_KEYS: &[&str] = &["stream", "messages"];

pub struct OpenAiCompatibleAdapter {
    vendor: Vendor,
}

impl OpenAiCompatibleAdapter {
    pub fn new(vendor: Vendor) -> Self {
        Self { vendor }
    }

    /// Only OpenRouter routes to models that accept image parts.
    fn accepts_images(&self) -> bool {
        self.vendor == Vendor::OpenRouter
    }

    fn user_content(&self, content: &PromptContent) -> Result<Value, AiError> {
        match content {
            PromptContent::Text(text) => Ok(Value::String(text.clone())),
            PromptContent::Images {
                instruction,
                images,
            } if self.accepts_images() => {
                let mut parts = Vec::with_capacity(images.len() + 1);
                parts.push(json!({ "type": "text", "text": instruction }));
                parts.extend(images.iter().map(|image| {
                    json!({
                        "type": "image_url",
                        "image_url": { "url": image.data_uri() },
                    })
                }));
                Ok(Value::Array(parts))
            }
            other => Err(AiError::UnsupportedContent {
                vendor: self.vendor,
                content: other.kind(),
            }),
        }
    }
}

impl VendorAdapter for OpenAiCompatibleAdapter {
    fn vendor(&self) -> Vendor {
        self.vendor
    }

    fn build_payload(
        &self,
        config: &AiConfig,
        system_prompt: &str,
        content: &PromptContent,
    ) -> Result<Value, AiError> {
        let user = self.user_content(content)?;
        Ok(json!({
            "model": config.model,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": user },
            ],
            "temperature": config.temperature,
            "top_p": config.top_p,
            "max_tokens": config.max_tokens,
            "stream": false,
        }))
    }

    fn merge_params(&self, payload: &mut Value, params: &Map<String, Value>) {
        merge_into(Some(payload), params, FIXED_KEYS);
    }

    fn endpoint(&self, config: &AiConfig) -> String {
        if config.base_url.ends_with(COMPLETIONS_PATH) {
            config.base_url.clone()
        } else {
            format!("{}{COMPLETIONS_PATH}", config.base_url)
        }
    }

    fn authorize(
        &self,
        request: reqwest::RequestBuilder,
        config: &AiConfig,
        api_key: &str,
    ) -> reqwest::RequestBuilder {
        let request = request.bearer_auth(api_key);
        match self.vendor {
            Vendor::OpenRouter => request
                .header("HTTP-Referer", &config.site_url)
                .header("X-Title", &config.app_name),
            _ => request,
        }
    }

    fn parse_response(&self, body: &Value) -> Result<String, AiError> {
        if let Some(error) = body.get("error") {
            let status = error
                .get("code")
                .and_then(Value::as_u64)
                .and_then(|c| u16::try_from(c).ok())
                .unwrap_or(502);
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("Unknown error")
                .to_string();
            return Err(classify_vendor_error(status, message));
        }

        match body
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
        {
            Some(text) if !text.is_empty() => Ok(text.to_string()),
            _ => Err(AiError::EmptyResponse(
                "no choices[0].message.content in response".to_string(),
            )),
        }
    }
}
