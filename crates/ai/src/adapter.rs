//! Vendor payload strategy.
//!
//! [`AiBridge`](crate::AiBridge) runs the same pipeline for every vendor and
//! delegates the vendor-specific parts (request body, URL, auth headers,
//! response extraction) to a [`VendorAdapter`].

use serde_json::{Map, Value};

use crate::config::{AiConfig, Vendor};
use crate::content::PromptContent;
use crate::error::AiError;
use crate::gemini::GeminiAdapter;
use crate::openai::OpenAiCompatibleAdapter;

pub trait VendorAdapter: Send + Sync {
    fn vendor(&self) -> Vendor;

    /// Build the JSON request body.
    fn build_payload(
        &self,
        config: &AiConfig,
        system_prompt: &str,
        content: &PromptContent,
    ) -> Result<Value, AiError>;

    /// Shallow-merge caller-supplied parameters over the defaults in `payload`.
    fn merge_params(&self, payload: &mut Value, params: &Map<String, Value>);

    /// Full request URL.
    fn endpoint(&self, config: &AiConfig) -> String;

    /// Attach credentials and vendor-specific headers.
    fn authorize(
        &self,
        request: reqwest::RequestBuilder,
        config: &AiConfig,
        api_key: &str,
    ) -> reqwest::RequestBuilder;

    /// Extract the generated text from a 2xx response body.
    fn parse_response(&self, body: &Value) -> Result<String, AiError>;
}

/// Adapter for the configured vendor.
pub fn adapter_for(vendor: Vendor) -> Box<dyn VendorAdapter> {
    match vendor {
        Vendor::Gemini => Box::new(GeminiAdapter),
        Vendor::DeepSeek | Vendor::OpenRouter => Box::new(OpenAiCompatibleAdapter::new(vendor)),
    }
}

/// Insert every `params` entry into `target` if it is a JSON object.
pub(crate) fn merge_into(target: Option<&mut Value>, params: &Map<String, Value>, skip: &[&str]) {
    if let Some(Value::Object(map)) = target {
        for (key, value) in params {
            if skip.contains(&key.as_str()) {
                continue;
            }
            map.insert(key.clone(), value.clone());
        }
    }
}
