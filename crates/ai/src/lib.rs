//! Client for the generative-AI vendors.
//!
//! [`AiBridge`] sends one system prompt plus user content to the vendor
//! selected in [`AiConfig`] and returns the generated text with the raw
//! response. Vendor differences live behind [`VendorAdapter`].

pub mod adapter;
pub mod bridge;
pub mod config;
pub mod content;
pub mod error;
pub mod gemini;
pub mod openai;

pub use adapter::VendorAdapter;
pub use bridge::{AiBridge, AiResponse};
pub use config::{AiConfig, ConfigError, Vendor};
pub use content::{ImagePart, PromptContent};
pub use error::AiError;
