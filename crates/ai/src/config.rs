//! Vendor configuration.
//!
//! An [`AiConfig`] is built once at startup and handed to
//! [`AiBridge::new`](crate::AiBridge::new). Values are layered:
//! per-vendor defaults, then an optional JSON file, then environment
//! variables.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default config file, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_TOP_P: f64 = 0.9;
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

const DEFAULT_SITE_URL: &str = "http://localhost:8000";
const DEFAULT_APP_NAME: &str = "Scribe";

// ---------------------------------------------------------------------------
// Vendors
// ---------------------------------------------------------------------------

/// Supported AI vendors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vendor {
    Gemini,
    DeepSeek,
    OpenRouter,
}

impl Vendor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::DeepSeek => "deepseek",
            Self::OpenRouter => "openrouter",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini-2.0-flash",
            Self::DeepSeek => "deepseek-chat",
            Self::OpenRouter => "google/gemini-2.0-flash-001",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::Gemini => "https://generativelanguage.googleapis.com",
            Self::DeepSeek => "https://api.deepseek.com",
            Self::OpenRouter => "https://openrouter.ai/api/v1",
        }
    }

    /// Vendor-specific environment variable holding the API key.
    pub fn key_env_var(&self) -> &'static str {
        match self {
            Self::Gemini => "GEMINI_API_KEY",
            Self::DeepSeek => "DEEPSEEK_API_KEY",
            Self::OpenRouter => "OPENROUTER_API_KEY",
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Vendor {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "deepseek" => Ok(Self::DeepSeek),
            "openrouter" => Ok(Self::OpenRouter),
            other => Err(ConfigError::Invalid {
                key: "vendor",
                message: format!("unknown vendor '{other}' (expected gemini, deepseek or openrouter)"),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised while loading [`AiConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

// ---------------------------------------------------------------------------
// File overlay
// ---------------------------------------------------------------------------

/// Shape of the optional JSON config file. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    pub vendor: Option<String>,
    pub api_token: Option<String>,
    /// Older files used `api_key`; `api_token` wins when both are present.
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub api_url: Option<String>,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub max_tokens: Option<u32>,
    pub timeout_secs: Option<u64>,
}

impl FileConfig {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

// ---------------------------------------------------------------------------
// AiConfig
// ---------------------------------------------------------------------------

/// Everything needed to talk to one vendor.
#[derive(Clone)]
pub struct AiConfig {
    pub vendor: Vendor,
    pub api_key: Option<String>,
    pub model: String,
    /// Base URL. A full endpoint URL (ending in `:generateContent` or
    /// `/chat/completions`) is also accepted and used as-is.
    pub base_url: String,
    pub temperature: f64,
    pub top_p: f64,
    pub max_tokens: u32,
    /// Bound on the whole outbound call, connect through body.
    pub timeout: Duration,
    /// Sent as `HTTP-Referer` to OpenRouter.
    pub site_url: String,
    /// Sent as `X-Title` to OpenRouter.
    pub app_name: String,
}

// The API key stays out of logs.
impl fmt::Debug for AiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AiConfig")
            .field("vendor", &self.vendor)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("top_p", &self.top_p)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl AiConfig {
    /// Defaults for `vendor` with no API key.
    pub fn for_vendor(vendor: Vendor) -> Self {
        Self {
            vendor,
            api_key: None,
            model: vendor.default_model().to_string(),
            base_url: vendor.default_base_url().to_string(),
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            site_url: DEFAULT_SITE_URL.to_string(),
            app_name: DEFAULT_APP_NAME.to_string(),
        }
    }

    /// Load configuration from the config file and the process environment.
    ///
    /// | Env Var                   | Default / effect                                  |
    /// |---------------------------|---------------------------------------------------|
    /// | `AI_CONFIG_FILE`          | `config.json`; a missing default file is skipped  |
    /// | `AI_VENDOR`               | `gemini`                                          |
    /// | `AI_API_KEY`              | falls back to `GEMINI_API_KEY` / `DEEPSEEK_API_KEY` / `OPENROUTER_API_KEY` |
    /// | `AI_MODEL`                | per vendor                                        |
    /// | `AI_BASE_URL`             | per vendor                                        |
    /// | `TEMPERATURE`             | `0.7`                                             |
    /// | `TOP_P`                   | `0.9`                                             |
    /// | `MAX_TOKENS`              | `1024`                                            |
    /// | `AI_TIMEOUT_SECS`         | `60`                                              |
    /// | `SITE_URL`                | `http://localhost:8000`                           |
    /// | `APP_NAME`                | `Scribe`                                          |
    pub fn load() -> Result<Self, ConfigError> {
        let env = |key: &str| std::env::var(key).ok();

        let file = match env("AI_CONFIG_FILE") {
            Some(path) => Some(FileConfig::from_path(Path::new(&path))?),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Some(FileConfig::from_path(path)?)
                } else {
                    tracing::debug!("No {DEFAULT_CONFIG_FILE} found, using environment only");
                    None
                }
            }
        };

        Self::from_sources(file.as_ref(), env)
    }

    /// Layer `file` and then `env` over the vendor defaults.
    pub fn from_sources<F>(file: Option<&FileConfig>, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let vendor = match env("AI_VENDOR").or_else(|| file.and_then(|f| f.vendor.clone())) {
            Some(name) => name.parse()?,
            None => Vendor::Gemini,
        };
        let mut config = Self::for_vendor(vendor);

        if let Some(file) = file {
            config.api_key = file.api_token.clone().or_else(|| file.api_key.clone());
            if let Some(model) = &file.model {
                config.model = model.clone();
            }
            if let Some(url) = &file.api_url {
                config.base_url = url.clone();
            }
            if let Some(t) = file.temperature {
                config.temperature = t;
            }
            if let Some(p) = file.top_p {
                config.top_p = p;
            }
            if let Some(m) = file.max_tokens {
                config.max_tokens = m;
            }
            if let Some(secs) = file.timeout_secs {
                config.timeout = Duration::from_secs(secs);
            }
        }

        if let Some(key) = env("AI_API_KEY").or_else(|| env(vendor.key_env_var())) {
            config.api_key = Some(key);
        }
        if let Some(model) = env("AI_MODEL") {
            config.model = model;
        }
        if let Some(url) = env("AI_BASE_URL") {
            config.base_url = url;
        }
        if let Some(raw) = env("TEMPERATURE") {
            config.temperature = parse_env("TEMPERATURE", &raw)?;
        }
        if let Some(raw) = env("TOP_P") {
            config.top_p = parse_env("TOP_P", &raw)?;
        }
        if let Some(raw) = env("MAX_TOKENS") {
            config.max_tokens = parse_env("MAX_TOKENS", &raw)?;
        }
        if let Some(raw) = env("AI_TIMEOUT_SECS") {
            config.timeout = Duration::from_secs(parse_env("AI_TIMEOUT_SECS", &raw)?);
        }
        if let Some(site) = env("SITE_URL") {
            config.site_url = site;
        }
        if let Some(name) = env("APP_NAME") {
            config.app_name = name;
        }

        config.base_url = config.base_url.trim_end_matches('/').to_string();
        config.validate()?;
        Ok(config)
    }

    /// Range checks on the sampling parameters and timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::Invalid {
                key: "temperature",
                message: format!("must be between 0 and 2 (got {})", self.temperature),
            });
        }
        if !(0.0..=1.0).contains(&self.top_p) {
            return Err(ConfigError::Invalid {
                key: "top_p",
                message: format!("must be between 0 and 1 (got {})", self.top_p),
            });
        }
        if self.max_tokens == 0 {
            return Err(ConfigError::Invalid {
                key: "max_tokens",
                message: "must be greater than 0".to_string(),
            });
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::Invalid {
                key: "timeout_secs",
                message: "must be greater than 0".to_string(),
            });
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "model",
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_env<T: FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T::Err: fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        message: format!("'{raw}': {e}"),
    })
}
