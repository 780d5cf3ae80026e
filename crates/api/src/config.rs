use std::path::PathBuf;

use scribe_core::ingest::ocr::DEFAULT_OCR_ENGINE;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `90`). Kept above the AI
    /// vendor timeout so vendor timeouts surface as 504 rather than 408.
    pub request_timeout_secs: u64,
    /// Limit on a whole request body in megabytes (default: `100`).
    pub max_request_body_mb: usize,
    /// SQLite database URL (default: `sqlite://summaries.db`).
    pub database_url: String,
    /// Local OCR engine executable (default: `tesseract` on `PATH`).
    pub ocr_engine: PathBuf,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `8000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `90`                       |
    /// | `MAX_REQUEST_BODY_MB`  | `100`                      |
    /// | `DATABASE_URL`         | `sqlite://summaries.db`    |
    /// | `TESSERACT_PATH`       | `tesseract`                |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "90".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let max_request_body_mb: usize = std::env::var("MAX_REQUEST_BODY_MB")
            .unwrap_or_else(|_| "100".into())
            .parse()
            .expect("MAX_REQUEST_BODY_MB must be a valid usize");

        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://summaries.db".into());

        let ocr_engine = std::env::var("TESSERACT_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_OCR_ENGINE));

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            max_request_body_mb,
            database_url,
            ocr_engine,
        }
    }

    pub fn max_request_body_bytes(&self) -> usize {
        self.max_request_body_mb * 1024 * 1024
    }
}
