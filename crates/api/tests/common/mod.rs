#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::{Json, Router};
use http_body_util::BodyExt;
use scribe_ai::{AiBridge, AiConfig, Vendor};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::ServiceExt;

use scribe_api::config::ServerConfig;
use scribe_api::router::build_app_router;
use scribe_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        max_request_body_mb: 100,
        database_url: "sqlite::memory:".to_string(),
        ocr_engine: "/nonexistent/scribe-test-ocr".into(),
    }
}

/// Gemini configuration pointed at `base_url` with a test key and a short
/// vendor timeout.
pub fn gemini_config(base_url: &str) -> AiConfig {
    let mut config = AiConfig::for_vendor(Vendor::Gemini);
    config.api_key = Some("test-key".to_string());
    config.base_url = base_url.to_string();
    config.timeout = Duration::from_secs(1);
    config
}

/// Build the full application router, as `main.rs` does, around the given
/// pool and AI configuration.
pub fn build_test_app(pool: SqlitePool, ai: AiConfig) -> Router {
    build_test_app_with(pool, ai, test_config())
}

/// Like [`build_test_app`], with a caller-tuned server configuration.
pub fn build_test_app_with(pool: SqlitePool, ai: AiConfig, config: ServerConfig) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        ai: Arc::new(AiBridge::new(ai).unwrap()),
    };
    build_app_router(state, &config)
}

/// App whose vendor endpoint is unreachable. For routes that must not call
/// the vendor at all.
pub fn build_offline_app(pool: SqlitePool) -> Router {
    build_test_app(pool, gemini_config("http://127.0.0.1:1"))
}

// ---------------------------------------------------------------------------
// Fake vendor
// ---------------------------------------------------------------------------

/// Serve `router` on an ephemeral port and return its base URL.
pub async fn spawn_vendor(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// A Gemini look-alike.
///
/// Text mentioning `E=mc^2` gets a summary with a formula piece. Requests
/// with inline data get a transcript naming the attachment count. Anything
/// else is echoed back.
pub async fn spawn_fake_gemini() -> String {
    async fn generate(Json(body): Json<Value>) -> Json<Value> {
        let parts = body["contents"][0]["parts"]
            .as_array()
            .cloned()
            .unwrap_or_default();
        let text = parts
            .iter()
            .filter_map(|p| p["text"].as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let attachments = parts.iter().filter(|p| p.get("inlineData").is_some()).count();

        let reply = if text.contains("E=mc^2") {
            "<summary><summary_piece><text>Mass-energy equivalence was discovered in 1905.</text>\
             <formula>E=mc^2</formula></summary_piece></summary>"
                .to_string()
        } else if attachments > 0 {
            format!("<extracted_text><text>{attachments} attachment(s)</text></extracted_text>")
        } else {
            format!("echo: {text}")
        };

        Json(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": reply}]},
                "finishReason": "STOP"
            }]
        }))
    }

    spawn_vendor(Router::new().fallback(generate)).await
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, Body::empty(), None).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Body::empty(), None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(
        app,
        Method::POST,
        uri,
        Body::from(body.to_string()),
        Some("application/json"),
    )
    .await
}

pub async fn put_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(
        app,
        Method::PUT,
        uri,
        Body::from(body.to_string()),
        Some("application/json"),
    )
    .await
}

pub async fn post_multipart(app: Router, uri: &str, form: MultipartBody) -> Response<Body> {
    let content_type = form.content_type();
    send(
        app,
        Method::POST,
        uri,
        Body::from(form.finish()),
        Some(content_type.as_str()),
    )
    .await
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Body,
    content_type: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(ct) = content_type {
        builder = builder.header("content-type", ct);
    }
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Multipart bodies
// ---------------------------------------------------------------------------

const BOUNDARY: &str = "scribe-test-boundary";

/// Minimal `multipart/form-data` encoder.
#[derive(Default)]
pub struct MultipartBody {
    buf: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        write!(
            self.buf,
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        )
        .unwrap();
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Self {
        write!(
            self.buf,
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; \
             filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .unwrap();
        self.buf.extend_from_slice(bytes);
        self.buf.extend_from_slice(b"\r\n");
        self
    }

    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={BOUNDARY}")
    }

    pub fn finish(mut self) -> Vec<u8> {
        write!(self.buf, "--{BOUNDARY}--\r\n").unwrap();
        self.buf
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A small PNG image.
pub fn png_bytes() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(8, 8, image::Rgb([200, 30, 30]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

/// A DOCX container whose body holds one paragraph per entry.
pub fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t>{p}</w:t></w:r></w:p>"))
        .collect();
    let xml = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
         <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
         <w:body>{body}</w:body></w:document>"
    );

    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    zip.start_file("word/document.xml", zip::write::SimpleFileOptions::default())
        .unwrap();
    zip.write_all(xml.as_bytes()).unwrap();
    zip.finish().unwrap().into_inner()
}
