//! Handlers for the XML helper endpoints.
//!
//! These never reach the AI vendor; they post-process model output or wrap
//! caller content in a `<summary>` / `<test>` document.

use axum::Json;
use scribe_core::xml::{build_markup_xml, parse_tagged_xml, XmlTag};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::AppResult;

/// Request body for `POST /parse_xml`.
#[derive(Debug, Deserialize)]
pub struct ParseXmlRequest {
    pub text: String,
    #[serde(default = "default_tag_type")]
    pub tag_type: String,
}

fn default_tag_type() -> String {
    XmlTag::Test.as_str().to_string()
}

#[derive(Debug, Serialize)]
pub struct ParseXmlResponse {
    pub original_text: String,
    pub parsed_text: String,
}

/// Request body for the `create_*_xml` endpoints.
#[derive(Debug, Deserialize)]
pub struct MarkupRequest {
    pub content: String,
    pub title: Option<String>,
    pub metadata: Option<Map<String, Value>>,
}

#[derive(Debug, Serialize)]
pub struct MarkupResponse {
    pub xml_content: String,
}

/// POST /parse_xml
///
/// Strips any preamble before the first `<test>` or `<summary>` tag.
pub async fn parse_xml(Json(input): Json<ParseXmlRequest>) -> AppResult<Json<ParseXmlResponse>> {
    let parsed = parse_tagged_xml(&input.text, &input.tag_type)?.to_string();

    Ok(Json(ParseXmlResponse {
        original_text: input.text,
        parsed_text: parsed,
    }))
}

/// POST /create_summary_xml
pub async fn create_summary_xml(
    Json(input): Json<MarkupRequest>,
) -> AppResult<Json<MarkupResponse>> {
    markup(XmlTag::Summary, input)
}

/// POST /create_test_xml
pub async fn create_test_xml(Json(input): Json<MarkupRequest>) -> AppResult<Json<MarkupResponse>> {
    markup(XmlTag::Test, input)
}

fn markup(root: XmlTag, input: MarkupRequest) -> AppResult<Json<MarkupResponse>> {
    let xml_content = build_markup_xml(
        root,
        &input.content,
        input.title.as_deref(),
        input.metadata.as_ref(),
    )?;
    Ok(Json(MarkupResponse { xml_content }))
}
