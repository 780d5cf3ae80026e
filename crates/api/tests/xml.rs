//! Integration tests for the XML helper endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, post_json};
use serde_json::json;
use sqlx::SqlitePool;

#[sqlx::test(migrations = "../db/migrations")]
async fn parse_xml_strips_preamble(pool: SqlitePool) {
    let app = common::build_offline_app(pool);
    let text = "Sure, here it is:\n<test><question>Q</question></test>";
    let response = post_json(app, "/parse_xml", json!({"text": text})).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["original_text"], text);
    assert_eq!(json["parsed_text"], "<test><question>Q</question></test>");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn parse_xml_rejects_unknown_tag(pool: SqlitePool) {
    let app = common::build_offline_app(pool);
    let response = post_json(app, "/parse_xml", json!({"text": "x", "tag_type": "quiz"})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_summary_xml_wraps_content(pool: SqlitePool) {
    let app = common::build_offline_app(pool);
    let response = post_json(
        app,
        "/create_summary_xml",
        json!({"content": "<p>x</p>", "metadata": {"subject": "math"}}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let xml = body_json(response).await["xml_content"]
        .as_str()
        .unwrap()
        .to_string();
    assert_eq!(
        xml,
        "<summary>\n    <title>Summary</title>\n    <meta name=\"subject\">math</meta>\n    <content><p>x</p></content>\n</summary>"
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_test_xml_requires_content(pool: SqlitePool) {
    let app = common::build_offline_app(pool);
    let response = post_json(app, "/create_test_xml", json!({"content": ""})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
