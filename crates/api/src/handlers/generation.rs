//! Handlers for text-in generation: summaries and quizzes.

use axum::extract::State;
use axum::Json;
use scribe_ai::{AiResponse, PromptContent};
use scribe_core::prompts::{PromptTask, DEFAULT_NUM_QUESTIONS};
use scribe_core::types::DEFAULT_LANGUAGE;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Request body shared by the generation endpoints.
#[derive(Debug, Deserialize)]
pub struct PromptRequest {
    pub text: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_num_questions")]
    pub num_questions: u32,
    #[serde(default)]
    pub stream: bool,
    pub additional_params: Option<Map<String, Value>>,
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_num_questions() -> u32 {
    DEFAULT_NUM_QUESTIONS
}

/// POST /generate_summary, POST /generate/summary
pub async fn generate_summary(
    State(state): State<AppState>,
    Json(input): Json<PromptRequest>,
) -> AppResult<Json<AiResponse>> {
    run(&state, PromptTask::Summary, input).await
}

/// POST /generate_test, POST /generate/test
///
/// `num_questions` must be between 1 and 50.
pub async fn generate_test(
    State(state): State<AppState>,
    Json(input): Json<PromptRequest>,
) -> AppResult<Json<AiResponse>> {
    let task = PromptTask::test(input.num_questions)?;
    run(&state, task, input).await
}

async fn run(state: &AppState, task: PromptTask, input: PromptRequest) -> AppResult<Json<AiResponse>> {
    if input.stream {
        return Err(AppError::BadRequest(
            "Streaming responses are not supported".into(),
        ));
    }

    let prompt = task.system_prompt(&input.language);
    tracing::debug!(task = ?task, chars = input.text.chars().count(), "Generating");

    let response = state
        .ai
        .send(
            &prompt,
            PromptContent::Text(input.text),
            input.additional_params.as_ref(),
        )
        .await?;
    Ok(Json(response))
}
