//! Handlers for stored summaries.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use scribe_core::error::CoreError;
use scribe_core::summary::{validate_new_summary, validate_summary_update};
use scribe_core::types::DbId;
use scribe_db::models::summary::{CreateSummary, SummaryListParams, UpdateSummary};
use scribe_db::repositories::SummaryRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Summary",
        id,
    })
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// POST /summaries
pub async fn create_summary(
    State(state): State<AppState>,
    Json(input): Json<CreateSummary>,
) -> AppResult<impl IntoResponse> {
    validate_new_summary(
        &input.title,
        &input.content,
        input.subject.as_deref(),
        input.author.as_deref(),
    )?;

    let summary = SummaryRepo::create(&state.pool, &input).await?;

    tracing::info!(
        summary_id = summary.id,
        subject = ?summary.subject,
        "Summary created",
    );

    Ok((StatusCode::CREATED, Json(summary)))
}

/// GET /summaries?limit&offset
pub async fn list_summaries(
    State(state): State<AppState>,
    Query(params): Query<SummaryListParams>,
) -> AppResult<impl IntoResponse> {
    let summaries = SummaryRepo::list(&state.pool, &params).await?;
    Ok(Json(summaries))
}

/// GET /summaries/{id}
pub async fn get_summary(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let summary = SummaryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(summary))
}

/// PUT /summaries/{id}
///
/// Partial update: omitted fields keep their stored values.
pub async fn update_summary(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSummary>,
) -> AppResult<impl IntoResponse> {
    validate_summary_update(
        input.title.as_deref(),
        input.content.as_deref(),
        input.subject.as_deref(),
        input.author.as_deref(),
    )?;

    let summary = SummaryRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(summary_id = id, "Summary updated");
    Ok(Json(summary))
}

/// DELETE /summaries/{id}
pub async fn delete_summary(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !SummaryRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }

    tracing::info!(summary_id = id, "Summary deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

/// GET /summaries/subject/{subject}
///
/// Subject matching ignores case.
pub async fn list_by_subject(
    State(state): State<AppState>,
    Path(subject): Path<String>,
) -> AppResult<impl IntoResponse> {
    let summaries = SummaryRepo::list_by_subject(&state.pool, &subject).await?;
    Ok(Json(summaries))
}

/// GET /summaries/title/{title}
pub async fn list_by_title(
    State(state): State<AppState>,
    Path(title): Path<String>,
) -> AppResult<impl IntoResponse> {
    let summaries = SummaryRepo::list_by_title(&state.pool, &title).await?;
    Ok(Json(summaries))
}

/// GET /summaries/author/{author}
pub async fn list_by_author(
    State(state): State<AppState>,
    Path(author): Path<String>,
) -> AppResult<impl IntoResponse> {
    let summaries = SummaryRepo::list_by_author(&state.pool, &author).await?;
    Ok(Json(summaries))
}
