//! Repository for the `summaries` table.
//!
//! Every operation is a single statement, so each runs in SQLite's implicit
//! transaction.

use scribe_core::summary::normalize_subject;
use scribe_core::types::DbId;

use crate::models::summary::{CreateSummary, Summary, SummaryListParams, UpdateSummary};
use crate::DbPool;

/// Column list for `summaries` queries.
const COLUMNS: &str = "id, title, subject, content, author";

/// Default page size for summary listing.
const DEFAULT_LIMIT: i64 = 100;

/// Maximum page size for summary listing.
const MAX_LIMIT: i64 = 500;

/// Provides CRUD operations for summaries.
pub struct SummaryRepo;

impl SummaryRepo {
    /// Insert a new summary, returning the created row.
    pub async fn create(pool: &DbPool, input: &CreateSummary) -> Result<Summary, sqlx::Error> {
        let subject = input.subject.as_deref().map(normalize_subject);
        let query = format!(
            "INSERT INTO summaries (title, subject, content, author) \
             VALUES (?1, ?2, ?3, ?4) \
             RETURNING {COLUMNS}"
        );
        let summary = sqlx::query_as::<_, Summary>(&query)
            .bind(&input.title)
            .bind(subject)
            .bind(&input.content)
            .bind(&input.author)
            .fetch_one(pool)
            .await?;

        tracing::debug!(summary_id = summary.id, "Summary created");
        Ok(summary)
    }

    /// Find a summary by its ID.
    pub async fn find_by_id(pool: &DbPool, id: DbId) -> Result<Option<Summary>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM summaries WHERE id = ?1");
        sqlx::query_as::<_, Summary>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List summaries ordered by ID, with pagination.
    pub async fn list(
        pool: &DbPool,
        params: &SummaryListParams,
    ) -> Result<Vec<Summary>, sqlx::Error> {
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let offset = params.offset.unwrap_or(0).max(0);

        let query = format!("SELECT {COLUMNS} FROM summaries ORDER BY id LIMIT ?1 OFFSET ?2");
        sqlx::query_as::<_, Summary>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// All summaries with the given subject. Matching ignores case.
    pub async fn list_by_subject(pool: &DbPool, subject: &str) -> Result<Vec<Summary>, sqlx::Error> {
        Self::list_where(pool, "subject", &normalize_subject(subject)).await
    }

    /// All summaries with exactly this title.
    pub async fn list_by_title(pool: &DbPool, title: &str) -> Result<Vec<Summary>, sqlx::Error> {
        Self::list_where(pool, "title", title).await
    }

    /// All summaries by exactly this author.
    pub async fn list_by_author(pool: &DbPool, author: &str) -> Result<Vec<Summary>, sqlx::Error> {
        Self::list_where(pool, "author", author).await
    }

    /// Update the supplied fields of a summary.
    ///
    /// Returns `None` if no summary with the given ID exists.
    pub async fn update(
        pool: &DbPool,
        id: DbId,
        input: &UpdateSummary,
    ) -> Result<Option<Summary>, sqlx::Error> {
        let subject = input.subject.as_deref().map(normalize_subject);
        let query = format!(
            "UPDATE summaries SET \
                 title = COALESCE(?2, title), \
                 subject = COALESCE(?3, subject), \
                 content = COALESCE(?4, content), \
                 author = COALESCE(?5, author) \
             WHERE id = ?1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Summary>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(subject)
            .bind(&input.content)
            .bind(&input.author)
            .fetch_optional(pool)
            .await
    }

    /// Delete a summary by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &DbPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM summaries WHERE id = ?1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// `column` is one of the fixed names above, never caller input.
    async fn list_where(
        pool: &DbPool,
        column: &'static str,
        value: &str,
    ) -> Result<Vec<Summary>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM summaries WHERE {column} = ?1 ORDER BY id");
        sqlx::query_as::<_, Summary>(&query)
            .bind(value)
            .fetch_all(pool)
            .await
    }
}
