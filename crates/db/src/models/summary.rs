//! Summary models and DTOs.

use scribe_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `summaries` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Summary {
    pub id: DbId,
    pub title: String,
    /// Always stored lower-cased.
    pub subject: Option<String>,
    pub content: String,
    pub author: Option<String>,
}

// ---------------------------------------------------------------------------
// DTOs (request payloads)
// ---------------------------------------------------------------------------

/// DTO for creating a summary.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSummary {
    pub title: String,
    pub content: String,
    pub subject: Option<String>,
    pub author: Option<String>,
}

/// DTO for a partial update. `None` fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSummary {
    pub title: Option<String>,
    pub content: Option<String>,
    pub subject: Option<String>,
    pub author: Option<String>,
}

/// Query parameters for `GET /summaries`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SummaryListParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
