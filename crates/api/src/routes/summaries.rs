//! Route definitions for stored summaries.

use axum::routing::get;
use axum::Router;

use crate::handlers::summaries;
use crate::state::AppState;

/// Summary routes mounted at `/summaries`.
///
/// ```text
/// GET    /                    -> list_summaries
/// POST   /                    -> create_summary
/// GET    /{id}                -> get_summary
/// PUT    /{id}                -> update_summary
/// DELETE /{id}                -> delete_summary
/// GET    /subject/{subject}   -> list_by_subject
/// GET    /title/{title}       -> list_by_title
/// GET    /author/{author}     -> list_by_author
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(summaries::list_summaries).post(summaries::create_summary),
        )
        .route(
            "/{id}",
            get(summaries::get_summary)
                .put(summaries::update_summary)
                .delete(summaries::delete_summary),
        )
        .route("/subject/{subject}", get(summaries::list_by_subject))
        .route("/title/{title}", get(summaries::list_by_title))
        .route("/author/{author}", get(summaries::list_by_author))
}
