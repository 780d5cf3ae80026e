//! Integration tests for the summary repository.
//!
//! Runs against a fresh SQLite database per test with the crate migrations
//! applied.

use scribe_db::models::summary::{CreateSummary, SummaryListParams, UpdateSummary};
use scribe_db::repositories::SummaryRepo;
use sqlx::SqlitePool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_summary(title: &str, subject: Option<&str>, author: Option<&str>) -> CreateSummary {
    CreateSummary {
        title: title.to_string(),
        content: format!("<summary>{title}</summary>"),
        subject: subject.map(str::to_string),
        author: author.map(str::to_string),
    }
}

// ---------------------------------------------------------------------------
// Create / read
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_health_check(pool: SqlitePool) {
    scribe_db::health_check(&pool).await.unwrap();
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_and_find(pool: SqlitePool) {
    let created = SummaryRepo::create(&pool, &new_summary("Relativity", Some("Physics"), Some("Ann")))
        .await
        .unwrap();
    assert!(created.id > 0);
    assert_eq!(created.subject.as_deref(), Some("physics"));

    let found = SummaryRepo::find_by_id(&pool, created.id).await.unwrap();
    assert_eq!(found, Some(created));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_find_missing_returns_none(pool: SqlitePool) {
    assert!(SummaryRepo::find_by_id(&pool, 999).await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_ids_are_unique(pool: SqlitePool) {
    let a = SummaryRepo::create(&pool, &new_summary("A", None, None)).await.unwrap();
    let b = SummaryRepo::create(&pool, &new_summary("B", None, None)).await.unwrap();
    assert_ne!(a.id, b.id);
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_list_paginates(pool: SqlitePool) {
    for i in 0..5 {
        SummaryRepo::create(&pool, &new_summary(&format!("S{i}"), None, None))
            .await
            .unwrap();
    }

    let page = SummaryRepo::list(
        &pool,
        &SummaryListParams {
            limit: Some(2),
            offset: Some(1),
        },
    )
    .await
    .unwrap();
    let titles: Vec<_> = page.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["S1", "S2"]);

    let all = SummaryRepo::list(&pool, &SummaryListParams::default()).await.unwrap();
    assert_eq!(all.len(), 5);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_by_subject_ignores_case(pool: SqlitePool) {
    SummaryRepo::create(&pool, &new_summary("One", Some("History"), None)).await.unwrap();
    SummaryRepo::create(&pool, &new_summary("Two", Some("HISTORY"), None)).await.unwrap();
    SummaryRepo::create(&pool, &new_summary("Three", Some("Maths"), None)).await.unwrap();

    let found = SummaryRepo::list_by_subject(&pool, "history").await.unwrap();
    assert_eq!(found.len(), 2);
    let found = SummaryRepo::list_by_subject(&pool, "HiStOrY").await.unwrap();
    assert_eq!(found.len(), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_by_title_and_author(pool: SqlitePool) {
    SummaryRepo::create(&pool, &new_summary("Optics", None, Some("Newton"))).await.unwrap();
    SummaryRepo::create(&pool, &new_summary("Gravity", None, Some("Newton"))).await.unwrap();

    assert_eq!(SummaryRepo::list_by_title(&pool, "Optics").await.unwrap().len(), 1);
    assert_eq!(SummaryRepo::list_by_author(&pool, "Newton").await.unwrap().len(), 2);
    assert!(SummaryRepo::list_by_author(&pool, "Euler").await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Update / delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_partial_update_keeps_other_fields(pool: SqlitePool) {
    let created = SummaryRepo::create(&pool, &new_summary("Draft", Some("bio"), Some("Kim")))
        .await
        .unwrap();

    let update = UpdateSummary {
        title: Some("Final".to_string()),
        ..Default::default()
    };
    let updated = SummaryRepo::update(&pool, created.id, &update)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.title, "Final");
    assert_eq!(updated.content, created.content);
    assert_eq!(updated.subject, created.subject);
    assert_eq!(updated.author, created.author);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_lower_cases_subject(pool: SqlitePool) {
    let created = SummaryRepo::create(&pool, &new_summary("T", None, None)).await.unwrap();
    let update = UpdateSummary {
        subject: Some("Chemistry".to_string()),
        ..Default::default()
    };
    let updated = SummaryRepo::update(&pool, created.id, &update)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.subject.as_deref(), Some("chemistry"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_missing_returns_none(pool: SqlitePool) {
    let result = SummaryRepo::update(&pool, 42, &UpdateSummary::default()).await.unwrap();
    assert!(result.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete(pool: SqlitePool) {
    let created = SummaryRepo::create(&pool, &new_summary("Gone", None, None)).await.unwrap();

    assert!(SummaryRepo::delete(&pool, created.id).await.unwrap());
    assert!(SummaryRepo::find_by_id(&pool, created.id).await.unwrap().is_none());
    assert!(!SummaryRepo::delete(&pool, created.id).await.unwrap());
}
