//! Integration tests for the PostgreSQL shard store.
//!
//! These tests need two running PostgreSQL databases with migrations
//! applied (see `migrations/`); they are ignored by default.

use mediadex_core::{CompiledPattern, Shard, ShardStore};
use mediadex_db::test_fixtures::{sample_record, test_urls};
use mediadex_db::Database;

async fn connect() -> Database {
    dotenvy::dotenv().ok();
    let (primary, secondary) = test_urls();
    Database::connect(&primary, &secondary)
        .await
        .expect("test databases must be running")
}

async fn clear(db: &Database) {
    for pool in [&db.primary_pool, &db.secondary_pool] {
        sqlx::query("DELETE FROM file_record")
            .execute(pool)
            .await
            .expect("failed to clear file_record");
    }
}

#[tokio::test]
#[ignore] // Requires database connection
async fn test_insert_and_count() {
    let db = connect().await;
    clear(&db).await;

    assert!(db.primary.insert(&sample_record("a1", "x.mp4")).await.unwrap());
    assert!(!db.primary.insert(&sample_record("a1", "x.mp4")).await.unwrap());
    assert_eq!(db.primary.count().await.unwrap(), 1);
    assert_eq!(db.secondary.count().await.unwrap(), 0);
}

#[tokio::test]
#[ignore] // Requires database connection
async fn test_find_by_ids_projection() {
    let db = connect().await;
    clear(&db).await;

    db.primary.insert(&sample_record("a1", "x.mp4")).await.unwrap();
    db.primary.insert(&sample_record("b2", "y.mp4")).await.unwrap();

    let refs = db
        .primary
        .find_by_ids(&["a1".to_string(), "missing".to_string()])
        .await
        .unwrap();
    assert_eq!(refs.len(), 1);
    assert_eq!(refs[0].file_name, "x.mp4");
}

#[tokio::test]
#[ignore] // Requires database connection
async fn test_pattern_search_is_case_insensitive() {
    let db = connect().await;
    clear(&db).await;

    db.secondary
        .insert(&sample_record("c3", "The.Matrix.1999.mkv"))
        .await
        .unwrap();

    let pattern = CompiledPattern::new("matrix").unwrap();
    let hits = db.secondary.find_by_pattern(&pattern).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(db.secondary.shard(), Shard::Secondary);
}

#[tokio::test]
#[ignore] // Requires database connection
async fn test_delete_by_ids() {
    let db = connect().await;
    clear(&db).await;

    db.secondary.insert(&sample_record("a1", "x.mp4")).await.unwrap();
    db.secondary.insert(&sample_record("b2", "y.mp4")).await.unwrap();

    let removed = db
        .secondary
        .delete_by_ids(&["a1".to_string()])
        .await
        .unwrap();
    assert_eq!(removed, 1);
    assert_eq!(db.secondary.count().await.unwrap(), 1);
}
