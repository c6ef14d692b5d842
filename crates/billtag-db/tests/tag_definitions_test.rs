//! Integration tests for the PostgreSQL-backed tag definition DAO.
//!
//! Run with a database available:
//! `DATABASE_URL=postgres://... cargo test -p billtag-db -- --ignored`

use billtag_db::test_fixtures::{unique_name, TestDatabase};
use billtag_db::{ControlTagType, Error, ErrorCode};

async fn setup() -> TestDatabase {
    dotenvy::dotenv().ok();
    TestDatabase::new().await
}

#[tokio::test]
#[ignore] // Requires database connection
async fn test_create_get_delete_round_trip() {
    let db = setup().await;
    let name = unique_name("promo");

    let created = db
        .dao
        .create(&name, "Promotional tag", &db.context)
        .await
        .expect("create should succeed");
    assert!(!created.is_control_tag());

    let fetched = db
        .dao
        .get_by_name(&name)
        .await
        .expect("lookup should succeed")
        .expect("definition should exist");
    assert!(!fetched.is_control_tag());
    assert_eq!(fetched.description(), "Promotional tag");

    db.dao
        .delete_tag_definition(&name, &db.context)
        .await
        .expect("delete should succeed");
    assert!(db.dao.get_by_name(&name).await.unwrap().is_none());

    db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires database connection
async fn test_list_includes_stored_and_control_tags() {
    let db = setup().await;
    let first = unique_name("alpha");
    let second = unique_name("beta");

    db.dao.create(&first, "First", &db.context).await.unwrap();
    db.dao.create(&second, "Second", &db.context).await.unwrap();

    let defs = db.dao.get_tag_definitions().await.unwrap();
    assert_eq!(defs.len(), 2 + ControlTagType::ALL.len());

    let control: Vec<_> = defs
        .iter()
        .filter(|d| d.is_control_tag())
        .map(|d| d.name())
        .collect();
    let expected: Vec<_> = ControlTagType::ALL.iter().map(|t| t.name()).collect();
    assert_eq!(control, expected);
    assert!(defs[..2].iter().all(|d| !d.is_control_tag()));

    db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires database connection
async fn test_create_control_tag_name_writes_nothing() {
    let db = setup().await;

    let err = db
        .dao
        .create("AUTO_PAY_OFF", "Mine now", &db.context)
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::TagDefinitionConflictsWithControlTag));
    assert_eq!(db.row_count("AUTO_PAY_OFF").await, 0);

    db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires database connection
async fn test_create_duplicate_keeps_single_row() {
    let db = setup().await;
    let name = unique_name("dup");

    db.dao.create(&name, "Once", &db.context).await.unwrap();
    let err = db.dao.create(&name, "Twice", &db.context).await.unwrap_err();

    assert!(matches!(err, Error::TagDefinitionAlreadyExists(ref n) if *n == name));
    assert_eq!(db.row_count(&name).await, 1);

    db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires database connection
async fn test_concurrent_create_single_winner() {
    let db = setup().await;
    let name = unique_name("race");

    let (a, b) = futures::join!(
        db.dao.create(&name, "A", &db.context),
        db.dao.create(&name, "B", &db.context)
    );

    assert_eq!(
        [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(),
        1,
        "exactly one concurrent create should win"
    );
    let loser = a.err().or(b.err()).expect("one create should fail");
    assert_eq!(loser.code(), Some(ErrorCode::TagDefinitionAlreadyExists));
    assert_eq!(db.row_count(&name).await, 1);

    db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires database connection
async fn test_delete_unknown_does_not_exist() {
    let db = setup().await;

    let err = db
        .dao
        .delete_tag_definition("never-created", &db.context)
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::TagDefinitionDoesNotExist));

    db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires database connection
async fn test_delete_in_use_keeps_row() {
    let db = setup().await;
    let name = unique_name("used");

    db.dao.create(&name, "In use", &db.context).await.unwrap();
    db.add_usage(&name, 2).await;

    let err = db
        .dao
        .delete_tag_definition(&name, &db.context)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::TagDefinitionInUse(ref n) if *n == name));
    assert_eq!(db.row_count(&name).await, 1);

    db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires database connection
async fn test_create_stamps_audit_columns() {
    let db = setup().await;
    let name = unique_name("audit");

    db.dao.create(&name, "Audited", &db.context).await.unwrap();

    let (created_by, updated_by): (String, String) = sqlx::query_as(
        "SELECT created_by, updated_by FROM tag_definitions WHERE name = $1",
    )
    .bind(&name)
    .fetch_one(&db.pool)
    .await
    .unwrap();
    assert_eq!(created_by, db.context.user_name);
    assert_eq!(updated_by, db.context.user_name);

    db.cleanup().await;
}
