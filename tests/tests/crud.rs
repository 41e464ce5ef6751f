use pretty_assertions::assert_eq;
use rowmap::RecordState;
use std_util::prelude::*;
use tests::{models::*, models, setup};

#[tokio::test]
async fn save_then_find_round_trips() {
    let (mut db, _log) = setup(models!(User, Post)).await;

    let mut user = User::new("ada", "ada@example.com");
    user.is_active = false;

    let id = db.save(&mut user).await.unwrap();
    assert_eq!(user.meta.id(), Some(id));
    assert_eq!(user.meta.state(), RecordState::Persisted);
    assert!(user.meta.hash().is_some());

    // Drop the cached copy so the row is read back from the table
    db.cache().clear();

    let found: User = assert_some!(db.find_by_id(id, false).await.unwrap());
    assert_eq!(found.user_name, "ada");
    assert_eq!(found.email_address, "ada@example.com");
    assert!(!found.is_active);
    assert_eq!(found.meta, user.meta);
}

#[tokio::test]
async fn nullable_fields_round_trip() {
    let (mut db, _log) = setup(models!(User, Post)).await;

    let user_id = db.save(&mut User::new("ada", "ada@example.com")).await.unwrap();

    let mut with_content = Post::new(user_id, "first");
    with_content.post_content = Some("hello".to_string());
    let a = db.save(&mut with_content).await.unwrap();
    let b = db.save(&mut Post::new(user_id, "second")).await.unwrap();

    db.cache().clear();

    let a: Post = assert_some!(db.find_by_id(a, false).await.unwrap());
    let b: Post = assert_some!(db.find_by_id(b, false).await.unwrap());
    assert_eq!(a.post_content.as_deref(), Some("hello"));
    assert_eq!(b.post_content, None);
    assert_eq!(b.user_id, user_id);
}

#[tokio::test]
async fn find_missing_returns_none() {
    let (mut db, _log) = setup(models!(User, Post)).await;
    assert_none!(db.find_by_id::<User>(42, true).await.unwrap());
}

#[tokio::test]
async fn update_keeps_id_and_rewrites_fields() {
    let (mut db, log) = setup(models!(User, Post)).await;

    let mut user = User::new("ada", "ada@example.com");
    let id = db.save(&mut user).await.unwrap();
    let first_hash = user.meta.hash().map(str::to_string);

    user.user_name = "lovelace".to_string();
    log.clear();
    assert_eq!(db.save(&mut user).await.unwrap(), id);

    assert!(log
        .statements()
        .iter()
        .any(|sql| sql.starts_with("UPDATE \"test_users\" SET")));
    assert_ne!(user.meta.hash().map(str::to_string), first_hash);

    let all: Vec<User> = db.find_all(false).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].user_name, "lovelace");
}

#[tokio::test]
async fn delete_marks_record_and_evicts() {
    let (mut db, _log) = setup(models!(User, Post)).await;

    let mut user = User::new("ada", "ada@example.com");
    let id = db.save(&mut user).await.unwrap();
    assert_eq!(db.cache().len(), 1);

    db.delete(&mut user).await.unwrap();
    assert_eq!(user.meta.state(), RecordState::Deleted);
    assert!(db.cache().is_empty());
    assert_none!(db.find_by_id::<User>(id, false).await.unwrap());
}

#[tokio::test]
async fn deleted_records_cannot_be_saved_or_deleted() {
    let (mut db, log) = setup(models!(User, Post)).await;

    let mut user = User::new("ada", "ada@example.com");
    db.save(&mut user).await.unwrap();
    db.delete(&mut user).await.unwrap();

    log.clear();

    let err = assert_err!(db.save(&mut user).await);
    assert!(err.is_invalid_record_state(), "{err}");

    let err = assert_err!(db.delete(&mut user).await);
    assert!(err.is_invalid_record_state(), "{err}");

    // Rejected before any statement is sent
    assert!(log.is_empty());
}

#[tokio::test]
async fn unsaved_records_cannot_be_deleted() {
    let (mut db, _log) = setup(models!(User, Post)).await;

    let err = assert_err!(db.delete(&mut User::new("ada", "ada@example.com")).await);
    assert!(err.is_invalid_record_state(), "{err}");
}

#[tokio::test]
async fn update_of_vanished_row_is_a_concurrent_modification() {
    let (mut db, log) = setup(models!(User, Post)).await;

    let mut user = User::new("ada", "ada@example.com");
    let id = db.save(&mut user).await.unwrap();

    // Another writer removes the row
    db.executor_mut()
        .execute("DELETE FROM \"test_users\" WHERE \"Id\" = ?1;", &[id.into()])
        .await
        .unwrap();

    user.user_name = "lovelace".to_string();
    log.clear();

    let err = assert_err!(db.save(&mut user).await);
    assert!(err.is_concurrent_modification(), "{err}");
    assert!(db.cache().is_empty());

    // The failed write was rolled back, not committed
    assert_eq!(log.count_kind(tests::ExecKind::Rollback), 1);
    assert_eq!(log.count_kind(tests::ExecKind::Commit), 0);

    // The caller's record is left untouched
    assert_eq!(user.meta.state(), RecordState::Persisted);
    assert_eq!(user.user_name, "lovelace");
}

#[tokio::test]
async fn delete_of_vanished_row_is_a_concurrent_modification() {
    let (mut db, _log) = setup(models!(User, Post)).await;

    let mut user = User::new("ada", "ada@example.com");
    let id = db.save(&mut user).await.unwrap();

    db.executor_mut()
        .execute("DELETE FROM \"test_users\" WHERE \"Id\" = ?1;", &[id.into()])
        .await
        .unwrap();

    let err = assert_err!(db.delete(&mut user).await);
    assert!(err.is_concurrent_modification(), "{err}");
    assert_eq!(user.meta.state(), RecordState::Persisted);
    assert!(db.cache().is_empty());
}

#[tokio::test]
async fn unregistered_types_are_rejected() {
    let (mut db, log) = setup(models!(Address)).await;

    let err = assert_err!(db.find_by_id::<Course>(1, false).await);
    assert!(err.is_configuration(), "{err}");

    let err = assert_err!(db.save(&mut Course::new("CS101", "Intro")).await);
    assert!(err.is_configuration(), "{err}");

    let err = assert_err!(db.ensure_schema::<Course>().await);
    assert!(err.is_configuration(), "{err}");

    assert!(log.is_empty());
}
