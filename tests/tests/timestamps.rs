use pretty_assertions::assert_eq;
use std::time::Duration;
use std_util::prelude::*;
use tests::{models::*, models, setup};

#[tokio::test]
async fn updated_at_increases_and_created_at_is_fixed() {
    let (mut db, _log) = setup(models!(User, Post)).await;

    let mut user = User::new("ada", "ada@example.com");
    let id = db.save(&mut user).await.unwrap();

    let created_at = assert_some!(user.meta.created_at());
    let first = assert_some!(user.meta.updated_at());
    assert_eq!(created_at, first);

    tokio::time::sleep(Duration::from_millis(5)).await;

    user.user_name = "lovelace".to_string();
    db.save(&mut user).await.unwrap();

    let second = assert_some!(user.meta.updated_at());
    assert!(second > first, "{second} <= {first}");
    assert_eq!(user.meta.created_at(), Some(created_at));

    db.cache().clear();
    let found: User = assert_some!(db.find_by_id(id, false).await.unwrap());
    assert_eq!(found.meta.created_at(), Some(created_at));
    assert_eq!(found.meta.updated_at(), Some(second));
}

#[tokio::test]
async fn back_to_back_saves_still_advance() {
    let (mut db, _log) = setup(models!(User, Post)).await;

    let mut user = User::new("ada", "ada@example.com");
    db.save(&mut user).await.unwrap();

    let mut previous = assert_some!(user.meta.updated_at());
    for _ in 0..5 {
        db.save(&mut user).await.unwrap();
        let current = assert_some!(user.meta.updated_at());
        assert!(current > previous);
        previous = current;
    }
}

#[tokio::test]
async fn unchanged_save_changes_hash() {
    let (mut db, _log) = setup(models!(User, Post)).await;

    let mut user = User::new("ada", "ada@example.com");
    db.save(&mut user).await.unwrap();
    let before = user.meta.hash().map(str::to_string);

    db.save(&mut user).await.unwrap();

    // The hash covers `UpdatedAt`, which moved
    assert_ne!(user.meta.hash().map(str::to_string), before);
}
