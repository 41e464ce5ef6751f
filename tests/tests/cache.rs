use pretty_assertions::assert_eq;
use rowmap::{stmt::Value, IdentityCache};
use std::sync::Arc;
use std_util::prelude::*;
use tests::{init_tracing, models::*, models, setup, ExecKind, LoggingExecutor};

#[tokio::test]
async fn cached_record_is_verified_with_hash_only() {
    let (mut db, log) = setup(models!(User, Post)).await;

    let id = db.save(&mut User::new("ada", "ada@example.com")).await.unwrap();
    db.cache().clear();

    let first: User = assert_some!(db.find_by_id(id, false).await.unwrap());

    log.clear();
    let second: User = assert_some!(db.find_by_id(id, false).await.unwrap());

    assert_eq!(
        log.statements(),
        ["SELECT \"Hash\" FROM \"test_users\" WHERE \"Id\" = ?1;"]
    );
    assert_eq!(log.count_kind(ExecKind::Query), 0);
    assert_eq!(first.meta, second.meta);
    assert_eq!(first.user_name, second.user_name);
}

#[tokio::test]
async fn saved_change_is_visible_to_next_find() {
    let (mut db, _log) = setup(models!(User, Post)).await;

    let mut user = User::new("ada", "ada@example.com");
    let id = db.save(&mut user).await.unwrap();
    let _: User = assert_some!(db.find_by_id(id, false).await.unwrap());

    user.user_name = "lovelace".to_string();
    db.save(&mut user).await.unwrap();

    let found: User = assert_some!(db.find_by_id(id, false).await.unwrap());
    assert_eq!(found.user_name, "lovelace");
}

#[tokio::test]
async fn external_write_makes_entry_stale() {
    let (mut db, log) = setup(models!(User, Post)).await;

    let id = db.save(&mut User::new("ada", "ada@example.com")).await.unwrap();

    // Another writer changes the row and its hash
    db.executor_mut()
        .execute(
            "UPDATE \"test_users\" SET \"user_name\" = ?1, \"Hash\" = ?2 WHERE \"Id\" = ?3;",
            &["grace".into(), "x".repeat(44).into(), id.into()],
        )
        .await
        .unwrap();

    log.clear();
    let found: User = assert_some!(db.find_by_id(id, false).await.unwrap());
    assert_eq!(found.user_name, "grace");

    // Hash check, then the full row
    assert_eq!(log.count_kind(ExecKind::Scalar), 1);
    assert_eq!(log.count_kind(ExecKind::Query), 1);

    // The refreshed entry is trusted again
    log.clear();
    let _: User = assert_some!(db.find_by_id(id, false).await.unwrap());
    assert_eq!(log.count_kind(ExecKind::Query), 0);
}

#[tokio::test]
async fn externally_deleted_row_is_evicted() {
    let (mut db, _log) = setup(models!(User, Post)).await;

    let id = db.save(&mut User::new("ada", "ada@example.com")).await.unwrap();
    assert_eq!(db.cache().len(), 1);

    db.executor_mut()
        .execute("DELETE FROM \"test_users\" WHERE \"Id\" = ?1;", &[id.into()])
        .await
        .unwrap();

    assert_none!(db.find_by_id::<User>(id, false).await.unwrap());
    assert!(db.cache().is_empty());
}

#[tokio::test]
async fn find_all_reloads_only_stale_rows() {
    let (mut db, log) = setup(models!(User, Post)).await;

    let mut ids = vec![];
    for i in 0..4 {
        let mut user = User::new(&format!("user{i}"), &format!("user{i}@example.com"));
        ids.push(db.save(&mut user).await.unwrap());
    }

    db.cache().invalidate("test_users", ids[1]);
    db.cache().invalidate("test_users", ids[3]);

    log.clear();
    let users: Vec<User> = db.find_all(false).await.unwrap();

    let names: Vec<_> = users.iter().map(|u| u.user_name.as_str()).collect();
    assert_eq!(names, ["user0", "user1", "user2", "user3"]);

    let statements = log.statements();
    assert_eq!(statements.len(), 2);
    assert_eq!(
        statements[0],
        "SELECT \"Id\", \"Hash\" FROM \"test_users\" ORDER BY \"Id\";"
    );
    assert!(statements[1].contains("WHERE \"Id\" IN (?1, ?2)"), "{}", statements[1]);

    let reload = log.pop().and_then(|_| log.pop()).unwrap();
    assert_eq!(reload.params, [Value::from(ids[1]), Value::from(ids[3])]);

    // Every row is now cached
    log.clear();
    let _: Vec<User> = db.find_all(false).await.unwrap();
    assert_eq!(log.len(), 1);
}

#[tokio::test]
async fn find_all_on_empty_table() {
    let (mut db, log) = setup(models!(User, Post)).await;

    let users: Vec<User> = db.find_all(true).await.unwrap();
    assert!(users.is_empty());
    assert_eq!(log.len(), 1);
}

#[tokio::test]
async fn handles_share_a_cache() {
    init_tracing();

    let path = std::env::temp_dir().join(format!("rowmap-shared-cache-{}.db", std::process::id()));
    let _ = std::fs::remove_file(&path);
    let url = format!("sqlite:{}", path.display());

    let cache = Arc::new(IdentityCache::new());

    let mut builder = models!(User, Post);
    builder.cache(cache.clone());

    let mut writer = builder.connect(&url).await.unwrap();
    writer.ensure_schema_all().await.unwrap();

    let executor = LoggingExecutor::new(rowmap::connect(&url).unwrap());
    let log = executor.log();
    let mut reader = writer.connect_with(executor).await.unwrap();
    assert!(Arc::ptr_eq(reader.cache(), &cache));

    let mut user = User::new("ada", "ada@example.com");
    let id = writer.save(&mut user).await.unwrap();

    // Written through by one handle, verified by the other
    let found: User = assert_some!(reader.find_by_id(id, false).await.unwrap());
    assert_eq!(found.user_name, "ada");
    assert_eq!(log.count_kind(ExecKind::Query), 0);

    user.user_name = "lovelace".to_string();
    writer.save(&mut user).await.unwrap();

    let found: User = assert_some!(reader.find_by_id(id, false).await.unwrap());
    assert_eq!(found.user_name, "lovelace");

    writer.close().await.unwrap();
    reader.close().await.unwrap();
    let _ = std::fs::remove_file(&path);
}
