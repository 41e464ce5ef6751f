use pretty_assertions::assert_eq;
use rowmap::{stmt::timestamp, Db};
use rust_decimal::Decimal;
use std_util::prelude::*;
use tests::{init_tracing, models::*, models, setup, ExecLog, LoggingExecutor};

#[tokio::test]
async fn enumerated_values_are_enforced() {
    let (mut db, _log) = setup(models!(Account)).await;

    let mut pending = Account::new("ada", "ada@example.com", 36);
    pending.status = Some("pending".to_string());
    db.save(&mut pending).await.unwrap();

    let mut unknown = Account::new("grace", "grace@example.com", 40);
    unknown.status = Some("archived".to_string());
    let err = assert_err!(db.save(&mut unknown).await);
    assert!(err.is_constraint_violation(), "{err}");
    assert_eq!(unknown.meta.id(), None);
}

#[tokio::test]
async fn check_expressions_are_enforced() {
    let (mut db, _log) = setup(models!(Account)).await;

    let err = assert_err!(db.save(&mut Account::new("old", "old@example.com", 200)).await);
    assert!(err.is_constraint_violation(), "{err}");

    let err = assert_err!(db.save(&mut Account::new("neg", "neg@example.com", -1)).await);
    assert!(err.is_constraint_violation(), "{err}");

    db.save(&mut Account::new("ok", "ok@example.com", 150))
        .await
        .unwrap();

    let mut account = Account::new("high", "high@example.com", 30);
    account.score = 101;
    let err = assert_err!(db.save(&mut account).await);
    assert!(err.is_constraint_violation(), "{err}");

    let all: Vec<Account> = db.find_all(false).await.unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn decimal_checks_compare_numerically() {
    let (mut db, _log) = setup(models!(Product)).await;

    let mut pen = Product::new("pen", Decimal::new(99_950, 2));
    db.save(&mut pen).await.unwrap();

    let mut cap = Product::new("cap", Decimal::new(1_000, 0));
    db.save(&mut cap).await.unwrap();

    let mut desk = Product::new("desk", Decimal::new(500_000, 2));
    let err = assert_err!(db.save(&mut desk).await);
    assert!(err.is_constraint_violation(), "{err}");

    db.cache().clear();
    let id = pen.meta.id().unwrap();
    let found: Product = assert_some!(db.find_by_id(id, false).await.unwrap());
    assert_eq!(found.price.to_string(), "999.50");
}

#[tokio::test]
async fn decimal_uniqueness_ignores_trailing_zeros() {
    let (mut db, _log) = setup(models!(Coupon)).await;

    let mut whole = Coupon::new(Decimal::new(1, 0));
    let id = db.save(&mut whole).await.unwrap();
    assert_eq!(whole.amount.to_string(), "1.00");

    let mut padded = Coupon::new(Decimal::new(100, 2));
    let err = assert_err!(db.save(&mut padded).await);
    assert!(err.is_constraint_violation(), "{err}");

    db.cache().clear();
    let found: Coupon = assert_some!(db.find_by_id(id, false).await.unwrap());
    assert_eq!(found.amount.to_string(), "1.00");
    assert_eq!(found.meta.hash(), whole.meta.hash());
}

#[tokio::test]
async fn floating_point_fields_round_trip() {
    let (mut db, _log) = setup(models!(Product)).await;

    let mut rated = Product::new("lamp", Decimal::new(2_500, 2));
    rated.weight = 1.25;
    rated.rating = Some(4.125);
    let rated_id = db.save(&mut rated).await.unwrap();

    let mut unrated = Product::new("bulb", Decimal::new(300, 2));
    unrated.weight = 0.1;
    let unrated_id = db.save(&mut unrated).await.unwrap();

    db.cache().clear();
    let found: Product = assert_some!(db.find_by_id(rated_id, false).await.unwrap());
    assert_eq!(found.weight, 1.25);
    assert_eq!(found.rating, Some(4.125));

    let found: Product = assert_some!(db.find_by_id(unrated_id, false).await.unwrap());
    assert_eq!(found.weight, 0.1_f32);
    assert_eq!(found.rating, None);
}

#[tokio::test]
async fn unique_columns_are_enforced() {
    let (mut db, log) = setup(models!(User, Post)).await;

    db.save(&mut User::new("ada", "same@example.com"))
        .await
        .unwrap();

    log.clear();
    let err = assert_err!(db.save(&mut User::new("grace", "same@example.com")).await);
    assert!(err.is_constraint_violation(), "{err}");
    assert_eq!(log.count_kind(tests::ExecKind::Rollback), 1);
}

#[tokio::test]
async fn foreign_keys_are_enforced() {
    let (mut db, _log) = setup(models!(User, Post)).await;

    let err = assert_err!(db.save(&mut Post::new(99, "orphan")).await);
    assert!(err.is_constraint_violation(), "{err}");
}

#[tokio::test]
async fn defaults_are_applied_on_insert() {
    let (mut db, _log) = setup(models!(Account)).await;

    let mut account = Account::new("ada", "ada@example.com", 36);
    db.save(&mut account).await.unwrap();

    assert_eq!(account.status.as_deref(), Some("active"));
    assert_eq!(account.balance, Some(Decimal::ZERO));
    assert_eq!(account.last_seen, account.meta.created_at());
    assert_eq!(account.is_active, Some(true));
    assert_eq!(account.notes.as_deref(), Some(""));
    assert_eq!(account.score, 0);
    assert_eq!(account.last_login, None);
}

#[tokio::test]
async fn bound_defaults_agree_with_table_defaults() {
    let (mut db, _log) = setup(models!(Account)).await;

    let mut saved = Account::new("ada", "ada@example.com", 36);
    db.save(&mut saved).await.unwrap();

    // A row written without the engine gets the table's defaults
    let now = timestamp::format(timestamp::now());
    db.executor_mut()
        .execute(
            "INSERT INTO \"configuration_tests\" \
             (\"name\", \"email\", \"age\", \"CreatedAt\", \"UpdatedAt\", \"Hash\") \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            &[
                "grace".into(),
                "grace@example.com".into(),
                40.into(),
                now.clone().into(),
                now.into(),
                "x".repeat(44).into(),
            ],
        )
        .await
        .unwrap();

    let all: Vec<Account> = db.find_all(false).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[1].status, saved.status);
    assert_eq!(all[1].balance, saved.balance);
    assert_eq!(all[1].is_active, saved.is_active);
    assert_eq!(all[1].notes, saved.notes);
    assert_eq!(all[1].score, saved.score);
    assert_eq!(all[1].last_login, None);
    assert!(all[1].last_seen.is_some());
}

#[tokio::test]
async fn decimals_are_rounded_to_scale() {
    let (mut db, _log) = setup(models!(Account)).await;

    let mut account = Account::new("ada", "ada@example.com", 36);
    account.balance = Some(Decimal::new(12_346, 3));
    let id = db.save(&mut account).await.unwrap();

    assert_eq!(account.balance, Some(Decimal::new(1_235, 2)));

    db.cache().clear();
    let found: Account = assert_some!(db.find_by_id(id, false).await.unwrap());
    assert_eq!(found.balance, Some(Decimal::new(1_235, 2)));
}

#[tokio::test]
async fn update_refreshes_on_update_timestamps() {
    let (mut db, _log) = setup(models!(Account)).await;

    let mut account = Account::new("ada", "ada@example.com", 36);
    db.save(&mut account).await.unwrap();
    let first = account.last_seen;

    account.age = 37;
    db.save(&mut account).await.unwrap();

    assert!(account.last_seen >= first);
    assert_eq!(account.status.as_deref(), Some("active"));
}

async fn user_tables(db: &mut Db) -> Vec<String> {
    let rows = db
        .executor_mut()
        .query(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name;",
            &[],
        )
        .await
        .unwrap();

    rows.map(|mut row| row.take("name").unwrap().to_string_value().unwrap())
        .collect()
}

async fn open(builder: &mut rowmap::db::Builder) -> (Db, ExecLog) {
    init_tracing();

    let executor = LoggingExecutor::new(rowmap::connect("sqlite::memory:").unwrap());
    let log = executor.log();
    (builder.build(executor).await.unwrap(), log)
}

#[tokio::test]
async fn malicious_table_name_is_never_executed() {
    let (mut db, log) = open(&mut models!(User, Post, MaliciousTable)).await;

    db.ensure_schema::<User>().await.unwrap();
    db.ensure_schema::<Post>().await.unwrap();

    log.clear();
    let err = assert_err!(db.ensure_schema::<MaliciousTable>().await);
    assert!(err.is_invalid_identifier(), "{err}");
    assert!(log.is_empty());

    let err = assert_err!(
        db.save(&mut MaliciousTable {
            name: "x".to_string(),
            ..MaliciousTable::default()
        })
        .await
    );
    assert!(err.is_invalid_identifier(), "{err}");

    assert_eq!(user_tables(&mut db).await, ["test_posts", "test_users"]);
}

#[tokio::test]
async fn malicious_column_name_is_never_executed() {
    let (mut db, log) = open(&mut models!(MaliciousColumn)).await;

    let err = assert_err!(db.ensure_schema_all().await);
    assert!(err.is_invalid_identifier(), "{err}");
    assert!(log.is_empty());

    assert!(user_tables(&mut db).await.is_empty());
}
