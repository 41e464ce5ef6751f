mod exec_log;
pub use exec_log::{ExecKind, ExecLog, ExecOp};

mod logging_executor;
pub use logging_executor::LoggingExecutor;


use rowmap::{db::Builder, Db};

#[macro_export]
macro_rules! models {
    (
        $( $model:ty ),*
    ) => {{
        let mut builder = rowmap::Db::builder();
        $( builder.register::<$model>(); )*
        builder
    }};
}

/// Installs a `tracing` subscriber filtered by `RUST_LOG`. Safe to call from
/// every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Opens a fresh in-memory database, wrapped so every statement is logged,
/// and creates the tables of every registered type.
pub async fn setup(mut builder: Builder) -> (Db, ExecLog) {
    init_tracing();

    let executor = LoggingExecutor::new(rowmap::connect("sqlite::memory:").unwrap());
    let log = executor.log();

    let mut db = builder.build(executor).await.unwrap();
    db.ensure_schema_all().await.unwrap();

    log.clear();
    (db, log)
}
