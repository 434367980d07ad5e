use std::sync::Arc;
use std::time::Duration;

use gosling::{ActiveDialect, AppConfig, follow_config};
use rusqlite::{Connection, params};
use tokio::sync::watch;

fn config(dialect: &str) -> AppConfig {
    AppConfig {
        dialect: dialect.to_string(),
        ..AppConfig::default()
    }
}

fn is_active(active: &ActiveDialect, name: &str) -> bool {
    let expected = active.registry().lookup(name).unwrap();
    Arc::ptr_eq(&active.get(), &expected)
}

/// Poll until `name` is active, giving up after about two seconds.
async fn wait_until_active(active: &ActiveDialect, name: &str) -> bool {
    for _ in 0..200 {
        if is_active(active, name) {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

#[tokio::test]
async fn applies_initial_and_changed_dialects() {
    let active = Arc::new(ActiveDialect::new());
    let (tx, rx) = watch::channel(config("mysql"));
    let task = follow_config(rx, Arc::clone(&active));
    assert!(wait_until_active(&active, "mysql").await);

    tx.send(config("sqlite3")).unwrap();
    drop(tx);
    task.await.unwrap();

    assert!(is_active(&active, "sqlite3"));
}

#[tokio::test]
async fn unknown_dialect_in_config_keeps_previous() {
    let active = Arc::new(ActiveDialect::new());
    active.set("redshift").unwrap();
    let (tx, rx) = watch::channel(config("redshift"));
    let task = follow_config(rx, Arc::clone(&active));

    tx.send(config("bogus")).unwrap();
    drop(tx);
    task.await.unwrap();

    assert!(is_active(&active, "redshift"));
}

#[tokio::test]
async fn unknown_initial_dialect_leaves_default() {
    let active = Arc::new(ActiveDialect::new());
    let (tx, rx) = watch::channel(config("bogus"));
    let task = follow_config(rx, Arc::clone(&active));
    drop(tx);
    task.await.unwrap();

    assert!(is_active(&active, "postgres"));
}

#[tokio::test]
async fn followed_dialect_records_history() {
    let active = Arc::new(ActiveDialect::new());
    let (tx, rx) = watch::channel(config("sqlite3"));
    drop(tx);
    follow_config(rx, Arc::clone(&active)).await.unwrap();

    let dialect = active.get();
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(dialect.create_version_table_sql()).unwrap();
    conn.execute(dialect.insert_version_sql(), params![5i64, true])
        .unwrap();

    let rows = dialect
        .db_version_query(&conn)
        .unwrap()
        .collect_rows()
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].version_id, 5);
}
