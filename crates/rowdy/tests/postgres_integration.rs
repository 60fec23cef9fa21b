//! Integration tests against real PostgreSQL.
//!
//! Opt in by pointing `ROWDY_TEST_HOST` (and optionally
//! `ROWDY_TEST_PORT`, `ROWDY_TEST_USER`, `ROWDY_TEST_PASSWORD`,
//! `ROWDY_TEST_DBNAME`) at a running server:
//!
//! ```text
//! ROWDY_TEST_HOST=127.0.0.1 cargo test -p rowdy --test postgres_integration
//! ```
//!
//! Without `ROWDY_TEST_HOST` the tests skip.

use rowdy::{ConnectOptions, Error, MarshalMode, Object, Session, Value, connect};

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

async fn setup() -> Option<Session> {
    let host = match std::env::var("ROWDY_TEST_HOST") {
        Ok(host) => host,
        Err(_) => {
            eprintln!("skipping: ROWDY_TEST_HOST not set");
            return None;
        }
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let opts = ConnectOptions::new(
        "postgres",
        host,
        env_or("ROWDY_TEST_PORT", "5432").parse().expect("port"),
        env_or("ROWDY_TEST_USER", "postgres"),
        env_or("ROWDY_TEST_PASSWORD", "postgres"),
        env_or("ROWDY_TEST_DBNAME", "postgres"),
    )
    .expect("options");

    Some(connect(&opts).await.expect("connect"))
}

fn row(entries: &[(&str, Value)]) -> Object {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

async fn create_fixture(session: &Session, table: &str) {
    session
        .execute(&format!(
            "CREATE TABLE {table} (
                id SERIAL PRIMARY KEY,
                name TEXT,
                age INT4,
                score FLOAT8,
                active BOOL,
                meta JSONB
            )"
        ))
        .await
        .expect("create table");
}

#[tokio::test]
async fn test_crud_round_trip() {
    let Some(session) = setup().await else {
        return;
    };
    let table = "rowdy_it_crud";
    session
        .execute(&format!("DROP TABLE IF EXISTS {table}"))
        .await
        .expect("drop");
    create_fixture(&session, table).await;

    let alice = row(&[
        ("name", Value::from("O'Brien")),
        ("age", Value::from(40i64)),
        ("score", Value::from(1.5)),
        ("active", Value::from(true)),
        (
            "meta",
            Value::Array(vec![Value::Int(1), Value::Int(2)]),
        ),
    ]);
    let summary = session.add(table, &alice).await.expect("add");
    assert_eq!(summary.rows_affected, 1);
    assert_eq!(summary.last_insert_id, -1);

    let conditions = row(&[("name", Value::from("O'Brien"))]);
    let fetched = session
        .get(table, &[], &conditions)
        .await
        .expect("get");
    assert_eq!(fetched["name"], Value::from("O'Brien"));
    assert_eq!(fetched["age"], Value::Int(40));
    assert_eq!(fetched["score"], Value::Double(1.5));
    assert_eq!(fetched["active"], Value::Bool(true));
    assert_eq!(
        fetched["meta"],
        Value::Array(vec![Value::Int(1), Value::Int(2)])
    );

    assert!(session.exists(table, &conditions).await.expect("exists"));
    assert_eq!(session.count(table, &conditions).await.expect("count"), 1);

    let patch = row(&[("age", Value::from(41i64)), ("meta", Value::Null)]);
    let summary = session
        .update(table, &patch, &conditions)
        .await
        .expect("update");
    assert_eq!(summary.rows_affected, 1);

    let fetched = session.get(table, &[], &conditions).await.expect("get");
    assert_eq!(fetched["age"], Value::Int(41));
    assert_eq!(fetched["meta"], Value::Null);

    let summary = session.delete(table, &conditions).await.expect("delete");
    assert_eq!(summary.rows_affected, 1);
    assert!(!session.exists(table, &conditions).await.expect("exists"));

    let err = session.get(table, &[], &conditions).await.unwrap_err();
    assert!(matches!(err, Error::NoRows));

    session
        .execute(&format!("DROP TABLE {table}"))
        .await
        .expect("drop");
    session.close().await;
}

#[tokio::test]
async fn test_transaction_rollback_and_commit() {
    let Some(mut session) = setup().await else {
        return;
    };
    let table = "rowdy_it_tx";
    session
        .execute(&format!("DROP TABLE IF EXISTS {table}"))
        .await
        .expect("drop");
    create_fixture(&session, table).await;

    let bob = row(&[("name", Value::from("Bob"))]);
    let conditions = row(&[("name", Value::from("Bob"))]);

    let tx = session.begin().await.expect("begin");
    tx.add(table, &bob).await.expect("add");
    assert_eq!(tx.count(table, &conditions).await.expect("count"), 1);
    tx.rollback().await.expect("rollback");
    assert_eq!(
        session.count(table, &conditions).await.expect("count"),
        0
    );

    let tx = session.begin().await.expect("begin");
    tx.add(table, &bob).await.expect("add");
    tx.commit().await.expect("commit");
    assert_eq!(
        session.count(table, &conditions).await.expect("count"),
        1
    );

    session
        .execute(&format!("DROP TABLE {table}"))
        .await
        .expect("drop");
    session.close().await;
}

#[tokio::test]
async fn test_marshal_modes_on_unmapped_types() {
    let Some(session) = setup().await else {
        return;
    };

    // uuid has no mapping: lenient omits the column
    let rows = session
        .query("SELECT 1 AS n, gen_random_uuid() AS u")
        .await
        .expect("query");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["n"], Value::Int(1));
    assert!(!rows[0].contains_key("u"));

    let session = session.marshal_mode(MarshalMode::Strict);
    let err = session
        .query("SELECT gen_random_uuid() AS u")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::UnsupportedColumnType { column, .. } if column == "u"
    ));
    session.close().await;
}

#[tokio::test]
async fn test_fetch_one_and_raw_passthroughs() {
    let Some(session) = setup().await else {
        return;
    };

    let one = session.fetch_one("SELECT 7 AS n").await.expect("fetch");
    assert_eq!(one["n"], Value::Int(7));

    let err = session
        .fetch_one("SELECT 1 AS n WHERE FALSE")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NoRows));

    let err = session.query("SELEC nonsense").await.unwrap_err();
    assert!(matches!(err, Error::Postgres(_)));
    session.close().await;
}
