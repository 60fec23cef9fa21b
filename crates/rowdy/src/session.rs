//! Session and transaction façades.
//!
//! [`Session`] wraps a live connection, [`Tx`] an active transaction;
//! both expose the same row-level operations. A transaction mutably
//! borrows its session, so it is confined to one caller at a time by
//! construction.

use rowdy_sql::{Object, Value, delete_params, insert_params, select_params, update_params};
use tokio_postgres::types::ToSql;
use tokio_postgres::{Client, GenericClient, Transaction};

use crate::marshal::{MarshalMode, SqlParam, marshal_row};
use crate::{Error, Result};

/// Outcome of a write operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecSummary {
    /// Postgres reports no last-insert-id; this is the `-1` sentinel,
    /// kept for parity with engines that do.
    pub last_insert_id: i64,
    /// Rows affected, or `-1` when the driver cannot report it.
    pub rows_affected: i64,
}

/// A connection-bound session.
pub struct Session {
    client: Client,
    handle: tokio::task::JoinHandle<()>,
    mode: MarshalMode,
}

impl Session {
    pub(crate) fn new(client: Client, handle: tokio::task::JoinHandle<()>) -> Self {
        Self {
            client,
            handle,
            mode: MarshalMode::default(),
        }
    }

    /// Choose how unmapped result column types are handled.
    pub fn marshal_mode(mut self, mode: MarshalMode) -> Self {
        self.mode = mode;
        self
    }

    /// Liveness probe.
    pub async fn ping(&self) -> Result<()> {
        self.client.query_one("SELECT 1", &[]).await?;
        Ok(())
    }

    /// Start a transaction. The returned [`Tx`] borrows this session
    /// exclusively until committed, rolled back, or dropped.
    pub async fn begin(&mut self) -> Result<Tx<'_>> {
        let tx = self.client.transaction().await?;
        Ok(Tx {
            tx,
            mode: self.mode,
        })
    }

    /// Close the session and wait for the connection task to finish.
    pub async fn close(self) {
        let Session { client, handle, .. } = self;
        drop(client);
        let _ = handle.await;
    }

    /// Execute caller-supplied SQL and marshal every row.
    pub async fn query(&self, sql: &str) -> Result<Vec<Object>> {
        run_query(&self.client, self.mode, sql, &[]).await
    }

    /// Execute caller-supplied SQL and report affected rows.
    pub async fn execute(&self, sql: &str) -> Result<ExecSummary> {
        run_execute(&self.client, sql, &[]).await
    }

    /// Execute caller-supplied SQL and marshal the first row.
    /// Fails with [`Error::NoRows`] on an empty result set.
    pub async fn fetch_one(&self, sql: &str) -> Result<Object> {
        run_fetch_one(&self.client, self.mode, sql, &[]).await
    }

    /// List rows matching a condition set.
    pub async fn find(
        &self,
        table: &str,
        columns: &[&str],
        conditions: &Object,
        sort: &Object,
        limit: Option<u64>,
    ) -> Result<Vec<Object>> {
        run_find(&self.client, self.mode, table, columns, conditions, sort, limit).await
    }

    /// Fetch a single row matching a condition set.
    pub async fn get(&self, table: &str, columns: &[&str], conditions: &Object) -> Result<Object> {
        run_get(&self.client, self.mode, table, columns, conditions).await
    }

    /// Insert one row. An empty row fails before any SQL is built.
    pub async fn add(&self, table: &str, row: &Object) -> Result<ExecSummary> {
        run_add(&self.client, table, row).await
    }

    /// Update rows matching a condition set. An empty row fails before
    /// any SQL is built.
    pub async fn update(
        &self,
        table: &str,
        row: &Object,
        conditions: &Object,
    ) -> Result<ExecSummary> {
        run_update(&self.client, table, row, conditions).await
    }

    /// Delete rows matching a condition set.
    pub async fn delete(&self, table: &str, conditions: &Object) -> Result<ExecSummary> {
        run_delete(&self.client, table, conditions).await
    }

    /// Whether any row matches a condition set.
    pub async fn exists(&self, table: &str, conditions: &Object) -> Result<bool> {
        run_exists(&self.client, self.mode, table, conditions).await
    }

    /// Count rows matching a condition set.
    pub async fn count(&self, table: &str, conditions: &Object) -> Result<i64> {
        run_count(&self.client, self.mode, table, conditions).await
    }
}

/// A transaction-bound session.
pub struct Tx<'a> {
    tx: Transaction<'a>,
    mode: MarshalMode,
}

impl Tx<'_> {
    pub async fn commit(self) -> Result<()> {
        self.tx.commit().await?;
        Ok(())
    }

    pub async fn rollback(self) -> Result<()> {
        self.tx.rollback().await?;
        Ok(())
    }

    /// Execute caller-supplied SQL and marshal every row.
    pub async fn query(&self, sql: &str) -> Result<Vec<Object>> {
        run_query(&self.tx, self.mode, sql, &[]).await
    }

    /// Execute caller-supplied SQL and report affected rows.
    pub async fn execute(&self, sql: &str) -> Result<ExecSummary> {
        run_execute(&self.tx, sql, &[]).await
    }

    /// Execute caller-supplied SQL and marshal the first row.
    pub async fn fetch_one(&self, sql: &str) -> Result<Object> {
        run_fetch_one(&self.tx, self.mode, sql, &[]).await
    }

    /// List rows matching a condition set.
    pub async fn find(
        &self,
        table: &str,
        columns: &[&str],
        conditions: &Object,
        sort: &Object,
        limit: Option<u64>,
    ) -> Result<Vec<Object>> {
        run_find(&self.tx, self.mode, table, columns, conditions, sort, limit).await
    }

    /// Fetch a single row matching a condition set.
    pub async fn get(&self, table: &str, columns: &[&str], conditions: &Object) -> Result<Object> {
        run_get(&self.tx, self.mode, table, columns, conditions).await
    }

    /// Insert one row.
    pub async fn add(&self, table: &str, row: &Object) -> Result<ExecSummary> {
        run_add(&self.tx, table, row).await
    }

    /// Update rows matching a condition set.
    pub async fn update(
        &self,
        table: &str,
        row: &Object,
        conditions: &Object,
    ) -> Result<ExecSummary> {
        run_update(&self.tx, table, row, conditions).await
    }

    /// Delete rows matching a condition set.
    pub async fn delete(&self, table: &str, conditions: &Object) -> Result<ExecSummary> {
        run_delete(&self.tx, table, conditions).await
    }

    /// Whether any row matches a condition set.
    pub async fn exists(&self, table: &str, conditions: &Object) -> Result<bool> {
        run_exists(&self.tx, self.mode, table, conditions).await
    }

    /// Count rows matching a condition set.
    pub async fn count(&self, table: &str, conditions: &Object) -> Result<i64> {
        run_count(&self.tx, self.mode, table, conditions).await
    }
}

// Shared implementations over the client/transaction seam.

fn param_refs<'a>(params: &'a [SqlParam<'a>]) -> Vec<&'a (dyn ToSql + Sync)> {
    params
        .iter()
        .map(|p| p as &(dyn ToSql + Sync))
        .collect()
}

async fn run_query<C: GenericClient>(
    client: &C,
    mode: MarshalMode,
    sql: &str,
    params: &[Value],
) -> Result<Vec<Object>> {
    tracing::debug!(sql, "executing query");
    let params: Vec<SqlParam> = params.iter().map(SqlParam).collect();
    let rows = client.query(sql, &param_refs(&params)).await?;
    rows.iter().map(|row| marshal_row(row, mode)).collect()
}

async fn run_execute<C: GenericClient>(
    client: &C,
    sql: &str,
    params: &[Value],
) -> Result<ExecSummary> {
    tracing::debug!(sql, "executing statement");
    let params: Vec<SqlParam> = params.iter().map(SqlParam).collect();
    let affected = client.execute(sql, &param_refs(&params)).await?;
    Ok(ExecSummary {
        last_insert_id: -1,
        rows_affected: i64::try_from(affected).unwrap_or(-1),
    })
}

async fn run_fetch_one<C: GenericClient>(
    client: &C,
    mode: MarshalMode,
    sql: &str,
    params: &[Value],
) -> Result<Object> {
    tracing::debug!(sql, "fetching one row");
    let params: Vec<SqlParam> = params.iter().map(SqlParam).collect();
    let rows = client.query(sql, &param_refs(&params)).await?;
    let first = rows.first().ok_or(Error::NoRows)?;
    marshal_row(first, mode)
}

async fn run_find<C: GenericClient>(
    client: &C,
    mode: MarshalMode,
    table: &str,
    columns: &[&str],
    conditions: &Object,
    sort: &Object,
    limit: Option<u64>,
) -> Result<Vec<Object>> {
    let built = select_params(table, columns, conditions, sort, None, limit);
    run_query(client, mode, &built.sql, &built.params).await
}

async fn run_get<C: GenericClient>(
    client: &C,
    mode: MarshalMode,
    table: &str,
    columns: &[&str],
    conditions: &Object,
) -> Result<Object> {
    let built = select_params(table, columns, conditions, &Object::new(), None, Some(1));
    run_fetch_one(client, mode, &built.sql, &built.params).await
}

async fn run_add<C: GenericClient>(client: &C, table: &str, row: &Object) -> Result<ExecSummary> {
    let built = insert_params(table, row)?;
    run_execute(client, &built.sql, &built.params).await
}

async fn run_update<C: GenericClient>(
    client: &C,
    table: &str,
    row: &Object,
    conditions: &Object,
) -> Result<ExecSummary> {
    let built = update_params(table, row, conditions)?;
    run_execute(client, &built.sql, &built.params).await
}

async fn run_delete<C: GenericClient>(
    client: &C,
    table: &str,
    conditions: &Object,
) -> Result<ExecSummary> {
    let built = delete_params(table, conditions);
    run_execute(client, &built.sql, &built.params).await
}

async fn run_exists<C: GenericClient>(
    client: &C,
    mode: MarshalMode,
    table: &str,
    conditions: &Object,
) -> Result<bool> {
    let columns: Vec<&str> = conditions.keys().map(String::as_str).collect();
    match run_get(client, mode, table, &columns, conditions).await {
        Ok(_) => Ok(true),
        Err(Error::NoRows) => Ok(false),
        Err(e) => Err(e),
    }
}

async fn run_count<C: GenericClient>(
    client: &C,
    mode: MarshalMode,
    table: &str,
    conditions: &Object,
) -> Result<i64> {
    // No dedicated count path: a count(*) projection through fetch-one.
    let built = select_params(table, &["count(*)"], conditions, &Object::new(), None, None);
    let row = run_fetch_one(client, mode, &built.sql, &built.params).await?;
    let value = row.values().next().ok_or(Error::NoRows)?;
    Ok(value.as_int()?)
}
