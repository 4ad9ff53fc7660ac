//! An in-memory SQLite stand-in for the ProxySQL admin port.
//!
//! ProxySQL keeps its admin tables in SQLite, so the rendered statements run
//! unchanged against tables created with the admin schema: the same column
//! defaults and checks, and the `(hostgroup_id, hostname, port)` primary key.
//! `save mysql servers to disk` and `load mysql servers to runtime` are
//! emulated with `insert into ... select` into an attached `disk` database and
//! `runtime_mysql_servers`.

#![allow(dead_code)]

use proxysql_admin::{
    AdminError, AdminExecutor, AdminResult, AdminRow, FromRow, Host, LOAD_TO_RUNTIME,
    SAVE_TO_DISK, Value,
};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Column, Row};
use std::borrow::Cow;
use std::sync::Mutex;
use std::time::Duration;

pub const SERVERS: &str = "mysql_servers";
pub const RUNTIME: &str = "runtime_mysql_servers";
pub const DISK: &str = "disk.mysql_servers";

fn create_table(table: &str) -> String {
    format!(
        "CREATE TABLE {table} (
            hostgroup_id INT CHECK (hostgroup_id >= 0) NOT NULL DEFAULT 0,
            hostname VARCHAR NOT NULL,
            port INT CHECK (port >= 0 AND port <= 65535) NOT NULL DEFAULT 3306,
            status VARCHAR CHECK (UPPER(status) IN ('ONLINE','SHUNNED','OFFLINE_SOFT','OFFLINE_HARD')) NOT NULL DEFAULT 'ONLINE',
            weight INT CHECK (weight >= 0) NOT NULL DEFAULT 1,
            compression INT CHECK (compression >= 0 AND compression <= 102400) NOT NULL DEFAULT 0,
            max_connections INT CHECK (max_connections >= 0) NOT NULL DEFAULT 1000,
            max_replication_lag INT CHECK (max_replication_lag >= 0 AND max_replication_lag <= 126144000) NOT NULL DEFAULT 0,
            use_ssl INT CHECK (use_ssl IN (0,1)) NOT NULL DEFAULT 0,
            max_latency_ms INT UNSIGNED CHECK (max_latency_ms >= 0) NOT NULL DEFAULT 0,
            comment VARCHAR NOT NULL DEFAULT '',
            PRIMARY KEY (hostgroup_id, hostname, port)
        )"
    )
}

/// Executor over a single in-memory SQLite connection, with statement
/// logging, failure injection and an optional per-statement delay.
pub struct SqliteAdmin {
    pool: SqlitePool,
    log: Mutex<Vec<String>>,
    fail_prefixes: Vec<String>,
    delay: Option<Duration>,
}

impl SqliteAdmin {
    pub async fn open() -> Self {
        // One connection that never expires: every `:memory:` connection is
        // its own database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .expect("open in-memory sqlite");

        let schema = format!(
            "ATTACH DATABASE ':memory:' AS disk; {}; {}; {};",
            create_table(SERVERS),
            create_table(RUNTIME),
            create_table(DISK)
        );
        sqlx::raw_sql(&schema)
            .execute(&pool)
            .await
            .expect("create admin tables");

        Self {
            pool,
            log: Mutex::new(Vec::new()),
            fail_prefixes: Vec::new(),
            delay: None,
        }
    }

    /// Fail every statement starting with `prefix`.
    pub fn fail_on(mut self, prefix: &str) -> Self {
        self.fail_prefixes.push(prefix.to_string());
        self
    }

    /// Sleep before answering each statement.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Insert full rows directly, bypassing the log and failure injection.
    pub async fn seed(self, table: &str, hosts: impl IntoIterator<Item = Host>) -> Self {
        for host in hosts {
            let sql = format!(
                "insert into {table} {} values {}",
                host.render_columns(),
                host.render_values()
            );
            sqlx::raw_sql(&sql)
                .execute(&self.pool)
                .await
                .expect("seed row");
        }
        self
    }

    /// Statements received through [`AdminExecutor`], in order.
    pub fn statements(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    pub async fn rows(&self, table: &str) -> Vec<Host> {
        self.fetch(&format!("select * from {table}"))
            .await
            .expect("read table")
            .iter()
            .map(|row| Host::from_row(row).expect("decode host"))
            .collect()
    }

    pub async fn disk(&self) -> Vec<Host> {
        self.rows(DISK).await
    }

    async fn enter(&self, sql: &str) -> AdminResult<()> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.log.lock().unwrap().push(sql.to_string());
        if self.fail_prefixes.iter().any(|p| sql.starts_with(p.as_str())) {
            return Err(AdminError::query(format!("injected failure: {sql}")));
        }
        Ok(())
    }

    async fn fetch(&self, sql: &str) -> AdminResult<Vec<AdminRow>> {
        let rows = sqlx::raw_sql(sql)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;
        rows.iter().map(decode_row).collect()
    }
}

impl AdminExecutor for SqliteAdmin {
    async fn execute(&self, sql: &str) -> AdminResult<u64> {
        self.enter(sql).await?;
        let sql = translate(sql);
        let result = sqlx::raw_sql(&sql)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(result.rows_affected())
    }

    async fn query(&self, sql: &str) -> AdminResult<Vec<AdminRow>> {
        self.enter(sql).await?;
        self.fetch(sql).await
    }
}

/// Admin commands that are not SQL become the copies they perform.
fn translate(sql: &str) -> Cow<'_, str> {
    if sql == SAVE_TO_DISK {
        Cow::Owned(format!(
            "DELETE FROM {DISK}; INSERT INTO {DISK} SELECT * FROM main.{SERVERS};"
        ))
    } else if sql == LOAD_TO_RUNTIME {
        Cow::Owned(format!(
            "DELETE FROM main.{RUNTIME}; INSERT INTO main.{RUNTIME} SELECT * FROM main.{SERVERS};"
        ))
    } else {
        Cow::Borrowed(sql)
    }
}

fn db_error(err: sqlx::Error) -> AdminError {
    match err {
        sqlx::Error::RowNotFound => AdminError::not_found("no rows in result set"),
        other => AdminError::query(other.to_string()),
    }
}

fn decode_row(row: &SqliteRow) -> AdminResult<AdminRow> {
    let mut columns = Vec::with_capacity(row.len());
    let mut values = Vec::with_capacity(row.len());
    for (i, column) in row.columns().iter().enumerate() {
        let value = match row.try_get::<Option<i64>, _>(i) {
            Ok(v) => Value::from(v),
            Err(_) => Value::from(row.try_get::<Option<String>, _>(i).map_err(db_error)?),
        };
        columns.push(column.name().to_string());
        values.push(value);
    }
    Ok(AdminRow::new(columns, values))
}
