//! SQL logging for admin statements.

use crate::error::AdminResult;
use crate::executor::AdminExecutor;
use crate::row::AdminRow;

/// Truncate to at most `max_bytes`, backing off to a char boundary.
fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

/// An executor wrapper that emits every statement through `tracing`.
///
/// Statements are logged at `DEBUG` under the `proxysql_admin::sql` target
/// before they run; failures are logged at `WARN` and returned unchanged.
#[derive(Debug, Clone)]
pub struct TracedExecutor<E> {
    inner: E,
    /// Truncate long SQL strings (in bytes). `None` means no truncation.
    max_sql_length: Option<usize>,
}

impl<E: AdminExecutor> TracedExecutor<E> {
    pub fn new(inner: E) -> Self {
        Self {
            inner,
            max_sql_length: Some(200),
        }
    }

    /// Set maximum SQL length to display.
    pub fn max_sql_length(mut self, len: Option<usize>) -> Self {
        self.max_sql_length = len;
        self
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }

    pub fn into_inner(self) -> E {
        self.inner
    }

    fn truncate_sql(&self, sql: &str) -> String {
        match self.max_sql_length {
            Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
            _ => sql.to_string(),
        }
    }

    fn log_result<T>(&self, kind: &'static str, sql: &str, result: &AdminResult<T>) {
        if let Err(err) = result {
            tracing::warn!(
                target: "proxysql_admin::sql",
                kind,
                sql = %self.truncate_sql(sql),
                error = %err,
                "admin statement failed"
            );
        }
    }
}

impl<E: AdminExecutor> AdminExecutor for TracedExecutor<E> {
    async fn execute(&self, sql: &str) -> AdminResult<u64> {
        tracing::debug!(target: "proxysql_admin::sql", kind = "execute", sql = %self.truncate_sql(sql));
        let result = self.inner.execute(sql).await;
        self.log_result("execute", sql, &result);
        result
    }

    async fn query(&self, sql: &str) -> AdminResult<Vec<AdminRow>> {
        tracing::debug!(target: "proxysql_admin::sql", kind = "query", sql = %self.truncate_sql(sql));
        let result = self.inner.query(sql).await;
        self.log_result("query", sql, &result);
        result
    }

    async fn query_opt(&self, sql: &str) -> AdminResult<Option<AdminRow>> {
        tracing::debug!(target: "proxysql_admin::sql", kind = "query_opt", sql = %self.truncate_sql(sql));
        let result = self.inner.query_opt(sql).await;
        self.log_result("query_opt", sql, &result);
        result
    }

    async fn ping(&self) -> AdminResult<()> {
        self.inner.ping().await
    }

    async fn close(&self) {
        self.inner.close().await
    }
}
