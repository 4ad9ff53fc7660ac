//! The executor trait the admin client runs statements through.

use crate::error::AdminResult;
use crate::row::AdminRow;
use std::sync::Arc;

/// Executes admin statements against ProxySQL.
///
/// Statements are fully rendered SQL text; the admin interface does not
/// support bound parameters. Implement this for a live connection (see
/// `MySqlExecutor` behind the `mysql` feature) or for a test double.
pub trait AdminExecutor: Send + Sync {
    /// Execute a statement and return the number of affected rows.
    fn execute(&self, sql: &str) -> impl std::future::Future<Output = AdminResult<u64>> + Send;

    /// Execute a query and return all rows.
    ///
    /// Implementations may report an exhausted result set as
    /// [`crate::AdminError::NotFound`]; list operations treat that as zero rows.
    fn query(
        &self,
        sql: &str,
    ) -> impl std::future::Future<Output = AdminResult<Vec<AdminRow>>> + Send;

    /// Execute a query and return the first row, if any.
    ///
    /// Semantics:
    /// - 0 rows: returns `Ok(None)`
    /// - 1 or more rows: returns `Ok(Some(first_row))`
    fn query_opt(
        &self,
        sql: &str,
    ) -> impl std::future::Future<Output = AdminResult<Option<AdminRow>>> + Send {
        async move {
            let rows = self.query(sql).await?;
            Ok(rows.into_iter().next())
        }
    }

    /// Check that the connection is alive.
    fn ping(&self) -> impl std::future::Future<Output = AdminResult<()>> + Send {
        async { Ok(()) }
    }

    /// Release the underlying connection.
    fn close(&self) -> impl std::future::Future<Output = ()> + Send {
        async {}
    }
}

// ===== Reference implementations =====

impl<E: AdminExecutor> AdminExecutor for &E {
    fn execute(&self, sql: &str) -> impl std::future::Future<Output = AdminResult<u64>> + Send {
        (*self).execute(sql)
    }

    fn query(
        &self,
        sql: &str,
    ) -> impl std::future::Future<Output = AdminResult<Vec<AdminRow>>> + Send {
        (*self).query(sql)
    }

    fn query_opt(
        &self,
        sql: &str,
    ) -> impl std::future::Future<Output = AdminResult<Option<AdminRow>>> + Send {
        (*self).query_opt(sql)
    }

    fn ping(&self) -> impl std::future::Future<Output = AdminResult<()>> + Send {
        (*self).ping()
    }

    fn close(&self) -> impl std::future::Future<Output = ()> + Send {
        (*self).close()
    }
}

impl<E: AdminExecutor> AdminExecutor for Arc<E> {
    fn execute(&self, sql: &str) -> impl std::future::Future<Output = AdminResult<u64>> + Send {
        self.as_ref().execute(sql)
    }

    fn query(
        &self,
        sql: &str,
    ) -> impl std::future::Future<Output = AdminResult<Vec<AdminRow>>> + Send {
        self.as_ref().query(sql)
    }

    fn query_opt(
        &self,
        sql: &str,
    ) -> impl std::future::Future<Output = AdminResult<Option<AdminRow>>> + Send {
        self.as_ref().query_opt(sql)
    }

    fn ping(&self) -> impl std::future::Future<Output = AdminResult<()>> + Send {
        self.as_ref().ping()
    }

    fn close(&self) -> impl std::future::Future<Output = ()> + Send {
        self.as_ref().close()
    }
}
