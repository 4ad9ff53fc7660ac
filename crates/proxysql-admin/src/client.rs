//! The admin client.
//!
//! [`ProxySql`] is the only thing that talks to the admin interface. Every
//! operation follows the same shape:
//!
//! 1. build and validate a [`HostQuery`] (failures return before the lock is taken)
//! 2. take the lock: shared for reads, exclusive for writes
//! 3. render and execute the statement
//! 4. for reads, decode each row into a [`Host`]
//!
//! Executor errors are returned unchanged; nothing is retried.

use crate::config::AdminConfig;
use crate::error::{AdminError, AdminResult, ConfigError};
use crate::executor::AdminExecutor;
use crate::host::Host;
use crate::query::{HostOpt, HostQuery, hostgroup_id, hostname, max_connections};
use crate::row::{AdminRow, FromRow};
use crate::trace::TracedExecutor;
use tokio::sync::RwLock;

/// Copies the `mysql_servers` configuration to disk.
pub const SAVE_TO_DISK: &str = "save mysql servers to disk";

/// Activates the `mysql_servers` configuration.
pub const LOAD_TO_RUNTIME: &str = "load mysql servers to runtime";

/// A handle on one ProxySQL admin connection.
///
/// Reads run concurrently; writes are serialized against each other and
/// against reads, so a read started after a write completes sees that write.
pub struct ProxySql<E> {
    executor: TracedExecutor<E>,
    lock: RwLock<()>,
    config: AdminConfig,
}

impl<E: AdminExecutor> ProxySql<E> {
    /// Create a client with the default configuration.
    pub fn new(executor: E) -> Self {
        let config = AdminConfig::default();
        Self {
            executor: TracedExecutor::new(executor).max_sql_length(config.max_sql_length),
            lock: RwLock::new(()),
            config,
        }
    }

    /// Create a client with `config`, rejecting out-of-range hostgroups.
    pub fn with_config(executor: E, config: AdminConfig) -> AdminResult<Self> {
        config.validate()?;
        Ok(Self {
            executor: TracedExecutor::new(executor).max_sql_length(config.max_sql_length),
            lock: RwLock::new(()),
            config,
        })
    }

    pub fn config(&self) -> &AdminConfig {
        &self.config
    }

    /// The wrapped executor.
    pub fn executor(&self) -> &E {
        self.executor.inner()
    }

    // ==================== Lifecycle ====================

    pub async fn ping(&self) -> AdminResult<()> {
        let _guard = self.lock.read().await;
        self.executor.ping().await
    }

    /// Close the underlying connection once in-flight operations finish.
    pub async fn close(&self) {
        let _guard = self.lock.write().await;
        self.executor.close().await;
        tracing::info!("admin connection closed");
    }

    /// Save `mysql_servers` to disk, then load it to runtime.
    ///
    /// Stops at the first failure. If the load fails after the save
    /// succeeded, disk and runtime configuration differ until the next
    /// successful call.
    pub async fn persist_changes(&self) -> AdminResult<()> {
        let _guard = self.lock.write().await;
        self.executor.execute(SAVE_TO_DISK).await?;
        self.executor.execute(LOAD_TO_RUNTIME).await?;
        tracing::info!("mysql servers persisted and loaded to runtime");
        Ok(())
    }

    // ==================== Writes ====================

    /// Insert a host built from `opts`. A hostname is required; every other
    /// column not given keeps its table default.
    pub async fn add_host(&self, opts: impl IntoIterator<Item = HostOpt>) -> AdminResult<()> {
        let query = HostQuery::build_and_parse_require_hostname(opts)?;
        let _guard = self.lock.write().await;
        self.executor.execute(&query.render_insert()).await?;
        Ok(())
    }

    /// Insert full rows into `mysql_servers`.
    ///
    /// Every host is validated before the first insert is sent; inserts then
    /// run in order and stop at the first failure.
    pub async fn add_hosts(&self, hosts: &[Host]) -> AdminResult<()> {
        for host in hosts {
            host.validate()?;
            if host.hostname().is_empty() {
                return Err(ConfigError::NoHostname.into());
            }
        }
        let _guard = self.lock.write().await;
        for host in hosts {
            let sql = format!(
                "insert into mysql_servers {} values {}",
                host.render_columns(),
                host.render_values()
            );
            self.executor.execute(&sql).await?;
        }
        Ok(())
    }

    /// Delete every row of `mysql_servers`.
    pub async fn clear(&self) -> AdminResult<()> {
        let _guard = self.lock.write().await;
        self.executor
            .execute(&HostQuery::default().render_delete())
            .await?;
        Ok(())
    }

    /// Delete the row matching `host` on every column.
    pub async fn remove_host(&self, host: &Host) -> AdminResult<()> {
        let sql = format!("delete from mysql_servers where {}", host.render_where());
        let _guard = self.lock.write().await;
        self.executor.execute(&sql).await?;
        Ok(())
    }

    /// [`ProxySql::remove_host`] for each host, stopping at the first failure.
    pub async fn remove_hosts(&self, hosts: &[Host]) -> AdminResult<()> {
        for host in hosts {
            self.remove_host(host).await?;
        }
        Ok(())
    }

    /// Delete every row matching the specified fields. With no field options
    /// this clears the table.
    pub async fn remove_hosts_like(
        &self,
        opts: impl IntoIterator<Item = HostOpt>,
    ) -> AdminResult<()> {
        let query = HostQuery::build_and_parse(opts)?;
        let _guard = self.lock.write().await;
        self.executor.execute(&query.render_delete()).await?;
        Ok(())
    }

    pub async fn remove_host_from_hostgroup(&self, host: &str, hostgroup: i64) -> AdminResult<()> {
        self.remove_hosts_like([hostname(host), hostgroup_id(hostgroup)])
            .await
    }

    /// Point the writer hostgroup at `host`.
    ///
    /// Inserts a writer row if there is none, otherwise renames the row the
    /// lookup returned, matched on its `(hostgroup_id, hostname, port)` key.
    /// Other rows in the writer hostgroup are left alone. The lookup and the
    /// write run under one exclusive lock.
    pub async fn set_writer(&self, host: &str, max_conns: i64) -> AdminResult<()> {
        let writer_hostgroup = self.config.writer_hostgroup;
        let insert = HostQuery::build_and_parse_require_hostname([
            hostgroup_id(writer_hostgroup),
            hostname(host),
            max_connections(max_conns),
        ])?;
        let filter = HostQuery::default().hostgroup_id(writer_hostgroup);

        let _guard = self.lock.write().await;
        match self.lookup_writer(&filter).await? {
            None => {
                self.executor.execute(&insert.render_insert()).await?;
                tracing::info!(hostname = host, hostgroup = writer_hostgroup, "writer inserted");
            }
            Some(current) => {
                let rename = HostQuery::default().hostname(host);
                let current_row = HostQuery::default()
                    .hostgroup_id(writer_hostgroup)
                    .hostname(current.hostname())
                    .port(current.port());
                self.executor
                    .execute(&rename.render_update(&current_row)?)
                    .await?;
                tracing::info!(
                    hostname = host,
                    previous = current.hostname(),
                    hostgroup = writer_hostgroup,
                    "writer replaced"
                );
            }
        }
        Ok(())
    }

    // ==================== Reads ====================

    /// Every host matching the specified fields. No matches is an empty vec.
    pub async fn hosts_like(&self, opts: impl IntoIterator<Item = HostOpt>) -> AdminResult<Vec<Host>> {
        let query = HostQuery::build_and_parse(opts)?;
        let _guard = self.lock.read().await;
        self.fetch_hosts(&query.render_select()).await
    }

    /// Every host in a table. Only [`crate::table`] options are accepted.
    pub async fn all(&self, opts: impl IntoIterator<Item = HostOpt>) -> AdminResult<Vec<Host>> {
        let opts: Vec<HostOpt> = opts.into_iter().collect();
        if let Some(extra) = opts.iter().find(|opt| !opt.is_table()) {
            return Err(AdminError::usage(format!(
                "all() only accepts table options, got {extra:?}"
            )));
        }
        self.hosts_like(opts).await
    }

    pub async fn hostgroup(&self, hostgroup: i64) -> AdminResult<Vec<Host>> {
        self.hosts_like([hostgroup_id(hostgroup)]).await
    }

    /// Hosts in the configured reader hostgroup.
    pub async fn readers(&self) -> AdminResult<Vec<Host>> {
        self.hostgroup(self.config.reader_hostgroup).await
    }

    pub async fn host_exists(&self, host: &str) -> AdminResult<bool> {
        let query = HostQuery::build_and_parse([hostname(host)])?;
        let _guard = self.lock.read().await;
        Ok(self.count(&query).await? > 0)
    }

    pub async fn size_of_hostgroup(&self, hostgroup: i64) -> AdminResult<usize> {
        let query = HostQuery::build_and_parse([hostgroup_id(hostgroup)])?;
        let _guard = self.lock.read().await;
        self.count(&query).await
    }

    /// The host in the writer hostgroup.
    ///
    /// Returns [`AdminError::NotFound`] when the hostgroup is empty.
    pub async fn writer(&self) -> AdminResult<Host> {
        let filter = HostQuery::default().hostgroup_id(self.config.writer_hostgroup);
        let _guard = self.lock.read().await;
        self.lookup_writer(&filter).await?.ok_or_else(|| {
            AdminError::not_found(format!(
                "no writer in hostgroup {}",
                self.config.writer_hostgroup
            ))
        })
    }

    // ==================== Helpers (caller holds the lock) ====================

    async fn fetch_hosts(&self, sql: &str) -> AdminResult<Vec<Host>> {
        let rows = match self.executor.query(sql).await {
            Ok(rows) => rows,
            Err(err) if err.is_not_found() => return Ok(Vec::new()),
            Err(err) => return Err(err),
        };
        rows.iter().map(Host::from_row).collect()
    }

    async fn lookup_writer(&self, filter: &HostQuery) -> AdminResult<Option<Host>> {
        let row = match self.executor.query_opt(&filter.render_select()).await {
            Ok(row) => row,
            Err(err) if err.is_not_found() => None,
            Err(err) => return Err(err),
        };
        row.as_ref().map(Host::from_row).transpose()
    }

    async fn count(&self, query: &HostQuery) -> AdminResult<usize> {
        let row = self
            .executor
            .query_opt(&query.render_count())
            .await?
            .ok_or_else(|| AdminError::not_found("count(*) returned no rows"))?;
        decode_count(&row)
    }
}

fn decode_count(row: &AdminRow) -> AdminResult<usize> {
    let column = row
        .columns()
        .first()
        .cloned()
        .unwrap_or_else(|| "count(*)".to_string());
    let value = row
        .get_index(0)
        .ok_or_else(|| AdminError::decode(&column, "empty row"))?;
    let n = <i64 as crate::row::FromValue>::from_value(&column, value)?;
    usize::try_from(n).map_err(|_| AdminError::decode(column, format!("negative count {n}")))
}
