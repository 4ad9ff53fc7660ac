//! Host query builder.
//!
//! A [`HostQuery`] starts from the table defaults and records which fields
//! were explicitly set, in call order. Only those fields show up in the
//! rendered statements:
//!
//! ```
//! use proxysql_admin::{HostQuery, hostgroup_id, hostname, port, table};
//!
//! let q = HostQuery::build_and_parse([
//!     port(1),
//!     hostgroup_id(3),
//!     table("runtime_mysql_servers"),
//!     hostname("host"),
//! ])
//! .unwrap();
//!
//! assert_eq!(
//!     q.render_insert(),
//!     "insert into runtime_mysql_servers (port, hostgroup_id, hostname) values (1, 3, 'host')"
//! );
//! assert_eq!(
//!     q.render_select(),
//!     "select * from runtime_mysql_servers where port = 1 and hostgroup_id = 3 and hostname = 'host'"
//! );
//! ```

use crate::error::{AdminError, AdminResult, ConfigError};
use crate::host::{Host, HostField};
use crate::validate::{require_hostname, validate_host_query};

/// Default table for every query.
pub const DEFAULT_TABLE: &str = "mysql_servers";

/// One field assignment applied to a [`HostQuery`].
///
/// Built with the free functions [`table`], [`hostgroup_id`], [`hostname`]
/// and friends, and applied left to right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostOpt {
    Table(String),
    HostgroupId(i64),
    Hostname(String),
    Port(i64),
    Status(String),
    Weight(i64),
    Compression(i64),
    MaxConnections(i64),
    MaxReplicationLag(i64),
    UseSsl(i64),
    MaxLatencyMs(i64),
    Comment(String),
}

impl HostOpt {
    /// Whether this option only selects the target table.
    pub fn is_table(&self) -> bool {
        matches!(self, HostOpt::Table(_))
    }

    /// Apply this option to `query`.
    ///
    /// Field options also mark the field as specified; the table option does
    /// not, since the table is never part of a column or WHERE list.
    pub fn apply(self, query: &mut HostQuery) {
        let field = match self {
            HostOpt::Table(t) => {
                query.table = t;
                return;
            }
            HostOpt::HostgroupId(v) => {
                query.host.hostgroup_id = v;
                HostField::HostgroupId
            }
            HostOpt::Hostname(v) => {
                query.host.hostname = v;
                HostField::Hostname
            }
            HostOpt::Port(v) => {
                query.host.port = v;
                HostField::Port
            }
            HostOpt::Status(v) => {
                query.host.status = v;
                HostField::Status
            }
            HostOpt::Weight(v) => {
                query.host.weight = v;
                HostField::Weight
            }
            HostOpt::Compression(v) => {
                query.host.compression = v;
                HostField::Compression
            }
            HostOpt::MaxConnections(v) => {
                query.host.max_connections = v;
                HostField::MaxConnections
            }
            HostOpt::MaxReplicationLag(v) => {
                query.host.max_replication_lag = v;
                HostField::MaxReplicationLag
            }
            HostOpt::UseSsl(v) => {
                query.host.use_ssl = v;
                HostField::UseSsl
            }
            HostOpt::MaxLatencyMs(v) => {
                query.host.max_latency_ms = v;
                HostField::MaxLatencyMs
            }
            HostOpt::Comment(v) => {
                query.host.comment = v;
                HostField::Comment
            }
        };
        query.specified_fields.push(field);
    }
}

// ==================== Option constructors ====================

/// Target table: `mysql_servers` (default) or `runtime_mysql_servers`.
pub fn table(name: impl Into<String>) -> HostOpt {
    HostOpt::Table(name.into())
}

pub fn hostgroup_id(hostgroup_id: i64) -> HostOpt {
    HostOpt::HostgroupId(hostgroup_id)
}

pub fn hostname(hostname: impl Into<String>) -> HostOpt {
    HostOpt::Hostname(hostname.into())
}

pub fn port(port: i64) -> HostOpt {
    HostOpt::Port(port)
}

/// Accepts a [`crate::HostStatus`] or any string; unknown values fail validation.
pub fn status(status: impl Into<String>) -> HostOpt {
    HostOpt::Status(status.into())
}

pub fn weight(weight: i64) -> HostOpt {
    HostOpt::Weight(weight)
}

pub fn compression(compression: i64) -> HostOpt {
    HostOpt::Compression(compression)
}

pub fn max_connections(max_connections: i64) -> HostOpt {
    HostOpt::MaxConnections(max_connections)
}

pub fn max_replication_lag(max_replication_lag: i64) -> HostOpt {
    HostOpt::MaxReplicationLag(max_replication_lag)
}

pub fn use_ssl(use_ssl: i64) -> HostOpt {
    HostOpt::UseSsl(use_ssl)
}

pub fn max_latency_ms(max_latency_ms: i64) -> HostOpt {
    HostOpt::MaxLatencyMs(max_latency_ms)
}

pub fn comment(comment: impl Into<String>) -> HostOpt {
    HostOpt::Comment(comment.into())
}

/// A partially specified `mysql_servers` row plus its target table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostQuery {
    table: String,
    host: Host,
    specified_fields: Vec<HostField>,
}

impl Default for HostQuery {
    fn default() -> Self {
        Self {
            table: DEFAULT_TABLE.to_string(),
            host: Host::default(),
            specified_fields: Vec::new(),
        }
    }
}

impl HostQuery {
    /// Apply `opts` in order to a default query and validate the result.
    pub fn build_and_parse(opts: impl IntoIterator<Item = HostOpt>) -> Result<Self, ConfigError> {
        let mut query = Self::default();
        for opt in opts {
            opt.apply(&mut query);
        }
        if let Err(err) = validate_host_query(&query) {
            tracing::debug!(target: "proxysql_admin::query", error = %err, ?query, "host query rejected");
            return Err(err);
        }
        Ok(query)
    }

    /// Like [`HostQuery::build_and_parse`], additionally requiring a hostname.
    pub fn build_and_parse_require_hostname(
        opts: impl IntoIterator<Item = HostOpt>,
    ) -> Result<Self, ConfigError> {
        let query = Self::build_and_parse(opts)?;
        require_hostname(&query)?;
        Ok(query)
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn host(&self) -> &Host {
        &self.host
    }

    pub fn specified_fields(&self) -> &[HostField] {
        &self.specified_fields
    }

    pub fn into_host(self) -> Host {
        self.host
    }

    // ==================== Chained setters ====================

    /// Replace the target table without marking anything as specified.
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Replace the whole host without marking anything as specified.
    pub fn with_host(mut self, host: Host) -> Self {
        self.host = host;
        self
    }

    /// Apply a single option.
    pub fn opt(mut self, opt: HostOpt) -> Self {
        opt.apply(&mut self);
        self
    }

    pub fn hostgroup_id(self, v: i64) -> Self {
        self.opt(HostOpt::HostgroupId(v))
    }

    pub fn hostname(self, v: impl Into<String>) -> Self {
        self.opt(HostOpt::Hostname(v.into()))
    }

    pub fn port(self, v: i64) -> Self {
        self.opt(HostOpt::Port(v))
    }

    pub fn status(self, v: impl Into<String>) -> Self {
        self.opt(HostOpt::Status(v.into()))
    }

    pub fn weight(self, v: i64) -> Self {
        self.opt(HostOpt::Weight(v))
    }

    pub fn compression(self, v: i64) -> Self {
        self.opt(HostOpt::Compression(v))
    }

    pub fn max_connections(self, v: i64) -> Self {
        self.opt(HostOpt::MaxConnections(v))
    }

    pub fn max_replication_lag(self, v: i64) -> Self {
        self.opt(HostOpt::MaxReplicationLag(v))
    }

    pub fn use_ssl(self, v: i64) -> Self {
        self.opt(HostOpt::UseSsl(v))
    }

    pub fn max_latency_ms(self, v: i64) -> Self {
        self.opt(HostOpt::MaxLatencyMs(v))
    }

    pub fn comment(self, v: impl Into<String>) -> Self {
        self.opt(HostOpt::Comment(v.into()))
    }

    // ==================== Rendering ====================

    /// `(port, hostgroup_id)`, in specification order.
    pub fn render_specified_columns(&self) -> String {
        let columns: Vec<&str> = self.specified_fields.iter().map(|f| f.column()).collect();
        format!("({})", columns.join(", "))
    }

    /// `(1, 3, 'host')`, in specification order.
    pub fn render_specified_values(&self) -> String {
        let values: Vec<String> = self
            .specified_fields
            .iter()
            .map(|f| f.literal(&self.host).to_string())
            .collect();
        format!("({})", values.join(", "))
    }

    /// `and`-joined equality over the specified fields, `None` if nothing was specified.
    pub fn render_specified_where(&self) -> Option<String> {
        if self.specified_fields.is_empty() {
            return None;
        }
        let clauses: Vec<String> = self
            .specified_fields
            .iter()
            .map(|f| f.equality(&self.host))
            .collect();
        Some(clauses.join(" and "))
    }

    pub fn render_insert(&self) -> String {
        format!(
            "insert into {} {} values {}",
            self.table,
            self.render_specified_columns(),
            self.render_specified_values()
        )
    }

    /// Without specified fields this selects the whole table.
    pub fn render_select(&self) -> String {
        self.with_where(format!("select * from {}", self.table))
    }

    /// Without specified fields this deletes the whole table.
    pub fn render_delete(&self) -> String {
        self.with_where(format!("delete from {}", self.table))
    }

    /// `select count(*) from <table> where <specified equality>`.
    pub fn render_count(&self) -> String {
        self.with_where(format!("select count(*) from {}", self.table))
    }

    /// `update <table> set <specified fields> where <filter's specified fields>`.
    ///
    /// Errors if this query has nothing to set.
    pub fn render_update(&self, filter: &HostQuery) -> AdminResult<String> {
        if self.specified_fields.is_empty() {
            return Err(AdminError::usage("update requires at least one specified field"));
        }
        let assignments: Vec<String> = self
            .specified_fields
            .iter()
            .map(|f| f.equality(&self.host))
            .collect();
        let sql = format!("update {} set {}", self.table, assignments.join(", "));
        Ok(filter.with_where(sql))
    }

    fn with_where(&self, mut sql: String) -> String {
        if let Some(clause) = self.render_specified_where() {
            sql.push_str(" where ");
            sql.push_str(&clause);
        }
        sql
    }
}
