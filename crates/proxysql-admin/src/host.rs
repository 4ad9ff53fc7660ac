//! The `mysql_servers` row model.
//!
//! A [`Host`] is one row of ProxySQL's `mysql_servers` (or
//! `runtime_mysql_servers`) table. Hosts are plain values: setters never
//! validate, validation happens once in [`crate::validate`] when a query is
//! built.

use crate::error::ConfigError;
use crate::query::HostQuery;
use crate::validate::validate_host_query;
use std::fmt;
use std::str::FromStr;

/// The `status` column of `mysql_servers`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostStatus {
    Online,
    Shunned,
    OfflineSoft,
    OfflineHard,
}

impl HostStatus {
    pub const ALL: [HostStatus; 4] = [
        HostStatus::Online,
        HostStatus::Shunned,
        HostStatus::OfflineSoft,
        HostStatus::OfflineHard,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            HostStatus::Online => "ONLINE",
            HostStatus::Shunned => "SHUNNED",
            HostStatus::OfflineSoft => "OFFLINE_SOFT",
            HostStatus::OfflineHard => "OFFLINE_HARD",
        }
    }
}

impl fmt::Display for HostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HostStatus {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HostStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or(ConfigError::BadStatus)
    }
}

impl From<HostStatus> for String {
    fn from(status: HostStatus) -> Self {
        status.as_str().to_string()
    }
}

/// A SQL literal as it is interpolated into admin statements.
///
/// Integers render bare, text renders single-quoted with embedded quotes
/// doubled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Literal<'a> {
    Int(i64),
    Text(&'a str),
}

impl fmt::Display for Literal<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(n) => write!(f, "{n}"),
            Literal::Text(s) => write!(f, "'{}'", s.replace('\'', "''")),
        }
    }
}

/// One column of `mysql_servers`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostField {
    HostgroupId,
    Hostname,
    Port,
    Status,
    Weight,
    Compression,
    MaxConnections,
    MaxReplicationLag,
    UseSsl,
    MaxLatencyMs,
    Comment,
}

impl HostField {
    /// All columns, in table order.
    pub const ALL: [HostField; 11] = [
        HostField::HostgroupId,
        HostField::Hostname,
        HostField::Port,
        HostField::Status,
        HostField::Weight,
        HostField::Compression,
        HostField::MaxConnections,
        HostField::MaxReplicationLag,
        HostField::UseSsl,
        HostField::MaxLatencyMs,
        HostField::Comment,
    ];

    pub fn column(self) -> &'static str {
        match self {
            HostField::HostgroupId => "hostgroup_id",
            HostField::Hostname => "hostname",
            HostField::Port => "port",
            HostField::Status => "status",
            HostField::Weight => "weight",
            HostField::Compression => "compression",
            HostField::MaxConnections => "max_connections",
            HostField::MaxReplicationLag => "max_replication_lag",
            HostField::UseSsl => "use_ssl",
            HostField::MaxLatencyMs => "max_latency_ms",
            HostField::Comment => "comment",
        }
    }

    /// Read this field out of `host` as a literal.
    pub fn literal(self, host: &Host) -> Literal<'_> {
        match self {
            HostField::HostgroupId => Literal::Int(host.hostgroup_id),
            HostField::Hostname => Literal::Text(&host.hostname),
            HostField::Port => Literal::Int(host.port),
            HostField::Status => Literal::Text(&host.status),
            HostField::Weight => Literal::Int(host.weight),
            HostField::Compression => Literal::Int(host.compression),
            HostField::MaxConnections => Literal::Int(host.max_connections),
            HostField::MaxReplicationLag => Literal::Int(host.max_replication_lag),
            HostField::UseSsl => Literal::Int(host.use_ssl),
            HostField::MaxLatencyMs => Literal::Int(host.max_latency_ms),
            HostField::Comment => Literal::Text(&host.comment),
        }
    }

    /// `column = literal`
    pub fn equality(self, host: &Host) -> String {
        format!("{} = {}", self.column(), self.literal(host))
    }
}

impl fmt::Display for HostField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// A row in ProxySQL's `mysql_servers` configuration table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Host {
    pub(crate) hostgroup_id: i64,
    pub(crate) hostname: String,
    pub(crate) port: i64,
    pub(crate) status: String,
    pub(crate) weight: i64,
    pub(crate) compression: i64,
    pub(crate) max_connections: i64,
    pub(crate) max_replication_lag: i64,
    pub(crate) use_ssl: i64,
    pub(crate) max_latency_ms: i64,
    pub(crate) comment: String,
}

/// Table defaults. `hostname` is left empty and must be supplied for inserts.
impl Default for Host {
    fn default() -> Self {
        Self {
            hostgroup_id: 0,
            hostname: String::new(),
            port: 3306,
            status: HostStatus::Online.into(),
            weight: 1,
            compression: 0,
            max_connections: 1000,
            max_replication_lag: 0,
            use_ssl: 0,
            max_latency_ms: 0,
            comment: String::new(),
        }
    }
}

impl Host {
    pub fn new(hostname: impl Into<String>) -> Self {
        Self::default().with_hostname(hostname)
    }

    // ==================== Setters ====================

    pub fn with_hostgroup_id(mut self, hostgroup_id: i64) -> Self {
        self.hostgroup_id = hostgroup_id;
        self
    }

    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = hostname.into();
        self
    }

    pub fn with_port(mut self, port: i64) -> Self {
        self.port = port;
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn with_weight(mut self, weight: i64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_compression(mut self, compression: i64) -> Self {
        self.compression = compression;
        self
    }

    pub fn with_max_connections(mut self, max_connections: i64) -> Self {
        self.max_connections = max_connections;
        self
    }

    pub fn with_max_replication_lag(mut self, max_replication_lag: i64) -> Self {
        self.max_replication_lag = max_replication_lag;
        self
    }

    pub fn with_use_ssl(mut self, use_ssl: i64) -> Self {
        self.use_ssl = use_ssl;
        self
    }

    pub fn with_max_latency_ms(mut self, max_latency_ms: i64) -> Self {
        self.max_latency_ms = max_latency_ms;
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    // ==================== Getters ====================

    pub fn hostgroup_id(&self) -> i64 {
        self.hostgroup_id
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn port(&self) -> i64 {
        self.port
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn weight(&self) -> i64 {
        self.weight
    }

    pub fn compression(&self) -> i64 {
        self.compression
    }

    pub fn max_connections(&self) -> i64 {
        self.max_connections
    }

    pub fn max_replication_lag(&self) -> i64 {
        self.max_replication_lag
    }

    pub fn use_ssl(&self) -> i64 {
        self.use_ssl
    }

    pub fn max_latency_ms(&self) -> i64 {
        self.max_latency_ms
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Run the full validation pipeline against this host.
    ///
    /// An empty hostname passes here; inserts check it separately.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_host_query(&HostQuery::default().with_host(self.clone()))
    }

    // ==================== Rendering ====================

    /// `(1, 'db-1', 3306, 'ONLINE', ...)` over every column, in table order.
    pub fn render_values(&self) -> String {
        let values: Vec<String> = HostField::ALL
            .iter()
            .map(|field| field.literal(self).to_string())
            .collect();
        format!("({})", values.join(", "))
    }

    /// `(hostgroup_id, hostname, port, ...)` over every column, in table order.
    pub fn render_columns(&self) -> String {
        let columns: Vec<&str> = HostField::ALL.iter().map(|f| f.column()).collect();
        format!("({})", columns.join(", "))
    }

    /// Exact-match predicate over every column.
    pub fn render_where(&self) -> String {
        let clauses: Vec<String> = HostField::ALL.iter().map(|f| f.equality(self)).collect();
        clauses.join(" and ")
    }
}
