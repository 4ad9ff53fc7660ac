//! Error types for proxysql-admin

use thiserror::Error;

/// Result type alias for admin operations
pub type AdminResult<T> = Result<T, AdminError>;

/// A configuration value was rejected before anything was sent to ProxySQL.
///
/// Exactly one variant exists per validation rule, so callers can match on
/// the rule that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("bad table value, must be one of 'mysql_servers', 'runtime_mysql_servers'")]
    BadTable,

    #[error("bad hostgroup value, must be in [0, 2147483648]")]
    BadHostgroupId,

    #[error("bad port value, must be in [0, 65535]")]
    BadPort,

    #[error("bad max_connections value, must be >= 0")]
    BadMaxConnections,

    #[error("bad status value, must be one of 'ONLINE', 'SHUNNED', 'OFFLINE_SOFT', 'OFFLINE_HARD'")]
    BadStatus,

    #[error("bad weight value, must be >= 0")]
    BadWeight,

    #[error("bad compression value, must be in [0, 102400]")]
    BadCompression,

    #[error("bad max_replication_lag value, must be in [0, 126144000]")]
    BadMaxReplicationLag,

    #[error("bad use_ssl value, must be one of 0, 1")]
    BadUseSsl,

    #[error("bad max_latency_ms value, must be >= 0")]
    BadMaxLatencyMs,

    #[error("bad function call, a value was specified twice")]
    DuplicateSpec,

    #[error("bad hostname, must not be empty")]
    NoHostname,
}

/// Error types for admin operations
#[derive(Debug, Error)]
pub enum AdminError {
    /// Host configuration failed validation
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// An operation was called with options it does not accept
    #[error("Usage error: {0}")]
    Usage(String),

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Connection could not be established or was lost
    #[error("Connection error: {0}")]
    Connection(String),

    /// Statement execution error reported by the admin interface
    #[error("Query error: {0}")]
    Query(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl AdminError {
    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a usage error
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }

    /// Create a query error
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query(message.into())
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this is a usage error
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Usage(_))
    }

    /// Returns the validation rule that failed, if this is a config error
    pub fn config_error(&self) -> Option<ConfigError> {
        match self {
            Self::Config(err) => Some(*err),
            _ => None,
        }
    }
}

#[cfg(feature = "mysql")]
impl From<sqlx::Error> for AdminError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::NotFound("no rows in result set".to_string()),
            sqlx::Error::ColumnDecode { index, source } => Self::decode(index, source.to_string()),
            sqlx::Error::Io(e) => Self::Connection(e.to_string()),
            e @ (sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed) => {
                Self::Connection(e.to_string())
            }
            other => Self::Query(other.to_string()),
        }
    }
}
