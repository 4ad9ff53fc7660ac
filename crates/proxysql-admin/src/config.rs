//! Client configuration: writer/reader hostgroups, pool size and log truncation.

use crate::error::ConfigError;
use crate::validate::validate_hostgroup_id;
use serde::{Deserialize, Serialize};

/// Client configuration.
///
/// Fields missing from a deserialized config fall back to [`AdminConfig::default`].
///
/// ```
/// use proxysql_admin::AdminConfig;
///
/// let config: AdminConfig = serde_json::from_str(r#"{ "reader_hostgroup": 2 }"#).unwrap();
/// assert_eq!(config.writer_hostgroup, 0);
/// assert_eq!(config.reader_hostgroup, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Hostgroup holding the single writer.
    ///
    /// Default: 0
    pub writer_hostgroup: i64,

    /// Hostgroup holding the readers.
    ///
    /// Default: 1
    pub reader_hostgroup: i64,

    /// Connections kept open to the admin port by the MySQL executor.
    ///
    /// Default: 4
    pub max_connections: u32,

    /// Truncate logged SQL to this many bytes. `None` logs statements in full.
    ///
    /// Default: `Some(200)`
    pub max_sql_length: Option<usize>,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            writer_hostgroup: 0,
            reader_hostgroup: 1,
            max_connections: 4,
            max_sql_length: Some(200),
        }
    }
}

impl AdminConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_writer_hostgroup(mut self, hostgroup: i64) -> Self {
        self.writer_hostgroup = hostgroup;
        self
    }

    pub fn with_reader_hostgroup(mut self, hostgroup: i64) -> Self {
        self.reader_hostgroup = hostgroup;
        self
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    pub fn with_max_sql_length(mut self, len: Option<usize>) -> Self {
        self.max_sql_length = len;
        self
    }

    /// Both hostgroups must be valid `hostgroup_id` values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_hostgroup_id(self.writer_hostgroup)?;
        validate_hostgroup_id(self.reader_hostgroup)
    }
}
