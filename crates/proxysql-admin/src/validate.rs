//! Validation rules for host queries.
//!
//! Rules run in the order of [`RULES`] and the first failure is returned
//! unchanged. Every rule looks at the host value whether or not the field was
//! specified, so the defaults have to satisfy all of them.

use crate::error::ConfigError;
use crate::host::{HostField, HostStatus};
use crate::query::HostQuery;
use std::collections::HashSet;

/// A single validation rule.
pub type Rule = fn(&HostQuery) -> Result<(), ConfigError>;

/// Tables that accept `mysql_servers`-shaped rows.
pub const TABLES: [&str; 2] = ["mysql_servers", "runtime_mysql_servers"];

pub const MAX_HOSTGROUP_ID: i64 = 2_147_483_648;
pub const MAX_PORT: i64 = 65_535;
pub const MAX_COMPRESSION: i64 = 102_400;
pub const MAX_REPLICATION_LAG: i64 = 126_144_000;

/// Every default rule, in evaluation order.
pub const RULES: [Rule; 11] = [
    table,
    hostgroup_id,
    port,
    max_connections,
    status,
    weight,
    compression,
    max_replication_lag,
    use_ssl,
    max_latency_ms,
    no_duplicate_fields,
];

/// Run [`RULES`] against `query`, returning the first failure.
pub fn validate_host_query(query: &HostQuery) -> Result<(), ConfigError> {
    RULES.iter().try_for_each(|rule| rule(query))
}

/// Fails on an empty hostname.
///
/// Not part of [`RULES`]: reads treat an empty hostname as "any host", only
/// inserts require one.
pub fn require_hostname(query: &HostQuery) -> Result<(), ConfigError> {
    if query.host().hostname().is_empty() {
        return Err(ConfigError::NoHostname);
    }
    Ok(())
}

pub fn validate_table(table: &str) -> Result<(), ConfigError> {
    if !TABLES.contains(&table) {
        return Err(ConfigError::BadTable);
    }
    Ok(())
}

pub fn validate_hostgroup_id(hostgroup_id: i64) -> Result<(), ConfigError> {
    if !(0..=MAX_HOSTGROUP_ID).contains(&hostgroup_id) {
        return Err(ConfigError::BadHostgroupId);
    }
    Ok(())
}

fn table(query: &HostQuery) -> Result<(), ConfigError> {
    validate_table(query.table())
}

fn hostgroup_id(query: &HostQuery) -> Result<(), ConfigError> {
    validate_hostgroup_id(query.host().hostgroup_id())
}

fn port(query: &HostQuery) -> Result<(), ConfigError> {
    if !(0..=MAX_PORT).contains(&query.host().port()) {
        return Err(ConfigError::BadPort);
    }
    Ok(())
}

fn max_connections(query: &HostQuery) -> Result<(), ConfigError> {
    if query.host().max_connections() < 0 {
        return Err(ConfigError::BadMaxConnections);
    }
    Ok(())
}

fn status(query: &HostQuery) -> Result<(), ConfigError> {
    query.host().status().parse::<HostStatus>().map(|_| ())
}

fn weight(query: &HostQuery) -> Result<(), ConfigError> {
    if query.host().weight() < 0 {
        return Err(ConfigError::BadWeight);
    }
    Ok(())
}

fn compression(query: &HostQuery) -> Result<(), ConfigError> {
    if !(0..=MAX_COMPRESSION).contains(&query.host().compression()) {
        return Err(ConfigError::BadCompression);
    }
    Ok(())
}

fn max_replication_lag(query: &HostQuery) -> Result<(), ConfigError> {
    if !(0..=MAX_REPLICATION_LAG).contains(&query.host().max_replication_lag()) {
        return Err(ConfigError::BadMaxReplicationLag);
    }
    Ok(())
}

fn use_ssl(query: &HostQuery) -> Result<(), ConfigError> {
    if !matches!(query.host().use_ssl(), 0 | 1) {
        return Err(ConfigError::BadUseSsl);
    }
    Ok(())
}

fn max_latency_ms(query: &HostQuery) -> Result<(), ConfigError> {
    if query.host().max_latency_ms() < 0 {
        return Err(ConfigError::BadMaxLatencyMs);
    }
    Ok(())
}

fn no_duplicate_fields(query: &HostQuery) -> Result<(), ConfigError> {
    let mut seen: HashSet<HostField> = HashSet::new();
    for field in query.specified_fields() {
        if !seen.insert(*field) {
            return Err(ConfigError::DuplicateSpec);
        }
    }
    Ok(())
}
