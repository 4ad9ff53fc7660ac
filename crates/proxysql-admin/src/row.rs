//! Row mapping traits and utilities

use crate::error::{AdminError, AdminResult};
use crate::host::{Host, HostField};

/// A single column value as returned by the admin interface.
///
/// The admin interface answers over the text protocol, so most values arrive
/// as [`Value::Text`] even for integer columns; [`FromValue`] parses them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Null,
    Int(i64),
    Text(String),
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Conversion from a column [`Value`] into a Rust type.
pub trait FromValue: Sized {
    fn from_value(column: &str, value: &Value) -> AdminResult<Self>;
}

impl FromValue for i64 {
    fn from_value(column: &str, value: &Value) -> AdminResult<Self> {
        match value {
            Value::Int(n) => Ok(*n),
            Value::Text(s) => s
                .trim()
                .parse()
                .map_err(|e| AdminError::decode(column, format!("invalid integer {s:?}: {e}"))),
            Value::Null => Err(AdminError::decode(column, "unexpected NULL")),
        }
    }
}

impl FromValue for String {
    fn from_value(column: &str, value: &Value) -> AdminResult<Self> {
        match value {
            Value::Text(s) => Ok(s.clone()),
            Value::Int(n) => Ok(n.to_string()),
            Value::Null => Err(AdminError::decode(column, "unexpected NULL")),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(column: &str, value: &Value) -> AdminResult<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(column, other).map(Some),
        }
    }
}

/// One result row: column names paired with their values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminRow {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl AdminRow {
    /// Create a row. Extra names or values beyond the shorter list are dropped.
    pub fn new(columns: Vec<String>, values: Vec<Value>) -> Self {
        let len = columns.len().min(values.len());
        let mut columns = columns;
        let mut values = values;
        columns.truncate(len);
        values.truncate(len);
        Self { columns, values }
    }

    /// Build a row from `(column, value)` pairs.
    pub fn from_pairs<I, C, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (C, V)>,
        C: Into<String>,
        V: Into<Value>,
    {
        let (columns, values) = pairs
            .into_iter()
            .map(|(c, v)| (c.into(), v.into()))
            .unzip();
        Self { columns, values }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Look up a value by column name (ASCII case-insensitive).
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(column))
            .map(|i| &self.values[i])
    }

    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Try to get a column value, returning [`AdminError::Decode`] on failure.
    pub fn try_get_column<T: FromValue>(&self, column: &str) -> AdminResult<T> {
        let value = self
            .get(column)
            .ok_or_else(|| AdminError::decode(column, "column not present in row"))?;
        T::from_value(column, value)
    }
}

/// Trait for converting a result row into a Rust value.
pub trait FromRow: Sized {
    fn from_row(row: &AdminRow) -> AdminResult<Self>;
}

impl FromRow for Host {
    fn from_row(row: &AdminRow) -> AdminResult<Self> {
        let int = |field: HostField| row.try_get_column::<i64>(field.column());
        let text = |field: HostField| row.try_get_column::<String>(field.column());
        Ok(Host {
            hostgroup_id: int(HostField::HostgroupId)?,
            hostname: text(HostField::Hostname)?,
            port: int(HostField::Port)?,
            status: text(HostField::Status)?,
            weight: int(HostField::Weight)?,
            compression: int(HostField::Compression)?,
            max_connections: int(HostField::MaxConnections)?,
            max_replication_lag: int(HostField::MaxReplicationLag)?,
            use_ssl: int(HostField::UseSsl)?,
            max_latency_ms: int(HostField::MaxLatencyMs)?,
            comment: text(HostField::Comment)?,
        })
    }
}

/// Render a host as the row the admin interface would return for it.
impl From<&Host> for AdminRow {
    fn from(host: &Host) -> Self {
        AdminRow::from_pairs(HostField::ALL.iter().map(|f| {
            let value = match f.literal(host) {
                crate::host::Literal::Int(n) => Value::Int(n),
                crate::host::Literal::Text(s) => Value::Text(s.to_string()),
            };
            (f.column(), value)
        }))
    }
}
