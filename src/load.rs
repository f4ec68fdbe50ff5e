//! Single-row and bulk insert statements for formatted records
//!
//! Values are rendered as SQL literals with quotes doubled. Table and column
//! names are written as given, so they must come from this crate and never
//! from the extract.

use async_trait::async_trait;
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::debug;

use crate::error::{Result, TombstoneError};

/// A column value ready to be rendered into a statement
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Decimal(Decimal),
    Text(String),
}

impl SqlValue {
    /// Convert a JSON value; arrays and objects are stored as their JSON text
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => SqlValue::Null,
            Value::Bool(b) => SqlValue::Bool(*b),
            Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => SqlValue::Integer(i),
                (None, Some(f)) => SqlValue::Float(f),
                _ => SqlValue::Text(n.to_string()),
            },
            Value::String(s) => SqlValue::Text(s.clone()),
            other => SqlValue::Text(other.to_string()),
        }
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Integer(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

impl From<Decimal> for SqlValue {
    fn from(value: Decimal) -> Self {
        SqlValue::Decimal(value)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(SqlValue::Null, Into::into)
    }
}

/// Column name to value, in insertion order
pub type Row = IndexMap<String, SqlValue>;

/// Render a value as an SQL literal; non-finite floats become `NULL`
pub fn format_value(value: &SqlValue) -> String {
    match value {
        SqlValue::Null => "NULL".to_string(),
        SqlValue::Bool(true) => "TRUE".to_string(),
        SqlValue::Bool(false) => "FALSE".to_string(),
        SqlValue::Integer(i) => i.to_string(),
        // NaN and infinities have no SQL literal
        SqlValue::Float(f) if !f.is_finite() => "NULL".to_string(),
        SqlValue::Float(f) => f.to_string(),
        SqlValue::Decimal(d) => d.to_string(),
        SqlValue::Text(s) => format!("'{}'", s.replace('\'', "''")),
    }
}

fn render_values(row: &Row) -> String {
    row.values().map(format_value).collect::<Vec<_>>().join(", ")
}

fn render_columns(row: &Row) -> String {
    row.keys().map(String::as_str).collect::<Vec<_>>().join(", ")
}

/// `insert into <table> (...) values (...) returning id`
pub fn insert_statement(table: &str, row: &Row) -> Result<String> {
    if row.is_empty() {
        return Err(TombstoneError::EmptyInsert {
            table: table.to_string(),
        });
    }
    Ok(format!(
        "insert into {} ({}) values ({}) returning id",
        table,
        render_columns(row),
        render_values(row)
    ))
}

/// Multi-row insert; every row must carry the same columns in the same order
pub fn bulk_insert_statement(table: &str, rows: &[Row]) -> Result<String> {
    let Some(first) = rows.first().filter(|row| !row.is_empty()) else {
        return Err(TombstoneError::EmptyInsert {
            table: table.to_string(),
        });
    };

    if rows.iter().any(|row| !row.keys().eq(first.keys())) {
        return Err(TombstoneError::MismatchedColumns {
            table: table.to_string(),
        });
    }

    let values = rows
        .iter()
        .map(|row| format!("({})", render_values(row)))
        .collect::<Vec<_>>()
        .join(", ");

    Ok(format!(
        "insert into {} ({}) values {}",
        table,
        render_columns(first),
        values
    ))
}

/// Connection the loader issues statements on, one at a time
#[async_trait]
pub trait SqlSink: Send {
    /// Run a statement returning a single generated id, if any row came back
    async fn fetch_id(&mut self, sql: &str) -> Result<Option<i64>>;

    /// Run a statement, returning the number of affected rows
    async fn execute(&mut self, sql: &str) -> Result<u64>;
}

/// Insert one row and return its generated identifier
pub async fn load_data<S: SqlSink + ?Sized>(
    sink: &mut S,
    table: &str,
    row: &Row,
) -> Result<i64> {
    let sql = insert_statement(table, row)?;
    debug!(table, columns = row.len(), "inserting row");

    sink.fetch_id(&sql)
        .await?
        .ok_or_else(|| TombstoneError::MissingIdentifier {
            table: table.to_string(),
        })
}

/// Insert several rows in one statement, returning the affected row count
pub async fn load_rows<S: SqlSink + ?Sized>(
    sink: &mut S,
    table: &str,
    rows: &[Row],
) -> Result<u64> {
    let sql = bulk_insert_statement(table, rows)?;
    debug!(table, rows = rows.len(), "bulk inserting rows");
    sink.execute(&sql).await
}

#[cfg(feature = "database")]
#[async_trait]
impl SqlSink for sqlx::PgConnection {
    async fn fetch_id(&mut self, sql: &str) -> Result<Option<i64>> {
        let id = sqlx::query_scalar::<_, i64>(sql)
            .fetch_optional(&mut *self)
            .await?;
        Ok(id)
    }

    async fn execute(&mut self, sql: &str) -> Result<u64> {
        let done = sqlx::query(sql).execute(&mut *self).await?;
        Ok(done.rows_affected())
    }
}
