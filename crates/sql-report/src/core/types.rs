use std::fmt;

use rusqlite::types::{ToSqlOutput, ValueRef};
use rusqlite::ToSql;

use crate::error::RenderError;

/// A single scalar cell value as returned by SQLite, or supplied as a bind parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<ValueRef<'_>> for Value {
    fn from(v: ValueRef<'_>) -> Self {
        match v {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(x) => Value::Integer(x),
            ValueRef::Real(x) => Value::Real(x),
            ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => Value::Blob(b.to_vec()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(x: i64) -> Self {
        Value::Integer(x)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Real(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let v = match self {
            Value::Null => ValueRef::Null,
            // SQLite has no boolean storage class.
            Value::Bool(b) => ValueRef::Integer(i64::from(*b)),
            Value::Integer(x) => ValueRef::Integer(*x),
            Value::Real(x) => ValueRef::Real(*x),
            Value::Text(s) => ValueRef::Text(s.as_bytes()),
            Value::Blob(b) => ValueRef::Blob(b),
        };
        Ok(ToSqlOutput::Borrowed(v))
    }
}

/// Display form used by every renderer before format-specific escaping.
/// Renderers mark `Null` up separately so it never reads as text.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Integer(x) => write!(f, "{x}"),
            Value::Real(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{x:.1}"),
            Value::Real(x) => write!(f, "{x}"),
            Value::Text(s) => f.write_str(s),
            Value::Blob(b) => write!(f, "<blob {} bytes>", b.len()),
        }
    }
}

/// One result row: column name to value, in query column order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    cells: Vec<(String, Value)>,
}

impl Row {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            cells: Vec::with_capacity(n),
        }
    }

    pub fn push(&mut self, column: impl Into<String>, value: Value) {
        self.cells.push((column.into(), value));
    }

    /// First value stored under `column`.
    #[cfg(test)]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, v)| v)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.cells.iter().map(|(_, v)| v)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Materialized output of one statement.
///
/// `columns` is the authoritative column list; it stays known when there are no rows.
/// A result with no columns at all comes from a statement that yields nothing (a write).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultSet {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl ResultSet {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_columns(&self) -> bool {
        !self.columns.is_empty()
    }

    /// Checks that every row carries exactly the result's columns, in order.
    pub fn validate(&self) -> Result<(), RenderError> {
        for (i, row) in self.rows.iter().enumerate() {
            if !row.columns().eq(self.columns.iter().map(String::as_str)) {
                return Err(RenderError::ColumnMismatch {
                    row: i,
                    expected: self.columns.clone(),
                    found: row.columns().map(String::from).collect(),
                });
            }
        }
        Ok(())
    }
}

/// Bind parameters for a statement.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Params {
    #[default]
    None,
    /// Bound to `?`, `?1`, `?2`, ... in order.
    Positional(Vec<Value>),
    /// Bound by name; names carry their SQLite prefix (`:name`, `@name`, `$name`).
    Named(Vec<(String, Value)>),
}

/// SQL text plus its bound values. Values never become part of the SQL text.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    sql: String,
    params: Params,
}

impl QueryRequest {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Params::None,
        }
    }

    pub fn positional(sql: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params: Params::Positional(values),
        }
    }

    /// Names without a `:`, `@` or `$` prefix get `:` prepended.
    pub fn named<K: Into<String>>(sql: impl Into<String>, pairs: Vec<(K, Value)>) -> Self {
        let pairs = pairs
            .into_iter()
            .map(|(k, v)| {
                let k = k.into();
                if k.starts_with([':', '@', '$']) {
                    (k, v)
                } else {
                    (format!(":{k}"), v)
                }
            })
            .collect();
        Self {
            sql: sql.into(),
            params: Params::Named(pairs),
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &Params {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[(&str, Value)]) -> Row {
        cells.iter().cloned().collect()
    }

    #[test]
    fn row_keeps_insertion_order() {
        let r = row(&[("b", Value::Integer(1)), ("a", Value::Integer(2))]);
        assert_eq!(r.columns().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(r.get("a"), Some(&Value::Integer(2)));
        assert_eq!(r.get("missing"), None);
    }

    #[test]
    fn validate_rejects_mismatched_rows() {
        let rs = ResultSet::new(
            vec!["a".into(), "b".into()],
            vec![
                row(&[("a", Value::Integer(1)), ("b", Value::Integer(2))]),
                row(&[("b", Value::Integer(2)), ("a", Value::Integer(1))]),
            ],
        );
        match rs.validate() {
            Err(RenderError::ColumnMismatch { row, found, .. }) => {
                assert_eq!(row, 1);
                assert_eq!(found, vec!["b".to_string(), "a".to_string()]);
            }
            other => panic!("expected mismatch, got {other:?}"),
        }

        let short = ResultSet::new(vec!["a".into(), "b".into()], vec![row(&[("a", Value::Integer(1))])]);
        assert!(short.validate().is_err());
    }

    #[test]
    fn display_forms() {
        assert_eq!(Value::Integer(-7).to_string(), "-7");
        assert_eq!(Value::Real(42.5).to_string(), "42.5");
        assert_eq!(Value::Real(3.0).to_string(), "3.0");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::Blob(vec![1, 2, 3]).to_string(), "<blob 3 bytes>");
        assert_eq!(Value::from("").to_string(), "");
    }

    #[test]
    fn named_params_get_colon_prefix() {
        let req = QueryRequest::named("SELECT :a, @b", vec![("a", Value::Integer(1)), ("@b", Value::Integer(2))]);
        match req.params() {
            Params::Named(pairs) => {
                assert_eq!(pairs[0].0, ":a");
                assert_eq!(pairs[1].0, "@b");
            }
            other => panic!("unexpected params: {other:?}"),
        }
    }
}
