use rusqlite::{params_from_iter, Batch, Connection, Statement, ToSql};

use crate::core::types::{Params, QueryRequest, ResultSet, Row, Value};
use crate::error::QueryError;

/// Runs one statement on `conn` and reads its whole result.
///
/// Statements without result columns (writes, DDL) yield an empty, columnless
/// `ResultSet`. Parameters go through SQLite's own binding; the SQL text is sent as-is.
/// Empty SQL, SQL after the first statement, and named placeholders without a
/// value are all errors.
pub fn execute(conn: &Connection, request: &QueryRequest) -> Result<ResultSet, QueryError> {
    let sql = request.sql();
    let fail = |e: rusqlite::Error| QueryError::new(sql, e);

    let mut stmt = prepare_single(conn, sql)?;
    let columns: Vec<String> = stmt.column_names().iter().map(|s| s.to_string()).collect();

    let rows = match request.params() {
        Params::None => run(&mut stmt, &columns, []),
        Params::Positional(values) => run(&mut stmt, &columns, params_from_iter(values.iter())),
        Params::Named(pairs) => {
            check_named(&stmt, sql, pairs)?;
            let named: Vec<(&str, &dyn ToSql)> = pairs
                .iter()
                .map(|(name, v)| (name.as_str(), v as &dyn ToSql))
                .collect();
            run(&mut stmt, &columns, named.as_slice())
        }
    }
    .map_err(fail)?;

    tracing::debug!(sql, columns = columns.len(), rows = rows.len(), "query executed");
    Ok(ResultSet::new(columns, rows))
}

/// Prepares the only statement in `sql`. Whitespace and comments around it are fine.
fn prepare_single<'conn>(conn: &'conn Connection, sql: &str) -> Result<Statement<'conn>, QueryError> {
    let mut batch = Batch::new(conn, sql);
    let stmt = match batch.next() {
        Ok(Some(stmt)) => stmt,
        Ok(None) => return Err(QueryError::msg(sql, "empty statement")),
        Err(e) => return Err(QueryError::new(sql, e)),
    };
    match batch.next() {
        Ok(None) => Ok(stmt),
        Ok(Some(_)) | Err(_) => Err(QueryError::msg(
            sql,
            "only one statement is allowed; found more SQL after the first statement",
        )),
    }
}

/// Every placeholder must have a named value; SQLite would bind a missing one as NULL.
fn check_named(stmt: &Statement<'_>, sql: &str, pairs: &[(String, Value)]) -> Result<(), QueryError> {
    let unbound: Vec<String> = (1..=stmt.parameter_count())
        .map(|i| stmt.parameter_name(i).map(str::to_string).unwrap_or_else(|| format!("?{i}")))
        .filter(|name| !pairs.iter().any(|(k, _)| k == name))
        .collect();
    if unbound.is_empty() {
        Ok(())
    } else {
        Err(QueryError::msg(sql, format!("no value bound for {}", unbound.join(", "))))
    }
}

fn run<P: rusqlite::Params>(
    stmt: &mut Statement<'_>,
    columns: &[String],
    params: P,
) -> rusqlite::Result<Vec<Row>> {
    if columns.is_empty() {
        let changes = stmt.execute(params)?;
        tracing::debug!(changes, "statement returned no columns");
        return Ok(Vec::new());
    }

    let mut rows = Vec::new();
    let mut r = stmt.query(params)?;
    while let Some(row) = r.next()? {
        rows.push(read_row(row, columns)?);
    }
    Ok(rows)
}

fn read_row(row: &rusqlite::Row<'_>, columns: &[String]) -> rusqlite::Result<Row> {
    let mut out = Row::with_capacity(columns.len());
    for (i, name) in columns.iter().enumerate() {
        out.push(name.clone(), row.get_ref(i)?.into());
    }
    Ok(out)
}
