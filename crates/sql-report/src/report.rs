use rusqlite::Connection;

use crate::core::{query, types::QueryRequest};
use crate::error::{AppError, AppResult};
use crate::render::{RenderedTable, TableRenderer};

/// One named report: a title and the query behind it.
#[derive(Debug, Clone)]
pub struct ReportSpec {
    pub title: String,
    pub request: QueryRequest,
}

#[derive(Debug)]
pub enum ReportOutcome {
    Rendered(RenderedTable),
    Failed(AppError),
}

/// A rendered report (table or error block) under its title.
#[derive(Debug, Clone)]
pub struct Section {
    pub title: String,
    pub body: RenderedTable,
    pub failed: bool,
}

pub fn run_report(conn: &Connection, spec: &ReportSpec, renderer: &dyn TableRenderer) -> ReportOutcome {
    let rendered = query::execute(conn, &spec.request)
        .map_err(AppError::from)
        .and_then(|rs| {
            tracing::debug!(report = %spec.title, rows = rs.len(), "query finished");
            renderer.render(&rs).map_err(AppError::from)
        });

    match rendered {
        Ok(table) => {
            tracing::info!(report = %spec.title, "report rendered");
            ReportOutcome::Rendered(table)
        }
        Err(e) => {
            tracing::warn!(report = %spec.title, code = e.code(), error = %e, "report failed");
            ReportOutcome::Failed(e)
        }
    }
}

/// Runs reports one after another on the same connection.
///
/// A failing report becomes an error block and the rest still run, unless
/// `fail_fast` is set, in which case the first failure is returned.
pub fn run_all(
    conn: &Connection,
    specs: &[ReportSpec],
    renderer: &dyn TableRenderer,
    fail_fast: bool,
) -> AppResult<Vec<Section>> {
    let mut sections = Vec::with_capacity(specs.len());
    for spec in specs {
        let (body, failed) = match run_report(conn, spec, renderer) {
            ReportOutcome::Rendered(table) => (table, false),
            ReportOutcome::Failed(e) if fail_fast => return Err(e),
            ReportOutcome::Failed(e) => (renderer.render_failure(&e), true),
        };
        sections.push(Section {
            title: spec.title.clone(),
            body,
            failed,
        });
    }
    Ok(sections)
}
