mod cli;
mod config;
mod core;
mod error;
mod layout;
mod logging;
mod render;
mod report;

use std::io::Write;

use clap::Parser;

use crate::{
    cli::Args,
    config::ReportConfig,
    core::types::QueryRequest,
    error::{AppError, AppResult},
    report::ReportSpec,
};

fn main() -> AppResult<()> {
    let args = Args::parse();
    logging::init(&args.log_level);

    let (title, specs) = load_reports(&args)?;
    let conn = crate::core::connection::open(&args.db, args.readonly, args.busy_timeout_ms)
        .inspect_err(|e| tracing::error!(error = %e, "cannot open database"))?;

    let renderer = args.format.renderer();
    let sections = report::run_all(&conn, &specs, renderer.as_ref(), args.fail_fast)?;
    let failed = sections.iter().filter(|s| s.failed).count();
    let page = layout::page(args.format, title.as_deref(), &sections);

    match &args.output {
        Some(path) => std::fs::write(path, page)?,
        None => {
            let mut out = std::io::stdout().lock();
            out.write_all(page.as_bytes())?;
            out.flush()?;
        }
    }

    tracing::info!(reports = sections.len(), failed, "done");
    Ok(())
}

fn load_reports(args: &Args) -> AppResult<(Option<String>, Vec<ReportSpec>)> {
    match (&args.reports, &args.sql) {
        (Some(path), None) => {
            let config = ReportConfig::load(path)?;
            Ok((config.title, config.reports))
        }
        (None, Some(sql)) => {
            let values = args.params.iter().map(|p| cli::parse_param(p)).collect();
            let spec = ReportSpec {
                title: "Query".into(),
                request: QueryRequest::positional(sql.clone(), values),
            };
            Ok((None, vec![spec]))
        }
        _ => Err(AppError::Config("pass exactly one of --reports or --sql".into())),
    }
}
