use std::path::PathBuf;

use clap::{ArgGroup, Parser};

use crate::core::types::Value;
use crate::render::Format;

#[derive(Parser, Debug, Clone)]
#[command(name = "sql-report", version, about = "Run SQL reports against SQLite and render them as tables")]
#[command(group(ArgGroup::new("source").required(true).args(["reports", "sql"])))]
pub struct Args {
    /// SQLite database file (must exist).
    #[arg(long, env = "SQL_REPORT_DB")]
    pub db: PathBuf,

    /// TOML report file with one [[report]] table per report.
    #[arg(long)]
    pub reports: Option<PathBuf>,

    /// Run a single ad-hoc statement instead of a report file.
    #[arg(long)]
    pub sql: Option<String>,

    /// Positional bind parameter for --sql (repeatable; ?1, ?2, ...).
    #[arg(long = "param", requires = "sql")]
    pub params: Vec<String>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Html)]
    pub format: Format,

    /// Write output to a file instead of stdout.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Open the database read-only.
    #[arg(long)]
    pub readonly: bool,

    /// SQLite busy timeout.
    #[arg(long, default_value_t = 2_000)]
    pub busy_timeout_ms: u64,

    /// Stop at the first failing report instead of rendering an error block.
    #[arg(long)]
    pub fail_fast: bool,

    /// Logging level (stderr). Also supports RUST_LOG.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// Interprets a `--param` value: `NULL`, an integer, a real, or text.
pub fn parse_param(raw: &str) -> Value {
    if raw == "NULL" {
        Value::Null
    } else if let Ok(x) = raw.parse::<i64>() {
        Value::Integer(x)
    } else if let Some(x) = raw.parse::<f64>().ok().filter(|x| x.is_finite()) {
        Value::Real(x)
    } else {
        Value::Text(raw.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_report_run() {
        let args = Args::try_parse_from([
            "sql-report",
            "--db",
            "nba.sqlite",
            "--reports",
            "reports.toml",
            "--format",
            "text",
            "--fail-fast",
        ])
        .unwrap();
        assert_eq!(args.db, PathBuf::from("nba.sqlite"));
        assert_eq!(args.format, Format::Text);
        assert!(args.fail_fast);
        assert_eq!(args.busy_timeout_ms, 2_000);
    }

    #[test]
    fn adhoc_sql_with_params() {
        let args = Args::try_parse_from([
            "sql-report",
            "--db",
            "nba.sqlite",
            "--sql",
            "SELECT ?1, ?2",
            "--param",
            "BOS",
            "--param",
            "30",
        ])
        .unwrap();
        assert_eq!(args.format, Format::Html);
        assert_eq!(args.params, vec!["BOS".to_string(), "30".to_string()]);
    }

    #[test]
    fn needs_exactly_one_source() {
        assert!(Args::try_parse_from(["sql-report", "--db", "x"]).is_err());
        assert!(Args::try_parse_from(["sql-report", "--db", "x", "--reports", "r", "--sql", "SELECT 1"]).is_err());
        assert!(Args::try_parse_from(["sql-report", "--db", "x", "--reports", "r", "--param", "1"]).is_err());
    }

    #[test]
    fn param_values() {
        assert_eq!(parse_param("NULL"), Value::Null);
        assert_eq!(parse_param("30"), Value::Integer(30));
        assert_eq!(parse_param("35.5"), Value::Real(35.5));
        assert_eq!(parse_param("nan"), Value::from("nan"));
        assert_eq!(parse_param("'; DROP TABLE team; --"), Value::from("'; DROP TABLE team; --"));
    }
}
