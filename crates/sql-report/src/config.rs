//! Report file loading.
//!
//! A report file is TOML with an optional page `title` and one `[[report]]` table
//! per report. `params` is either an array (positional) or a table (named).

use std::path::Path;

use serde::Deserialize;

use crate::core::types::{QueryRequest, Value};
use crate::error::{AppError, AppResult};
use crate::report::ReportSpec;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ReportFile {
    #[serde(default)]
    title: Option<String>,
    #[serde(default, rename = "report")]
    reports: Vec<ReportEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ReportEntry {
    title: String,
    sql: String,
    #[serde(default)]
    params: Option<ParamsEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ParamsEntry {
    Positional(Vec<toml::Value>),
    Named(toml::Table),
}

/// Parsed report file, ready to run.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub title: Option<String>,
    pub reports: Vec<ReportSpec>,
}

impl ReportConfig {
    pub fn load(path: &Path) -> AppResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("cannot read report file {}: {e}", path.display()))
        })?;
        let config = Self::from_toml_str(&raw)?;
        tracing::debug!(path = %path.display(), reports = config.reports.len(), "report file loaded");
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> AppResult<Self> {
        let file: ReportFile = toml::from_str(raw)?;
        if file.reports.is_empty() {
            return Err(AppError::Config("report file defines no [[report]] entries".into()));
        }

        let reports = file
            .reports
            .into_iter()
            .map(ReportEntry::into_spec)
            .collect::<AppResult<Vec<_>>>()?;
        Ok(Self {
            title: file.title,
            reports,
        })
    }
}

impl ReportEntry {
    fn into_spec(self) -> AppResult<ReportSpec> {
        let request = match self.params {
            None => QueryRequest::new(self.sql),
            Some(ParamsEntry::Positional(values)) => {
                let values = values
                    .iter()
                    .map(|v| toml_to_value(&self.title, v))
                    .collect::<AppResult<Vec<_>>>()?;
                QueryRequest::positional(self.sql, values)
            }
            Some(ParamsEntry::Named(table)) => {
                let pairs = table
                    .iter()
                    .map(|(k, v)| Ok::<_, AppError>((k.clone(), toml_to_value(&self.title, v)?)))
                    .collect::<AppResult<Vec<_>>>()?;
                QueryRequest::named(self.sql, pairs)
            }
        };
        Ok(ReportSpec {
            title: self.title,
            request,
        })
    }
}

fn toml_to_value(report: &str, v: &toml::Value) -> AppResult<Value> {
    match v {
        toml::Value::String(s) => Ok(Value::Text(s.clone())),
        toml::Value::Integer(x) => Ok(Value::Integer(*x)),
        toml::Value::Float(x) => Ok(Value::Real(*x)),
        toml::Value::Boolean(b) => Ok(Value::Bool(*b)),
        other => Err(AppError::Config(format!(
            "report {report:?}: unsupported parameter type {}",
            other.type_str()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::core::types::Params;

    #[test]
    fn parses_reports_and_params() {
        let config = ReportConfig::from_toml_str(
            r#"
            title = "NBA 2019"

            [[report]]
            title = "Example Query"
            sql = "SELECT * FROM team"

            [[report]]
            title = "By team"
            sql = "SELECT name FROM roster WHERE team_code = ?1 AND age > ?2"
            params = ["BOS", 30]

            [[report]]
            title = "Accurate"
            sql = "SELECT name FROM roster WHERE pct > :pct AND active = :active"
            params = { pct = 35.0, active = true }
            "#,
        )
        .unwrap();

        assert_eq!(config.title.as_deref(), Some("NBA 2019"));
        assert_eq!(config.reports.len(), 3);
        assert_eq!(config.reports[0].title, "Example Query");
        assert_eq!(config.reports[0].request.params(), &Params::None);
        assert_eq!(
            config.reports[1].request.params(),
            &Params::Positional(vec![Value::from("BOS"), Value::Integer(30)])
        );
        assert_eq!(
            config.reports[2].request.params(),
            &Params::Named(vec![
                (":active".to_string(), Value::Bool(true)),
                (":pct".to_string(), Value::Real(35.0)),
            ])
        );
    }

    #[test]
    fn rejects_empty_file() {
        let err = ReportConfig::from_toml_str("title = \"x\"").unwrap_err();
        assert_eq!(err.code(), "CONFIG_ERROR");
    }

    #[test]
    fn rejects_unsupported_param_type() {
        let err = ReportConfig::from_toml_str(
            r#"
            [[report]]
            title = "bad"
            sql = "SELECT ?1"
            params = [[1, 2]]
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("unsupported parameter type array"), "{err}");
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = ReportConfig::from_toml_str("[[report]\ntitle = ").unwrap_err();
        assert_eq!(err.code(), "TOML_ERROR");

        let err = ReportConfig::from_toml_str("[[report]]\ntitle = \"t\"\n").unwrap_err();
        assert_eq!(err.code(), "TOML_ERROR");
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[[report]]\ntitle = \"Teams\"\nsql = \"SELECT * FROM team\"").unwrap();

        let config = ReportConfig::load(file.path()).unwrap();
        assert_eq!(config.reports[0].request.sql(), "SELECT * FROM team");

        let err = ReportConfig::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert_eq!(err.code(), "CONFIG_ERROR");
    }
}
