use std::path::PathBuf;

use thiserror::Error;

/// The database rejected or failed to run a statement.
#[derive(Debug, Clone, Error)]
#[error("{message} (sql: {sql})")]
pub struct QueryError {
    pub sql: String,
    pub message: String,
}

impl QueryError {
    pub fn new(sql: impl Into<String>, source: rusqlite::Error) -> Self {
        Self {
            sql: sql.into(),
            message: source.to_string(),
        }
    }

    pub fn msg(sql: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            message: message.into(),
        }
    }
}

/// A result set handed to a renderer broke the row/column invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("row {row} has columns {found:?}, expected {expected:?}")]
    ColumnMismatch {
        row: usize,
        expected: Vec<String>,
        found: Vec<String>,
    },
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to open database: {path}: {source}")]
    DbOpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("query error: {0}")]
    Query(#[from] QueryError),

    #[error("render error: {0}")]
    Render(#[from] RenderError),

    #[error("config error: {0}")]
    Config(String),

    #[error("invalid report file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::DbOpenFailed { .. } => "DB_OPEN_FAILED",
            AppError::Query(_) => "QUERY_ERROR",
            AppError::Render(_) => "RENDER_ERROR",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Toml(_) => "TOML_ERROR",
            AppError::Io(_) => "IO_ERROR",
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
