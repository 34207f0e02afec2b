mod html;
mod text;

use std::fmt;

pub use html::HtmlRenderer;
pub use text::TextRenderer;

use crate::core::types::ResultSet;
use crate::error::{AppError, RenderError};

/// Placeholder shown for SQL NULL.
pub const NULL_MARKER: &str = "NULL";

/// Display-ready output of a renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTable(String);

impl RenderedTable {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RenderedTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Turns any result set into a table, driven only by its shape.
pub trait TableRenderer {
    fn render(&self, result: &ResultSet) -> Result<RenderedTable, RenderError>;

    /// Marked error block shown in place of a report's table.
    fn render_failure(&self, err: &AppError) -> RenderedTable;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    Html,
    Text,
}

impl Format {
    pub fn renderer(self) -> Box<dyn TableRenderer> {
        match self {
            Format::Html => Box::new(HtmlRenderer),
            Format::Text => Box::new(TextRenderer),
        }
    }
}
