use super::{RenderedTable, TableRenderer, NULL_MARKER};
use crate::core::types::{ResultSet, Value};
use crate::error::{AppError, RenderError};

/// Aligned plain-text grid for terminals.
///
/// `|`, `\` and control characters inside cells are backslash-escaped, so every
/// grid line holds exactly one row. SQL NULL prints as `NULL`; the text `"NULL"`
/// prints as `\NULL`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl TableRenderer for TextRenderer {
    fn render(&self, result: &ResultSet) -> Result<RenderedTable, RenderError> {
        result.validate()?;

        if !result.has_columns() {
            return Ok(RenderedTable::new("(no results)\n"));
        }

        let header: Vec<String> = result.columns().iter().map(|c| escape(c)).collect();
        let body: Vec<Vec<String>> = result
            .rows()
            .iter()
            .map(|row| row.values().map(cell).collect())
            .collect();

        let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
        for cells in &body {
            for (w, c) in widths.iter_mut().zip(cells) {
                *w = (*w).max(c.chars().count());
            }
        }

        let rule = rule(&widths);
        let mut out = String::new();
        out.push_str(&rule);
        push_line(&mut out, &header, &widths);
        out.push_str(&rule);
        for cells in &body {
            push_line(&mut out, cells, &widths);
        }
        if !result.is_empty() {
            out.push_str(&rule);
        }
        Ok(RenderedTable::new(out))
    }

    fn render_failure(&self, err: &AppError) -> RenderedTable {
        RenderedTable::new(format!("!! {}: {}\n", err.code(), err))
    }
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => NULL_MARKER.to_string(),
        Value::Text(s) if s == NULL_MARKER => format!("\\{NULL_MARKER}"),
        other => escape(&other.to_string()),
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '|' => out.push_str("\\|"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{{{:04x}}}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

fn rule(widths: &[usize]) -> String {
    let mut line = String::from("+");
    for w in widths {
        line.push_str(&"-".repeat(w + 2));
        line.push('+');
    }
    line.push('\n');
    line
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    out.push('|');
    for (c, w) in cells.iter().zip(widths) {
        out.push_str(&format!(" {c:<w$} |", w = *w));
    }
    out.push('\n');
}
