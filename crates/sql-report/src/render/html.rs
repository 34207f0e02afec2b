use maud::html;

use super::{RenderedTable, TableRenderer, NULL_MARKER};
use crate::core::types::ResultSet;
use crate::error::{AppError, RenderError};

/// HTML `<table>` output. Cell text goes through maud, which escapes `&`, `<`, `>` and `"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl TableRenderer for HtmlRenderer {
    fn render(&self, result: &ResultSet) -> Result<RenderedTable, RenderError> {
        result.validate()?;

        if !result.has_columns() {
            let markup = html! { p class="no-results" { "No results" } };
            return Ok(RenderedTable::new(markup.into_string()));
        }

        let markup = html! {
            table class="report-table" {
                thead {
                    tr {
                        @for column in result.columns() {
                            th { (column) }
                        }
                    }
                }
                tbody {
                    @for row in result.rows() {
                        tr {
                            @for value in row.values() {
                                @if value.is_null() {
                                    td class="null" { (NULL_MARKER) }
                                } @else {
                                    td { (value.to_string()) }
                                }
                            }
                        }
                    }
                }
            }
        };
        Ok(RenderedTable::new(markup.into_string()))
    }

    fn render_failure(&self, err: &AppError) -> RenderedTable {
        let markup = html! {
            div class="report-error" {
                strong { (err.code()) }
                ": "
                (err.to_string())
            }
        };
        RenderedTable::new(markup.into_string())
    }
}
