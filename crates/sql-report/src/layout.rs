use maud::{html, PreEscaped, DOCTYPE};

use crate::render::Format;
use crate::report::Section;

const STYLE: &str = "
body { font-family: sans-serif; margin: 2em; }
table.report-table { border-collapse: collapse; margin-bottom: 2em; }
table.report-table th, table.report-table td { border: 1px solid #ccc; padding: 4px 8px; text-align: left; }
table.report-table th { background: #f0f0f0; }
td.null { color: #999; font-style: italic; }
div.report-error { color: #a00; border: 1px solid #a00; padding: 8px; margin-bottom: 2em; }
";

/// Wraps rendered sections in a page for the chosen format.
pub fn page(format: Format, title: Option<&str>, sections: &[Section]) -> String {
    match format {
        Format::Html => html_page(title, sections),
        Format::Text => text_page(title, sections),
    }
}

fn html_page(title: Option<&str>, sections: &[Section]) -> String {
    let title = title.unwrap_or("Reports");
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { (title) }
                style { (PreEscaped(STYLE)) }
            }
            body {
                @for section in sections {
                    h1 { (section.title) }
                    // Section bodies are already escaped by the renderer.
                    (PreEscaped(section.body.as_str()))
                }
            }
        }
    }
    .into_string()
}

fn text_page(title: Option<&str>, sections: &[Section]) -> String {
    let mut out = String::new();
    if let Some(title) = title {
        out.push_str(&format!("# {title}\n\n"));
    }
    for (i, section) in sections.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&format!("== {} ==\n", section.title));
        out.push_str(section.body.as_str());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RenderedTable;

    fn sections() -> Vec<Section> {
        vec![
            Section {
                title: "Example <Query>".into(),
                body: RenderedTable::new("<table></table>"),
                failed: false,
            },
            Section {
                title: "Report 1".into(),
                body: RenderedTable::new("<p>x</p>"),
                failed: false,
            },
        ]
    }

    #[test]
    fn html_page_embeds_sections_in_order() {
        let out = page(Format::Html, Some("NBA 2019"), &sections());
        assert!(out.starts_with("<!DOCTYPE html>"));
        assert!(out.contains("<title>NBA 2019</title>"));
        let first = out.find("<h1>Example &lt;Query&gt;</h1><table></table>").unwrap();
        let second = out.find("<h1>Report 1</h1><p>x</p>").unwrap();
        assert!(first < second);
    }

    #[test]
    fn text_page_headings() {
        let out = page(Format::Text, None, &sections());
        assert_eq!(out, "== Example <Query> ==\n<table></table>\n== Report 1 ==\n<p>x</p>");
    }
}
