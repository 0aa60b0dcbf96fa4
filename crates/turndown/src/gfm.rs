//! GitHub Flavored Markdown extensions.
//!
//! Use with [`TurndownService::use_plugin`]:
//!
//! ```rust
//! use turndown::{gfm, TurndownService};
//!
//! let mut service = TurndownService::new();
//! service.use_plugin(gfm::tables);
//!
//! let markdown = service.turndown("<table><tr><th>A</th></tr><tr><td>1</td></tr></table>");
//! assert_eq!(markdown, "| A |\n| --- |\n| 1 |");
//! ```

use scraper::ElementRef;

use crate::node::ElementExt;
use crate::rules::{Filter, Rule};
use crate::TurndownService;

/// Convert tables with a heading row to pipe tables; keep the rest as HTML.
pub fn tables(service: &mut TurndownService) {
    service
        .add_rule(
            "tableCell",
            Rule::for_tags(&["th", "td"], |node, content, _| cell(content, node)),
        )
        .add_rule("tableRow", Rule::for_tag("tr", |node, content, _| {
            let border_cells = if is_heading_row(node) {
                node.child_elements()
                    .map(|child| {
                        let align = child.attribute("align").map(str::to_lowercase);
                        let border = match align.as_deref() {
                            Some("left") => ":--",
                            Some("right") => "--:",
                            Some("center") => ":-:",
                            _ => "---",
                        };
                        cell(border, &child)
                    })
                    .collect::<String>()
            } else {
                String::new()
            };

            if border_cells.is_empty() {
                format!("\n{}", content)
            } else {
                format!("\n{}\n{}", content, border_cells)
            }
        }))
        .add_rule(
            "table",
            Rule::new(
                Filter::predicate(|tag, node, _| {
                    tag == "table" && first_row(node).is_some_and(|row| is_heading_row(&row))
                }),
                |_, content, _| format!("\n\n{}\n\n", content.replace("\n\n", "\n")),
            ),
        )
        .add_rule(
            "tableSection",
            Rule::for_tags(&["thead", "tbody", "tfoot"], |_, content, _| content.to_string()),
        )
        .keep(Filter::predicate(|tag, node, _| {
            tag == "table" && !first_row(node).is_some_and(|row| is_heading_row(&row))
        }));
}

fn cell(content: &str, node: &ElementRef<'_>) -> String {
    let prefix = if node.element_index() == 0 { "| " } else { " " };
    let content = content.trim().replace('\n', " ").replace('|', "\\|");
    format!("{}{} |", prefix, content)
}

/// First row of a table, looking through its sections
fn first_row<'a>(table: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    table.child_elements().find_map(|child| match child.tag_name() {
        "tr" => Some(child),
        "thead" | "tbody" | "tfoot" => child.child_elements().find(|row| row.tag_name() == "tr"),
        _ => None,
    })
}

fn is_heading_row(row: &ElementRef<'_>) -> bool {
    let Some(parent) = row.parent().and_then(ElementRef::wrap) else {
        return false;
    };
    if parent.tag_name() == "thead" {
        return true;
    }

    let is_first_row = row.element_index() == 0;
    let in_leading_section = parent.tag_name() == "table" || is_first_tbody(&parent);
    is_first_row
        && in_leading_section
        && row.child_elements().all(|cell| cell.tag_name() == "th")
}

fn is_first_tbody(section: &ElementRef<'_>) -> bool {
    section.tag_name() == "tbody"
        && !section
            .prev_siblings()
            .filter_map(ElementRef::wrap)
            .any(|sibling| sibling.tag_name() == "thead")
}
