//! CommonMark rules for HTML to Markdown conversion.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::ElementRef;

use super::{Filter, Rule};
use crate::node::ElementExt;
use crate::service::{CodeBlockStyle, HeadingStyle};
use crate::utilities::{clean_attribute, repeat};

/// Create all CommonMark rules
pub fn commonmark_rules() -> Vec<Rule> {
    vec![
        paragraph_rule(),
        line_break_rule(),
        heading_rule(),
        blockquote_rule(),
        list_rule(),
        list_item_rule(),
        indented_code_block_rule(),
        fenced_code_block_rule(),
        horizontal_rule(),
        inline_link_rule(),
        emphasis_rule(),
        strong_rule(),
        code_rule(),
        image_rule(),
    ]
}

fn paragraph_rule() -> Rule {
    Rule::for_tag("p", |_, content, _| {
        format!("\n\n{}\n\n", content.trim())
    })
}

fn line_break_rule() -> Rule {
    Rule::for_tag("br", |_, _, _| "  \n".to_string())
}

fn heading_rule() -> Rule {
    Rule::for_tags(&["h1", "h2", "h3", "h4", "h5", "h6"], |node, content, options| {
        let level: usize = node.tag_name()[1..].parse().unwrap_or(1);

        let content = content.trim();
        if content.is_empty() {
            return String::new();
        }

        match options.heading_style {
            HeadingStyle::Setext if level <= 2 => {
                let underline = if level == 1 { "=" } else { "-" };
                format!(
                    "\n\n{}\n{}\n\n",
                    content,
                    repeat(underline, content.chars().count())
                )
            }
            _ => {
                format!("\n\n{} {}\n\n", repeat("#", level), content)
            }
        }
    })
}

fn blockquote_rule() -> Rule {
    Rule::for_tag("blockquote", |_, content, _| {
        let content = content.trim_matches('\n');
        if content.trim().is_empty() {
            return String::new();
        }
        let quoted: Vec<String> = content
            .lines()
            .map(|line| {
                if line.is_empty() {
                    ">".to_string()
                } else {
                    format!("> {}", line)
                }
            })
            .collect();
        format!("\n\n{}\n\n", quoted.join("\n"))
    })
}

fn list_rule() -> Rule {
    Rule::for_tags(&["ul", "ol"], |node, content, _| {
        // A list closing out a list item hugs the item text
        if node.parent_tag() == Some("li") && node.is_last_element_child() {
            format!("\n{}", content)
        } else {
            format!("\n\n{}\n\n", content)
        }
    })
}

fn list_item_rule() -> Rule {
    Rule::for_tag("li", |node, content, options| {
        let content = content.trim_start_matches('\n');
        let trimmed = content.trim_end_matches('\n');
        let content = if trimmed.len() < content.len() {
            format!("{}\n", trimmed)
        } else {
            trimmed.to_string()
        };
        // Indent continuation lines
        let content = content.replace('\n', "\n    ");
        let content = content.strip_suffix("    ").unwrap_or(content.as_str());

        let prefix = match node.parent().and_then(ElementRef::wrap) {
            Some(list) if list.tag_name() == "ol" => {
                let start: usize = list
                    .attribute("start")
                    .and_then(|s| s.trim().parse().ok())
                    .unwrap_or(1);
                format!("{}.  ", start + node.element_index())
            }
            _ => format!("{}   ", options.bullet_list_marker),
        };

        let separator = if node.next_sibling().is_some() && !content.ends_with('\n') {
            "\n"
        } else {
            ""
        };

        format!("{}{}{}", prefix, content, separator)
    })
}

/// Whether the first child of `pre` is a `code` element
fn has_code_child(node: &ElementRef<'_>) -> bool {
    node.first_child()
        .and_then(ElementRef::wrap)
        .is_some_and(|child| child.tag_name() == "code")
}

fn indented_code_block_rule() -> Rule {
    Rule::new(
        Filter::predicate(|tag, node, options| {
            tag == "pre"
                && has_code_child(node)
                && matches!(options.code_block_style, CodeBlockStyle::Indented)
        }),
        |node, _, _| {
            let code = node.text_content();
            let indented: Vec<String> = code
                .trim_end_matches('\n')
                .lines()
                .map(|line| format!("    {}", line))
                .collect();

            format!("\n\n{}\n\n", indented.join("\n"))
        },
    )
}

static LANGUAGE_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"language-(\S+)").expect("language pattern is valid"));

fn fenced_code_block_rule() -> Rule {
    Rule::new(
        Filter::predicate(|tag, node, options| {
            tag == "pre"
                && has_code_child(node)
                && matches!(options.code_block_style, CodeBlockStyle::Fenced)
        }),
        |node, _, options| {
            let Some(code_node) = node.first_child().and_then(ElementRef::wrap) else {
                return String::new();
            };

            let code = code_node.text_content();
            let class = code_node.attribute("class").unwrap_or("");
            let language = LANGUAGE_CLASS
                .captures(class)
                .and_then(|caps| caps.get(1))
                .map_or("", |m| m.as_str());

            // Grow the fence past any fence-like run inside the code
            let fence_char = options.fence.chars().next().unwrap_or('`');
            let longest_run = code
                .lines()
                .map(|line| line.trim_start().chars().take_while(|c| *c == fence_char).count())
                .max()
                .unwrap_or(0);
            let fence = if longest_run >= options.fence.chars().count() {
                fence_char.to_string().repeat(longest_run + 1)
            } else {
                options.fence.clone()
            };

            format!(
                "\n\n{}{}\n{}\n{}\n\n",
                fence,
                language,
                code.strip_suffix('\n').unwrap_or(code.as_str()),
                fence
            )
        },
    )
}

fn horizontal_rule() -> Rule {
    Rule::for_tag("hr", |_, _, options| {
        format!("\n\n{}\n\n", options.hr)
    })
}

fn inline_link_rule() -> Rule {
    Rule::new(
        Filter::predicate(|tag, node, _| tag == "a" && node.has_attribute("href")),
        |node, content, _| {
            let href = clean_attribute(node.attribute("href"));
            let title = clean_attribute(node.attribute("title"));

            if href.is_empty() {
                return content.to_string();
            }

            let href = href.replace('(', "\\(").replace(')', "\\)");
            let title_part = if title.is_empty() {
                String::new()
            } else {
                format!(" \"{}\"", title.replace('"', "\\\""))
            };

            format!("[{}]({}{})", content, href, title_part)
        },
    )
}

fn emphasis_rule() -> Rule {
    Rule::for_tags(&["em", "i"], |_, content, options| {
        if content.trim().is_empty() {
            return String::new();
        }
        let delimiter = options.em_delimiter;
        format!("{}{}{}", delimiter, content, delimiter)
    })
}

fn strong_rule() -> Rule {
    Rule::for_tags(&["strong", "b"], |_, content, options| {
        if content.trim().is_empty() {
            return String::new();
        }
        let delimiter = &options.strong_delimiter;
        format!("{}{}{}", delimiter, content, delimiter)
    })
}

fn code_rule() -> Rule {
    Rule::new(
        Filter::predicate(|tag, node, _| {
            // <code> that is not the body of a code block
            tag == "code" && node.parent_tag() != Some("pre")
        }),
        |node, _, _| {
            let content = node.text_content().replace(['\r', '\n'], " ");
            if content.is_empty() {
                return String::new();
            }

            let max_consecutive_backticks = content
                .chars()
                .fold((0, 0), |(max, current), c| {
                    if c == '`' {
                        (max.max(current + 1), current + 1)
                    } else {
                        (max, 0)
                    }
                })
                .0;

            let backticks = "`".repeat(max_consecutive_backticks + 1);

            if content.starts_with('`') || content.ends_with('`') {
                format!("{} {} {}", backticks, content, backticks)
            } else {
                format!("{}{}{}", backticks, content, backticks)
            }
        },
    )
}

fn image_rule() -> Rule {
    Rule::for_tag("img", |node, _, _| {
        let alt = clean_attribute(node.attribute("alt"));
        let src = clean_attribute(node.attribute("src"));
        let title = clean_attribute(node.attribute("title"));

        if src.is_empty() {
            return String::new();
        }

        let title_part = if title.is_empty() {
            String::new()
        } else {
            format!(" \"{}\"", title)
        };

        format!("![{}]({}{})", alt, src, title_part)
    })
}
