//! TurndownService - the main entry point for HTML to Markdown conversion.

use ego_tree::NodeRef;
use scraper::{ElementRef, Html, Node};

use crate::node::{is_block_node, ElementExt};
use crate::rules::{Filter, Rule, Rules};
use crate::utilities::{collapse_whitespace, escape_markdown, is_raw_text, is_void, join};

/// Heading style options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeadingStyle {
    /// Use setext-style headings (underlined with = or -)
    #[default]
    Setext,
    /// Use ATX-style headings (prefixed with #)
    Atx,
}

/// Code block style options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodeBlockStyle {
    /// Use indented code blocks (4 spaces)
    #[default]
    Indented,
    /// Use fenced code blocks (```)
    Fenced,
}

/// Options for TurndownService
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurndownOptions {
    /// Heading style (setext or atx)
    pub heading_style: HeadingStyle,

    /// Horizontal rule string
    pub hr: String,

    /// Bullet list marker
    pub bullet_list_marker: char,

    /// Code block style
    pub code_block_style: CodeBlockStyle,

    /// Fence string for fenced code blocks
    pub fence: String,

    /// Emphasis delimiter
    pub em_delimiter: char,

    /// Strong delimiter
    pub strong_delimiter: String,
}

impl Default for TurndownOptions {
    fn default() -> Self {
        Self {
            heading_style: HeadingStyle::Setext,
            hr: "* * *".to_string(),
            bullet_list_marker: '*',
            code_block_style: CodeBlockStyle::Indented,
            fence: "```".to_string(),
            em_delimiter: '_',
            strong_delimiter: "**".to_string(),
        }
    }
}

/// Traversal state inherited from ancestors
#[derive(Debug, Clone, Copy, Default)]
struct Context {
    /// Inside `<pre>`: whitespace is significant
    in_pre: bool,
    /// Inside `<code>`: text is literal
    in_code: bool,
}

impl Context {
    fn enter(self, tag: &str) -> Self {
        Self {
            in_pre: self.in_pre || tag == "pre",
            in_code: self.in_code || tag == "code",
        }
    }
}

/// The main service for converting HTML to Markdown
pub struct TurndownService {
    options: TurndownOptions,
    rules: Rules,
}

impl TurndownService {
    /// Create a new TurndownService with default options
    pub fn new() -> Self {
        Self {
            options: TurndownOptions::default(),
            rules: Rules::new(),
        }
    }

    /// Create a TurndownService with custom options
    pub fn with_options(options: TurndownOptions) -> Self {
        Self {
            options,
            rules: Rules::new(),
        }
    }

    /// Convert HTML to Markdown.
    ///
    /// Parsing is error tolerant, so any input produces output; markup the
    /// parser cannot make sense of ends up as text.
    pub fn turndown(&self, html: &str) -> String {
        let document = Html::parse_fragment(html);
        let output = self.process_children(document.root_element(), Context::default());
        post_process(&output)
    }

    /// Add a custom rule
    pub fn add_rule(&mut self, key: &str, rule: Rule) -> &mut Self {
        self.rules.add(key, rule);
        self
    }

    /// Keep elements matching the filter as HTML
    pub fn keep(&mut self, filter: Filter) -> &mut Self {
        self.rules.keep(filter);
        self
    }

    /// Apply a plugin
    pub fn use_plugin<F>(&mut self, plugin: F) -> &mut Self
    where
        F: FnOnce(&mut Self),
    {
        plugin(self);
        self
    }

    /// Get the current options
    pub fn options(&self) -> &TurndownOptions {
        &self.options
    }

    /// Get the rule set
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Process children of an element
    fn process_children(&self, element: ElementRef<'_>, ctx: Context) -> String {
        let parent_is_block = element.is_block();
        let mut output = String::new();

        for child in element.children() {
            let replacement = match child.value() {
                Node::Text(text) => self.process_text(child, &text.text, parent_is_block, ctx),
                Node::Element(_) => match ElementRef::wrap(child) {
                    Some(child_element) => self.process_element(child_element, ctx),
                    None => continue,
                },
                _ => continue,
            };

            if replacement.is_empty() {
                continue;
            }
            // A lone space next to a block boundary carries no meaning
            if !ctx.in_pre
                && replacement.trim_matches([' ', '\t']).is_empty()
                && at_block_boundary(child, parent_is_block)
            {
                continue;
            }
            output = join(&output, &replacement);
        }

        output
    }

    /// Process a text node
    fn process_text(
        &self,
        node: NodeRef<'_, Node>,
        text: &str,
        parent_is_block: bool,
        ctx: Context,
    ) -> String {
        if ctx.in_pre {
            return if ctx.in_code {
                text.to_string()
            } else {
                escape_markdown(text)
            };
        }

        // Whitespace next to a block boundary carries no meaning
        let mut collapsed = collapse_whitespace(text);
        let after_block = node.prev_sibling().map_or(parent_is_block, is_block_node);
        let before_block = node.next_sibling().map_or(parent_is_block, is_block_node);
        if after_block {
            collapsed = collapsed.trim_start().to_string();
        }
        if before_block {
            collapsed = collapsed.trim_end().to_string();
        }

        if ctx.in_code {
            collapsed
        } else {
            escape_markdown(&collapsed)
        }
    }

    /// Process a single element
    fn process_element(&self, element: ElementRef<'_>, ctx: Context) -> String {
        let tag = element.tag_name();
        let rule = self.rules.for_element(&element, &self.options);

        let content = if is_raw_text(tag) {
            element.text_content()
        } else {
            self.process_children(element, ctx.enter(tag))
        };

        // Inline elements push surrounding whitespace outside their markup
        let flanking = !element.is_block()
            && !is_raw_text(tag)
            && !is_void(tag)
            && tag != "code"
            && !ctx.in_code;
        if !flanking {
            return rule.replace(&element, &content, &self.options);
        }

        let trimmed = content.trim();
        let leading = if trimmed.len() < content.trim_end().len() { " " } else { "" };
        let trailing = if trimmed.len() < content.trim_start().len() { " " } else { "" };
        if leading.is_empty() && trailing.is_empty() {
            return rule.replace(&element, &content, &self.options);
        }

        let replacement = rule.replace(&element, trimmed, &self.options);
        if replacement.is_empty() {
            // Keep a word break where an empty inline element sat
            let space = if leading.is_empty() { trailing } else { leading };
            return space.to_string();
        }
        format!("{}{}{}", leading, replacement, trailing)
    }
}

impl Default for TurndownService {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether a node sits directly after or before a block boundary
fn at_block_boundary(node: NodeRef<'_, Node>, parent_is_block: bool) -> bool {
    node.prev_sibling().map_or(parent_is_block, is_block_node)
        || node.next_sibling().map_or(parent_is_block, is_block_node)
}

/// Trim the assembled document
fn post_process(output: &str) -> String {
    output
        .trim_start_matches(['\t', '\r', '\n'])
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn atx_fenced() -> TurndownService {
        TurndownService::with_options(TurndownOptions {
            heading_style: HeadingStyle::Atx,
            code_block_style: CodeBlockStyle::Fenced,
            bullet_list_marker: '-',
            ..Default::default()
        })
    }

    #[test]
    fn test_simple_paragraph() {
        let service = TurndownService::new();
        assert_eq!(service.turndown("<p>Hello World</p>"), "Hello World");
    }

    #[test]
    fn test_heading_setext() {
        let service = TurndownService::new();
        assert_eq!(service.turndown("<h1>Title</h1>"), "Title\n=====");
    }

    #[test]
    fn test_heading_atx() {
        let service = atx_fenced();
        assert_eq!(service.turndown("<h3>Title</h3>"), "### Title");
    }

    #[test]
    fn test_emphasis() {
        let service = TurndownService::new();
        assert_eq!(service.turndown("<em>emphasized</em>"), "_emphasized_");
    }

    #[test]
    fn test_strong() {
        let service = TurndownService::new();
        assert_eq!(service.turndown("<strong>bold</strong>"), "**bold**");
    }

    #[test]
    fn test_flanking_whitespace_moves_outside() {
        let service = TurndownService::new();
        assert_eq!(
            service.turndown("<p>Some<strong> bold </strong>text</p>"),
            "Some **bold** text"
        );
    }

    #[test]
    fn test_inline_link() {
        let service = TurndownService::new();
        assert_eq!(
            service.turndown(r#"<a href="https://example.com">Link</a>"#),
            "[Link](https://example.com)"
        );
    }

    #[test]
    fn test_image() {
        let service = TurndownService::new();
        assert_eq!(
            service.turndown(r#"<img src="test.png" alt="Alt">"#),
            "![Alt](test.png)"
        );
    }

    #[test]
    fn test_inline_code() {
        let service = TurndownService::new();
        assert_eq!(service.turndown("<code>a_b*c</code>"), "`a_b*c`");
    }

    #[test]
    fn test_text_is_escaped() {
        let service = TurndownService::new();
        assert_eq!(service.turndown("<p>snake_case *stars*</p>"), "snake\\_case \\*stars\\*");
    }

    #[test]
    fn test_horizontal_rule() {
        let service = TurndownService::new();
        assert_eq!(service.turndown("<p>a</p><hr><p>b</p>"), "a\n\n* * *\n\nb");
    }

    #[test]
    fn test_blockquote() {
        let service = TurndownService::new();
        assert_eq!(
            service.turndown("<blockquote><p>One</p><p>Two</p></blockquote>"),
            "> One\n>\n> Two"
        );
    }

    #[test]
    fn test_indented_code_block() {
        let service = TurndownService::new();
        assert_eq!(
            service.turndown("<pre><code>function() {}</code></pre>"),
            "    function() {}"
        );
    }

    #[test]
    fn test_fenced_code_block_with_language() {
        let service = atx_fenced();
        let html = "<pre><code class=\"language-rust\">let x = 1;\nlet y = 2;\n</code></pre>";
        assert_eq!(
            service.turndown(html),
            "```rust\nlet x = 1;\nlet y = 2;\n```"
        );
    }

    #[test]
    fn test_ordered_list() {
        let service = TurndownService::new();
        assert_eq!(
            service.turndown("<ol><li>One</li><li>Two</li></ol>"),
            "1.  One\n2.  Two"
        );
    }

    #[test]
    fn test_ordered_list_start() {
        let service = TurndownService::new();
        assert_eq!(
            service.turndown("<ol start=\"3\"><li>Three</li><li>Four</li></ol>"),
            "3.  Three\n4.  Four"
        );
    }

    #[test]
    fn test_unordered_list_with_whitespace() {
        let service = atx_fenced();
        assert_eq!(
            service.turndown("<ul>\n  <li>One</li>\n  <li>Two</li>\n</ul>"),
            "-   One\n-   Two"
        );
    }

    #[test]
    fn test_nested_list() {
        let service = atx_fenced();
        assert_eq!(
            service.turndown("<ul><li>One<ul><li>Sub</li></ul></li><li>Two</li></ul>"),
            "-   One\n    -   Sub\n-   Two"
        );
    }

    #[test]
    fn test_blank_elements_are_dropped() {
        let service = TurndownService::new();
        assert_eq!(service.turndown("<p>a</p><div></div><span> </span><p>b</p>"), "a\n\nb");
        assert_eq!(service.turndown(r#"<iframe src="https://example.com"></iframe>"#), "");
    }

    #[test]
    fn test_empty_div_separates_text() {
        let service = TurndownService::new();
        assert_eq!(
            service.turndown("<div>Line one\n<div></div>\nLine two</div>"),
            "Line one\n\nLine two"
        );
    }

    #[test]
    fn test_keep() {
        let mut service = TurndownService::new();
        service.keep(Filter::tag("del"));
        assert_eq!(service.turndown("<p>a <del>b</del></p>"), "a <del>b</del>");
    }

    #[test]
    fn test_custom_rule_overrides_commonmark() {
        let mut service = TurndownService::new();
        service.add_rule(
            "shout",
            Rule::for_tag("p", |_, content, _| format!("\n\n{}!\n\n", content.to_uppercase())),
        );
        assert_eq!(service.turndown("<p>hi</p>"), "HI!");
    }

    #[test]
    fn test_malformed_html_degrades_to_text() {
        let service = TurndownService::new();
        assert_eq!(service.turndown("<p>unclosed <em>tags"), "unclosed _tags_");
        assert_eq!(service.turndown("plain text"), "plain text");
        assert_eq!(service.turndown(""), "");
    }
}
