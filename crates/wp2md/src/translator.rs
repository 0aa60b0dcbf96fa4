//! Conversion pipeline: prepare, convert, finalize.

use rayon::prelude::*;
use turndown::{gfm, CodeBlockStyle, HeadingStyle, TurndownOptions, TurndownService};

use crate::config::AssetPathConfig;
use crate::finalize::finalize;
use crate::post::PostRecord;
use crate::prepare::prepare;
use crate::rules::embeds;

/// Converts post HTML to Markdown.
///
/// Build one translator and share it: options and rules are fixed at
/// construction, and conversions do not touch shared state, so a single
/// instance can serve any number of threads.
pub struct Translator {
    service: TurndownService,
}

impl Translator {
    /// Create a translator with [`Translator::default_options`]
    pub fn new() -> Self {
        Self::with_options(Self::default_options())
    }

    /// Create a translator with custom converter options
    pub fn with_options(options: TurndownOptions) -> Self {
        let mut service = TurndownService::with_options(options);
        service.use_plugin(gfm::tables).use_plugin(embeds);
        Self { service }
    }

    /// ATX headings, `-` bullets and fenced code blocks
    pub fn default_options() -> TurndownOptions {
        TurndownOptions {
            heading_style: HeadingStyle::Atx,
            bullet_list_marker: '-',
            code_block_style: CodeBlockStyle::Fenced,
            ..Default::default()
        }
    }

    /// Get the converter options
    pub fn options(&self) -> &TurndownOptions {
        self.service.options()
    }

    /// Convert a post's content to Markdown
    pub fn convert(&self, post: &PostRecord, config: &AssetPathConfig) -> String {
        let markdown = self.convert_html(&post.content, config);
        tracing::debug!(
            post_id = %post.id,
            html_bytes = post.content.len(),
            markdown_bytes = markdown.len(),
            "Converted post"
        );
        markdown
    }

    /// Convert an HTML fragment to Markdown
    pub fn convert_html(&self, html: &str, config: &AssetPathConfig) -> String {
        let html = prepare(html, config);
        let markdown = self.service.turndown(&html);
        finalize(&markdown)
    }

    /// Convert posts in parallel. Results are in input order.
    pub fn convert_all(&self, posts: &[PostRecord], config: &AssetPathConfig) -> Vec<String> {
        posts
            .par_iter()
            .map(|post| self.convert(post, config))
            .collect()
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn convert(html: &str) -> String {
        Translator::new().convert_html(html, &AssetPathConfig::default())
    }

    #[test]
    fn test_translator_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Translator>();
    }

    #[test]
    fn test_default_options() {
        let translator = Translator::new();
        assert_eq!(translator.options().heading_style, HeadingStyle::Atx);
        assert_eq!(translator.options().bullet_list_marker, '-');
        assert_eq!(translator.options().code_block_style, CodeBlockStyle::Fenced);
    }

    #[test]
    fn test_plain_post() {
        let html = "<h2>Intro</h2>\n\n<p>Some <strong>bold</strong> and <a href=\"https://example.com\">a link</a>.</p>\n\n<ul>\n<li>One</li>\n<li>Two</li>\n</ul>";
        assert_eq!(
            convert(html),
            "## Intro\n\nSome **bold** and [a link](https://example.com).\n\n- One\n- Two"
        );
    }

    #[test]
    fn test_ordered_list_spacing() {
        assert_eq!(convert("<ol><li>First</li><li>Second</li></ol>"), "1. First\n2. Second");
    }

    #[test]
    fn test_blank_line_splits_unwrapped_text() {
        assert_eq!(
            convert("<div>First line\n\nSecond line</div>"),
            "First line\n\nSecond line"
        );
    }

    #[test]
    fn test_blank_line_inside_code_is_kept() {
        assert_eq!(
            convert("<pre><code class=\"language-js\">a();\n\nb();</code></pre>"),
            "```js\na();\n\nb();\n```"
        );
        assert_eq!(
            convert("<pre class=\"EnlighterJSRAW\" data-enlighter-language=\"js\">a();\n\nb();</pre>"),
            "```js\na();\n\nb();\n```"
        );
    }

    #[test]
    fn test_table() {
        let html = "<table>\n<thead><tr><th>Name</th><th>Age</th></tr></thead>\n<tbody><tr><td>Ada</td><td>36</td></tr></tbody>\n</table>";
        assert_eq!(convert(html), "| Name | Age |\n| --- | --- |\n| Ada | 36 |");
    }

    #[test]
    fn test_convert_all_keeps_order() {
        let posts: Vec<PostRecord> = (0..20)
            .map(|i| PostRecord::new(i.to_string(), format!("<p>Post {i}</p>")))
            .collect();
        let results = Translator::new().convert_all(&posts, &AssetPathConfig::default());
        let expected: Vec<String> = (0..20).map(|i| format!("Post {i}")).collect();
        assert_eq!(results, expected);
    }
}
