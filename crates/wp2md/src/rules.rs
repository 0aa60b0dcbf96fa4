//! Rules that keep WordPress embeds intact.
//!
//! Each rule claims one structural signature (tweet blockquotes, CodePen
//! snippets, embed scripts, highlighter code blocks, iframes) so the base
//! converter never flattens it. Signatures are disjoint: registration order
//! does not change the output.

use turndown::{
    CodeBlockStyle, ElementExt, ElementRef, Filter, Rule, TurndownOptions, TurndownService,
};

/// Register every embed rule on `service`
pub fn embeds(service: &mut TurndownService) {
    service
        .add_rule("tweet", tweet_rule())
        .add_rule("codepen", codepen_rule())
        .add_rule("script", script_rule())
        .add_rule("enlighter", enlighter_rule())
        .add_rule("syntaxhighlighter-evolved", syntaxhighlighter_rule())
        .add_rule("iframe", iframe_rule());
}

/// Embedded tweets, kept as their original blockquote
fn tweet_rule() -> Rule {
    Rule::new(
        Filter::predicate(|tag, node, _| {
            tag == "blockquote" && node.has_class_name("twitter-tweet")
        }),
        |node, _, _| format!("\n\n{}", node.outer_html()),
    )
}

/// CodePen embeds.
///
/// The snippet CodePen hands out has been a `<p>` or a `<div>` over the
/// years; all of them carry the `codepen` class and a `data-slug-hash`.
fn codepen_rule() -> Rule {
    Rule::new(
        Filter::predicate(|tag, node, _| {
            matches!(tag, "p" | "div")
                && node.has_attribute("data-slug-hash")
                && node.has_class_name("codepen")
        }),
        |node, _, _| format!("\n\n{}", node.outer_html()),
    )
}

/// Embed scripts (tweets, CodePens, gists)
fn script_rule() -> Rule {
    Rule::for_tag("script", |node, _, _| {
        // Stay snug with the embed the script belongs to
        let after_element = node
            .prev_sibling()
            .is_some_and(|sibling| !sibling.value().is_text());
        let before = if after_element { "\n" } else { "\n\n" };
        let html = node.outer_html().replacen("async=\"\"", "async", 1);
        format!("{}{}\n\n", before, html)
    })
}

fn is_highlighter_block(node: &ElementRef<'_>, options: &TurndownOptions, class: &str) -> bool {
    options.code_block_style == CodeBlockStyle::Fenced
        && node.tag_name() == "pre"
        && node.has_first_child()
        && node.has_class_name(class)
}

fn fenced(language: &str, code: &str, options: &TurndownOptions) -> String {
    format!("\n{fence}{language}\n{code}\n{fence}\n", fence = options.fence)
}

/// Enlighter code blocks
fn enlighter_rule() -> Rule {
    Rule::new(
        Filter::predicate(|_, node, options| is_highlighter_block(node, options, "EnlighterJSRAW")),
        |node, _, options| {
            let language = node.attribute("data-enlighter-language").unwrap_or("");
            fenced(language, &node.text_content(), options)
        },
    )
}

/// SyntaxHighlighter Evolved code blocks.
///
/// The language lives in the block comment around the `<pre>`, which is not
/// part of the content handed to us, so the fence stays untagged.
fn syntaxhighlighter_rule() -> Rule {
    Rule::new(
        Filter::predicate(|_, node, options| {
            is_highlighter_block(node, options, "wp-block-syntaxhighlighter-code")
        }),
        |node, _, options| fenced("", &node.text_content(), options),
    )
}

/// Iframes (embedded audio and video)
fn iframe_rule() -> Rule {
    Rule::for_tag("iframe", |node, _, _| {
        let html = node.outer_html().replacen("allowfullscreen=\"\"", "allowfullscreen", 1);
        format!("\n\n{}\n\n", html)
    })
}
