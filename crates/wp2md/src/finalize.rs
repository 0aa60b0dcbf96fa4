//! Clean-ups applied to the converted Markdown.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::prepare::IFRAME_PLACEHOLDER;

static LIST_MARKER_SPACING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^((?:[ \t]*>)*[ \t]*)(-|\d+\.)[ \t]{2,}")
        .expect("list marker pattern is valid")
});

static IFRAME_PLACEHOLDER_CLOSE: Lazy<Regex> = Lazy::new(|| {
    let placeholder = regex::escape(&IFRAME_PLACEHOLDER.to_string());
    Regex::new(&format!(r"(?i){placeholder}(</iframe>)")).expect("iframe pattern is valid")
});

/// Finish converted Markdown: one space after list markers, and the iframe
/// placeholder removed.
pub fn finalize(markdown: &str) -> String {
    let markdown = LIST_MARKER_SPACING.replace_all(markdown, "${1}${2} ");
    IFRAME_PLACEHOLDER_CLOSE
        .replace_all(&markdown, "${1}")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_list_marker_spacing() {
        assert_eq!(
            finalize("-   One\n    -   Sub\n1.  First\n10.  Tenth"),
            "- One\n    - Sub\n1. First\n10. Tenth"
        );
    }

    #[test]
    fn test_list_marker_spacing_in_blockquotes() {
        assert_eq!(
            finalize("> -   One\n> > 2.  Two\n>     -   Deep"),
            "> - One\n> > 2. Two\n>     - Deep"
        );
    }

    #[test]
    fn test_spacing_inside_lines_untouched() {
        let text = "a -  b\nx = 1.  5\n> quote -  dash";
        assert_eq!(finalize(text), text);
    }

    #[test]
    fn test_placeholder_removed() {
        assert_eq!(
            finalize(r#"<iframe src="x">.</iframe> and <IFRAME>.</IFRAME>"#),
            r#"<iframe src="x"></iframe> and <IFRAME></IFRAME>"#
        );
    }

    #[test]
    fn test_other_periods_untouched() {
        assert_eq!(finalize("The end."), "The end.");
    }
}
