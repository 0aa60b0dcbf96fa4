//! Rule system for HTML to Markdown conversion.

mod commonmark;
mod rule;

pub use commonmark::commonmark_rules;
pub use rule::{Filter, PredicateFn, ReplacementFn, Rule};

use indexmap::IndexMap;
use scraper::ElementRef;

use crate::node::ElementExt;
use crate::service::TurndownOptions;
use crate::utilities::{is_meaningful_when_blank, is_void};

/// Collection of rules for conversion
pub struct Rules {
    /// Custom rules added by the user (checked first, in insertion order)
    custom_rules: IndexMap<String, Rule>,
    /// Built-in CommonMark rules
    commonmark_rules: Vec<Rule>,
    /// Keep rules (preserve as HTML)
    keep_rules: Vec<Rule>,
    blank_rule: Rule,
    default_rule: Rule,
}

impl Rules {
    /// Create a new Rules instance with CommonMark rules
    pub fn new() -> Self {
        Self {
            custom_rules: IndexMap::new(),
            commonmark_rules: commonmark_rules(),
            keep_rules: Vec::new(),
            blank_rule: Rule::new(Filter::predicate(|_, _, _| true), |node, _, _| {
                if node.is_block() {
                    "\n\n".to_string()
                } else {
                    String::new()
                }
            }),
            default_rule: Rule::new(Filter::predicate(|_, _, _| true), |node, content, _| {
                if node.is_block() {
                    format!("\n\n{}\n\n", content)
                } else {
                    content.to_string()
                }
            }),
        }
    }

    /// Add a custom rule. Re-adding a key replaces the rule in place.
    pub fn add(&mut self, key: &str, rule: Rule) {
        self.custom_rules.insert(key.to_string(), rule);
    }

    /// Add a keep filter
    pub fn keep(&mut self, filter: Filter) {
        self.keep_rules.push(Rule::new(filter, |node, _, _| keep_replacement(node)));
    }


    /// Names of the custom rules, in the order they are consulted
    pub fn custom_keys(&self) -> impl Iterator<Item = &str> {
        self.custom_rules.keys().map(String::as_str)
    }

    /// Find the rule that renders an element.
    ///
    /// Blank elements always get the blank rule. Otherwise custom rules win
    /// over CommonMark rules, which win over keep filters; the
    /// default rule catches everything else.
    pub fn for_element(&self, element: &ElementRef<'_>, options: &TurndownOptions) -> &Rule {
        if is_blank(element) {
            return &self.blank_rule;
        }

        if let Some((key, rule)) = self
            .custom_rules
            .iter()
            .find(|(_, rule)| rule.matches(element, options))
        {
            tracing::trace!(rule = %key, tag = element.tag_name(), "Custom rule matched");
            return rule;
        }

        self.commonmark_rules
            .iter()
            .chain(&self.keep_rules)
            .find(|rule| rule.matches(element, options))
            .unwrap_or(&self.default_rule)
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self::new()
    }
}

/// Render an element as its original HTML
pub fn keep_replacement(node: &ElementRef<'_>) -> String {
    if node.is_block() {
        format!("\n\n{}\n\n", node.outer_html())
    } else {
        node.outer_html()
    }
}

/// An element is blank when it has no text and nothing that carries meaning
/// without text (void elements, links, table cells, scripts, media).
pub fn is_blank(element: &ElementRef<'_>) -> bool {
    let tag = element.tag_name();
    if is_void(tag) || is_meaningful_when_blank(tag) {
        return false;
    }
    if !element.text().all(|text| text.trim().is_empty()) {
        return false;
    }
    !element.descendants().skip(1).any(|node| {
        node.value()
            .as_element()
            .is_some_and(|el| is_void(el.name()) || is_meaningful_when_blank(el.name()))
    })
}
