//! Rule and Filter types for HTML conversion.

use scraper::ElementRef;

use crate::service::TurndownOptions;

/// Type alias for replacement functions
pub type ReplacementFn =
    Box<dyn Fn(&ElementRef<'_>, &str, &TurndownOptions) -> String + Send + Sync>;

/// Type alias for filter predicates
pub type PredicateFn = Box<dyn Fn(&str, &ElementRef<'_>, &TurndownOptions) -> bool + Send + Sync>;

/// A filter determines which elements a rule applies to
pub enum Filter {
    /// Match a single tag name
    TagName(String),
    /// Match any of multiple tag names
    TagNames(Vec<String>),
    /// Match using a predicate function
    Predicate(PredicateFn),
}

impl Filter {
    /// Create a filter for a single tag
    pub fn tag(name: &str) -> Self {
        Filter::TagName(name.to_lowercase())
    }

    /// Create a filter for multiple tags
    pub fn tags(names: &[&str]) -> Self {
        Filter::TagNames(names.iter().map(|s| s.to_lowercase()).collect())
    }

    /// Create a filter with a predicate
    ///
    /// The predicate receives the lowercase tag name, the element and the
    /// active options.
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&str, &ElementRef<'_>, &TurndownOptions) -> bool + Send + Sync + 'static,
    {
        Filter::Predicate(Box::new(f))
    }

    /// Check if this filter matches an element
    pub fn matches(&self, element: &ElementRef<'_>, options: &TurndownOptions) -> bool {
        let tag = element.value().name().to_lowercase();
        match self {
            Filter::TagName(t) => tag == *t,
            Filter::TagNames(tags) => tags.contains(&tag),
            Filter::Predicate(f) => f(&tag, element, options),
        }
    }
}

/// A rule defines how to convert a matched HTML element to Markdown
pub struct Rule {
    /// Filter to determine which elements this rule applies to
    pub filter: Filter,
    /// Replacement function that generates Markdown
    pub replacement: ReplacementFn,
}

impl Rule {
    /// Create a new rule
    pub fn new<F>(filter: Filter, replacement: F) -> Self
    where
        F: Fn(&ElementRef<'_>, &str, &TurndownOptions) -> String + Send + Sync + 'static,
    {
        Self {
            filter,
            replacement: Box::new(replacement),
        }
    }

    /// Create a rule that matches a single tag
    pub fn for_tag<F>(tag: &str, replacement: F) -> Self
    where
        F: Fn(&ElementRef<'_>, &str, &TurndownOptions) -> String + Send + Sync + 'static,
    {
        Self::new(Filter::tag(tag), replacement)
    }

    /// Create a rule that matches multiple tags
    pub fn for_tags<F>(tags: &[&str], replacement: F) -> Self
    where
        F: Fn(&ElementRef<'_>, &str, &TurndownOptions) -> String + Send + Sync + 'static,
    {
        Self::new(Filter::tags(tags), replacement)
    }

    /// Check whether this rule claims an element
    pub fn matches(&self, element: &ElementRef<'_>, options: &TurndownOptions) -> bool {
        self.filter.matches(element, options)
    }

    /// Apply this rule's replacement
    pub fn replace(
        &self,
        element: &ElementRef<'_>,
        content: &str,
        options: &TurndownOptions,
    ) -> String {
        (self.replacement)(element, content, options)
    }
}
