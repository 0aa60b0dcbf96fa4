//! # turndown
//!
//! Convert HTML to Markdown.
//!
//! This is a Rust implementation inspired by [turndown](https://github.com/mixmark-io/turndown),
//! providing a similar API: a service with CommonMark rules that callers
//! extend with their own rules, keep filters and plugins.
//!
//! ## Design
//!
//! HTML is parsed with `scraper` (html5ever), which never fails: broken
//! markup is repaired or ends up as text. The tree is then walked depth
//! first. For every element the first matching rule wins, in this order:
//!
//! 1. the blank rule, for elements without meaningful content
//! 2. rules added with [`TurndownService::add_rule`], in insertion order
//! 3. the built-in CommonMark rules
//! 4. keep filters
//! 5. the default rule (block elements become paragraphs, inline elements
//!    pass their content through)
//!
//! ## Example
//!
//! ```rust
//! use turndown::{Rule, TurndownService};
//!
//! let mut service = TurndownService::new();
//! service.add_rule("mark", Rule::for_tag("mark", |_, content, _| format!("=={}==", content)));
//!
//! let markdown = service.turndown("<p>Hello <mark>World</mark></p>");
//! assert_eq!(markdown, "Hello ==World==");
//! ```

pub mod gfm;
pub mod node;
mod rules;
mod service;
mod utilities;

pub use node::ElementExt;
pub use rules::{is_blank, keep_replacement, Filter, PredicateFn, ReplacementFn, Rule, Rules};
pub use service::{CodeBlockStyle, HeadingStyle, TurndownOptions, TurndownService};
pub use utilities::*;

/// Element type handed to rule filters and replacements
pub use scraper::ElementRef;
