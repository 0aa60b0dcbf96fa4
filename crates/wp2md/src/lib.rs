//! # wp2md
//!
//! Convert WordPress post HTML to Markdown without losing embeds.
//!
//! A plain HTML to Markdown conversion flattens tweets, CodePens, embed
//! scripts, highlighter plugin code blocks and iframes. This crate layers
//! rules for those onto the `turndown` converter (with GFM tables) and wraps
//! the conversion in a few text rewrites:
//!
//! 1. [`prepare`]: blank lines become paragraph breaks, asset references
//!    are optionally pointed at local paths, iframes get a placeholder so
//!    they are not dropped as empty
//! 2. conversion through [`turndown::TurndownService`] with the embed
//!    [`rules`]
//! 3. [`finalize`]: list marker spacing and placeholder removal
//!
//! ## Example
//!
//! ```rust
//! use wp2md::{AssetPathConfig, PostRecord, Translator};
//!
//! let translator = Translator::new();
//! let post = PostRecord::new(
//!     "42",
//!     r#"<h2>Hello</h2><iframe src="https://www.youtube.com/embed/abc" allowfullscreen></iframe>"#,
//! );
//!
//! let markdown = translator.convert(&post, &AssetPathConfig::default());
//! assert_eq!(
//!     markdown,
//!     "## Hello\n\n<iframe src=\"https://www.youtube.com/embed/abc\" allowfullscreen></iframe>"
//! );
//! ```

pub mod config;
pub mod finalize;
pub mod post;
pub mod prepare;
pub mod rules;
mod translator;

pub use config::AssetPathConfig;
pub use finalize::finalize;
pub use post::PostRecord;
pub use prepare::{prepare, IFRAME_PLACEHOLDER};
pub use translator::Translator;

/// Error type for wp2md operations
#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TranslateError>;
