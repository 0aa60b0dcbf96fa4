//! Post input.

use serde::{Deserialize, Serialize};

/// A post handed in for conversion.
///
/// Only `content` is converted; `id` and `title` identify the post in logs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    pub id: String,
    pub title: String,
    /// Raw HTML body as exported
    pub content: String,
}

impl PostRecord {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}
