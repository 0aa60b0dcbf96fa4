//! Asset path configuration.

use serde::{Deserialize, Serialize};

use crate::Result;

/// Controls where image and PDF references point after conversion.
///
/// Field names follow the export tool's settings (`saveScrapedImages`,
/// `postFolders`, `assets`). Nothing here is validated: an empty `assets`
/// directory name is substituted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssetPathConfig {
    /// Rewrite image and PDF references to local paths
    pub save_scraped_images: bool,
    /// Every post gets its own output folder holding its assets
    pub post_folders: bool,
    /// Shared assets folder name, used when `post_folders` is off
    pub assets: String,
}

impl Default for AssetPathConfig {
    fn default() -> Self {
        Self {
            save_scraped_images: false,
            post_folders: false,
            assets: "assets".to_string(),
        }
    }
}

impl AssetPathConfig {
    /// Decode a config from JSON; missing keys take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Directory asset references are rewritten into, if rewriting is on
    pub fn assets_dir(&self) -> Option<String> {
        if !self.save_scraped_images {
            return None;
        }
        if self.post_folders {
            Some(".".to_string())
        } else {
            Some(format!("./{}", self.assets))
        }
    }
}
