//! `[site]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [site]
//! origin = "https://zushapp.com"  # Canonical origin for og:url and <link rel="canonical">
//! mount_id = "root"               # id of the element the client app renders into
//! title = "Zush"                  # Default title for unknown routes
//! description = "..."             # Default description for unknown routes
//! ```

use crate::route::DEFAULT_ORIGIN;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSectionConfig {
    /// Canonical site origin (scheme + host, no path).
    pub origin: String,

    /// Element id of the client-side mount node.
    pub mount_id: String,

    /// Overrides the default record's title.
    pub title: Option<String>,

    /// Overrides the default record's description.
    pub description: Option<String>,
}

impl Default for SiteSectionConfig {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN.to_string(),
            mount_id: "root".to_string(),
            title: None,
            description: None,
        }
    }
}

impl SiteSectionConfig {
    pub(crate) fn validate(&self) -> Result<(), String> {
        let origin = self.origin.trim();
        if origin.is_empty() {
            return Err("[site] origin must not be empty".into());
        }
        if !(origin.starts_with("https://") || origin.starts_with("http://")) {
            return Err(format!(
                "[site] origin `{origin}` must start with http:// or https://"
            ));
        }
        if self.mount_id.trim().is_empty() {
            return Err("[site] mount_id must not be empty".into());
        }
        if self.mount_id.contains(|c: char| c.is_whitespace() || c == '"' || c == '\'') {
            return Err(format!("[site] mount_id `{}` is not a valid id", self.mount_id));
        }
        Ok(())
    }
}
