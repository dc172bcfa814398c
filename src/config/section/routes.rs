//! `[[routes]]` table configuration.
//!
//! When present, replaces the built-in route table. Each entry is layered
//! over the default record, so only the fields that differ are needed.
//!
//! # Example
//!
//! ```toml
//! [[routes]]
//! path = "/"
//! robots = "index"
//!
//! [[routes]]
//! path = "/changelog"
//! title = "Changelog - Zush"
//! description = "Release notes and updates."
//! robots = "index, follow"
//! ```

use crate::route::{MetaOverride, Robots};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteEntry {
    /// Absolute route path.
    pub path: String,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// `index` / `noindex` or the full directive. Defaults to the default
    /// record's `noindex, nofollow`.
    #[serde(default)]
    pub robots: Option<Robots>,
}

impl RouteEntry {
    pub fn to_override(&self) -> MetaOverride {
        MetaOverride {
            title: self.title.clone(),
            description: self.description.clone(),
            robots: self.robots,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;
    use crate::route::Robots;

    #[test]
    fn test_routes_parse() {
        let config = test_parse_config(
            "[[routes]]\npath = \"/\"\nrobots = \"index\"\n\n[[routes]]\npath = \"/changelog\"\ntitle = \"Changelog\"\nrobots = \"index, follow\"\n\n[[routes]]\npath = \"/activate\"",
        );
        assert_eq!(config.routes.len(), 3);
        assert_eq!(config.routes[0].robots, Some(Robots::Index));
        assert_eq!(config.routes[1].title.as_deref(), Some("Changelog"));
        assert_eq!(config.routes[2].robots, None);
    }

    #[test]
    fn test_routes_invalid_robots() {
        let content = "[[routes]]\npath = \"/\"\nrobots = \"sometimes\"";
        assert!(crate::config::PrerenderConfig::parse_with_ignored(content).is_err());
    }
}
