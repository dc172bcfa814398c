//! `[build]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [build]
//! output = "dist"             # Bundler output directory (relative to the config file)
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSectionConfig {
    /// Directory holding the built `index.html` and assets. Snapshots are
    /// written back into it.
    pub output: PathBuf,
}

impl Default for BuildSectionConfig {
    fn default() -> Self {
        Self {
            output: "dist".into(),
        }
    }
}

impl BuildSectionConfig {
    /// Path of the bundler's html shell.
    pub fn base_document(&self) -> PathBuf {
        self.output.join("index.html")
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;
    use std::path::PathBuf;

    #[test]
    fn test_build_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.build.output, PathBuf::from("dist"));
        assert_eq!(config.build.base_document(), PathBuf::from("dist/index.html"));
    }

    #[test]
    fn test_build_output_override() {
        let config = test_parse_config("[build]\noutput = \"public\"");
        assert_eq!(config.build.output, PathBuf::from("public"));
    }
}
