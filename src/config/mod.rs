//! Configuration for a prerender run (`prerender.toml`).
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # [site], [build], [serve], [browser], [[routes]]
//! ├── error.rs       # ConfigError
//! ├── util.rs        # config file discovery
//! └── mod.rs         # PrerenderConfig (this file)
//! ```
//!
//! The file is optional. Every field has a default, and CLI flags override
//! file values.

mod error;
pub mod section;
mod util;

pub use error::ConfigError;
pub use section::{BrowserConfig, BuildSectionConfig, RouteEntry, ServeConfig, SiteSectionConfig};

use crate::{
    cli::{Cli, DEFAULT_CONFIG_NAME},
    route::{RouteMeta, RouteRegistry, default_meta},
    warn,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use util::find_config_file;

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing prerender.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PrerenderConfig {
    /// Absolute path to the config file, if one was loaded (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Directory relative paths are resolved against (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Canonical origin, mount node, default copy
    pub site: SiteSectionConfig,

    /// Bundler output
    pub build: BuildSectionConfig,

    /// Local origin server
    pub serve: ServeConfig,

    /// Headless browser
    pub browser: BrowserConfig,

    /// Route table (empty = built-in table)
    pub routes: Vec<RouteEntry>,
}

impl PrerenderConfig {
    /// Load configuration for a run.
    ///
    /// An explicit `--config` must exist. Otherwise `prerender.toml` is
    /// searched upward from cwd and defaults are used when none is found.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let config_path = match &cli.config {
            Some(path) => {
                let path = if path.is_absolute() { path.clone() } else { cwd.join(path) };
                if !path.is_file() {
                    return Err(ConfigError::NotFound(path).into());
                }
                Some(path)
            }
            None => find_config_file(&cwd, Path::new(DEFAULT_CONFIG_NAME)),
        };

        let mut config = match &config_path {
            Some(path) => Self::from_path(path)?,
            None => Self::default(),
        };

        let root = config_path
            .as_deref()
            .and_then(Path::parent)
            .map_or(cwd, Path::to_path_buf);

        config.config_path = config_path;
        config.finalize(cli, &root);
        config.validate()?;
        Ok(config)
    }

    /// Resolve paths and apply CLI overrides.
    fn finalize(&mut self, cli: &Cli, root: &Path) {
        self.root = root.to_path_buf();

        if let Some(output) = &cli.output {
            // CLI paths are relative to cwd, file paths to the config file.
            self.build.output = std::env::current_dir()
                .map(|cwd| cwd.join(output))
                .unwrap_or_else(|_| output.clone());
        }
        if let Some(port) = cli.port {
            self.serve.port = port;
        }
        if cli.no_browser {
            self.browser.enable = false;
        }

        self.build.output = self.root_join(&self.build.output);
        self.site.origin = self.site.origin.trim().trim_end_matches('/').to_string();
    }

    /// Check values that parse but cannot work.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.site.validate().map_err(ConfigError::Validation)?;
        self.browser.validate().map_err(ConfigError::Validation)?;
        self.registry()?;
        Ok(())
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        warn!("prerender"; "ignoring unknown fields in {}: {}", display_path, fields.join(", "));
    }

    /// Join a path with the root directory.
    pub fn root_join(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(path)
    }

    /// Build the route registry: `[[routes]]` if given, else the built-in table.
    pub fn registry(&self) -> Result<RouteRegistry, ConfigError> {
        let default = self.default_meta();
        if self.routes.is_empty() {
            return Ok(RouteRegistry::builtin_with_default(default));
        }

        let entries = self.routes.iter().map(|r| (r.path.as_str(), r.to_override()));
        Ok(RouteRegistry::new(default, entries)?)
    }

    fn default_meta(&self) -> RouteMeta {
        let mut meta = default_meta();
        if let Some(title) = &self.site.title {
            meta.title = title.clone();
        }
        if let Some(description) = &self.site.description {
            meta.description = description.clone();
        }
        meta
    }
}

/// Parse a config snippet in tests, failing on unknown fields.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> PrerenderConfig {
    let (parsed, ignored) = PrerenderConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
