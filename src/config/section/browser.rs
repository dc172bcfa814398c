//! `[browser]` section configuration.
//!
//! Controls discovery and use of the headless browser that renders each
//! route before it is snapshotted.
//!
//! # Example
//!
//! ```toml
//! [browser]
//! enable = true                   # false = write meta-only html for every route
//! env = "CHROME_PATH"             # Environment variable checked before `paths`
//! paths = ["/usr/bin/chromium"]   # Candidate executables, first existing wins
//! args = ["--no-sandbox"]         # Extra launch flags
//! block = ["font", "media"]       # Resource kinds aborted while rendering
//! navigation_timeout_ms = 15000   # Page load + network idle budget
//! mount_timeout_ms = 10000        # Budget for the app to render into the mount node
//! settle_ms = 1000                # Fixed delay after mount before extraction
//! ```

use crate::render::{BrowserCandidate, RenderTimings, RequestPolicy, ResourceKind};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Well-known install locations, checked in order.
const DEFAULT_PATHS: &[&str] = &[
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
    "/usr/bin/google-chrome",
    "/usr/bin/google-chrome-stable",
    "/usr/bin/chromium-browser",
    "/usr/bin/chromium",
];

const DEFAULT_ARGS: &[&str] = &["--no-sandbox", "--disable-setuid-sandbox", "--disable-gpu"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Use a headless browser at all.
    pub enable: bool,

    /// Environment variable naming an executable; checked first.
    pub env: String,

    /// Candidate executable paths, checked in order.
    pub paths: Vec<PathBuf>,

    /// Launch flags passed to the browser.
    pub args: Vec<String>,

    /// Resource kinds aborted at the tab level.
    pub block: Vec<ResourceKind>,

    pub navigation_timeout_ms: u64,
    pub mount_timeout_ms: u64,
    pub settle_ms: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            enable: true,
            env: "CHROME_PATH".to_string(),
            paths: DEFAULT_PATHS.iter().map(PathBuf::from).collect(),
            args: DEFAULT_ARGS.iter().map(ToString::to_string).collect(),
            block: vec![ResourceKind::Font, ResourceKind::Media],
            navigation_timeout_ms: 15_000,
            mount_timeout_ms: 10_000,
            settle_ms: 1_000,
        }
    }
}

impl BrowserConfig {
    /// Ordered discovery list: the env override, then fixed paths.
    pub fn candidates(&self) -> Vec<BrowserCandidate> {
        let env = (!self.env.trim().is_empty()).then(|| BrowserCandidate::Env(self.env.clone()));
        env.into_iter()
            .chain(self.paths.iter().cloned().map(BrowserCandidate::Path))
            .collect()
    }

    pub fn timings(&self) -> RenderTimings {
        RenderTimings {
            navigation: Duration::from_millis(self.navigation_timeout_ms),
            mount: Duration::from_millis(self.mount_timeout_ms),
            settle: Duration::from_millis(self.settle_ms),
        }
    }

    pub fn request_policy(&self) -> RequestPolicy {
        RequestPolicy::blocking(self.block.iter().copied())
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.navigation_timeout_ms == 0 {
            return Err("[browser] navigation_timeout_ms must be greater than 0".into());
        }
        if self.mount_timeout_ms == 0 {
            return Err("[browser] mount_timeout_ms must be greater than 0".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_browser_defaults() {
        let config = test_parse_config("");
        let browser = &config.browser;
        assert!(browser.enable);
        assert_eq!(browser.env, "CHROME_PATH");
        assert_eq!(browser.block, [ResourceKind::Font, ResourceKind::Media]);
        assert_eq!(browser.timings().navigation, Duration::from_secs(15));
        assert_eq!(browser.timings().mount, Duration::from_secs(10));
        assert_eq!(browser.timings().settle, Duration::from_secs(1));
        assert!(browser.args.iter().any(|a| a == "--no-sandbox"));
    }

    #[test]
    fn test_candidates_env_first() {
        let config = test_parse_config("[browser]\npaths = [\"/opt/chrome\", \"/usr/bin/chromium\"]");
        assert_eq!(
            config.browser.candidates(),
            [
                BrowserCandidate::Env("CHROME_PATH".into()),
                BrowserCandidate::Path("/opt/chrome".into()),
                BrowserCandidate::Path("/usr/bin/chromium".into()),
            ]
        );
    }

    #[test]
    fn test_candidates_without_env() {
        let config = test_parse_config("[browser]\nenv = \"\"\npaths = [\"/opt/chrome\"]");
        assert_eq!(
            config.browser.candidates(),
            [BrowserCandidate::Path("/opt/chrome".into())]
        );
    }

    #[test]
    fn test_block_list_parse() {
        let config = test_parse_config("[browser]\nblock = [\"media\", \"image\"]");
        let policy = config.browser.request_policy();
        assert!(policy.blocks(ResourceKind::Media));
        assert!(policy.blocks(ResourceKind::Image));
        assert!(!policy.blocks(ResourceKind::Font));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = test_parse_config("[browser]\nmount_timeout_ms = 0");
        assert!(config.browser.validate().is_err());
    }
}
