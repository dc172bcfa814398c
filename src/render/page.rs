//! Browser-tab capability used by the snapshot loop.
//!
//! The orchestrator only talks to these traits, so routes can be driven by
//! a real headless browser or by a scripted page in tests.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Kind of subresource a tab requests, as far as blocking is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Document,
    Stylesheet,
    Image,
    Media,
    Font,
    Script,
    /// XHR and fetch() requests
    Fetch,
    Other,
}

/// Which resource kinds a tab aborts before they hit the network.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestPolicy {
    blocked: Vec<ResourceKind>,
}

impl RequestPolicy {
    pub fn blocking(kinds: impl IntoIterator<Item = ResourceKind>) -> Self {
        let mut blocked: Vec<_> = Vec::new();
        for kind in kinds {
            if !blocked.contains(&kind) {
                blocked.push(kind);
            }
        }
        Self { blocked }
    }

    #[inline]
    pub fn blocks(&self, kind: ResourceKind) -> bool {
        self.blocked.contains(&kind)
    }

    /// Nothing is blocked, so interception can be skipped entirely.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocked.is_empty()
    }
}

/// One browser tab.
///
/// Every method that waits takes its own timeout and fails once it elapses.
#[allow(async_fn_in_trait)]
pub trait NavigablePage {
    /// Abort requests whose kind the policy blocks. Called before `open`.
    async fn intercept_requests(&mut self, policy: &RequestPolicy) -> Result<()>;

    /// Navigate and wait until the network is idle.
    async fn open(&mut self, url: &str, timeout: Duration) -> Result<()>;

    async fn wait_for_selector(&mut self, selector: &str, timeout: Duration) -> Result<()>;

    /// Inner markup of the element with `id`, or `None` if it does not exist.
    async fn evaluate_inner_html(&mut self, id: &str) -> Result<Option<String>>;

    async fn close(self) -> Result<()>;
}

/// Something that opens fresh tabs.
#[allow(async_fn_in_trait)]
pub trait PageLauncher {
    type Page: NavigablePage;

    async fn new_page(&self) -> Result<Self::Page>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_blocks_listed_kinds() {
        let policy = RequestPolicy::blocking([ResourceKind::Font, ResourceKind::Media]);
        assert!(policy.blocks(ResourceKind::Font));
        assert!(policy.blocks(ResourceKind::Media));
        assert!(!policy.blocks(ResourceKind::Script));
        assert!(!policy.blocks(ResourceKind::Document));
    }

    #[test]
    fn test_policy_dedups() {
        let policy = RequestPolicy::blocking([ResourceKind::Font, ResourceKind::Font]);
        assert_eq!(policy, RequestPolicy::blocking([ResourceKind::Font]));
        assert!(RequestPolicy::default().is_empty());
    }
}
