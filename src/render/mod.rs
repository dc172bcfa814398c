//! Snapshot renderer: drives every indexable route through a browser tab
//! and writes the resulting documents.
//!
//! # Module Structure
//!
//! ```text
//! render/
//! ├── page.rs      # NavigablePage / PageLauncher capability, RequestPolicy
//! ├── discover.rs  # BrowserCandidate, find_browser
//! ├── chrome.rs    # chromiumoxide-backed launcher and tab
//! ├── compose.rs   # meta rewrite + mount splice
//! ├── output.rs    # artifact paths and writes
//! └── mod.rs       # Snapshotter (this file)
//! ```
//!
//! Routes run one at a time, one tab per route. A failure anywhere between
//! opening the tab and composing the document only downgrades that route to
//! meta-only output. Only output write failures abort the run.

mod chrome;
mod compose;
mod discover;
mod output;
mod page;

pub use chrome::ChromeBrowser;
pub use compose::{compose, meta_only};
pub use discover::{BrowserCandidate, find_browser};
pub use output::write_artifacts;
pub use page::{NavigablePage, PageLauncher, RequestPolicy, ResourceKind};

use crate::core::is_shutdown;
use crate::route::{RouteMeta, RouteRegistry};
use crate::{debug, log, warn};
use anyhow::Result;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Per-route waits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTimings {
    /// Page load plus network idle.
    pub navigation: Duration,
    /// Until the mount node has a child element.
    pub mount: Duration,
    /// Fixed pause after mount so late effects can finish.
    pub settle: Duration,
}

impl Default for RenderTimings {
    fn default() -> Self {
        Self {
            navigation: Duration::from_secs(15),
            mount: Duration::from_secs(10),
            settle: Duration::from_secs(1),
        }
    }
}

/// Where a route's snapshot attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStage {
    Open,
    Navigate,
    Mount,
    Extract,
    Compose,
}

impl RenderStage {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Navigate => "navigate",
            Self::Mount => "mount",
            Self::Extract => "extract",
            Self::Compose => "compose",
        }
    }
}

impl fmt::Display for RenderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("{stage} failed: {source:#}")]
pub struct RenderError {
    pub stage: RenderStage,
    pub source: anyhow::Error,
}

impl RenderError {
    fn at(stage: RenderStage) -> impl FnOnce(anyhow::Error) -> Self {
        move |source| Self { stage, source }
    }
}

/// Why a route was written without a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// No browser available or browser disabled.
    NoBrowser,
    /// Ctrl+C arrived before the route started.
    Shutdown,
    Failed(RenderStage),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    Snapshot,
    MetaOnly(Fallback),
}

impl RouteOutcome {
    /// Progress-line suffix logged after the route path.
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Snapshot => "snapshotted",
            Self::MetaOnly(Fallback::NoBrowser) => "written meta-only (no browser)",
            Self::MetaOnly(Fallback::Shutdown) => "written meta-only (interrupted)",
            Self::MetaOnly(Fallback::Failed(_)) => "written meta-only (render failed)",
        }
    }
}

/// What happened to each route of a run, in order.
#[derive(Debug, Default)]
pub struct RunReport {
    pub routes: Vec<(String, RouteOutcome)>,
}

impl RunReport {
    pub fn snapshotted(&self) -> usize {
        self.routes
            .iter()
            .filter(|(_, outcome)| *outcome == RouteOutcome::Snapshot)
            .count()
    }

    pub fn meta_only(&self) -> usize {
        self.routes.len() - self.snapshotted()
    }

    #[cfg(test)]
    pub fn outcome(&self, route: &str) -> Option<RouteOutcome> {
        self.routes
            .iter()
            .find(|(path, _)| path == route)
            .map(|(_, outcome)| *outcome)
    }
}

/// Everything a run needs besides the browser.
pub struct Snapshotter<'a> {
    pub registry: &'a RouteRegistry,
    /// The built `index.html`, read once before the loop.
    pub base: &'a str,
    /// Canonical site origin for SEO tags.
    pub origin: &'a str,
    /// Where the local origin server listens, e.g. `http://127.0.0.1:4173`.
    pub server_origin: &'a str,
    pub mount_id: &'a str,
    pub out_dir: &'a Path,
    pub timings: RenderTimings,
    pub policy: RequestPolicy,
}

impl Snapshotter<'_> {
    /// Write every indexable route. Without a launcher, all routes are
    /// written meta-only.
    pub async fn run<L: PageLauncher>(&self, launcher: Option<&L>) -> Result<RunReport> {
        let mut report = RunReport::default();

        for meta in self.registry.snapshot_routes() {
            let outcome = match launcher {
                _ if is_shutdown() => self.write_meta_only(meta, Fallback::Shutdown).await?,
                None => self.write_meta_only(meta, Fallback::NoBrowser).await?,
                Some(launcher) => self.render_route(launcher, meta).await?,
            };
            report.routes.push((meta.path.clone(), outcome));
        }

        log!(
            "prerender";
            "{} routes: {} snapshotted, {} meta-only",
            report.routes.len(),
            report.snapshotted(),
            report.meta_only()
        );
        Ok(report)
    }

    /// Snapshot one route, degrading it to meta-only on any render failure.
    async fn render_route<L: PageLauncher>(
        &self,
        launcher: &L,
        meta: &RouteMeta,
    ) -> Result<RouteOutcome> {
        log!("prerender"; "rendering {}", meta.path);
        match self.snapshot(launcher, meta).await {
            Ok(html) => {
                write_artifacts(self.out_dir, &meta.path, &html).await?;
                log!("prerender"; "{} {}", meta.path, RouteOutcome::Snapshot.describe());
                Ok(RouteOutcome::Snapshot)
            }
            Err(err) => {
                warn!("prerender"; "{}: {}, writing meta-only", meta.path, err);
                self.write_meta_only(meta, Fallback::Failed(err.stage)).await
            }
        }
    }

    async fn write_meta_only(&self, meta: &RouteMeta, why: Fallback) -> Result<RouteOutcome> {
        let html = meta_only(self.base, meta, self.origin);
        write_artifacts(self.out_dir, &meta.path, &html).await?;
        let outcome = RouteOutcome::MetaOnly(why);
        log!("prerender"; "{} {}", meta.path, outcome.describe());
        Ok(outcome)
    }

    /// Render one route in a fresh tab. The tab is closed on every path.
    async fn snapshot<L: PageLauncher>(
        &self,
        launcher: &L,
        meta: &RouteMeta,
    ) -> Result<String, RenderError> {
        let mut page = launcher
            .new_page()
            .await
            .map_err(RenderError::at(RenderStage::Open))?;

        let rendered = self.drive(&mut page, meta).await;
        if let Err(err) = page.close().await {
            debug!("prerender"; "{}: {:#}", meta.path, err);
        }

        compose(self.base, meta, self.origin, self.mount_id, &rendered?).map_err(|err| RenderError {
            stage: RenderStage::Compose,
            source: err.into(),
        })
    }

    async fn drive<P: NavigablePage>(
        &self,
        page: &mut P,
        meta: &RouteMeta,
    ) -> Result<String, RenderError> {
        page.intercept_requests(&self.policy)
            .await
            .map_err(RenderError::at(RenderStage::Open))?;

        let url = format!("{}{}", self.server_origin, meta.path);
        debug!("prerender"; "loading {}", url);
        page.open(&url, self.timings.navigation)
            .await
            .map_err(RenderError::at(RenderStage::Navigate))?;

        let selector = format!("#{} > *", self.mount_id);
        page.wait_for_selector(&selector, self.timings.mount)
            .await
            .map_err(RenderError::at(RenderStage::Mount))?;

        tokio::time::sleep(self.timings.settle).await;

        page.evaluate_inner_html(self.mount_id)
            .await
            .map_err(RenderError::at(RenderStage::Extract))?
            .ok_or_else(|| RenderError {
                stage: RenderStage::Extract,
                source: anyhow::anyhow!("`#{}` disappeared before extraction", self.mount_id),
            })
    }
}
