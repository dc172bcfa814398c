//! Headless Chromium over the DevTools protocol.
//!
//! `ChromeBrowser` owns the browser process and the task that pumps its
//! event stream. `ChromePage` adapts one tab to [`NavigablePage`].

use super::page::{NavigablePage, PageLauncher, RequestPolicy, ResourceKind};
use crate::debug;
use anyhow::{Context, Result, anyhow, bail};
use chromiumoxide::browser::{Browser, BrowserConfig as LaunchConfig};
use chromiumoxide::cdp::browser_protocol::fetch::{
    self, ContinueRequestParams, EventRequestPaused, FailRequestParams,
};
use chromiumoxide::cdp::browser_protocol::network::{
    ErrorReason, EventLoadingFailed, EventLoadingFinished, EventRequestWillBeSent, ResourceType,
};
use chromiumoxide::Page;
use futures::StreamExt;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

/// Requests allowed in flight while the network still counts as idle.
const IDLE_MAX_INFLIGHT: usize = 2;
/// How long the in-flight count must stay at or below the limit.
const IDLE_QUIET: Duration = Duration::from_millis(500);
const POLL_INTERVAL: Duration = Duration::from_millis(50);

// ============================================================================
// Browser
// ============================================================================

pub struct ChromeBrowser {
    browser: Browser,
    handler: JoinHandle<()>,
}

impl ChromeBrowser {
    /// Launch `executable` headless with `args`.
    pub async fn launch(executable: &Path, args: &[String]) -> Result<Self> {
        let config = LaunchConfig::builder()
            .chrome_executable(executable)
            .args(args.iter().map(String::as_str))
            .build()
            .map_err(|err| anyhow!(err))
            .context("Invalid browser launch configuration")?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .with_context(|| format!("Failed to launch {}", executable.display()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(err) = event {
                    debug!("browser"; "protocol: {}", err);
                }
            }
        });

        Ok(Self { browser, handler })
    }

    /// Close the browser and wait for the process to exit.
    pub async fn close(mut self) -> Result<()> {
        let closed = self.browser.close().await.context("Failed to close browser");
        if let Err(err) = self.browser.wait().await {
            debug!("browser"; "wait for exit: {}", err);
        }
        self.handler.abort();
        closed.map(drop)
    }
}

impl PageLauncher for ChromeBrowser {
    type Page = ChromePage;

    async fn new_page(&self) -> Result<ChromePage> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .context("Failed to open tab")?;
        Ok(ChromePage::new(page))
    }
}

// ============================================================================
// Tab
// ============================================================================

pub struct ChromePage {
    page: Page,
    inflight: Arc<Mutex<Inflight>>,
    tasks: Vec<JoinHandle<()>>,
}

impl ChromePage {
    fn new(page: Page) -> Self {
        Self {
            page,
            inflight: Arc::new(Mutex::new(Inflight::default())),
            tasks: Vec::new(),
        }
    }

    /// Start counting in-flight requests. Must run before navigation.
    async fn track_network(&mut self) -> Result<()> {
        let mut sent = self.page.event_listener::<EventRequestWillBeSent>().await?;
        let mut finished = self.page.event_listener::<EventLoadingFinished>().await?;
        let mut failed = self.page.event_listener::<EventLoadingFailed>().await?;

        let inflight = Arc::clone(&self.inflight);
        self.tasks.push(tokio::spawn(async move {
            while let Some(event) = sent.next().await {
                inflight.lock().start(event.request_id.inner().clone());
            }
        }));
        let inflight = Arc::clone(&self.inflight);
        self.tasks.push(tokio::spawn(async move {
            while let Some(event) = finished.next().await {
                inflight.lock().finish(event.request_id.inner());
            }
        }));
        let inflight = Arc::clone(&self.inflight);
        self.tasks.push(tokio::spawn(async move {
            while let Some(event) = failed.next().await {
                inflight.lock().finish(event.request_id.inner());
            }
        }));
        Ok(())
    }

    async fn wait_for_network_idle(&self) {
        loop {
            if self.inflight.lock().is_idle() {
                return;
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}

impl NavigablePage for ChromePage {
    async fn intercept_requests(&mut self, policy: &RequestPolicy) -> Result<()> {
        if policy.is_empty() {
            return Ok(());
        }

        let mut paused = self.page.event_listener::<EventRequestPaused>().await?;
        self.page
            .execute(fetch::EnableParams::default())
            .await
            .context("Failed to enable request interception")?;

        let page = self.page.clone();
        let policy = policy.clone();
        self.tasks.push(tokio::spawn(async move {
            while let Some(event) = paused.next().await {
                let id = event.request_id.clone();
                let result = if policy.blocks(resource_kind(&event.resource_type)) {
                    debug!("browser"; "blocked {}", event.request.url);
                    page.execute(FailRequestParams::new(id, ErrorReason::BlockedByClient))
                        .await
                        .map(drop)
                } else {
                    page.execute(ContinueRequestParams::new(id)).await.map(drop)
                };
                if let Err(err) = result {
                    debug!("browser"; "request {}: {}", event.request.url, err);
                }
            }
        }));
        Ok(())
    }

    async fn open(&mut self, url: &str, timeout: Duration) -> Result<()> {
        self.track_network().await?;

        let navigate = async {
            self.page
                .goto(url)
                .await
                .with_context(|| format!("Failed to load {url}"))?;
            self.wait_for_network_idle().await;
            Ok::<_, anyhow::Error>(())
        };

        match tokio::time::timeout(timeout, navigate).await {
            Ok(result) => result,
            Err(_) => bail!("timed out after {}ms loading {url}", timeout.as_millis()),
        }
    }

    async fn wait_for_selector(&mut self, selector: &str, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.page.find_element(selector).await.is_ok() {
                return Ok(());
            }
            if Instant::now() >= deadline {
                bail!("`{selector}` did not appear within {}ms", timeout.as_millis());
            }
            tokio::time::sleep(POLL_INTERVAL * 2).await;
        }
    }

    async fn evaluate_inner_html(&mut self, id: &str) -> Result<Option<String>> {
        // The result is JSON-encoded in the page so that `null` survives
        // the round trip as a string.
        let script = format!(
            "(() => {{ const el = document.getElementById({}); return JSON.stringify(el ? el.innerHTML : null); }})()",
            serde_json::to_string(id)?
        );
        let encoded: String = self
            .page
            .evaluate(script)
            .await
            .context("Failed to evaluate mount markup")?
            .into_value()
            .context("Unexpected mount markup result")?;
        Ok(serde_json::from_str(&encoded)?)
    }

    async fn close(self) -> Result<()> {
        for task in &self.tasks {
            task.abort();
        }
        self.page.close().await.context("Failed to close tab")
    }
}

/// Map a protocol resource type onto the kinds a policy can name.
fn resource_kind(kind: &ResourceType) -> ResourceKind {
    match kind {
        ResourceType::Document => ResourceKind::Document,
        ResourceType::Stylesheet => ResourceKind::Stylesheet,
        ResourceType::Image => ResourceKind::Image,
        ResourceType::Media => ResourceKind::Media,
        ResourceType::Font => ResourceKind::Font,
        ResourceType::Script => ResourceKind::Script,
        ResourceType::Xhr | ResourceType::Fetch => ResourceKind::Fetch,
        _ => ResourceKind::Other,
    }
}

// ============================================================================
// Network idle tracking
// ============================================================================

/// In-flight request ids and when the count last dropped to the idle limit.
#[derive(Debug)]
struct Inflight {
    ids: HashSet<String>,
    quiet_since: Option<Instant>,
}

impl Default for Inflight {
    fn default() -> Self {
        Self {
            ids: HashSet::new(),
            quiet_since: Some(Instant::now()),
        }
    }
}

impl Inflight {
    fn start(&mut self, id: String) {
        self.ids.insert(id);
        self.update();
    }

    fn finish(&mut self, id: &str) {
        self.ids.remove(id);
        self.update();
    }

    fn update(&mut self) {
        if self.ids.len() > IDLE_MAX_INFLIGHT {
            self.quiet_since = None;
        } else if self.quiet_since.is_none() {
            self.quiet_since = Some(Instant::now());
        }
    }

    fn is_idle(&self) -> bool {
        self.quiet_since.is_some_and(|since| since.elapsed() >= IDLE_QUIET)
    }
}
