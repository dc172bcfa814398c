//! prerender - snapshot the routes of a built single-page site into static,
//! SEO-ready html.

mod cli;
mod config;
mod core;
mod logger;
mod render;
mod route;
mod seo;
mod serve;
mod utils;

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use cli::Cli;
use config::{BrowserConfig, PrerenderConfig};
use render::{ChromeBrowser, Snapshotter, find_browser};
use route::RouteRegistry;
use serve::OriginServer;

fn main() {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    if let Err(e) = run(&cli) {
        error!("prerender"; "{:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let config = PrerenderConfig::load(cli)?;
    if let Some(path) = &config.config_path {
        debug!("prerender"; "using {}", path.display());
    }
    let registry = config.registry()?;
    debug!("prerender"; "{} routes registered", registry.len());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    runtime.block_on(prerender(&config, &registry))
}

/// One full run: serve the build, snapshot every route, clean up.
async fn prerender(config: &PrerenderConfig, registry: &RouteRegistry) -> Result<()> {
    let index = config.build.base_document();
    let base = tokio::fs::read_to_string(&index).await.with_context(|| {
        format!("Failed to read {} (has the site been built?)", index.display())
    })?;

    let server = OriginServer::bind(config.serve.interface, config.serve.port, &config.build.output)?;
    let server_origin = server.origin();
    log!("prerender"; "serving {} at {}", config.build.output.display(), server_origin);

    let snapshotter = Snapshotter {
        registry,
        base: &base,
        origin: &config.site.origin,
        server_origin: &server_origin,
        mount_id: &config.site.mount_id,
        out_dir: &config.build.output,
        timings: config.browser.timings(),
        policy: config.browser.request_policy(),
    };

    let browser = launch_browser(&config.browser).await?;
    let report = snapshotter.run(browser.as_ref()).await;

    if let Some(browser) = browser
        && let Err(e) = browser.close().await
    {
        warn!("prerender"; "{:#}", e);
    }
    server.close();

    report.map(drop)
}

/// Find and launch the browser. `None` means every route goes meta-only.
async fn launch_browser(config: &BrowserConfig) -> Result<Option<ChromeBrowser>> {
    if !config.enable {
        log!("prerender"; "browser disabled, writing meta-only html");
        return Ok(None);
    }

    let Some(executable) = find_browser(&config.candidates()) else {
        warn!(
            "prerender";
            "Chrome/Chromium not found (set {} or [browser] paths), writing meta-only html",
            config.env
        );
        return Ok(None);
    };

    debug!("prerender"; "launching {}", executable.display());
    ChromeBrowser::launch(&executable, &config.args)
        .await
        .map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_browser_degrades_without_error() {
        let dir = TempDir::new().unwrap();
        let config = BrowserConfig {
            env: "PRERENDER_TEST_UNSET_CHROME_PATH".into(),
            paths: vec![dir.path().join("chrome"), dir.path().join("chromium")],
            ..BrowserConfig::default()
        };

        let browser = launch_browser(&config).await.unwrap();
        assert!(browser.is_none());
    }

    #[tokio::test]
    async fn test_disabled_browser_is_not_launched() {
        let dir = TempDir::new().unwrap();
        let exe = dir.path().join("chromium");
        std::fs::write(&exe, "").unwrap();
        let config = BrowserConfig {
            enable: false,
            paths: vec![exe],
            ..BrowserConfig::default()
        };

        assert!(launch_browser(&config).await.unwrap().is_none());
    }
}
