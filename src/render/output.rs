//! Output artifact layout.
//!
//! `/` is written to `<out>/index.html`. Any other route `R` is written to
//! both `<out>R/index.html` and `<out>R.html` with identical bytes, so the
//! page resolves with and without a trailing slash on static hosts.

use crate::route::path;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Files a route is written to, in write order.
fn artifact_paths(out_dir: &Path, route: &str) -> Vec<PathBuf> {
    let route = path::normalize(route);
    if path::is_root(&route) {
        return vec![out_dir.join("index.html")];
    }

    let rel = route.trim_start_matches('/');
    vec![
        out_dir.join(rel).join("index.html"),
        out_dir.join(format!("{rel}.html")),
    ]
}

/// Write `html` to every artifact path of `route`, creating directories.
pub async fn write_artifacts(out_dir: &Path, route: &str, html: &str) -> Result<Vec<PathBuf>> {
    let paths = artifact_paths(out_dir, route);
    for file in &paths {
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        fs::write(file, html)
            .await
            .with_context(|| format!("Failed to write {}", file.display()))?;
    }
    Ok(paths)
}
