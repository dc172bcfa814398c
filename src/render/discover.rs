//! Browser executable discovery.
//!
//! Candidates are checked in order and the first existing file wins.
//! `PATH` is never searched.

use std::{env, path::PathBuf};

/// Where a browser executable may be found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserCandidate {
    /// Path held by an environment variable (e.g. `CHROME_PATH`).
    Env(String),
    /// Fixed install location.
    Path(PathBuf),
}

impl BrowserCandidate {
    /// The executable this candidate points at, if it exists.
    pub fn resolve(&self) -> Option<PathBuf> {
        let path = match self {
            Self::Env(var) => PathBuf::from(env::var_os(var).filter(|v| !v.is_empty())?),
            Self::Path(path) => path.clone(),
        };
        path.is_file().then_some(path)
    }
}

/// First candidate that resolves to an existing file.
pub fn find_browser(candidates: &[BrowserCandidate]) -> Option<PathBuf> {
    candidates.iter().find_map(|candidate| {
        let found = candidate.resolve();
        if found.is_none() {
            crate::debug!("browser"; "no browser at {:?}", candidate);
        }
        found
    })
}
