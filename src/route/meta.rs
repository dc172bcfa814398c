//! Per-route SEO metadata.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Robots directive for a route.
///
/// Only two directives are ever emitted. Unknown or parameterized routes
/// use [`Robots::NoIndex`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Robots {
    /// `index, follow`
    Index,
    /// `noindex, nofollow`
    #[default]
    NoIndex,
}

impl Robots {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Index => "index, follow",
            Self::NoIndex => "noindex, nofollow",
        }
    }

    #[inline]
    pub const fn is_indexable(self) -> bool {
        matches!(self, Self::Index)
    }
}

impl fmt::Display for Robots {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Robots {
    type Error = String;

    /// Accepts the full directive or the `index` / `noindex` shorthand.
    fn try_from(value: String) -> Result<Self, Self::Error> {
        let compact: String = value
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        match compact.as_str() {
            "index" | "index,follow" => Ok(Self::Index),
            "noindex" | "noindex,nofollow" => Ok(Self::NoIndex),
            _ => Err(format!(
                "invalid robots directive `{value}` (expected \"index, follow\" or \"noindex, nofollow\")"
            )),
        }
    }
}

impl From<Robots> for String {
    fn from(value: Robots) -> Self {
        value.as_str().to_string()
    }
}

/// SEO facts about one public route. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMeta {
    /// Normalized absolute route path (`/`, `/changelog`).
    pub path: String,
    pub title: String,
    pub description: String,
    pub robots: Robots,
}

/// Partial record layered over a base [`RouteMeta`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetaOverride {
    pub title: Option<String>,
    pub description: Option<String>,
    pub robots: Option<Robots>,
}

impl MetaOverride {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn robots(mut self, robots: Robots) -> Self {
        self.robots = Some(robots);
        self
    }
}

impl RouteMeta {
    /// Return a new record for `path`: `base` with every field set in
    /// `patch` replaced.
    pub fn merged(base: &RouteMeta, path: impl Into<String>, patch: &MetaOverride) -> Self {
        Self {
            path: path.into(),
            title: patch.title.clone().unwrap_or_else(|| base.title.clone()),
            description: patch
                .description
                .clone()
                .unwrap_or_else(|| base.description.clone()),
            robots: patch.robots.unwrap_or(base.robots),
        }
    }

    /// Same record under a different path.
    pub fn with_path(&self, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..self.clone()
        }
    }
}
