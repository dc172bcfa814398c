//! Route registry: the public routes of the site and their SEO metadata.
//!
//! The registry is an ordered table. Declaration order is the snapshot
//! order. Any path not in the table resolves to the default record, which
//! is never indexable.

mod meta;
pub mod path;

pub use meta::{MetaOverride, RouteMeta, Robots};

use thiserror::Error;

/// Canonical site origin used for `og:url` and `<link rel="canonical">`.
pub const DEFAULT_ORIGIN: &str = "https://zushapp.com";

const DEFAULT_TITLE: &str = "Zush - AI File Renamer for Mac";
const DEFAULT_DESCRIPTION: &str = "Zush gives your files meaningful AI-powered names, automatically. \
     Find any photo in seconds, not minutes.";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("route `{0}` is declared more than once")]
    Duplicate(String),

    #[error("route `{0}` must be an absolute path starting with `/`")]
    NotAbsolute(String),

    #[error("route `{0}` contains an empty, `.` or `..` segment")]
    InvalidSegment(String),
}

/// Ordered, read-only mapping from route path to [`RouteMeta`].
#[derive(Debug, Clone)]
pub struct RouteRegistry {
    default: RouteMeta,
    routes: Vec<RouteMeta>,
}

impl RouteRegistry {
    /// Build a registry from `(path, override)` entries layered over `default`.
    ///
    /// The default record's robots directive is forced to `noindex, nofollow`.
    pub fn new<I, P>(default: RouteMeta, entries: I) -> Result<Self, RouteError>
    where
        I: IntoIterator<Item = (P, MetaOverride)>,
        P: AsRef<str>,
    {
        let default = RouteMeta {
            robots: Robots::NoIndex,
            ..default
        };

        let mut routes: Vec<RouteMeta> = Vec::new();
        for (raw, patch) in entries {
            let raw = raw.as_ref();
            if !raw.trim_start().starts_with('/') {
                return Err(RouteError::NotAbsolute(raw.to_string()));
            }
            let key = path::normalize(raw);
            if !path::has_plain_segments(&key) {
                return Err(RouteError::InvalidSegment(raw.to_string()));
            }
            if routes.iter().any(|r| r.path == key) {
                return Err(RouteError::Duplicate(key));
            }
            routes.push(RouteMeta::merged(&default, key, &patch));
        }

        Ok(Self { default, routes })
    }

    /// The site's built-in route table.
    pub fn builtin() -> Self {
        Self::builtin_with_default(default_meta())
    }

    /// Built-in route table over a customized default record.
    pub fn builtin_with_default(default: RouteMeta) -> Self {
        let default = RouteMeta {
            robots: Robots::NoIndex,
            ..default
        };
        let routes = builtin_entries()
            .into_iter()
            .map(|(path, patch)| RouteMeta::merged(&default, path, &patch))
            .collect();
        Self { default, routes }
    }

    /// Metadata for `path`, or the default record (re-keyed to the
    /// normalized path) when the route is unknown.
    pub fn lookup(&self, path: &str) -> RouteMeta {
        let key = path::normalize(path);
        match self.get(&key) {
            Some(meta) => meta.clone(),
            None => self.default_meta().with_path(key),
        }
    }

    /// Exact lookup of a normalized route key.
    pub fn get(&self, key: &str) -> Option<&RouteMeta> {
        self.routes.iter().find(|r| r.path == key)
    }

    /// The fallback record for unknown routes.
    pub fn default_meta(&self) -> &RouteMeta {
        &self.default
    }

    /// All declared routes in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &RouteMeta> {
        self.routes.iter()
    }

    /// Routes that are written to disk: the indexable ones, in order.
    pub fn snapshot_routes(&self) -> impl Iterator<Item = &RouteMeta> {
        self.iter().filter(|r| r.robots.is_indexable())
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }
}

/// The default (non-indexable) record.
pub fn default_meta() -> RouteMeta {
    RouteMeta {
        path: "/".to_string(),
        title: DEFAULT_TITLE.to_string(),
        description: DEFAULT_DESCRIPTION.to_string(),
        robots: Robots::NoIndex,
    }
}

fn builtin_entries() -> Vec<(&'static str, MetaOverride)> {
    let index = || MetaOverride::default().robots(Robots::Index);
    let noindex = || MetaOverride::default().robots(Robots::NoIndex);

    vec![
        ("/", index()),
        (
            "/changelog",
            index()
                .title("Changelog - Zush")
                .description("Release notes and updates for Zush, the AI file renamer for macOS."),
        ),
        (
            "/byok-setup",
            index().title("Bring Your Own Key - Zush").description(
                "Connect your own AI provider API key to Zush and rename files without limits.",
            ),
        ),
        (
            "/privacy-policy",
            index()
                .title("Privacy Policy - Zush")
                .description("How Zush collects, uses and protects your data."),
        ),
        (
            "/terms-of-service",
            index()
                .title("Terms of Service - Zush")
                .description("The terms that govern your use of Zush."),
        ),
        (
            "/refund-policy",
            index()
                .title("Refund Policy - Zush")
                .description("Zush offers a full refund within 14 days of purchase."),
        ),
        ("/thank-you", noindex().title("Thank You - Zush")),
        ("/recover", noindex().title("Recover License - Zush")),
        ("/activate", noindex().title("Activate Zush")),
        ("/manage-subscription", noindex().title("Manage Subscription - Zush")),
    ]
}
