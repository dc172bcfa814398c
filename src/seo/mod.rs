//! Per-route SEO tags.
//!
//! `apply_route_meta` sets, in order: `title`, `meta[name=description]`,
//! `meta[name=robots]`, `meta[name=twitter:title]`,
//! `meta[name=twitter:description]`, `meta[property=og:title]`,
//! `meta[property=og:description]`, `meta[property=og:url]` and
//! `link[rel=canonical]`.

mod rewrite;

pub use rewrite::{set_canonical, set_named_meta, set_property_meta, set_title};

use crate::route::{RouteMeta, path};

/// Absolute canonical URL for a route.
///
/// The root route maps to `{origin}/`, never to the bare origin.
pub fn canonical_url(origin: &str, route: &str) -> String {
    let origin = origin.trim_end_matches('/');
    format!("{origin}{}", path::normalize(route))
}

/// Rewrite every SEO tag of `html` for one route.
pub fn apply_route_meta(html: &str, meta: &RouteMeta, origin: &str) -> String {
    let url = canonical_url(origin, &meta.path);

    let html = set_title(html, &meta.title);
    let html = set_named_meta(&html, "description", &meta.description);
    let html = set_named_meta(&html, "robots", meta.robots.as_str());
    let html = set_named_meta(&html, "twitter:title", &meta.title);
    let html = set_named_meta(&html, "twitter:description", &meta.description);
    let html = set_property_meta(&html, "og:title", &meta.title);
    let html = set_property_meta(&html, "og:description", &meta.description);
    let html = set_property_meta(&html, "og:url", &url);
    set_canonical(&html, &url)
}
