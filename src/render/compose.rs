//! Final document assembly for one route.

use crate::route::RouteMeta;
use crate::seo::apply_route_meta;
use crate::utils::html::{find_attribute, parse_attributes};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// Any start tag; group 1 is the name, group 2 the raw attributes.
static RE_START_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<([a-z][a-z0-9-]*)\b([^>]*)>").unwrap());

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ComposeError {
    #[error("mount element `#{0}` not found in base document")]
    MissingMount(String),

    #[error("mount element `#{0}` is not empty in base document")]
    MountNotEmpty(String),
}

/// The document written for a route without a snapshot: SEO tags only.
pub fn meta_only(base: &str, meta: &RouteMeta, origin: &str) -> String {
    apply_route_meta(base, meta, origin)
}

/// Rewrite SEO tags for `meta`, then place `inner` inside the empty mount
/// element.
pub fn compose(
    base: &str,
    meta: &RouteMeta,
    origin: &str,
    mount_id: &str,
    inner: &str,
) -> Result<String, ComposeError> {
    let html = apply_route_meta(base, meta, origin);
    splice_mount(&html, mount_id, inner)
}

/// Insert `inner` between the mount element's start and end tags.
///
/// Only whitespace may separate the two tags; it is replaced.
pub fn splice_mount(html: &str, mount_id: &str, inner: &str) -> Result<String, ComposeError> {
    let (tag, open_end) = RE_START_TAG
        .captures_iter(html)
        .find_map(|caps| {
            let attrs = parse_attributes(&caps[2]);
            (find_attribute(&attrs, "id") == Some(mount_id)).then(|| {
                let whole = caps.get(0).map_or(0..0, |m| m.range());
                (caps[1].to_ascii_lowercase(), whole.end)
            })
        })
        .ok_or_else(|| ComposeError::MissingMount(mount_id.to_string()))?;

    let rest = &html[open_end..];
    let close_start = open_end + (rest.len() - rest.trim_start().len());
    let close_len = closing_tag_len(&html[close_start..], &tag)
        .ok_or_else(|| ComposeError::MountNotEmpty(mount_id.to_string()))?;

    let mut out = String::with_capacity(html.len() + inner.len());
    out.push_str(&html[..open_end]);
    out.push_str(inner);
    out.push_str(&html[close_start..close_start + close_len]);
    out.push_str(&html[close_start + close_len..]);
    Ok(out)
}

/// Length of `</tag>` (whitespace allowed before `>`) at the start of `s`.
fn closing_tag_len(s: &str, tag: &str) -> Option<usize> {
    let prefix_len = 2 + tag.len();
    let head = s.get(..prefix_len)?;
    if !head.starts_with("</") || !head[2..].eq_ignore_ascii_case(tag) {
        return None;
    }
    let after = &s[prefix_len..];
    let trimmed = after.trim_start();
    trimmed
        .starts_with('>')
        .then(|| prefix_len + (after.len() - trimmed.len()) + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::RouteRegistry;

    const BASE: &str = "<!doctype html>\n<html>\n  <head>\n    <title>Zush</title>\n  </head>\n  <body>\n    <div id=\"root\"></div>\n    <script src=\"/assets/app.js\"></script>\n  </body>\n</html>";

    #[test]
    fn test_splice_into_empty_mount() {
        let out = splice_mount(BASE, "root", "<main><h1>Hi</h1></main>").unwrap();
        assert!(out.contains("<div id=\"root\"><main><h1>Hi</h1></main></div>"));
        assert!(out.contains("<script src=\"/assets/app.js\"></script>"));
    }

    #[test]
    fn test_splice_replaces_inner_whitespace() {
        let html = "<body><div class=\"app\" id='root'>\n  </div ></body>";
        let out = splice_mount(html, "root", "<p>x</p>").unwrap();
        assert_eq!(out, "<body><div class=\"app\" id='root'><p>x</p></div ></body>");
    }

    #[test]
    fn test_splice_matches_exact_id() {
        let html = "<div id=\"root-legacy\"></div><section id=\"root\"></section>";
        let out = splice_mount(html, "root", "ok").unwrap();
        assert_eq!(out, "<div id=\"root-legacy\"></div><section id=\"root\">ok</section>");
    }

    #[test]
    fn test_splice_missing_mount() {
        let err = splice_mount("<body><div id=\"app\"></div></body>", "root", "x").unwrap_err();
        assert_eq!(err, ComposeError::MissingMount("root".into()));
    }

    #[test]
    fn test_splice_non_empty_mount() {
        let err = splice_mount("<div id=\"root\"><p>old</p></div>", "root", "x").unwrap_err();
        assert_eq!(err, ComposeError::MountNotEmpty("root".into()));
    }

    #[test]
    fn test_compose_rewrites_meta_and_mount() {
        let meta = RouteRegistry::builtin().lookup("/refund-policy");
        let out = compose(BASE, &meta, "https://zushapp.com", "root", "<article>14 days</article>").unwrap();
        assert!(out.contains("<title>Refund Policy - Zush</title>"));
        assert!(out.contains("href=\"https://zushapp.com/refund-policy\""));
        assert!(out.contains("<div id=\"root\"><article>14 days</article></div>"));
    }

    #[test]
    fn test_meta_only_keeps_mount_empty() {
        let meta = RouteRegistry::builtin().lookup("/changelog");
        let out = meta_only(BASE, &meta, "https://zushapp.com");
        assert!(out.contains("<title>Changelog - Zush</title>"));
        assert!(out.contains("<div id=\"root\"></div>"));
    }
}
