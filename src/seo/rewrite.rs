//! String-level rewriting of SEO tags in an HTML document.
//!
//! Every operation only looks at the document head (everything before
//! `</head>`, or before `<body` when the head is not closed). Tags are
//! matched case-insensitively and regardless of attribute order. An existing
//! tag is updated in place, a missing tag is inserted just before `</head>`.
//!
//! All operations are idempotent: `f(f(x)) == f(x)`.

use crate::utils::html::{escape, escape_attr, find_attribute, parse_attributes, render_attributes};
use regex::Regex;
use std::sync::LazyLock;

static RE_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)(<title\b[^>]*>)(.*?)(</title\s*>)").unwrap());

static RE_META: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<meta\b([^>]*)>").unwrap());

static RE_LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<link\b([^>]*)>").unwrap());

static RE_HEAD_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</head\s*>").unwrap());

static RE_BODY_OPEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<body\b").unwrap());

// =============================================================================
// Public operations
// =============================================================================

/// Set the document title.
///
/// Replaces the content of the first `<title>` in the head, or inserts one.
/// Any further `<title>` elements in the head are removed.
pub fn set_title(html: &str, title: &str) -> String {
    let end = head_end(html);
    let head = &html[..end];
    let text = escape(title);

    let mut matches = RE_TITLE.captures_iter(head);
    let Some(first) = matches.next() else {
        return insert_into_head(html, &format!("<title>{text}</title>"));
    };

    let whole = first.get(0).map_or(0..0, |m| m.range());
    let open = first.get(1).map_or("", |m| m.as_str());
    let close = first.get(3).map_or("", |m| m.as_str());
    let extra: Vec<_> = matches.filter_map(|c| c.get(0).map(|m| m.range())).collect();

    let mut out = html.to_string();
    // Back to front so earlier ranges stay valid.
    for range in extra.into_iter().rev() {
        out.replace_range(range, "");
    }
    out.replace_range(whole, &format!("{open}{text}{close}"));
    out
}

/// Set `<meta name="{name}" content="{content}">`.
pub fn set_named_meta(html: &str, name: &str, content: &str) -> String {
    set_meta_by(html, "name", name, content)
}

/// Set `<meta property="{property}" content="{content}">` (Open Graph).
pub fn set_property_meta(html: &str, property: &str, content: &str) -> String {
    set_meta_by(html, "property", property, content)
}

/// Set `<link rel="canonical" href="{url}">`.
pub fn set_canonical(html: &str, url: &str) -> String {
    let end = head_end(html);
    let head = &html[..end];
    let href = escape_attr(url);

    for caps in RE_LINK.captures_iter(head) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let mut attrs = parse_attributes(inner.as_str());
        let is_canonical = find_attribute(&attrs, "rel").is_some_and(|rel| {
            rel.split_ascii_whitespace()
                .any(|token| token.eq_ignore_ascii_case("canonical"))
        });
        if !is_canonical {
            continue;
        }

        set_attribute(&mut attrs, "href", &href);
        let tag = rebuild_tag("link", &attrs, inner.as_str());
        let mut out = html.to_string();
        out.replace_range(whole.range(), &tag);
        return out;
    }

    insert_into_head(html, &format!(r#"<link rel="canonical" href="{href}">"#))
}

// =============================================================================
// Internals
// =============================================================================

fn set_meta_by(html: &str, key: &str, key_value: &str, content: &str) -> String {
    let end = head_end(html);
    let head = &html[..end];
    let content = escape_attr(content);

    for caps in RE_META.captures_iter(head) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let mut attrs = parse_attributes(inner.as_str());
        let matches = find_attribute(&attrs, key).is_some_and(|v| v.eq_ignore_ascii_case(key_value));
        if !matches {
            continue;
        }

        set_attribute(&mut attrs, "content", &content);
        let tag = rebuild_tag("meta", &attrs, inner.as_str());
        let mut out = html.to_string();
        out.replace_range(whole.range(), &tag);
        return out;
    }

    let key_value = escape_attr(key_value);
    insert_into_head(
        html,
        &format!(r#"<meta {key}="{key_value}" content="{content}">"#),
    )
}

/// Replace an attribute value (first match, case-insensitive) or append it.
fn set_attribute(attrs: &mut Vec<(String, String)>, name: &str, value: &str) {
    match attrs.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
        Some((_, v)) => *v = value.to_string(),
        None => attrs.push((name.to_string(), value.to_string())),
    }
}

/// Rebuild a void start tag, keeping a self-closing slash if the source had one.
fn rebuild_tag(tag: &str, attrs: &[(String, String)], original_inner: &str) -> String {
    let self_closing = original_inner.trim_end().ends_with('/');
    let attrs = render_attributes(attrs);
    if self_closing {
        format!("<{tag}{attrs} />")
    } else {
        format!("<{tag}{attrs}>")
    }
}

/// Byte offset where the head region ends.
fn head_end(html: &str) -> usize {
    RE_HEAD_CLOSE
        .find(html)
        .or_else(|| RE_BODY_OPEN.find(html))
        .map_or(html.len(), |m| m.start())
}

/// Insert `tag` just before `</head>`, else before `<body`, else prepend.
fn insert_into_head(html: &str, tag: &str) -> String {
    let mut out = String::with_capacity(html.len() + tag.len() + 1);
    match RE_HEAD_CLOSE.find(html).or_else(|| RE_BODY_OPEN.find(html)) {
        Some(m) => {
            out.push_str(&html[..m.start()]);
            out.push_str(tag);
            out.push('\n');
            out.push_str(&html[m.start()..]);
        }
        None => {
            out.push_str(tag);
            out.push('\n');
            out.push_str(html);
        }
    }
    out
}
