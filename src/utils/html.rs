//! HTML utility functions.
//!
//! Provides common HTML processing functions:
//! - `escape()`, `escape_attr()` - HTML entity escaping
//! - `parse_attributes()` - HTML attribute string parsing
//! - `render_attributes()` - the inverse, for rebuilding a start tag

use std::borrow::Cow;

// =============================================================================
// HTML Escaping
// =============================================================================

/// Characters that require escaping in text content.
const TEXT_ESCAPE_CHARS: [char; 3] = ['<', '>', '&'];

/// Characters that require escaping in double-quoted attribute values.
const ATTR_ESCAPE_CHARS: [char; 4] = ['<', '>', '&', '"'];

/// Get the HTML entity for a special character.
#[inline]
fn escape_char(c: char) -> Option<&'static str> {
    match c {
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        _ => None,
    }
}

/// Escape HTML special characters in text content.
///
/// Uses `Cow` to avoid allocation when no escaping is needed.
///
/// # Example
/// ```ignore
/// assert_eq!(escape("<script>"), "&lt;script&gt;");
/// assert_eq!(escape("hello"), "hello"); // No allocation
/// ```
#[inline]
pub fn escape(s: &str) -> Cow<'_, str> {
    escape_with(s, &TEXT_ESCAPE_CHARS)
}

/// Escape HTML attribute values (double-quoted context).
#[inline]
pub fn escape_attr(s: &str) -> Cow<'_, str> {
    escape_with(s, &ATTR_ESCAPE_CHARS)
}

/// Internal: escape with specified character set.
#[inline]
fn escape_with<'a>(s: &'a str, chars: &[char]) -> Cow<'a, str> {
    if !s.contains(chars) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len() + 16);
    for c in s.chars() {
        match escape_char(c).filter(|_| chars.contains(&c)) {
            Some(entity) => result.push_str(entity),
            None => result.push(c),
        }
    }
    Cow::Owned(result)
}

// =============================================================================
// Attribute Parsing
// =============================================================================

/// Parse HTML-style attributes from the inside of a start tag.
///
/// Input: `name="description" content='Hi' defer`
/// Output: `vec![("name", "description"), ("content", "Hi"), ("defer", "")]`
///
/// Values are returned verbatim (entities are not decoded). A trailing `/`
/// from a self-closing tag is ignored.
pub fn parse_attributes(s: &str) -> Vec<(String, String)> {
    let mut attrs = Vec::new();
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c.is_whitespace() || c == '/' {
            continue;
        }

        // Read attribute name
        let mut name = String::new();
        name.push(c);
        while let Some(&next) = chars.peek() {
            if next == '=' || next == '/' || next.is_whitespace() {
                break;
            }
            name.push(next);
            chars.next();
        }

        // Skip whitespace
        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }

        if chars.peek() != Some(&'=') {
            // Boolean attribute (no value)
            attrs.push((name, String::new()));
            continue;
        }
        chars.next(); // consume '='

        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }

        let mut value = String::new();
        match chars.peek().copied() {
            Some(quote @ ('"' | '\'')) => {
                chars.next();
                for c in chars.by_ref() {
                    if c == quote {
                        break;
                    }
                    value.push(c);
                }
            }
            _ => {
                // Unquoted value (read until whitespace)
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() {
                        break;
                    }
                    value.push(c);
                    chars.next();
                }
            }
        }

        attrs.push((name, value));
    }

    attrs
}

/// Render attributes back into start-tag form (` a="b" c`).
///
/// Values are emitted as-is, so already-escaped source values survive a
/// parse/render cycle unchanged. A value containing `"` is single-quoted.
pub fn render_attributes(attrs: &[(String, String)]) -> String {
    let mut out = String::new();
    for (name, value) in attrs {
        out.push(' ');
        out.push_str(name);
        if value.is_empty() {
            continue;
        }
        if value.contains('"') {
            out.push_str("='");
            out.push_str(value);
            out.push('\'');
        } else {
            out.push_str("=\"");
            out.push_str(value);
            out.push('"');
        }
    }
    out
}

/// Find an attribute value by name (ASCII case-insensitive).
pub fn find_attribute<'a>(attrs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("<b>Tom & Jerry</b>"), "&lt;b&gt;Tom &amp; Jerry&lt;/b&gt;");
        assert_eq!(escape("say \"hi\""), "say \"hi\"");
        assert!(matches!(escape("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_escape_attr() {
        assert_eq!(escape_attr("a \"quoted\" & <b>"), "a &quot;quoted&quot; &amp; &lt;b&gt;");
        assert!(matches!(escape_attr("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_parse_attributes() {
        let attrs = parse_attributes(r#"content='Hi there' NAME="description" defer"#);
        assert_eq!(
            attrs,
            vec![
                ("content".to_string(), "Hi there".to_string()),
                ("NAME".to_string(), "description".to_string()),
                ("defer".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn test_parse_attributes_self_closing_and_unquoted() {
        let attrs = parse_attributes(r#"rel=canonical href="https://x.test/" /"#);
        assert_eq!(find_attribute(&attrs, "rel"), Some("canonical"));
        assert_eq!(find_attribute(&attrs, "HREF"), Some("https://x.test/"));
        assert_eq!(attrs.len(), 2);
    }

    #[test]
    fn test_render_attributes_round_trip() {
        let src = r#" name="description" content="A &amp; B" data-x"#;
        let attrs = parse_attributes(src);
        assert_eq!(render_attributes(&attrs), src);
    }

    #[test]
    fn test_render_attributes_single_quotes_when_needed() {
        let attrs = vec![("content".to_string(), "say \"hi\"".to_string())];
        assert_eq!(render_attributes(&attrs), " content='say \"hi\"'");
    }
}
