//! URL to filesystem path resolution.

use percent_encoding::percent_decode_str;
use std::path::{Path, PathBuf};

/// Resolve a request URL to a file under `root`.
///
/// Directories resolve to their `index.html`. A file is only served when the
/// requested name has an extension, so extensionless client routes always
/// reach the app shell. Returns `None` when nothing
/// servable exists or the path would leave `root` (through `..` or a
/// symlink); callers then take the SPA fallback.
pub fn resolve_path(url: &str, root: &Path) -> Option<PathBuf> {
    let clean = normalize_url(url)?;

    if clean.split('/').any(|segment| segment == "..") {
        return None;
    }

    let local = root.join(&clean);

    // Canonicalize so symlinks cannot point outside the served root.
    let canonical = local.canonicalize().ok()?;
    let root_canonical = root.canonicalize().ok()?;

    if !canonical.starts_with(&root_canonical) {
        return None;
    }

    if canonical.is_file() {
        let has_extension = Path::new(&clean).extension().is_some();
        return has_extension.then_some(canonical);
    }

    if canonical.is_dir() {
        let index = canonical.join("index.html");
        if index.is_file() {
            return Some(index);
        }
    }

    None
}

/// Strip query and fragment, percent-decode, trim slashes.
///
/// `None` when the decoded path is not UTF-8 or contains a NUL byte.
fn normalize_url(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let decoded = percent_decode_str(path).decode_utf8().ok()?;
    if decoded.contains('\0') {
        return None;
    }
    Some(decoded.trim_matches('/').replace('\\', "/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn site() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("assets")).unwrap();
        fs::create_dir_all(dir.path().join("docs")).unwrap();
        fs::write(dir.path().join("index.html"), "<html></html>").unwrap();
        fs::write(dir.path().join("assets/app 1.js"), "console.log(1)").unwrap();
        fs::write(dir.path().join("docs/index.html"), "<p>docs</p>").unwrap();
        dir
    }

    #[test]
    fn test_normalize_url() {
        assert_eq!(normalize_url("/assets/app.js?v=3").as_deref(), Some("assets/app.js"));
        assert_eq!(normalize_url("/a%20b/#top").as_deref(), Some("a b"));
        assert_eq!(normalize_url("/").as_deref(), Some(""));
        // An encoded `?` is part of the name, not a query.
        assert_eq!(normalize_url("/what%3Fnow").as_deref(), Some("what?now"));
        assert_eq!(normalize_url("/%FF"), None);
    }

    #[test]
    fn test_resolve_file_and_directory() {
        let dir = site();
        let root = dir.path().canonicalize().unwrap();

        assert_eq!(
            resolve_path("/assets/app%201.js", dir.path()),
            Some(root.join("assets/app 1.js"))
        );
        assert_eq!(resolve_path("/docs/", dir.path()), Some(root.join("docs/index.html")));
        assert_eq!(resolve_path("/", dir.path()), Some(root.join("index.html")));
        assert_eq!(resolve_path("/assets", dir.path()), None);
        assert_eq!(resolve_path("/changelog", dir.path()), None);
    }

    #[test]
    fn test_extensionless_file_not_served() {
        let dir = site();
        fs::write(dir.path().join("changelog"), "stray build artifact").unwrap();
        fs::write(dir.path().join("docs/LICENSE"), "MIT").unwrap();

        assert_eq!(resolve_path("/changelog", dir.path()), None);
        assert_eq!(resolve_path("/docs/LICENSE", dir.path()), None);
    }

    #[test]
    fn test_traversal_rejected() {
        let outer = TempDir::new().unwrap();
        fs::write(outer.path().join("secret.txt"), "secret").unwrap();
        let root = outer.path().join("dist");
        fs::create_dir_all(&root).unwrap();

        assert_eq!(resolve_path("/../secret.txt", &root), None);
        assert_eq!(resolve_path("/%2e%2e/secret.txt", &root), None);
        assert_eq!(resolve_path("/..%2fsecret.txt", &root), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_escape_rejected() {
        let outer = TempDir::new().unwrap();
        fs::write(outer.path().join("secret.txt"), "secret").unwrap();
        let root = outer.path().join("dist");
        fs::create_dir_all(&root).unwrap();
        std::os::unix::fs::symlink(outer.path().join("secret.txt"), root.join("leak.txt")).unwrap();

        assert_eq!(resolve_path("/leak.txt", &root), None);
    }
}
