//! Local origin server for the built site.
//!
//! Serves the output directory over HTTP so the headless browser loads the
//! app exactly as a static host would. Unknown paths get the app shell
//! (`index.html`) with status 200 so client-side routing can take over.
//!
//! The shell is read once at bind time. Writing a snapshot over
//! `<out>/index.html` later in the run does not change what is served.

mod path;
mod response;

use crate::{debug, log};
use anyhow::{Result, anyhow};
use std::{
    fs,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::{Path, PathBuf},
    sync::Arc,
    thread::{self, JoinHandle},
};
use tiny_http::{Request, Server};

/// Maximum number of port binding attempts for a fixed port.
const MAX_PORT_RETRIES: u16 = 10;

/// What the request thread serves from.
struct Site {
    /// Canonical output directory.
    root: PathBuf,
    /// Canonical path of the shell on disk, answered from `fallback`.
    index: PathBuf,
    /// Shell captured at bind time; `None` when it could not be read.
    fallback: Option<Vec<u8>>,
}

/// A running server. Closed on [`OriginServer::close`] or drop.
pub struct OriginServer {
    server: Arc<Server>,
    addr: SocketAddr,
    thread: Option<JoinHandle<()>>,
}

impl OriginServer {
    /// Bind `interface:port` and start serving `root` on a background thread.
    ///
    /// Port 0 picks a free port; the real one is known before this returns.
    pub fn bind(interface: IpAddr, port: u16, root: &Path) -> Result<Self> {
        let site = Site::capture(root)?;
        let (server, addr) = bind_with_retry(interface, port)?;
        let server = Arc::new(server);

        let worker = Arc::clone(&server);
        let thread = thread::Builder::new()
            .name("origin-server".into())
            .spawn(move || run_request_loop(&worker, &site))
            .map_err(|e| anyhow!("Failed to spawn server thread: {e}"))?;

        debug!("serve"; "http://{}", addr);
        Ok(Self {
            server,
            addr,
            thread: Some(thread),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Base URL a browser on this machine can load, without trailing slash.
    pub fn origin(&self) -> String {
        let addr = self.addr();
        let ip = match addr.ip() {
            ip if ip.is_unspecified() => IpAddr::V4(Ipv4Addr::LOCALHOST),
            ip => ip,
        };
        format!("http://{}", SocketAddr::new(ip, addr.port()))
    }

    /// Stop accepting requests and wait for the request thread to exit.
    pub fn close(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(thread) = self.thread.take() {
            self.server.unblock();
            if thread.join().is_err() {
                debug!("serve"; "request thread panicked");
            }
        }
    }
}

impl Drop for OriginServer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl Site {
    fn capture(root: &Path) -> Result<Self> {
        let root = root
            .canonicalize()
            .map_err(|e| anyhow!("Cannot serve {}: {e}", root.display()))?;
        let index = root.join("index.html");
        let fallback = match fs::read(&index) {
            Ok(body) => Some(body),
            Err(e) => {
                debug!("serve"; "no fallback document ({}): {}", index.display(), e);
                None
            }
        };
        Ok(Self {
            root,
            index,
            fallback,
        })
    }
}

/// Bind to the given interface and port.
///
/// A fixed port that is taken is retried on the following ports.
fn bind_with_retry(interface: IpAddr, base_port: u16) -> Result<(Server, SocketAddr)> {
    let attempts = if base_port == 0 { 1 } else { MAX_PORT_RETRIES };
    let mut last_error = None;

    for offset in 0..attempts {
        let port = base_port.saturating_add(offset);
        match Server::http(SocketAddr::new(interface, port)) {
            Ok(server) => {
                let addr = server
                    .server_addr()
                    .to_ip()
                    .ok_or_else(|| anyhow!("server is not listening on an IP socket"))?;
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(e) => last_error = Some(e),
        }
    }

    Err(anyhow!(
        "Failed to bind {} (ports {}-{}): {}",
        interface,
        base_port,
        base_port.saturating_add(attempts - 1),
        last_error.map_or_else(String::new, |e| e.to_string())
    ))
}

fn run_request_loop(server: &Server, site: &Site) {
    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, site) {
            debug!("serve"; "request error: {e}");
        }
    }
}

/// Handle a single HTTP request
fn handle_request(request: Request, site: &Site) -> Result<()> {
    match path::resolve_path(request.url(), &site.root) {
        Some(file) if file != site.index => response::respond_file(request, &file),
        _ => match &site.fallback {
            Some(body) => response::respond_fallback(request, body),
            None => response::respond_not_found(request),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpStream;
    use tempfile::TempDir;

    const SHELL: &str = "<!doctype html><html><body><div id=\"root\"></div></body></html>";

    /// Send one request and return `(status, content-type, body)`.
    fn fetch(server: &OriginServer, method: &str, path: &str) -> (u16, String, String) {
        let mut stream = TcpStream::connect(server.addr()).unwrap();
        write!(
            stream,
            "{method} {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n"
        )
        .unwrap();
        let mut raw = String::new();
        stream.read_to_string(&mut raw).unwrap();

        let (head, body) = raw.split_once("\r\n\r\n").unwrap_or((&raw, ""));
        let status = head.split(' ').nth(1).unwrap().parse().unwrap();
        let content_type = head
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-type").then(|| value.trim().to_string())
            })
            .unwrap_or_default();
        (status, content_type, body.to_string())
    }

    fn site() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("assets")).unwrap();
        fs::create_dir_all(dir.path().join("docs")).unwrap();
        fs::write(dir.path().join("index.html"), SHELL).unwrap();
        fs::write(dir.path().join("assets/app.js"), "console.log('app')").unwrap();
        fs::write(dir.path().join("assets/font.woff2"), [0u8, 1, 2]).unwrap();
        fs::write(dir.path().join("docs/index.html"), "<p>docs</p>").unwrap();
        fs::write(dir.path().join("llms.md"), "# Zush").unwrap();
        dir
    }

    fn bind(dir: &TempDir) -> OriginServer {
        OriginServer::bind(IpAddr::V4(Ipv4Addr::LOCALHOST), 0, dir.path()).unwrap()
    }

    #[test]
    fn test_ephemeral_port_resolved() {
        let dir = site();
        let server = bind(&dir);
        assert_ne!(server.addr().port(), 0);
        assert_eq!(server.origin(), format!("http://127.0.0.1:{}", server.addr().port()));
    }

    #[test]
    fn test_serves_files_with_mime() {
        let dir = site();
        let server = bind(&dir);

        let (status, mime, body) = fetch(&server, "GET", "/assets/app.js?v=1");
        assert_eq!(status, 200);
        assert_eq!(mime, crate::utils::mime::types::JAVASCRIPT);
        assert_eq!(body, "console.log('app')");

        let (_, mime, _) = fetch(&server, "GET", "/assets/font.woff2");
        assert_eq!(mime, "font/woff2");

        let (_, mime, _) = fetch(&server, "GET", "/llms.md");
        assert_eq!(mime, crate::utils::mime::types::MARKDOWN);
    }

    #[test]
    fn test_directory_index() {
        let dir = site();
        let server = bind(&dir);
        let (status, _, body) = fetch(&server, "GET", "/docs/");
        assert_eq!(status, 200);
        assert_eq!(body, "<p>docs</p>");
    }

    #[test]
    fn test_unknown_route_gets_shell() {
        let dir = site();
        let server = bind(&dir);
        for route in ["/", "/changelog", "/activate/abc123", "/assets/missing.js"] {
            let (status, mime, body) = fetch(&server, "GET", route);
            assert_eq!(status, 200, "{route}");
            assert_eq!(mime, crate::utils::mime::types::HTML);
            assert_eq!(body, SHELL);
        }
    }

    #[test]
    fn test_shell_captured_at_bind() {
        let dir = site();
        let server = bind(&dir);
        fs::write(dir.path().join("index.html"), "<p>snapshot of /</p>").unwrap();

        let (_, _, body) = fetch(&server, "GET", "/changelog");
        assert_eq!(body, SHELL);
        let (_, _, body) = fetch(&server, "GET", "/");
        assert_eq!(body, SHELL);
    }

    #[test]
    fn test_extensionless_file_gets_shell() {
        let dir = site();
        fs::write(dir.path().join("changelog"), "not the app").unwrap();
        let server = bind(&dir);

        let (status, mime, body) = fetch(&server, "GET", "/changelog");
        assert_eq!(status, 200);
        assert_eq!(mime, crate::utils::mime::types::HTML);
        assert_eq!(body, SHELL);
    }

    #[test]
    fn test_missing_shell_is_404() {
        let dir = TempDir::new().unwrap();
        let server = bind(&dir);
        let (status, _, _) = fetch(&server, "GET", "/changelog");
        assert_eq!(status, 404);
    }

    #[test]
    fn test_traversal_takes_fallback() {
        let outer = TempDir::new().unwrap();
        fs::write(outer.path().join("secret.txt"), "secret").unwrap();
        let root = outer.path().join("dist");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("index.html"), SHELL).unwrap();

        let server = OriginServer::bind(IpAddr::V4(Ipv4Addr::LOCALHOST), 0, &root).unwrap();
        let (status, _, body) = fetch(&server, "GET", "/%2e%2e/secret.txt");
        assert_eq!(status, 200);
        assert_eq!(body, SHELL);
    }

    #[test]
    fn test_head_has_no_body() {
        let dir = site();
        let server = bind(&dir);
        let (status, mime, body) = fetch(&server, "HEAD", "/assets/app.js");
        assert_eq!(status, 200);
        assert_eq!(mime, crate::utils::mime::types::JAVASCRIPT);
        assert!(body.is_empty());
    }

    #[test]
    fn test_close_joins_request_thread() {
        let dir = site();
        let mut server = bind(&dir);
        fetch(&server, "GET", "/");
        server.shutdown();
        assert!(server.thread.is_none());
        // Closing again (and dropping) is a no-op.
        server.close();
    }
}
