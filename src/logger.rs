//! Logging utilities with colored prefixes.
//!
//! This module provides:
//! - `log!` macro for informational output on stdout
//! - `warn!` / `error!` macros for degraded and fatal conditions on stderr
//! - `debug!` macro that only prints with `--verbose`
//!
//! # Example
//!
//! ```ignore
//! log!("prerender"; "rendering {}", route);
//! warn!("prerender"; "chrome not found, writing meta-only html");
//! ```

use owo_colors::{OwoColorize, Stream, Style};
use std::{
    io::{Write, stderr, stdout},
    sync::atomic::{AtomicBool, Ordering},
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

/// Severity of a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
}

// ============================================================================
// Log Macros
// ============================================================================

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, $crate::logger::Level::Info, &format!($($arg)*))
    }};
}

/// Log a warning (recoverable, the run continues)
#[macro_export]
macro_rules! warn {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, $crate::logger::Level::Warn, &format!($($arg)*))
    }};
}

/// Log an error (fatal to the run)
#[macro_export]
macro_rules! error {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, $crate::logger::Level::Error, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when --verbose is enabled)
///
/// # Usage
/// ```ignore
/// debug!("module"; "debug info: {}", value);
/// ```
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, $crate::logger::Level::Info, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Write one log line. Info goes to stdout, warnings and errors to stderr.
pub fn log(module: &str, level: Level, message: &str) {
    let line = format_line(module, level, message);

    match level {
        Level::Info => {
            let mut out = stdout().lock();
            writeln!(out, "{line}").ok();
            out.flush().ok();
        }
        Level::Warn | Level::Error => {
            let mut out = stderr().lock();
            writeln!(out, "{line}").ok();
            out.flush().ok();
        }
    }
}

fn format_line(module: &str, level: Level, message: &str) -> String {
    let prefix = colorize_prefix(module, level);
    let stream = stream_for(level);
    match level {
        Level::Info => format!("{prefix} {message}"),
        Level::Warn => format!(
            "{prefix} {} {message}",
            "warning:".if_supports_color(stream, |t| t.yellow())
        ),
        Level::Error => format!(
            "{prefix} {} {message}",
            "error:".if_supports_color(stream, |t| t.red())
        ),
    }
}

/// Stream a level is written to; color support is checked per stream.
#[inline]
fn stream_for(level: Level) -> Stream {
    match level {
        Level::Info => Stream::Stdout,
        Level::Warn | Level::Error => Stream::Stderr,
    }
}

/// Apply color to a module prefix based on level
///
/// Honors `--color` through `owo_colors::set_override` and falls back to
/// plain text when the stream is not a terminal.
#[inline]
fn colorize_prefix(module: &str, level: Level) -> String {
    let prefix = format!("[{module}]");
    let style = match level {
        Level::Info => Style::new().bright_blue().bold(),
        Level::Warn => Style::new().bright_yellow().bold(),
        Level::Error => Style::new().bright_red().bold(),
    };
    prefix
        .if_supports_color(stream_for(level), |t| t.style(style))
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_line_keeps_prefix_and_message() {
        owo_colors::set_override(false);
        assert_eq!(
            format_line("prerender", Level::Info, "rendering /"),
            "[prerender] rendering /"
        );
        assert_eq!(
            format_line("prerender", Level::Warn, "chrome not found"),
            "[prerender] warning: chrome not found"
        );
        assert_eq!(
            format_line("prerender", Level::Error, "bind failed"),
            "[prerender] error: bind failed"
        );

        // The override is global, so forced color is checked in the same test.
        owo_colors::set_override(true);
        let colored = format_line("prerender", Level::Warn, "chrome not found");
        owo_colors::set_override(false);
        assert!(colored.contains('\u{1b}'));
        assert!(colored.contains("[prerender]"));
        assert!(colored.ends_with("chrome not found"));
    }

    #[test]
    fn test_verbose_toggle() {
        set_verbose(true);
        assert!(is_verbose());
        set_verbose(false);
        assert!(!is_verbose());
    }
}
