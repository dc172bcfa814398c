//! Process-wide run state.
//!
//! `SHUTDOWN` is set by the first Ctrl+C. The snapshot loop checks it
//! before each route: routes not yet started are written meta-only and the
//! browser and server are still closed normally. A second Ctrl+C exits at
//! once.

use std::sync::atomic::{AtomicBool, Ordering};

/// Shutdown has been requested (Ctrl+C received)
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Exit status used when a second Ctrl+C forces the process down.
const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Setup the global Ctrl+C handler. Call once at program start
pub fn setup_shutdown_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        if request_shutdown() {
            crate::warn!("prerender"; "interrupted, finishing current route (Ctrl+C again to abort)");
        } else {
            std::process::exit(INTERRUPTED_EXIT_CODE);
        }
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
}

/// Set the shutdown flag. Returns `false` if it was already set.
fn request_shutdown() -> bool {
    !SHUTDOWN.swap(true, Ordering::SeqCst)
}

/// Check if shutdown has been requested
///
/// Relaxed is enough: the flag is only polled between routes.
pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shutdown_once() {
        // Other tests in this binary rely on the flag staying clear.
        let was = SHUTDOWN.load(Ordering::SeqCst);
        SHUTDOWN.store(false, Ordering::SeqCst);

        assert!(request_shutdown());
        assert!(is_shutdown());
        assert!(!request_shutdown());

        SHUTDOWN.store(was, Ordering::SeqCst);
    }
}
