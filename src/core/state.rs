//! Process-wide run state.
//!
//! Two orthogonal states:
//! - `WORKING`: Is a batch build running? (Ctrl+C drains the pool instead of exiting)
//! - `SHUTDOWN`: Has shutdown been requested? (Ctrl+C received)

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use tiny_http::Server;

/// A batch build is dispatching render tasks
static WORKING: AtomicBool = AtomicBool::new(false);

/// Shutdown has been requested (Ctrl+C received)
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// HTTP server reference for graceful shutdown
static SERVER: OnceLock<Arc<Server>> = OnceLock::new();

// =============================================================================
// WORKING state
// =============================================================================

/// Mark a batch build as started
pub fn begin_work() {
    WORKING.store(true, Ordering::Release);
}

/// Mark a batch build as finished
pub fn end_work() {
    WORKING.store(false, Ordering::Release);
}

fn is_working() -> bool {
    WORKING.load(Ordering::Acquire)
}

// =============================================================================
// SHUTDOWN state
// =============================================================================

/// Setup the global Ctrl+C handler. Call once at program start
///
/// - Server registered: unblock it so the request loop returns
/// - Batch running: set the flag so workers stop picking tasks; a second
///   Ctrl+C exits immediately
/// - Otherwise: exit immediately
pub fn setup_shutdown_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        let repeated = SHUTDOWN.swap(true, Ordering::SeqCst);

        if let Some(server) = SERVER.get() {
            crate::log!("serve"; "shutting down...");
            server.unblock();
        } else if is_working() && !repeated {
            crate::log!("build"; "interrupted, waiting for in-flight renders...");
        } else {
            std::process::exit(130);
        }
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
}

/// Register the HTTP server for graceful shutdown
///
/// Call this after binding the server, before entering the request loop
pub fn register_server(server: Arc<Server>) {
    let _ = SERVER.set(server);
}

/// Check if shutdown has been requested
///
/// Uses Relaxed ordering - worst case a worker picks one more task before
/// stopping
pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_working() {
        begin_work();
        assert!(is_working());

        end_work();
        assert!(!is_working());
    }
}
