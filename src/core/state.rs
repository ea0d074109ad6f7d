//! Shutdown state for serve mode.
//!
//! `SHUTDOWN` is set once Ctrl+C is received. Requests still in flight
//! observe it and answer 503 instead of starting new work.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use tiny_http::Server;

/// Shutdown has been requested (Ctrl+C received)
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// HTTP server reference for graceful shutdown
static SERVER: OnceLock<Arc<Server>> = OnceLock::new();

/// Setup the global Ctrl+C handler. Call once at program start
///
/// - Before `register_server()`: exit immediately, batch output may be partial
/// - After `register_server()`: unblock the server so the request loop ends
pub fn setup_shutdown_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        SHUTDOWN.store(true, Ordering::SeqCst);

        if let Some(server) = SERVER.get() {
            crate::log!("serve"; "shutting down...");
            server.unblock();
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
pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}
