//! Server lifecycle management.

use crate::{core::register_server, log};
use anyhow::Result;
use std::{net::SocketAddr, sync::Arc};
use tiny_http::Server;

/// Maximum number of port binding attempts.
const MAX_PORT_RETRIES: u16 = 10;

/// Bind to the specified interface and port, with automatic port retry.
///
/// Returns the address actually bound, which differs from `base_port` when
/// the port was taken (or when `base_port` is 0).
pub fn bind_with_retry(
    interface: std::net::IpAddr,
    base_port: u16,
) -> Result<(Server, SocketAddr)> {
    let mut last_err = None;

    for offset in 0..MAX_PORT_RETRIES {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                let bound = server.server_addr().to_ip().unwrap_or(addr);
                return Ok((server, bound));
            }
            Err(e) => last_err = Some(e),
        }
    }

    Err(anyhow::anyhow!(
        "Failed to bind after {} attempts (ports {}-{}): {}",
        MAX_PORT_RETRIES,
        base_port,
        base_port.saturating_add(MAX_PORT_RETRIES - 1),
        last_err.map(|e| e.to_string()).unwrap_or_default()
    ))
}

/// Register server for graceful shutdown.
///
/// When Ctrl+C is pressed, the handler installed in `main` unblocks it.
pub fn register_server_for_shutdown(server: Arc<Server>) {
    register_server(server);
}
