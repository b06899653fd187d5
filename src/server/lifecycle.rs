//! Server binding.

use std::net::{IpAddr, SocketAddr};

use anyhow::{Result, anyhow};
use tiny_http::Server;

use crate::log;

/// Maximum number of port binding attempts.
const MAX_PORT_RETRIES: u16 = 10;

/// Bind to the specified interface and port, with automatic port retry.
///
/// Port 0 asks the OS for a free port and is never retried.
pub fn bind_with_retry(interface: IpAddr, base_port: u16) -> Result<(Server, SocketAddr)> {
    let attempts = if base_port == 0 { 1 } else { MAX_PORT_RETRIES };
    let mut last_error = None;

    for offset in 0..attempts {
        let port = base_port.saturating_add(offset);
        match Server::http(SocketAddr::new(interface, port)) {
            Ok(server) => {
                let addr = server
                    .server_addr()
                    .to_ip()
                    .unwrap_or_else(|| SocketAddr::new(interface, port));
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, addr.port());
                }
                return Ok((server, addr));
            }
            Err(e) => last_error = Some(e),
        }
    }

    Err(anyhow!(
        "Failed to bind after {} attempts (ports {}-{}): {}",
        attempts,
        base_port,
        base_port.saturating_add(attempts - 1),
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}
