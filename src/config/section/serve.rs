//! `[serve]` section configuration.
//!
//! Settings for the on-demand render server.
//!
//! # Example
//!
//! ```toml
//! [serve]
//! interface = "127.0.0.1"                 # Network interface
//! port = 5280                             # HTTP port number
//! origin = "https://cdn.example.com"      # Where fonts and blog images are fetched from
//! ```

use std::net::{IpAddr, Ipv4Addr};

use serde::{Deserialize, Serialize};

/// On-demand render server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    /// Network interface to bind.
    /// - `127.0.0.1` (default): localhost only
    /// - `0.0.0.0`: all interfaces
    pub interface: IpAddr,

    /// HTTP port number.
    pub port: u16,

    /// Origin that serves fonts and raster images for on-demand renders.
    /// Falls back to `site.url` when unset.
    pub origin: Option<String>,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            interface: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            port: 5280,
            origin: None,
        }
    }
}
