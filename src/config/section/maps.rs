//! `[maps]` and `[trips]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [maps]
//! api_key_env = "MAPS_API_KEY"
//! width = 560
//! height = 630
//! padding = 48
//!
//! [trips]
//! endpoint = "https://api.example.com/v1"
//! preferences = "trip-preferences.json"
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Static map and directions API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapsConfig {
    /// Environment variable holding the maps API key.
    pub api_key_env: String,
    pub static_map_endpoint: String,
    pub directions_endpoint: String,
    /// Map panel size in pixels.
    pub width: u32,
    pub height: u32,
    /// Inset kept free around the fitted route.
    pub padding: u32,
}

impl Default for MapsConfig {
    fn default() -> Self {
        Self {
            api_key_env: "MAPS_API_KEY".into(),
            static_map_endpoint: "https://maps.googleapis.com/maps/api/staticmap".into(),
            directions_endpoint: "https://maps.googleapis.com/maps/api/directions/json".into(),
            width: 560,
            height: 630,
            padding: 48,
        }
    }
}

impl MapsConfig {
    /// The API key, if the configured variable is set and non-empty.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
    }
}

/// Shared-trip document store and preference store locations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TripsConfig {
    pub endpoint: Option<String>,
    pub preferences: Option<PathBuf>,
}
