//! Per-trip view preferences and the store they are read from.

use std::{collections::HashMap, fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapStyle {
    #[default]
    Light,
    Dark,
    Satellite,
    Terrain,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteMode {
    #[default]
    Simple,
    Realistic,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Brand,
    Trip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewPreferences {
    pub map_style: MapStyle,
    pub route_mode: RouteMode,
    pub color_mode: ColorMode,
    pub show_labels: bool,
}

impl Default for ViewPreferences {
    fn default() -> Self {
        Self {
            map_style: MapStyle::Light,
            route_mode: RouteMode::Simple,
            color_mode: ColorMode::Brand,
            show_labels: true,
        }
    }
}

impl ViewPreferences {
    /// Parse stored preferences; anything malformed yields the defaults.
    pub fn parse(raw: &str) -> Self {
        serde_json::from_str(raw).unwrap_or_default()
    }
}

/// Key-value store holding raw preference JSON per trip id.
pub trait PreferenceStore: Send + Sync {
    fn raw(&self, trip_id: &str) -> Option<String>;

    fn preferences(&self, trip_id: &str) -> ViewPreferences {
        self.raw(trip_id)
            .map(|raw| ViewPreferences::parse(&raw))
            .unwrap_or_default()
    }
}

/// Preferences kept in a JSON object file mapping trip id to preference JSON.
///
/// Values may be objects or JSON-encoded strings.
#[derive(Debug, Default)]
pub struct JsonPreferenceStore {
    entries: HashMap<String, serde_json::Value>,
}

impl JsonPreferenceStore {
    /// Missing or unreadable files give an empty store.
    pub fn load(path: &Path) -> Self {
        let entries = fs::read_to_string(path)
            .ok()
            .and_then(|content| match serde_json::from_str(&content) {
                Ok(entries) => Some(entries),
                Err(e) => {
                    debug!("trip"; "ignoring malformed preferences {}: {}", path.display(), e);
                    None
                }
            })
            .unwrap_or_default();
        Self { entries }
    }
}

impl PreferenceStore for JsonPreferenceStore {
    fn raw(&self, trip_id: &str) -> Option<String> {
        self.entries.get(trip_id).map(|value| match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }
}
