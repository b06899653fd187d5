//! Render payload: the field set that determines a card's pixels.

use serde::Serialize;

use crate::{
    meta::CanonicalMetadata,
    trip::{MapLabel, TripSummary},
};

/// Tint strength used when a payload sets a tint without an intensity.
pub const DEFAULT_TINT_INTENSITY: f32 = 0.35;

/// Route map shown in the side panel of trip cards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapPanel {
    pub image_url: String,
    pub labels: Vec<MapLabel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderPayload {
    pub title: String,
    pub description: String,
    /// Canonical path, shown in the footer's display URL.
    pub path: String,
    pub pill: String,
    pub blog_image_ref: Option<String>,
    pub tint: Option<String>,
    pub tint_intensity: Option<f32>,
    pub map: Option<MapPanel>,
}

impl RenderPayload {
    pub fn from_metadata(meta: &CanonicalMetadata) -> Self {
        let image = &meta.image_params;
        Self {
            title: image.title.clone(),
            description: image.description.clone(),
            path: image.path.clone(),
            pill: image.pill.clone(),
            blog_image_ref: image.blog_image.clone(),
            tint: image.tint.clone(),
            tint_intensity: image.tint_intensity,
            map: None,
        }
    }

    /// Trip card: summary labels in the description, map in the side panel.
    pub fn from_trip(summary: &TripSummary, path: &str, pill: &str, fallback_title: &str) -> Self {
        let description = [
            Some(summary.duration_label.as_str()),
            Some(summary.months_label.as_str()),
            summary.distance_label.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" · ");

        Self {
            title: if summary.title.is_empty() {
                fallback_title.to_string()
            } else {
                summary.title.clone()
            },
            description,
            path: path.to_string(),
            pill: pill.to_string(),
            map: summary.map_image_url.as_ref().map(|url| MapPanel {
                image_url: url.clone(),
                labels: summary.map_labels.clone(),
            }),
            ..Self::default()
        }
    }

    /// Effective tint strength in `[0, 1]`, `None` without a tint.
    pub fn effective_tint(&self) -> Option<(&str, f32)> {
        let tint = self.tint.as_deref().filter(|t| !t.trim().is_empty())?;
        let intensity = self
            .tint_intensity
            .filter(|v| v.is_finite())
            .unwrap_or(DEFAULT_TINT_INTENSITY)
            .clamp(0.0, 1.0);
        Some((tint, intensity))
    }

    /// Query pairs that reproduce this payload through [`Self::from_query`].
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("title".to_string(), self.title.clone()),
            ("description".to_string(), self.description.clone()),
            ("path".to_string(), self.path.clone()),
            ("pill".to_string(), self.pill.clone()),
        ];
        if let Some(image) = &self.blog_image_ref {
            pairs.push(("image".into(), image.clone()));
        }
        if let Some(tint) = &self.tint {
            pairs.push(("tint".into(), tint.clone()));
        }
        if let Some(intensity) = self.tint_intensity {
            pairs.push(("tintIntensity".into(), intensity.to_string()));
        }
        if let Some(map) = &self.map {
            pairs.push(("map".into(), map.image_url.clone()));
            pairs.extend(map.labels.iter().map(|l| ("label".to_string(), encode_label(l))));
        }
        pairs
    }

    /// Build a payload from query pairs. Missing text fields become empty,
    /// malformed optional fields are dropped.
    pub fn from_query(pairs: &[(String, String)]) -> Self {
        let get = |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        };
        let non_empty = |key: &str| get(key).filter(|v| !v.trim().is_empty());

        let map = non_empty("map").map(|image_url| MapPanel {
            image_url,
            labels: pairs
                .iter()
                .filter(|(k, _)| k == "label")
                .filter_map(|(_, v)| decode_label(v))
                .collect(),
        });

        Self {
            title: get("title").unwrap_or_default(),
            description: get("description").unwrap_or_default(),
            path: get("path").unwrap_or_else(|| "/".to_string()),
            pill: get("pill").unwrap_or_default(),
            blog_image_ref: non_empty("image"),
            tint: non_empty("tint"),
            tint_intensity: get("tintIntensity").and_then(|v| v.trim().parse().ok()),
            map,
        }
    }
}

/// `x|y|tag|name`; the name goes last so it may contain `|`.
fn encode_label(label: &MapLabel) -> String {
    format!(
        "{}|{}|{}|{}",
        label.x,
        label.y,
        label.tag.as_deref().unwrap_or_default(),
        label.name
    )
}

fn decode_label(raw: &str) -> Option<MapLabel> {
    let mut parts = raw.splitn(4, '|');
    let x = parts.next()?.parse::<f64>().ok().filter(|v| v.is_finite())?;
    let y = parts.next()?.parse::<f64>().ok().filter(|v| v.is_finite())?;
    let tag = parts.next()?;
    let name = parts.next()?;
    Some(MapLabel {
        name: name.to_string(),
        x,
        y,
        tag: (!tag.is_empty()).then(|| tag.to_string()),
    })
}
