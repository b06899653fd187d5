//! Map viewport fitting and label placement in Web Mercator pixel space.

use serde::{Deserialize, Serialize};

use super::geo::{LatLng, project, unproject, world_size};
use crate::utils::slug::name_key;

pub const MIN_ZOOM: u8 = 2;
pub const MAX_ZOOM: u8 = 18;
/// Zoom used when there is only one point to show.
pub const SINGLE_POINT_ZOOM: u8 = 10;

/// Labels stay inside this band of canvas fractions.
const LABEL_INSET: f64 = 0.08;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapViewport {
    pub center: LatLng,
    pub zoom: u8,
}

impl MapViewport {
    /// World view used for empty input.
    pub const WORLD: Self = Self {
        center: LatLng::new(0.0, 0.0),
        zoom: MIN_ZOOM,
    };
}

/// Target canvas in pixels with a fixed inset kept free.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
    pub padding: u32,
}

impl Canvas {
    fn inner(self) -> (f64, f64) {
        let w = self.width.saturating_sub(2 * self.padding).max(1);
        let h = self.height.saturating_sub(2 * self.padding).max(1);
        (f64::from(w), f64::from(h))
    }
}

/// Fit `points` into `canvas`.
///
/// Each axis gets the largest integer zoom at which the bounding box still
/// fits the inner canvas; the smaller of the two wins, clamped to
/// `[MIN_ZOOM, MAX_ZOOM]`.
pub fn fit(points: &[LatLng], canvas: Canvas) -> MapViewport {
    match points {
        [] => MapViewport::WORLD,
        [only] => MapViewport {
            center: *only,
            zoom: SINGLE_POINT_ZOOM,
        },
        _ => {
            let projected: Vec<(f64, f64)> = points.iter().map(|p| project(*p)).collect();
            let (min_x, max_x) = bounds(projected.iter().map(|p| p.0));
            let (min_y, max_y) = bounds(projected.iter().map(|p| p.1));

            let (inner_w, inner_h) = canvas.inner();
            let zoom = axis_zoom(max_x - min_x, inner_w).min(axis_zoom(max_y - min_y, inner_h));

            MapViewport {
                center: unproject((min_x + max_x) / 2.0, (min_y + max_y) / 2.0),
                zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            }
        }
    }
}

fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

/// Largest zoom at which a span of `fraction` world widths fits in `pixels`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn axis_zoom(fraction: f64, pixels: f64) -> u8 {
    if fraction <= f64::EPSILON {
        return MAX_ZOOM;
    }
    let zoom = (pixels / (fraction * world_size(0))).log2().floor();
    zoom.clamp(0.0, f64::from(MAX_ZOOM)) as u8
}

/// A stop name positioned on the map image as canvas fractions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapLabel {
    pub name: String,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

pub const TAG_START: &str = "START";
pub const TAG_END: &str = "END";
pub const TAG_ROUND_TRIP: &str = "START • END";

/// Position of `point` as canvas fractions around the viewport center.
///
/// Horizontal deltas wrap across the antimeridian.
pub fn canvas_fraction(point: LatLng, viewport: MapViewport, canvas: Canvas) -> (f64, f64) {
    let world = world_size(viewport.zoom);
    let (px, py) = project(point);
    let (cx, cy) = project(viewport.center);

    let mut dx = (px - cx) * world;
    let dy = (py - cy) * world;
    if dx > world / 2.0 {
        dx -= world;
    } else if dx < -world / 2.0 {
        dx += world;
    }

    let x = 0.5 + dx / f64::from(canvas.width.max(1));
    let y = 0.5 + dy / f64::from(canvas.height.max(1));
    (
        x.clamp(LABEL_INSET, 1.0 - LABEL_INSET),
        y.clamp(LABEL_INSET, 1.0 - LABEL_INSET),
    )
}

/// Place one label per distinct stop name.
///
/// Names dedupe by their normalized key. When the first and last stops share
/// a key the trip is a round trip and that single label is tagged
/// [`TAG_ROUND_TRIP`].
pub fn place_labels(
    stops: &[(&str, LatLng)],
    viewport: MapViewport,
    canvas: Canvas,
) -> Vec<MapLabel> {
    let named: Vec<(String, &str, LatLng)> = stops
        .iter()
        .filter(|(name, _)| !name.trim().is_empty())
        .map(|(name, p)| (name_key(name), name.trim(), *p))
        .filter(|(key, _, _)| !key.is_empty())
        .collect();

    let (Some(first), Some(last)) = (named.first(), named.last()) else {
        return Vec::new();
    };
    let first_key = first.0.clone();
    let last_key = last.0.clone();
    let round_trip = named.len() > 1 && first_key == last_key;

    let mut seen = Vec::<String>::new();
    let mut labels = Vec::new();
    for (key, name, point) in &named {
        if seen.contains(key) {
            continue;
        }
        seen.push(key.clone());

        let tag = if round_trip && *key == first_key {
            Some(TAG_ROUND_TRIP)
        } else if *key == first_key {
            Some(TAG_START)
        } else if *key == last_key && named.len() > 1 {
            Some(TAG_END)
        } else {
            None
        };

        let (x, y) = canvas_fraction(*point, viewport, canvas);
        labels.push(MapLabel {
            name: (*name).to_string(),
            x,
            y,
            tag: tag.map(str::to_string),
        });
    }
    labels
}
