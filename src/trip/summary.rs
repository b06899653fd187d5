//! `summarize(itinerary, preferences) → TripSummary`.

use serde::Serialize;

use super::{
    DirectionsClient, Itinerary,
    colors::leg_color,
    geo::{LatLng, haversine_km},
    polyline,
    prefs::{RouteMode, ViewPreferences},
    staticmap::{PathSpec, static_map_url},
    viewport::{Canvas, MapLabel, fit, place_labels},
};
use crate::{
    config::MapsConfig,
    debug,
    utils::{
        date::DateTimeUtc,
        fmt::{plural_count, thousands},
    },
};

/// Upper bound on routed lookups per summary.
pub const MAX_ROUTE_LOOKUPS: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripSummary {
    pub title: String,
    pub duration_label: String,
    pub months_label: String,
    pub distance_label: Option<String>,
    pub map_image_url: Option<String>,
    pub map_labels: Vec<MapLabel>,
}

/// Map collaborators for one summary.
pub struct MapContext<'a> {
    pub maps: &'a MapsConfig,
    /// Without a key there is no map and no lookups.
    pub api_key: Option<&'a str>,
    pub directions: Option<&'a dyn DirectionsClient>,
}

pub fn summarize(trip: &Itinerary, prefs: &ViewPreferences, ctx: &MapContext<'_>) -> TripSummary {
    let days = duration_days(trip);

    let months_label = trip
        .start_date
        .as_deref()
        .and_then(DateTimeUtc::parse)
        .map(|start| months_label(start, days))
        .unwrap_or_default();

    let (map_image_url, map_labels) = match ctx.api_key {
        Some(key) => map_panel(trip, prefs, ctx, key),
        None => (None, Vec::new()),
    };

    TripSummary {
        title: trip.title.trim().to_string(),
        duration_label: plural_count(days as usize, "day"),
        months_label,
        distance_label: distance_km(trip).map(|km| format!("{} km", thousands(km))),
        map_image_url,
        map_labels,
    }
}

/// `ceil(maxEnd − minStart)` over stops with a valid start offset, at least 1.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn duration_days(trip: &Itinerary) -> u32 {
    let mut stops: Vec<(f64, f64)> = trip
        .stops()
        .filter_map(|s| {
            let start = s.start_offset.filter(|v| v.is_finite())?;
            let duration = s.duration.filter(|v| v.is_finite() && *v >= 0.0).unwrap_or(0.0);
            Some((start, start + duration))
        })
        .collect();
    stops.sort_by(|a, b| a.0.total_cmp(&b.0));

    let Some(min_start) = stops.first().map(|s| s.0) else {
        return 1;
    };
    let max_end = stops.iter().map(|s| s.1).fold(f64::NEG_INFINITY, f64::max);
    let span = (max_end - min_start).ceil();
    if span.is_finite() && span >= 1.0 {
        span.min(f64::from(u32::MAX)) as u32
    } else {
        1
    }
}

/// `"Apr 2025"`, `"Apr – May 2025"` or `"Dec 2025 – Jan 2026"`.
pub fn months_label(start: DateTimeUtc, days: u32) -> String {
    let end = start.add_days(i64::from(days.saturating_sub(1)));
    if (start.year, start.month) == (end.year, end.month) {
        format!("{} {}", start.month_abbr(), start.year)
    } else if start.year == end.year {
        format!("{} – {} {}", start.month_abbr(), end.month_abbr(), end.year)
    } else {
        format!(
            "{} {} – {} {}",
            start.month_abbr(),
            start.year,
            end.month_abbr(),
            end.year
        )
    }
}

/// Total distance in whole kilometres; `None` with fewer than two located stops.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn distance_km(trip: &Itinerary) -> Option<u64> {
    let legs = trip.legs();
    if legs.is_empty() {
        return None;
    }

    let total: f64 = legs
        .iter()
        .map(|leg| {
            let (a, b) = (leg.from.position(), leg.to.position());
            let great_circle = a.zip(b).map_or(0.0, |(a, b)| haversine_km(a, b));
            // Declared distances win; flights and undeclared legs use the great circle.
            match leg.travel.and_then(|t| t.route_distance_km) {
                Some(declared) if declared.is_finite() && declared >= 0.0 => declared,
                _ => great_circle,
            }
        })
        .sum();
    Some(total.round().max(0.0) as u64)
}

fn map_panel(
    trip: &Itinerary,
    prefs: &ViewPreferences,
    ctx: &MapContext<'_>,
    api_key: &str,
) -> (Option<String>, Vec<MapLabel>) {
    let stops = trip.located_stops();
    let points: Vec<LatLng> = stops.iter().filter_map(|s| s.position()).collect();
    let canvas = Canvas {
        width: ctx.maps.width,
        height: ctx.maps.height,
        padding: ctx.maps.padding,
    };
    let viewport = fit(&points, canvas);

    let paths = leg_paths(trip, prefs, ctx.directions);
    let url = static_map_url(ctx.maps, api_key, viewport, prefs.map_style, &paths);

    let labels = if prefs.show_labels {
        let named: Vec<(&str, LatLng)> = stops
            .iter()
            .filter_map(|s| Some((s.name.as_str(), s.position()?)))
            .collect();
        place_labels(&named, viewport, canvas)
    } else {
        Vec::new()
    };

    (url, labels)
}

/// One encoded path per leg.
///
/// Realistic mode tries one lookup per routable leg until the cap is hit;
/// failures and legs past the cap are drawn straight.
pub fn leg_paths(
    trip: &Itinerary,
    prefs: &ViewPreferences,
    directions: Option<&dyn DirectionsClient>,
) -> Vec<PathSpec> {
    let mut lookups = 0usize;

    trip.legs()
        .iter()
        .filter_map(|leg| {
            let (from, to) = (leg.from.position()?, leg.to.position()?);
            let authored = leg
                .travel
                .and_then(|t| t.color.as_deref())
                .or(leg.from.color.as_deref());
            let color = leg_color(prefs.color_mode, authored);

            let routed = match (prefs.route_mode, directions) {
                (RouteMode::Realistic, Some(client)) if lookups < MAX_ROUTE_LOOKUPS => {
                    let mode = leg.mode().map_or(Some("driving"), |m| m.directions_mode());
                    mode.and_then(|mode| {
                        lookups += 1;
                        match client.route(from, to, mode) {
                            Ok(encoded) => Some(encoded),
                            Err(e) => {
                                debug!("trip"; "route lookup {} → {} failed: {}", leg.from.name, leg.to.name, e);
                                None
                            }
                        }
                    })
                }
                _ => None,
            };

            Some(PathSpec {
                encoded: routed.unwrap_or_else(|| polyline::encode(&[from, to])),
                color,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trip::{
        LookupError, Stop, TimelineItem,
        model::{TransportMode, Travel},
        prefs::ColorMode,
        viewport::TAG_ROUND_TRIP,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingDirections {
        calls: AtomicUsize,
        fail: bool,
    }

    impl DirectionsClient for CountingDirections {
        fn route(&self, _: LatLng, _: LatLng, _: &str) -> Result<String, LookupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(LookupError::NoRoute)
            } else {
                Ok("routed".into())
            }
        }
    }

    fn stop(name: &str, lat: f64, lng: f64, offset: f64, duration: f64) -> TimelineItem {
        TimelineItem::Stop(Stop {
            name: name.into(),
            lat: Some(lat),
            lng: Some(lng),
            start_offset: Some(offset),
            duration: Some(duration),
            color: None,
        })
    }

    fn travel(mode: TransportMode, km: Option<f64>) -> TimelineItem {
        TimelineItem::Travel(Travel {
            mode: Some(mode),
            route_distance_km: km,
            color: Some("sunset".into()),
        })
    }

    fn tokyo_osaka() -> Itinerary {
        Itinerary {
            title: "Japan ".into(),
            start_date: Some("2025-04-28".into()),
            items: vec![
                stop("Tokyo", 35.68, 139.65, 0.0, 0.0),
                stop("Osaka", 34.69, 135.50, 0.0, 0.0),
            ],
        }
    }

    #[test]
    fn test_tokyo_osaka_summary() {
        let maps = MapsConfig::default();
        let ctx = MapContext { maps: &maps, api_key: None, directions: None };
        let summary = summarize(&tokyo_osaka(), &ViewPreferences::default(), &ctx);

        let expected = haversine_km(LatLng::new(35.68, 139.65), LatLng::new(34.69, 135.50));
        assert_eq!(
            summary.distance_label,
            Some(format!("{} km", thousands(expected.round() as u64)))
        );
        assert_eq!(summary.duration_label, "1 day");
        assert_eq!(summary.months_label, "Apr 2025");
        assert_eq!(summary.title, "Japan");
        assert!(summary.map_image_url.is_none());
        assert!(summary.map_labels.is_empty());
    }

    #[test]
    fn test_duration() {
        let mut trip = tokyo_osaka();
        assert_eq!(duration_days(&trip), 1);
        trip.items = vec![
            stop("A", 0.0, 0.0, 0.0, 2.0),
            stop("B", 1.0, 1.0, 2.0, 1.5),
        ];
        assert_eq!(duration_days(&trip), 4);
        trip.items.clear();
        assert_eq!(duration_days(&trip), 1);
    }

    #[test]
    fn test_months_label() {
        let start = DateTimeUtc::from_ymd(2025, 4, 28);
        assert_eq!(months_label(start, 1), "Apr 2025");
        assert_eq!(months_label(start, 5), "Apr – May 2025");
        let start = DateTimeUtc::from_ymd(2025, 12, 30);
        assert_eq!(months_label(start, 4), "Dec 2025 – Jan 2026");
    }

    #[test]
    fn test_invalid_start_date_gives_empty_months() {
        let mut trip = tokyo_osaka();
        trip.start_date = Some("someday".into());
        let maps = MapsConfig::default();
        let ctx = MapContext { maps: &maps, api_key: None, directions: None };
        assert_eq!(summarize(&trip, &ViewPreferences::default(), &ctx).months_label, "");
    }

    #[test]
    fn test_distance_sources() {
        let trip = Itinerary {
            items: vec![
                stop("Tokyo", 35.68, 139.65, 0.0, 1.0),
                travel(TransportMode::Train, Some(500.0)),
                stop("Osaka", 34.69, 135.50, 1.0, 1.0),
                travel(TransportMode::Flight, None),
                stop("Tokyo", 35.68, 139.65, 2.0, 1.0),
            ],
            ..Default::default()
        };
        let flight = haversine_km(LatLng::new(34.69, 135.50), LatLng::new(35.68, 139.65));
        assert_eq!(distance_km(&trip), Some((500.0 + flight).round() as u64));

        let single = Itinerary {
            items: vec![stop("Tokyo", 35.68, 139.65, 0.0, 1.0)],
            ..Default::default()
        };
        assert_eq!(distance_km(&single), None);
    }

    #[test]
    fn test_realistic_lookups_capped() {
        let items: Vec<TimelineItem> = (0..13)
            .map(|i| stop(&format!("S{i}"), 40.0 + f64::from(i) * 0.1, 10.0, f64::from(i), 1.0))
            .collect();
        let trip = Itinerary { items, ..Default::default() };
        assert_eq!(trip.legs().len(), 12);

        let client = CountingDirections { calls: AtomicUsize::new(0), fail: false };
        let prefs = ViewPreferences { route_mode: RouteMode::Realistic, ..Default::default() };
        let paths = leg_paths(&trip, &prefs, Some(&client));

        assert_eq!(client.calls.load(Ordering::SeqCst), MAX_ROUTE_LOOKUPS);
        assert_eq!(paths.len(), 12);
        assert_eq!(paths.iter().filter(|p| p.encoded == "routed").count(), MAX_ROUTE_LOOKUPS);
    }

    #[test]
    fn test_failed_lookup_falls_back_to_straight_leg() {
        let client = CountingDirections { calls: AtomicUsize::new(0), fail: true };
        let prefs = ViewPreferences { route_mode: RouteMode::Realistic, ..Default::default() };
        let paths = leg_paths(&tokyo_osaka(), &prefs, Some(&client));
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            paths[0].encoded,
            polyline::encode(&[LatLng::new(35.68, 139.65), LatLng::new(34.69, 135.50)])
        );
    }

    #[test]
    fn test_simple_mode_and_flights_never_look_up() {
        let client = CountingDirections { calls: AtomicUsize::new(0), fail: false };
        let trip = Itinerary {
            items: vec![
                stop("A", 0.0, 0.0, 0.0, 1.0),
                travel(TransportMode::Flight, None),
                stop("B", 1.0, 1.0, 1.0, 1.0),
            ],
            ..Default::default()
        };
        leg_paths(&trip, &ViewPreferences::default(), Some(&client));
        let realistic = ViewPreferences { route_mode: RouteMode::Realistic, ..Default::default() };
        leg_paths(&trip, &realistic, Some(&client));
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_trip_colors_and_round_trip_labels() {
        let trip = Itinerary {
            title: "Loop".into(),
            items: vec![
                stop("Tokyo", 35.68, 139.65, 0.0, 1.0),
                travel(TransportMode::Train, None),
                stop("Osaka", 34.69, 135.50, 1.0, 1.0),
                stop("Tokyo", 35.68, 139.65, 2.0, 1.0),
            ],
            ..Default::default()
        };
        let maps = MapsConfig::default();
        let ctx = MapContext { maps: &maps, api_key: Some("KEY"), directions: None };
        let prefs = ViewPreferences { color_mode: ColorMode::Trip, ..Default::default() };
        let summary = summarize(&trip, &prefs, &ctx);

        let url = summary.map_image_url.unwrap();
        assert!(url.contains("key=KEY"));
        assert!(url.contains("0xf97316ff"));
        assert_eq!(summary.map_labels.len(), 2);
        assert_eq!(summary.map_labels[0].tag.as_deref(), Some(TAG_ROUND_TRIP));
    }
}
