//! Static map image URLs.

use url::Url;

use super::{
    geo::LatLng,
    prefs::MapStyle,
    viewport::MapViewport,
};
use crate::config::MapsConfig;

/// A drawn leg: encoded path and its `#rrggbb` color.
#[derive(Debug, Clone, PartialEq)]
pub struct PathSpec {
    pub encoded: String,
    pub color: String,
}

const DARK_STYLE: [&str; 3] = [
    "element:geometry|color:0x1f2937",
    "element:labels.text.fill|color:0x9ca3af",
    "feature:water|color:0x0f172a",
];

const LIGHT_STYLE: [&str; 2] = [
    "feature:poi|visibility:off",
    "feature:transit|visibility:simplified",
];

/// Build the static map URL for a fitted viewport and its legs.
///
/// Returns `None` when the configured endpoint is not a valid URL.
pub fn static_map_url(
    maps: &MapsConfig,
    api_key: &str,
    viewport: MapViewport,
    style: MapStyle,
    paths: &[PathSpec],
) -> Option<String> {
    let mut params: Vec<(String, String)> = vec![
        ("center".into(), format_point(viewport.center)),
        ("zoom".into(), viewport.zoom.to_string()),
        ("size".into(), format!("{}x{}", maps.width, maps.height)),
        ("scale".into(), "2".into()),
    ];

    let maptype = match style {
        MapStyle::Light | MapStyle::Dark => "roadmap",
        MapStyle::Satellite => "hybrid",
        MapStyle::Terrain => "terrain",
    };
    params.push(("maptype".into(), maptype.into()));

    let styles: &[&str] = match style {
        MapStyle::Light => &LIGHT_STYLE,
        MapStyle::Dark => &DARK_STYLE,
        MapStyle::Satellite | MapStyle::Terrain => &[],
    };
    params.extend(styles.iter().map(|s| ("style".to_string(), (*s).to_string())));

    params.extend(paths.iter().map(|p| {
        (
            "path".to_string(),
            format!(
                "color:{}ff|weight:4|enc:{}",
                super::colors::to_map_color(&p.color),
                p.encoded
            ),
        )
    }));
    params.push(("key".into(), api_key.to_string()));

    Url::parse_with_params(&maps.static_map_endpoint, &params)
        .ok()
        .map(String::from)
}

fn format_point(p: LatLng) -> String {
    format!("{:.6},{:.6}", p.lat, p.lng)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_contains_viewport_and_paths() {
        let maps = MapsConfig::default();
        let viewport = MapViewport {
            center: LatLng::new(35.0, 137.5),
            zoom: 7,
        };
        let paths = [PathSpec {
            encoded: "_p~iF~ps|U".into(),
            color: "#ff0000".into(),
        }];
        let url = static_map_url(&maps, "KEY", viewport, MapStyle::Dark, &paths).unwrap();
        let parsed = Url::parse(&url).unwrap();
        let pairs: Vec<(String, String)> = parsed.query_pairs().into_owned().collect();

        assert!(pairs.contains(&("zoom".into(), "7".into())));
        assert!(pairs.contains(&("size".into(), "560x630".into())));
        assert!(pairs.contains(&("center".into(), "35.000000,137.500000".into())));
        assert!(pairs.contains(&("path".into(), "color:0xff0000ff|weight:4|enc:_p~iF~ps|U".into())));
        assert!(pairs.contains(&("key".into(), "KEY".into())));
        assert_eq!(pairs.iter().filter(|(k, _)| k == "style").count(), 3);
    }

    #[test]
    fn test_invalid_endpoint() {
        let maps = MapsConfig {
            static_map_endpoint: "not a url".into(),
            ..MapsConfig::default()
        };
        assert!(static_map_url(&maps, "K", MapViewport::WORLD, MapStyle::Light, &[]).is_none());
    }
}
