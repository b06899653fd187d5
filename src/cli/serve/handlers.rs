//! Request routing for the on-demand server.
//!
//! | Route        | Reply                                      |
//! |--------------|--------------------------------------------|
//! | `/og`        | PNG from payload query pairs               |
//! | `/og/route`  | PNG for `?path=` via the resolver          |
//! | `/og/trip`   | PNG for `?share=` or `?trip=[&version=]`   |
//! | `/meta`      | `CanonicalMetadata` JSON for `?path=`      |
//! | other        | file under the assets root, else 404       |

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::{
    config::SiteConfig,
    content::ContentCatalog,
    debug,
    meta::Resolver,
    render::{Compositor, RenderPayload, render_png},
    server::resolve_path,
    trip::{DirectionsClient, MapContext, PreferenceStore, TripStore, summarize},
};

pub const CACHE_IMMUTABLE: &str = "public, max-age=31536000, immutable";
pub const CACHE_UPDATED: &str = "public, max-age=3600";
pub const CACHE_DEFAULT: &str = "public, max-age=300";

/// What a request resolves to, before any HTTP I/O.
#[derive(Debug)]
pub enum Reply {
    Png {
        body: Vec<u8>,
        cache_control: &'static str,
    },
    Json(String),
    File(PathBuf),
    NotFound,
}

/// Everything a request handler needs, shared across worker threads.
pub struct ServeContext {
    pub config: SiteConfig,
    pub catalog: ContentCatalog,
    pub compositor: Box<dyn Compositor>,
    pub trips: Box<dyn TripStore>,
    pub prefs: Box<dyn PreferenceStore>,
    pub directions: Option<Box<dyn DirectionsClient>>,
    pub api_key: Option<String>,
}

impl ServeContext {
    pub fn reply(&self, url: &str) -> Result<Reply> {
        let (path, query) = url.split_once('?').unwrap_or((url, ""));
        let pairs: Vec<(String, String)> = url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();

        match path.trim_end_matches('/') {
            "/og" => self.png(&RenderPayload::from_query(&pairs), &pairs),
            "/og/route" => {
                let meta = self.resolver().resolve(param(&pairs, "path").unwrap_or("/"), &pairs);
                self.png(&RenderPayload::from_metadata(&meta), &pairs)
            }
            "/og/trip" => self.png(&self.trip_payload(&pairs), &pairs),
            "/meta" => {
                let meta = self.resolver().resolve(param(&pairs, "path").unwrap_or("/"), &pairs);
                Ok(Reply::Json(serde_json::to_string_pretty(&meta)?))
            }
            _ => Ok(resolve_path(url, &self.config.build.assets_root)
                .map_or(Reply::NotFound, Reply::File)),
        }
    }

    fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.config, &self.catalog)
    }

    fn png(&self, payload: &RenderPayload, pairs: &[(String, String)]) -> Result<Reply> {
        let body = render_png(self.compositor.as_ref(), payload)
            .with_context(|| format!("failed to render card for `{}`", payload.path))?;
        Ok(Reply::Png {
            body,
            cache_control: cache_control(pairs),
        })
    }

    /// Trip card payload. Lookup failures give the generic shared-trip card.
    pub fn trip_payload(&self, pairs: &[(String, String)]) -> RenderPayload {
        let site = &self.config.site;
        let locale = param(pairs, "locale").unwrap_or(&site.default_locale);
        let labels = self.catalog.labels(locale, &site.default_locale);

        let share = param(pairs, "share");
        let trip_id = param(pairs, "trip");
        let (path, snapshot) = match (share, trip_id) {
            (Some(token), _) => (format!("/share/{token}"), self.trips.by_share_token(token)),
            (None, Some(id)) => (
                format!("/trip/{id}"),
                self.trips.by_trip_id(id, param(pairs, "version")),
            ),
            (None, None) => ("/".to_string(), Err(crate::trip::LookupError::NotFound)),
        };

        match snapshot {
            Ok(itinerary) => {
                let prefs = self.prefs.preferences(trip_id.or(share).unwrap_or_default());
                let ctx = MapContext {
                    maps: &self.config.maps,
                    api_key: self.api_key.as_deref(),
                    directions: self.directions.as_deref(),
                };
                let summary = summarize(&itinerary, &prefs, &ctx);
                RenderPayload::from_trip(&summary, &path, &labels.shared_trip, &labels.shared_trip)
            }
            Err(err) => {
                debug!("serve"; "trip lookup failed for {}: {}", path, err);
                RenderPayload {
                    title: labels.shared_trip.clone(),
                    description: site.default_description.clone(),
                    path,
                    pill: site.name.clone(),
                    ..RenderPayload::default()
                }
            }
        }
    }
}

fn param<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, v)| k == key && !v.is_empty())
        .map(|(_, v)| v.as_str())
}

/// `version` → immutable, `updated` → one hour, otherwise five minutes.
pub fn cache_control(pairs: &[(String, String)]) -> &'static str {
    if param(pairs, "version").is_some() {
        CACHE_IMMUTABLE
    } else if param(pairs, "updated").is_some() {
        CACHE_UPDATED
    } else {
        CACHE_DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::test_parse_config,
        content::test_catalog,
        render::RenderError,
        trip::{Itinerary, JsonPreferenceStore, LookupError, NoTripStore, Stop, TimelineItem},
    };
    use image::{Rgba, RgbaImage};
    use parking_lot::Mutex;
    use std::{fs, sync::Arc};
    use tempfile::TempDir;

    /// Records the last payload it was asked to render.
    #[derive(Default)]
    struct Recording(Arc<Mutex<Option<RenderPayload>>>);

    impl Compositor for Recording {
        fn render(&self, payload: &RenderPayload) -> Result<RgbaImage, RenderError> {
            *self.0.lock() = Some(payload.clone());
            if payload.title == "boom" {
                return Err(RenderError::Pixmap(0, 0));
            }
            Ok(RgbaImage::from_pixel(1, 1, Rgba([255, 255, 255, 255])))
        }
    }

    struct OneTrip;

    impl TripStore for OneTrip {
        fn by_share_token(&self, token: &str) -> Result<Itinerary, LookupError> {
            if token != "abc" {
                return Err(LookupError::NotFound);
            }
            Ok(Itinerary {
                title: "Kansai loop".into(),
                start_date: Some("2025-04-28".into()),
                items: vec![TimelineItem::Stop(Stop {
                    name: "Kyoto".into(),
                    lat: Some(35.01),
                    lng: Some(135.77),
                    start_offset: Some(0.0),
                    duration: Some(2.0),
                    color: None,
                })],
            })
        }

        fn by_trip_id(&self, _: &str, _: Option<&str>) -> Result<Itinerary, LookupError> {
            Err(LookupError::Status(500))
        }
    }

    fn context(trips: Box<dyn TripStore>) -> (ServeContext, Arc<Mutex<Option<RenderPayload>>>) {
        let recording = Recording::default();
        let seen = Arc::clone(&recording.0);
        let config = test_parse_config(
            "[site]\nname = \"Wayfarer\"\nurl = \"https://wayfarer.example\"\nlocales = [\"en\", \"de\"]",
        );
        let ctx = ServeContext {
            config,
            catalog: test_catalog(),
            compositor: Box::new(recording),
            trips,
            prefs: Box::new(JsonPreferenceStore::default()),
            directions: None,
            api_key: None,
        };
        (ctx, seen)
    }

    fn pairs(query: &str) -> Vec<(String, String)> {
        url::form_urlencoded::parse(query.as_bytes()).into_owned().collect()
    }

    #[test]
    fn test_cache_control() {
        assert_eq!(cache_control(&pairs("version=3&updated=1")), CACHE_IMMUTABLE);
        assert_eq!(cache_control(&pairs("updated=1700000000")), CACHE_UPDATED);
        assert_eq!(cache_control(&pairs("title=x&version=")), CACHE_DEFAULT);
    }

    #[test]
    fn test_route_render() {
        let (ctx, seen) = context(Box::new(NoTripStore));
        let reply = ctx.reply("/og/route?path=%2Fde%2Ffeatures&version=2").unwrap();
        match reply {
            Reply::Png { body, cache_control } => {
                assert_eq!(&body[1..4], b"PNG");
                assert_eq!(cache_control, CACHE_IMMUTABLE);
            }
            other => panic!("unexpected {other:?}"),
        }
        let payload = seen.lock().clone().unwrap();
        assert_eq!(payload.title, "Funktionen");
        assert_eq!(payload.path, "/de/features");
    }

    #[test]
    fn test_payload_render() {
        let (ctx, seen) = context(Box::new(NoTripStore));
        let query = RenderPayload {
            title: "Hello & welcome".into(),
            path: "/x".into(),
            ..Default::default()
        }
        .to_query();
        let url = format!("/og?{}", url::form_urlencoded::Serializer::new(String::new()).extend_pairs(&query).finish());
        assert!(matches!(ctx.reply(&url).unwrap(), Reply::Png { cache_control: CACHE_DEFAULT, .. }));
        assert_eq!(seen.lock().as_ref().unwrap().title, "Hello & welcome");
    }

    #[test]
    fn test_render_failure_is_error() {
        let (ctx, _) = context(Box::new(NoTripStore));
        let err = ctx.reply("/og?title=boom&path=/boom").unwrap_err();
        assert!(format!("{err:#}").contains("/boom"));
    }

    #[test]
    fn test_meta_json() {
        let (ctx, _) = context(Box::new(NoTripStore));
        let Reply::Json(json) = ctx.reply("/meta?path=/de/features").unwrap() else {
            panic!("expected json");
        };
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["routeKey"], "de-features");
        assert_eq!(value["htmlLang"], "de");
    }

    #[test]
    fn test_trip_payloads() {
        let (ctx, _) = context(Box::new(OneTrip));

        let payload = ctx.trip_payload(&pairs("share=abc"));
        assert_eq!(payload.title, "Kansai loop");
        assert_eq!(payload.path, "/share/abc");
        assert!(payload.description.starts_with("2 days"));
        assert!(payload.map.is_none());

        let fallback = ctx.trip_payload(&pairs("trip=42&version=7&locale=de"));
        assert_eq!(fallback.title, "Geteilte Reise");
        assert_eq!(fallback.path, "/trip/42");

        let missing = ctx.trip_payload(&pairs(""));
        assert_eq!(missing.title, "Shared Trip");
    }

    #[test]
    fn test_static_fallback_and_not_found() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("fonts")).unwrap();
        fs::write(dir.path().join("fonts/Inter.ttf"), b"font").unwrap();

        let (mut ctx, _) = context(Box::new(NoTripStore));
        ctx.config.build.assets_root = dir.path().to_path_buf();
        assert!(matches!(ctx.reply("/fonts/Inter.ttf").unwrap(), Reply::File(_)));
        assert!(matches!(ctx.reply("/nope").unwrap(), Reply::NotFound));
    }
}
