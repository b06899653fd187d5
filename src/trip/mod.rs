//! Trip summary and viewport engine.
//!
//! Turns an itinerary snapshot plus view preferences into a [`TripSummary`]:
//! duration and month labels, total distance, a fitted static map URL and
//! label positions. Everything except realistic-mode route lookups is pure.

mod colors;
mod directions;
mod error;
mod geo;
mod model;
mod polyline;
mod prefs;
mod staticmap;
mod store;
mod summary;
mod viewport;

pub use directions::{DirectionsClient, HttpDirections};
pub use error::LookupError;
pub use model::{Itinerary, Stop, TimelineItem};
pub use prefs::{JsonPreferenceStore, PreferenceStore};
pub use store::{HttpTripStore, NoTripStore, TripStore};
pub use summary::{MapContext, TripSummary, summarize};
pub use viewport::MapLabel;
