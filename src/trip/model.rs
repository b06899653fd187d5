//! Itinerary snapshot as returned by the trip read API.

use serde::{Deserialize, Serialize};

use super::geo::LatLng;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Itinerary {
    pub title: String,
    /// ISO `YYYY-MM-DD`.
    pub start_date: Option<String>,
    pub items: Vec<TimelineItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TimelineItem {
    Stop(Stop),
    Travel(Travel),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Stop {
    pub name: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    /// Days from trip start.
    pub start_offset: Option<f64>,
    /// Length of stay in days.
    pub duration: Option<f64>,
    pub color: Option<String>,
}

impl Stop {
    pub fn position(&self) -> Option<LatLng> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => {
                Some(LatLng::new(lat, lng))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Travel {
    pub mode: Option<TransportMode>,
    /// Distance declared by the routing that produced this segment.
    pub route_distance_km: Option<f64>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Flight,
    Drive,
    Train,
    Bus,
    Ferry,
    Walk,
    Bike,
    #[serde(other)]
    Other,
}

impl TransportMode {
    /// Directions API travel mode, `None` when the mode cannot be routed.
    pub const fn directions_mode(self) -> Option<&'static str> {
        match self {
            Self::Flight | Self::Ferry => None,
            Self::Drive | Self::Other => Some("driving"),
            Self::Train | Self::Bus => Some("transit"),
            Self::Walk => Some("walking"),
            Self::Bike => Some("bicycling"),
        }
    }
}

/// Two consecutive located stops and the travel segment between them.
#[derive(Debug, Clone, PartialEq)]
pub struct Leg<'a> {
    pub from: &'a Stop,
    pub to: &'a Stop,
    pub travel: Option<&'a Travel>,
}

impl Leg<'_> {
    pub fn mode(&self) -> Option<TransportMode> {
        self.travel.and_then(|t| t.mode)
    }
}

impl Itinerary {
    pub fn stops(&self) -> impl Iterator<Item = &Stop> {
        self.items.iter().filter_map(|item| match item {
            TimelineItem::Stop(stop) => Some(stop),
            TimelineItem::Travel(_) => None,
        })
    }

    /// Stops that carry coordinates, in timeline order.
    pub fn located_stops(&self) -> Vec<&Stop> {
        self.stops().filter(|s| s.position().is_some()).collect()
    }

    /// Legs between consecutive located stops, in timeline order.
    ///
    /// A travel item applies to the leg ending at the next located stop.
    pub fn legs(&self) -> Vec<Leg<'_>> {
        let mut legs = Vec::new();
        let mut prev: Option<&Stop> = None;
        let mut travel: Option<&Travel> = None;

        for item in &self.items {
            match item {
                TimelineItem::Travel(t) => travel = Some(t),
                TimelineItem::Stop(stop) if stop.position().is_some() => {
                    if let Some(from) = prev {
                        legs.push(Leg { from, to: stop, travel: travel.take() });
                    }
                    travel = None;
                    prev = Some(stop);
                }
                TimelineItem::Stop(_) => {}
            }
        }
        legs
    }
}
