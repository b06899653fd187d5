//! Encoded polyline algorithm format (precision 1e5).

use super::geo::LatLng;

const PRECISION: f64 = 1e5;

pub fn encode(points: &[LatLng]) -> String {
    let mut out = String::new();
    let (mut prev_lat, mut prev_lng) = (0i64, 0i64);

    for p in points {
        let lat = scaled(p.lat);
        let lng = scaled(p.lng);
        encode_value(lat - prev_lat, &mut out);
        encode_value(lng - prev_lng, &mut out);
        prev_lat = lat;
        prev_lng = lng;
    }
    out
}

/// Decode an encoded polyline. Returns `None` on truncated or invalid input.
pub fn decode(encoded: &str) -> Option<Vec<LatLng>> {
    let bytes = encoded.as_bytes();
    let mut points = Vec::new();
    let (mut lat, mut lng) = (0i64, 0i64);
    let mut i = 0;

    while i < bytes.len() {
        lat += decode_value(bytes, &mut i)?;
        lng += decode_value(bytes, &mut i)?;
        points.push(LatLng::new(lat as f64 / PRECISION, lng as f64 / PRECISION));
    }
    Some(points)
}

#[allow(clippy::cast_possible_truncation)]
fn scaled(v: f64) -> i64 {
    (v * PRECISION).round() as i64
}

fn encode_value(value: i64, out: &mut String) {
    let mut v = if value < 0 { !(value << 1) } else { value << 1 };
    while v >= 0x20 {
        out.push(char::from((0x20 | (v & 0x1f)) as u8 + 63));
        v >>= 5;
    }
    out.push(char::from(v as u8 + 63));
}

fn decode_value(bytes: &[u8], i: &mut usize) -> Option<i64> {
    let mut result = 0i64;
    let mut shift = 0;
    loop {
        let b = i64::from(bytes.get(*i)?.checked_sub(63)?);
        *i += 1;
        result |= (b & 0x1f) << shift;
        shift += 5;
        if b < 0x20 {
            break;
        }
        if shift > 60 {
            return None;
        }
    }
    Some(if result & 1 == 1 { !(result >> 1) } else { result >> 1 })
}
