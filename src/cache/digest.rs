//! Content digests for render payloads and manifests.
//!
//! Every field is fed to blake3 as `tag | presence | len | bytes`, in a fixed
//! order, so reordering struct fields or adding one never silently collides
//! with an old digest.

use crate::{render::RenderPayload, utils::slug::slugify};

/// Hex chars kept from the blake3 output.
pub const DIGEST_LEN: usize = 16;

struct FieldHasher(blake3::Hasher);

impl FieldHasher {
    fn new(domain: &str) -> Self {
        let mut hasher = Self(blake3::Hasher::new());
        hasher.str(0, domain);
        hasher
    }

    fn bytes(&mut self, tag: u8, data: &[u8]) {
        self.0.update(&[tag, 1]);
        self.0.update(&(data.len() as u64).to_le_bytes());
        self.0.update(data);
    }

    fn str(&mut self, tag: u8, value: &str) {
        self.bytes(tag, value.as_bytes());
    }

    fn opt_str(&mut self, tag: u8, value: Option<&str>) {
        match value {
            Some(v) => self.str(tag, v),
            None => {
                self.0.update(&[tag, 0]);
            }
        }
    }

    fn f64(&mut self, tag: u8, value: f64) {
        self.bytes(tag, &value.to_bits().to_le_bytes());
    }

    fn finish(self) -> String {
        hex::encode(&self.0.finalize().as_bytes()[..DIGEST_LEN / 2])
    }
}

/// Digest of everything that affects a card's pixels.
pub fn content_hash(payload: &RenderPayload, template_revision: &str) -> String {
    let mut h = FieldHasher::new("sharecard/payload");
    h.str(1, template_revision);
    h.str(2, &payload.title);
    h.str(3, &payload.description);
    h.str(4, &payload.path);
    h.str(5, &payload.pill);
    h.opt_str(6, payload.blog_image_ref.as_deref());
    h.opt_str(7, payload.tint.as_deref());
    match payload.tint_intensity {
        Some(v) => h.f64(8, f64::from(v)),
        None => h.opt_str(8, None),
    }
    match &payload.map {
        Some(map) => {
            h.str(9, &map.image_url);
            h.bytes(10, &(map.labels.len() as u64).to_le_bytes());
            for label in &map.labels {
                h.str(11, &label.name);
                h.f64(12, label.x);
                h.f64(13, label.y);
                h.opt_str(14, label.tag.as_deref());
            }
        }
        None => h.opt_str(9, None),
    }
    h.finish()
}

/// `<slug(routeKey)>-<digest>.png`
pub fn file_name(route_key: &str, digest: &str) -> String {
    format!("{}-{}.png", slugify(route_key), digest)
}

/// Digest of `(routeKey, assetPath, contentHash)` tuples, order-independent.
pub fn revision<'a, I>(entries: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str, &'a str)>,
{
    let mut tuples: Vec<_> = entries.into_iter().collect();
    tuples.sort_unstable();

    let mut h = FieldHasher::new("sharecard/manifest");
    for (route_key, asset_path, hash) in tuples {
        h.str(1, route_key);
        h.str(2, asset_path);
        h.str(3, hash);
    }
    h.finish()
}

pub fn is_digest(s: &str) -> bool {
    s.len() == DIGEST_LEN && s.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{render::MapPanel, trip::MapLabel};

    fn payload() -> RenderPayload {
        RenderPayload {
            title: "Features".into(),
            description: "Plan every stop".into(),
            path: "/de/features".into(),
            pill: "Produkt".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_hash_is_deterministic() {
        let a = content_hash(&payload(), "1");
        assert_eq!(a, content_hash(&payload(), "1"));
        assert!(is_digest(&a));
    }

    #[test]
    fn test_hash_sensitive_to_every_field() {
        let base = content_hash(&payload(), "1");
        let variants = [
            RenderPayload { title: "Feature".into(), ..payload() },
            RenderPayload { description: "Plan every stop.".into(), ..payload() },
            RenderPayload { path: "/features".into(), ..payload() },
            RenderPayload { pill: String::new(), ..payload() },
            RenderPayload { blog_image_ref: Some(String::new()), ..payload() },
            RenderPayload { tint: Some("#fff".into()), ..payload() },
            RenderPayload { tint_intensity: Some(0.35), ..payload() },
            RenderPayload {
                map: Some(MapPanel { image_url: String::new(), labels: Vec::new() }),
                ..payload()
            },
        ];
        for variant in &variants {
            assert_ne!(content_hash(variant, "1"), base, "{variant:?}");
        }
        assert_ne!(content_hash(&payload(), "2"), base);
    }

    #[test]
    fn test_hash_field_boundaries() {
        let a = RenderPayload { title: "ab".into(), description: "c".into(), ..Default::default() };
        let b = RenderPayload { title: "a".into(), description: "bc".into(), ..Default::default() };
        assert_ne!(content_hash(&a, "1"), content_hash(&b, "1"));
    }

    #[test]
    fn test_hash_label_positions() {
        let with_label = |x: f64| RenderPayload {
            map: Some(MapPanel {
                image_url: "https://maps.example/a.png".into(),
                labels: vec![MapLabel { name: "Tokyo".into(), x, y: 0.5, tag: None }],
            }),
            ..payload()
        };
        assert_ne!(content_hash(&with_label(0.3), "1"), content_hash(&with_label(0.4), "1"));
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name("de-features", "0123456789abcdef"), "de-features-0123456789abcdef.png");
        assert_eq!(file_name("root", "0123456789abcdef"), "root-0123456789abcdef.png");
    }

    #[test]
    fn test_revision_stable_under_order() {
        let a = revision([("a", "/og/a.png", "1111"), ("b", "/og/b.png", "2222")]);
        let b = revision([("b", "/og/b.png", "2222"), ("a", "/og/a.png", "1111")]);
        assert_eq!(a, b);
        assert_ne!(a, revision([("a", "/og/a.png", "1111")]));
        assert_ne!(a, revision([("a", "/og/a.png", "1112"), ("b", "/og/b.png", "2222")]));
        assert!(is_digest(&a));
    }
}
