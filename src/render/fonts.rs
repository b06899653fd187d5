//! Font databases memoized per source.
//!
//! Keyed by origin (on-demand) or assets root (vector). Two threads racing on
//! the same key both build a database and the last insert wins; the result is
//! identical either way, so no lock is held while loading.

use std::sync::{Arc, LazyLock};

use dashmap::DashMap;
use usvg::fontdb::Database;

use crate::debug;

/// Process-wide font memo shared by every compositor.
pub static FONTS: LazyLock<FontCache> = LazyLock::new(FontCache::new);

#[derive(Default)]
pub struct FontCache {
    dbs: DashMap<String, Arc<Database>>,
}

impl FontCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Database for `key`, built from `load()` on first use.
    pub fn get_or_load<F>(&self, key: &str, load: F) -> Arc<Database>
    where
        F: FnOnce() -> Vec<Vec<u8>>,
    {
        if let Some(db) = self.dbs.get(key) {
            return Arc::clone(db.value());
        }
        let db = Arc::new(build_database(load()));
        debug!("fonts"; "loaded {} face(s) for {}", db.len(), key);
        self.dbs.insert(key.to_string(), Arc::clone(&db));
        db
    }

    /// Number of memoized sources.
    #[cfg(test)]
    fn len(&self) -> usize {
        self.dbs.len()
    }
}

/// The first loaded family becomes `sans-serif`, which the card template
/// uses. With no usable font data the system fonts are used instead.
fn build_database(sources: Vec<Vec<u8>>) -> Database {
    let mut db = Database::new();
    for data in sources {
        db.load_font_data(data);
    }

    if db.is_empty() {
        db.load_system_fonts();
        return db;
    }

    let family = db
        .faces()
        .next()
        .and_then(|face| face.families.first().map(|(name, _)| name.clone()));
    if let Some(family) = family {
        db.set_sans_serif_family(family);
    }
    db
}
