//! Content-addressed card cache.
//!
//! A card's file name embeds the digest of its payload, so a hit is simply
//! "the exact file exists". The manifest maps route keys to those files and
//! carries a revision digest over its entry set.

mod digest;
mod manifest;
mod reconcile;

pub use digest::{content_hash, file_name, revision};
pub use manifest::{ManifestEntry, ManifestError, ManifestFile};
pub use reconcile::{merge, replace};
