//! Shared helpers: dates, escaping, formatting, MIME types and slugs.

pub mod date;
pub mod escape;
pub mod fmt;
pub mod mime;
pub mod slug;
