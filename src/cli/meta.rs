//! `sharecard meta <PATH>`

use anyhow::Result;

use super::render::split_query;
use crate::{config::SiteConfig, content::ContentCatalog, meta::Resolver};

/// Print canonical metadata as pretty JSON on stdout.
pub fn print_meta(config: &SiteConfig, raw_path: &str) -> Result<()> {
    let catalog = ContentCatalog::load(&config.site.content)?;
    let (path, query) = split_query(raw_path);
    let meta = Resolver::new(config, &catalog).resolve(path, &query);
    println!("{}", serde_json::to_string_pretty(&meta)?);
    Ok(())
}
