//! `sharecard render <PATH> -o FILE`

use std::{fs, path::Path};

use anyhow::{Context, Result};

use crate::{
    config::SiteConfig,
    content::ContentCatalog,
    log,
    meta::Resolver,
    render::{RenderPayload, compositor_for, render_png},
    server::AssetServer,
};

/// Split `/path?k=v` into the path and decoded query pairs.
pub fn split_query(raw: &str) -> (&str, Vec<(String, String)>) {
    let (path, query) = raw.split_once('?').unwrap_or((raw, ""));
    let pairs = url::form_urlencoded::parse(query.as_bytes()).into_owned().collect();
    (path, pairs)
}

pub fn render_route(config: &SiteConfig, raw_path: &str, output: &Path) -> Result<()> {
    let catalog = ContentCatalog::load(&config.site.content)?;
    let (path, query) = split_query(raw_path);
    let meta = Resolver::new(config, &catalog).resolve(path, &query);
    let payload = RenderPayload::from_metadata(&meta);

    // The on-demand compositor reads fonts and images from the local assets.
    let server = AssetServer::start(&config.build.assets_root)?;
    let png = {
        let compositor = compositor_for(config, &server.origin())?;
        render_png(compositor.as_ref(), &payload)
            .with_context(|| format!("failed to render `{}`", meta.route_key))?
    };
    server.shutdown();

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(output, png).with_context(|| format!("failed to write `{}`", output.display()))?;
    log!("render"; "{} -> {}", meta.route_key, output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_query() {
        let (path, pairs) = split_query("/de/blog/x?share=a%20b&utm=1");
        assert_eq!(path, "/de/blog/x");
        assert_eq!(pairs, [("share".into(), "a b".into()), ("utm".into(), "1".into())]);

        let (path, pairs) = split_query("/");
        assert_eq!(path, "/");
        assert!(pairs.is_empty());
    }
}
