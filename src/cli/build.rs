//! `sharecard build`

use anyhow::Result;

use super::BuildArgs;
use crate::{
    batch::{self, TargetFilter},
    config::SiteConfig,
    content::ContentCatalog,
    log,
    render::compositor_for,
};

impl BuildArgs {
    pub fn filter(&self) -> TargetFilter {
        TargetFilter::new(
            self.locales.clone(),
            self.include_paths.clone(),
            self.include_prefixes.clone(),
            self.exclude_paths.clone(),
            self.exclude_prefixes.clone(),
        )
    }
}

pub fn build_cards(config: &SiteConfig, args: &BuildArgs) -> Result<()> {
    let catalog = ContentCatalog::load(&config.site.content)?;
    let filter = args.filter();
    if !filter.is_empty() {
        log!("build"; "filtered build, merging into existing manifest");
    }

    let report = batch::run(config, &catalog, &filter, |origin| compositor_for(config, origin))?;
    log!(
        "build";
        "targets: {}, wrote: {}, reused: {}, removed: {}",
        report.targets, report.wrote, report.reused, report.removed
    );
    Ok(())
}
