//! Batch build: pre-render every share card and reconcile the manifest.
//!
//! ```text
//! Enumerating ─► Diffing ─► Rendering ─► Reconciling ─► Done
//!   catalog ×      digest     worker pool   merge (filtered)
//!   locales        vs files   + asset srv   replace (full)
//! ```

mod filters;
mod phase;
mod plan;
mod pool;
mod targets;

pub use filters::TargetFilter;
pub use phase::Phase;
pub use plan::{diff, fingerprint};
pub use targets::{Target, enumerate};

use std::fs;

use anyhow::{Context, Result};

use crate::{
    cache::{self, ManifestFile},
    config::SiteConfig,
    content::ContentCatalog,
    core, debug, log,
    render::Compositor,
    server::AssetServer,
};

/// Counts reported at the end of a build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub targets: usize,
    pub wrote: usize,
    pub reused: usize,
    pub removed: usize,
}

/// Tracks the current phase and logs transitions.
struct Progress(Phase);

impl Progress {
    fn advance(&mut self) {
        if self.0.is_terminal() {
            return;
        }
        self.0 = self.0.next();
        debug!("build"; "phase: {}", self.0);
    }

    fn fail(&mut self) {
        self.0 = Phase::Failed;
        debug!("build"; "phase: {}", self.0);
    }
}

/// Run a batch build.
///
/// `make_compositor` receives the local asset server's origin. Any render
/// failure aborts the build before the manifest is touched.
pub fn run<F>(
    config: &SiteConfig,
    catalog: &ContentCatalog,
    filter: &TargetFilter,
    make_compositor: F,
) -> Result<BuildReport>
where
    F: FnOnce(&str) -> Result<Box<dyn Compositor>>,
{
    let mut phase = Progress(Phase::Idle);
    let result = run_phases(config, catalog, filter, make_compositor, &mut phase);
    if result.is_err() {
        phase.fail();
    }
    result
}

fn run_phases<F>(
    config: &SiteConfig,
    catalog: &ContentCatalog,
    filter: &TargetFilter,
    make_compositor: F,
    phase: &mut Progress,
) -> Result<BuildReport>
where
    F: FnOnce(&str) -> Result<Box<dyn Compositor>>,
{
    phase.advance();
    let targets: Vec<Target> = enumerate(config, catalog)
        .into_iter()
        .filter(|t| filter.matches(t))
        .collect();
    log!("build"; "{} target{}", targets.len(), crate::utils::fmt::plural_s(targets.len()));

    phase.advance();
    let plan = diff(&targets, config);
    debug!("build"; "{} to render, {} reused", plan.tasks.len(), plan.reused);

    phase.advance();
    let output = &config.build.output;
    fs::create_dir_all(output)
        .with_context(|| format!("failed to create `{}`", output.display()))?;

    let server = AssetServer::start(&config.build.assets_root)?;
    let wrote = {
        let compositor = make_compositor(&server.origin())?;
        core::begin_work();
        let result = pool::run(&plan.tasks, config.build.workers(), compositor.as_ref(), output);
        core::end_work();
        result
    };
    server.shutdown();
    let wrote = wrote?;

    phase.advance();
    let manifest_path = &config.build.manifest;
    let reconciled = if filter.is_empty() {
        cache::replace(plan.entries, output)
    } else {
        let previous = ManifestFile::load(manifest_path)?;
        cache::merge(previous.as_ref(), plan.entries, output)
    }
    .with_context(|| format!("failed to reconcile `{}`", output.display()))?;

    ManifestFile::new(reconciled.entries).write(manifest_path)?;
    phase.advance();

    Ok(BuildReport {
        targets: targets.len(),
        wrote,
        reused: plan.reused,
        removed: reconciled.removed,
    })
}
