//! On-demand share card server.

mod handlers;

pub use handlers::{Reply, ServeContext};

use std::sync::Arc;

use anyhow::{Context, Result};
use tiny_http::{Request, Server};

use crate::{
    config::SiteConfig,
    content::ContentCatalog,
    core, log,
    render::OnDemandCompositor,
    server::{
        bind_with_retry, respond_file, respond_json, respond_not_found, respond_pipeline_error,
        respond_png, respond_unavailable,
    },
    trip::{
        DirectionsClient, HttpDirections, HttpTripStore, JsonPreferenceStore, NoTripStore,
        TripStore,
    },
};

impl ServeContext {
    /// Wire up collaborators from config.
    pub fn from_config(config: SiteConfig) -> Result<Self> {
        let catalog = ContentCatalog::load(&config.site.content)?;
        let compositor = OnDemandCompositor::new(&config, config.asset_origin())?;

        let trips: Box<dyn TripStore> = match &config.trips.endpoint {
            Some(endpoint) => Box::new(HttpTripStore::new(endpoint).context("trip store")?),
            None => Box::new(NoTripStore),
        };
        let prefs = config
            .trips
            .preferences
            .as_deref()
            .map(JsonPreferenceStore::load)
            .unwrap_or_default();

        let api_key = config.maps.api_key();
        if api_key.is_none() {
            log!("serve"; "${} not set, trip cards render without maps", config.maps.api_key_env);
        }
        let directions: Option<Box<dyn DirectionsClient>> = match &api_key {
            Some(key) => Some(Box::new(
                HttpDirections::new(&config.maps.directions_endpoint, key.clone())
                    .context("directions client")?,
            )),
            None => None,
        };

        Ok(Self {
            config,
            catalog,
            compositor: Box::new(compositor),
            trips,
            prefs: Box::new(prefs),
            directions,
            api_key,
        })
    }
}

/// Bind and serve until Ctrl+C.
pub fn serve(config: SiteConfig) -> Result<()> {
    let (server, addr) = bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);
    let ctx = Arc::new(ServeContext::from_config(config)?);

    core::register_server(Arc::clone(&server));
    log!("serve"; "http://{}", addr);

    run_request_loop(&server, &ctx)
}

fn run_request_loop(server: &Server, ctx: &Arc<ServeContext>) -> Result<()> {
    // Rendering is CPU-bound; keep slow renders from blocking other requests
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(4)
        .build()
        .context("failed to create thread pool")?;

    for request in server.incoming_requests() {
        let ctx = Arc::clone(ctx);
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &ctx) {
                log!("serve"; "request error: {e}");
            }
        });
    }
    Ok(())
}

/// Handle a single HTTP request
fn handle_request(request: Request, ctx: &ServeContext) -> Result<()> {
    if core::is_shutdown() {
        return respond_unavailable(request);
    }

    match ctx.reply(request.url()) {
        Ok(Reply::Png { body, cache_control }) => respond_png(request, body, cache_control),
        Ok(Reply::Json(body)) => respond_json(request, body),
        Ok(Reply::File(path)) => respond_file(request, &path),
        Ok(Reply::NotFound) => respond_not_found(request),
        Err(err) => {
            log!("error"; "{} {:#}", request.url(), err);
            respond_pipeline_error(request, &err)
        }
    }
}
