//! Local asset server used during batch builds.
//!
//! Serves files under the assets root on `127.0.0.1:<ephemeral>` so the
//! on-demand compositor can fetch fonts and images exactly as it would from
//! the live site.

use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::Path,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread::{self, JoinHandle},
};

use anyhow::{Context, Result};
use tiny_http::Server;

use super::{
    lifecycle::bind_with_retry,
    path::resolve_path,
    response::{respond_file, respond_not_found},
};
use crate::debug;

pub struct AssetServer {
    server: Arc<Server>,
    addr: SocketAddr,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl AssetServer {
    /// Bind an ephemeral loopback port and start serving `root`.
    pub fn start(root: &Path) -> Result<Self> {
        let (server, addr) = bind_with_retry(IpAddr::V4(Ipv4Addr::LOCALHOST), 0)
            .context("failed to start local asset server")?;
        let server = Arc::new(server);
        let stop = Arc::new(AtomicBool::new(false));

        let handle = thread::Builder::new()
            .name("asset-server".into())
            .spawn({
                let server = Arc::clone(&server);
                let stop = Arc::clone(&stop);
                let root = root.to_path_buf();
                move || serve_loop(&server, &stop, &root)
            })
            .context("failed to spawn asset server thread")?;

        debug!("assets"; "serving {} on http://{}", root.display(), addr);
        Ok(Self {
            server,
            addr,
            stop,
            handle: Some(handle),
        })
    }

    pub fn origin(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop accepting requests and join the server thread.
    pub fn shutdown(mut self) {
        self.stop_and_join();
    }

    fn stop_and_join(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        self.server.unblock();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for AssetServer {
    fn drop(&mut self) {
        self.stop_and_join();
    }
}

fn serve_loop(server: &Server, stop: &AtomicBool, root: &Path) {
    let pool = match rayon::ThreadPoolBuilder::new().num_threads(4).build() {
        Ok(pool) => pool,
        Err(e) => {
            debug!("assets"; "thread pool unavailable: {}", e);
            return;
        }
    };

    pool.scope(|scope| {
        for request in server.incoming_requests() {
            if stop.load(Ordering::SeqCst) {
                break;
            }
            scope.spawn(move |_| {
                let result = match resolve_path(request.url(), root) {
                    Some(path) => respond_file(request, &path),
                    None => respond_not_found(request),
                };
                if let Err(e) = result {
                    debug!("assets"; "request error: {}", e);
                }
            });
        }
    });
}
