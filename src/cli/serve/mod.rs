//! Preview server routed through the offline cache engine.
//!
//! Every request the browser would hand to the deployed service worker goes
//! through the same arbitration here: the engine decides cache vs network
//! (the "network" being the site directory on disk), and pass-through
//! requests are served straight from disk.

mod lifecycle;
mod response;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use crossbeam::channel;
use tiny_http::{Method as HttpMethod, Request as HttpRequest, Server};
use url::Url;

use crate::config::{ShelfConfig, cfg};
use crate::utils::path::resolve_under_root;
use crate::worker::{
    CacheStorage, FetchOutcome, Fetcher, Method, Request, ServiceWorker, SiteFetcher,
    WorkerConfig, WorkerHandle,
};
use crate::{debug, log};

/// Run the serve command: bind, drive the worker lifecycle, serve requests.
pub fn serve(config: &ShelfConfig) -> Result<()> {
    let bound = bind_server(config)?;
    let origin = Url::parse(&format!("http://{}/", bound.addr()))
        .context("failed to derive origin from bound address")?;

    let worker_config = WorkerConfig::from_site(config, origin.clone());
    let fetcher: Arc<dyn Fetcher> = Arc::new(SiteFetcher::new(config.get_root().to_path_buf()));
    let worker = Arc::new(ServiceWorker::new(
        worker_config,
        Arc::new(CacheStorage::new()),
        fetcher,
    ));

    bound.run(worker, origin)
}

/// Bound server ready to accept requests.
pub struct BoundServer {
    server: Arc<Server>,
    addr: SocketAddr,
    shutdown_rx: channel::Receiver<()>,
}

/// Bind the HTTP server without starting the request loop.
fn bind_server(config: &ShelfConfig) -> Result<BoundServer> {
    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);

    let (shutdown_tx, shutdown_rx) = channel::unbounded::<()>();
    lifecycle::register_server_for_shutdown(Arc::clone(&server), shutdown_tx);

    log!("serve"; "http://{}", addr);

    Ok(BoundServer {
        server,
        addr,
        shutdown_rx,
    })
}

impl BoundServer {
    /// Get the bound address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Drive install + activate, then start the request loop (blocking).
    pub fn run(self, worker: Arc<ServiceWorker>, origin: Url) -> Result<()> {
        let offline = worker.is_offline();
        let (handle, runtime_thread) = lifecycle::spawn_worker_runtime(worker, self.shutdown_rx);

        // Lifecycle runs to completion before any request is served; a
        // failed install aborts this generation
        handle.blocking_install()?;
        handle.blocking_activate()?;

        if offline {
            log!("serve"; "offline cache active - responses are cached across requests");
        } else {
            log!("serve"; "pass-through mode - serving live from disk");
        }

        run_request_loop(&self.server, &handle, &origin);
        lifecycle::wait_for_shutdown(runtime_thread);
        Ok(())
    }
}

fn run_request_loop(server: &Server, handle: &WorkerHandle, origin: &Url) {
    let config = cfg();
    // Thread pool keeps one slow interception from blocking other requests
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(4)
        .build()
        .expect("failed to create thread pool");

    for request in server.incoming_requests() {
        let handle = handle.clone();
        let origin = origin.clone();
        let config = Arc::clone(&config);
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &handle, &origin, &config) {
                log!("serve"; "request error: {e:#}");
            }
        });
    }
}

/// Handle a single HTTP request through the engine.
fn handle_request(
    request: HttpRequest,
    handle: &WorkerHandle,
    origin: &Url,
    config: &ShelfConfig,
) -> Result<()> {
    if crate::core::is_shutdown() {
        return response::respond_unavailable(request);
    }

    let intercepted = build_worker_request(&request, origin)?;
    debug!("serve"; "{} {}", intercepted.method, intercepted.url.path());

    match handle.blocking_fetch(intercepted) {
        Ok(FetchOutcome::Served {
            response: served,
            source,
        }) => {
            debug!("serve"; "served from {}", source);
            response::respond_served(request, &served)
        }
        Ok(FetchOutcome::Passthrough) => respond_from_disk(request, config),
        Err(err) => response::respond_bad_gateway(request, &err),
    }
}

/// Map a tiny_http request onto the engine's request model.
fn build_worker_request(request: &HttpRequest, origin: &Url) -> Result<Request> {
    let url = origin
        .join(request.url())
        .with_context(|| format!("invalid request url '{}'", request.url()))?;
    let method = map_method(request.method());
    let navigation = method.is_get() && accepts_html(request);
    Ok(Request::new(method, url, navigation))
}

fn map_method(method: &HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::Get,
        HttpMethod::Head => Method::Head,
        HttpMethod::Post => Method::Post,
        HttpMethod::Put => Method::Put,
        HttpMethod::Delete => Method::Delete,
        HttpMethod::Options => Method::Options,
        HttpMethod::Patch => Method::Patch,
        _ => Method::Other,
    }
}

/// Document loads advertise text/html in their Accept header.
fn accepts_html(request: &HttpRequest) -> bool {
    request
        .headers()
        .iter()
        .find(|h| h.field.as_str().as_str().eq_ignore_ascii_case("accept"))
        .is_some_and(|h| h.value.as_str().contains("text/html"))
}

/// Non-intercepted requests are served straight from the site directory.
fn respond_from_disk(request: HttpRequest, config: &ShelfConfig) -> Result<()> {
    match resolve_under_root(config.get_root(), request.url()) {
        Some(path) => response::respond_file(request, &path),
        None => response::respond_not_found(request),
    }
}
