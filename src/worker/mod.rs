//! Offline cache engine.
//!
//! An in-process model of the deployed service worker's caching contract,
//! exercised by the preview server and by tests:
//!
//! - **install**: pre-cache the asset manifest into the current generation's
//!   store, all-or-nothing; skip waiting on success.
//! - **activate**: purge every other cache generation; claim open pages.
//! - **fetch**: same-origin GETs only, cache-first; successful basic 200
//!   responses are stored on the way through; failed navigations fall back
//!   to the cached application shell.
//! - **sync**: tag-triggered background refresh of the index JSON.
//! - **push / notificationclick**: notifications, no cache interaction.
//!
//! The engine is stateless between events apart from the cache store itself
//! and its lifecycle state. `offline = false` selects the pass-through
//! variant: lifecycle transitions and push handling only, no store, no
//! interception.
//!
//! ```text
//! serve loop --WorkerMsg--> WorkerActor --spawn--> handle_fetch (per request)
//!                                       \--------> handle_sync / handle_push
//! ```

pub mod cache;
pub mod fetch;

mod actor;
mod notify;

#[cfg(test)]
mod tests;

pub use actor::{WorkerActor, WorkerHandle, WorkerMsg};
pub use cache::{Cache, CacheStorage};
pub use fetch::{
    FetchOutcome, Fetcher, Method, Request, Response, ResponseKind, ServeSource, SiteFetcher,
};
pub use notify::Notification;

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use parking_lot::RwLock;
use url::Url;

use crate::config::ShelfConfig;
use crate::{debug, log};

/// Engine configuration, resolved against a concrete origin.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// The app origin; requests elsewhere are never intercepted.
    pub origin: Url,
    /// Store name of the current cache generation.
    pub store_name: String,
    /// Caching enabled; `false` is the pass-through variant.
    pub offline: bool,
    /// Application shell path, the navigation fallback.
    pub shell: String,
    /// Asset paths pre-cached at install.
    pub precache: Vec<String>,
    /// Background sync tag that refreshes the index.
    pub sync_tag: String,
    /// Origin-relative path of the index JSON.
    pub index_path: String,
    /// Push notification defaults.
    pub push_title: String,
    pub push_body: String,
}

impl WorkerConfig {
    /// Build the engine configuration from the project config and the origin
    /// the preview server actually bound.
    pub fn from_site(config: &ShelfConfig, origin: Url) -> Self {
        Self {
            origin,
            store_name: config.cache.store_name(),
            offline: config.cache.offline,
            shell: config.cache.shell.clone(),
            precache: config.cache.precache.clone(),
            sync_tag: config.cache.sync_tag.clone(),
            index_path: config.cache.index_path.clone(),
            push_title: config.push.title.clone(),
            push_body: config.push.body.clone(),
        }
    }
}

/// Lifecycle state, driven by the runtime in order.
///
/// `New` is the just-constructed worker; `Redundant` is a generation whose
/// install failed and will never control pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    New,
    Installing,
    Installed,
    Activating,
    Activated,
    Redundant,
}

/// The cache engine. One instance per worker generation.
pub struct ServiceWorker {
    config: WorkerConfig,
    storage: Arc<CacheStorage>,
    fetcher: Arc<dyn Fetcher>,
    state: RwLock<WorkerState>,
}

impl ServiceWorker {
    pub fn new(config: WorkerConfig, storage: Arc<CacheStorage>, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            config,
            storage,
            fetcher,
            state: RwLock::new(WorkerState::New),
        }
    }

    pub fn state(&self) -> WorkerState {
        *self.state.read()
    }

    pub fn is_offline(&self) -> bool {
        self.config.offline
    }

    pub fn storage(&self) -> &Arc<CacheStorage> {
        &self.storage
    }

    fn set_state(&self, state: WorkerState) {
        *self.state.write() = state;
    }

    /// The current generation's store.
    fn cache(&self) -> Arc<Cache> {
        self.storage.open(&self.config.store_name)
    }

    fn absolute(&self, path: &str) -> Result<Url> {
        self.config
            .origin
            .join(path)
            .with_context(|| format!("invalid path '{path}' against origin"))
    }

    /// Install: populate the manifest into the current generation, then skip
    /// waiting.
    ///
    /// All-or-nothing: the first failing manifest fetch aborts the install and
    /// marks this generation redundant. Entries stored before the failure are
    /// not rolled back, but the generation never activates.
    pub async fn install(&self) -> Result<()> {
        self.set_state(WorkerState::Installing);

        if self.config.offline {
            let cache = self.cache();
            for path in &self.config.precache {
                let url = self.absolute(path)?;
                let request = Request::get(url.clone());
                match self.fetcher.fetch(&request) {
                    Ok(response) if response.is_success() => {
                        cache.put(url.as_str(), response);
                    }
                    Ok(response) => {
                        self.set_state(WorkerState::Redundant);
                        bail!(
                            "install aborted: precache fetch for '{}' returned status {}",
                            path,
                            response.status
                        );
                    }
                    Err(err) => {
                        self.set_state(WorkerState::Redundant);
                        return Err(
                            err.context(format!("install aborted: precache fetch for '{path}' failed"))
                        );
                    }
                }
            }
            debug!("worker"; "pre-cached {} assets into '{}'", cache.len(), cache.name());
        }

        // Skip waiting: replace any previous generation without waiting for
        // open tabs to close
        self.set_state(WorkerState::Installed);
        Ok(())
    }

    /// Activate: purge every store that is not the current generation, then
    /// claim control of already-open pages.
    pub async fn activate(&self) {
        self.set_state(WorkerState::Activating);

        if self.config.offline {
            for name in self.storage.names() {
                if name != self.config.store_name {
                    self.storage.delete(&name);
                    debug!("worker"; "purged stale cache generation '{}'", name);
                }
            }
        }

        self.set_state(WorkerState::Activated);
    }

    /// Fetch arbitration for one intercepted request.
    ///
    /// Cache-first for same-origin GETs; everything else passes through
    /// untouched. A network failure on a navigation falls back to the cached
    /// shell; on a sub-resource it propagates to the caller.
    pub async fn handle_fetch(&self, request: Request) -> Result<FetchOutcome> {
        if !self.config.offline
            || !request.method.is_get()
            || !request.same_origin(&self.config.origin)
        {
            return Ok(FetchOutcome::Passthrough);
        }

        let cache = self.cache();
        let key = request.url.as_str().to_string();

        if let Some(hit) = cache.lookup(&key) {
            debug!("worker"; "cache hit for {}", key);
            return Ok(FetchOutcome::Served {
                response: hit,
                source: ServeSource::Cache,
            });
        }

        match self.fetcher.fetch(&request) {
            Ok(response) => {
                if response.is_cacheable() {
                    cache.put(&key, response.clone());
                }
                Ok(FetchOutcome::Served {
                    response,
                    source: ServeSource::Network,
                })
            }
            Err(err) => {
                if request.navigation {
                    let shell = self.absolute(&self.config.shell)?;
                    if let Some(shell_response) = cache.lookup(shell.as_str()) {
                        debug!("worker"; "network failed, serving shell for {}", key);
                        return Ok(FetchOutcome::Served {
                            response: shell_response,
                            source: ServeSource::ShellFallback,
                        });
                    }
                }
                // No cached fallback: the failure surfaces to the caller
                Err(err)
            }
        }
    }

    /// Background sync: refresh the index JSON on the configured tag.
    ///
    /// Failures are logged and otherwise ignored; retry policy is the
    /// scheduler's concern, not ours.
    pub async fn handle_sync(&self, tag: &str) {
        if tag != self.config.sync_tag {
            debug!("worker"; "ignoring sync tag '{}'", tag);
            return;
        }
        if !self.config.offline {
            return;
        }

        let url = match self.absolute(&self.config.index_path) {
            Ok(url) => url,
            Err(err) => {
                log!("worker"; "index refresh failed: {err:#}");
                return;
            }
        };

        let request = Request::get(url.clone());
        match self.fetcher.fetch(&request) {
            Ok(response) if response.is_success() => {
                self.cache().put(url.as_str(), response);
                log!("worker"; "index refreshed in background");
            }
            Ok(response) => {
                log!("worker"; "index refresh returned status {}", response.status);
            }
            Err(err) => {
                log!("worker"; "index refresh failed: {err:#}");
            }
        }
    }

    /// Push: parse the payload into a displayable notification.
    pub fn handle_push(&self, payload: Option<&[u8]>) -> Notification {
        notify::parse_push(payload, &self.config.push_title, &self.config.push_body)
    }

    /// Notification click: close and yield the app root to focus/open.
    pub fn handle_notification_click(&self) -> Url {
        self.config.origin.clone()
    }
}
