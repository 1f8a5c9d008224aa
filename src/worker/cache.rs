//! Versioned cache generations.
//!
//! `CacheStorage` is the process-wide registry of named stores, shared by
//! every engine instance. Exactly one generation is current at a time; stores
//! from prior deployments are purged at activation. Entry writes are
//! last-write-wins with no cross-request ordering guarantee.

use std::sync::Arc;

use dashmap::DashMap;

use crate::worker::fetch::Response;

/// Process-wide registry of named cache stores.
#[derive(Debug, Default)]
pub struct CacheStorage {
    stores: DashMap<String, Arc<Cache>>,
}

impl CacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open (or create) the store with the given name.
    pub fn open(&self, name: &str) -> Arc<Cache> {
        self.stores
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Cache::new(name)))
            .value()
            .clone()
    }

    /// Delete a store. Returns whether it existed.
    pub fn delete(&self, name: &str) -> bool {
        self.stores.remove(name).is_some()
    }

    /// Names of all existing stores.
    pub fn names(&self) -> Vec<String> {
        self.stores.iter().map(|e| e.key().clone()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.stores.contains_key(name)
    }
}

/// One cache generation: request URL -> stored response snapshot.
#[derive(Debug)]
pub struct Cache {
    name: String,
    entries: DashMap<String, Response>,
}

impl Cache {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            entries: DashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Store a response snapshot under the request URL. Last write wins.
    pub fn put(&self, url: &str, response: Response) {
        self.entries.insert(url.to_string(), response);
    }

    /// Look up a stored response, cloning the snapshot.
    pub fn lookup(&self, url: &str) -> Option<Response> {
        self.entries.get(url).map(|e| e.clone())
    }

    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All cached URLs (unordered).
    pub fn urls(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.key().clone()).collect()
    }
}
