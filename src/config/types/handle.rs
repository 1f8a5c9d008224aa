//! Global config handle.
//!
//! Uses `arc-swap` for lock-free reads. The config is stored once at startup
//! and shared by the request loop and the worker runtime.

use crate::config::ShelfConfig;
use arc_swap::ArcSwap;
use std::sync::{Arc, LazyLock};

/// Global config storage.
pub static CONFIG: LazyLock<ArcSwap<ShelfConfig>> =
    LazyLock::new(|| ArcSwap::from_pointee(ShelfConfig::default()));

#[inline]
pub fn cfg() -> Arc<ShelfConfig> {
    CONFIG.load_full()
}

#[inline]
pub fn init_config(config: ShelfConfig) -> Arc<ShelfConfig> {
    let arc = Arc::new(config);
    CONFIG.store(Arc::clone(&arc));
    arc
}
