//! Global config handle with atomic reload.
//!
//! Reads are lock-free through `arc-swap`. The server calls
//! [`reload_config`] per request, so every response is stripped with the
//! flags currently in `deschema.toml`.

use crate::config::SiteConfig;
use crate::utils::hash;
use anyhow::Result;
use arc_swap::ArcSwap;
use std::fs;
use std::sync::{Arc, LazyLock};

static CONFIG: LazyLock<ArcSwap<SiteConfig>> =
    LazyLock::new(|| ArcSwap::from_pointee(SiteConfig::default()));

/// Snapshot of the current config.
#[inline]
pub fn cfg() -> Arc<SiteConfig> {
    CONFIG.load_full()
}

/// Reload config from disk if the file content changed.
///
/// Returns `Ok(true)` when a new config was installed. A config that fails
/// to load is reported and the previous one stays active.
pub fn reload_config() -> Result<bool> {
    let current = cfg();
    let Some(cli) = current.cli else {
        return Ok(false);
    };

    // A file that was never there, or has been removed, keeps the defaults
    let Ok(content) = fs::read(&current.config_path) else {
        return Ok(false);
    };
    if hash::compute(&content) == current.content_hash {
        return Ok(false);
    }

    CONFIG.store(Arc::new(SiteConfig::load(cli)?));
    Ok(true)
}

/// Install the initial config and return it.
pub fn init_config(config: SiteConfig) -> Arc<SiteConfig> {
    let config = Arc::new(config);
    CONFIG.store(Arc::clone(&config));
    config
}
