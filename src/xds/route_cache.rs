//! Route configuration cache
//!
//! Built route configurations keyed by route name. Entries never expire:
//! nothing in the push path invalidates them, so an entry reflects the mesh
//! as it was when first built until the owner calls [`RouteConfigCache::invalidate`]
//! or [`RouteConfigCache::clear`].

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use envoy_types::pb::envoy::config::route::v3::RouteConfiguration;
use tracing::debug;

use crate::config::XdsPushConfig;
use crate::observability::MetricsRecorder;
use crate::Result;

/// Shared store of built route configurations.
///
/// Builds run outside the lock. Two threads missing on the same name may both
/// build; the first stored value wins and both callers get that value back.
#[derive(Debug)]
pub struct RouteConfigCache {
    enabled: bool,
    entries: RwLock<HashMap<String, Arc<RouteConfiguration>>>,
    metrics: MetricsRecorder,
}

impl RouteConfigCache {
    pub fn new(enabled: bool) -> Self {
        Self { enabled, entries: RwLock::new(HashMap::new()), metrics: MetricsRecorder::new() }
    }

    pub fn from_config(config: &XdsPushConfig) -> Self {
        Self::new(config.enable_route_cache)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Cached configuration for `name`, if any
    pub fn get(&self, name: &str) -> Option<Arc<RouteConfiguration>> {
        if !self.enabled {
            return None;
        }
        self.entries.read().unwrap_or_else(PoisonError::into_inner).get(name).cloned()
    }

    /// Return the cached configuration for `name`, building and storing it on a
    /// miss. With the cache disabled every call builds.
    pub fn get_or_build<F>(&self, name: &str, build: F) -> Result<Arc<RouteConfiguration>>
    where
        F: FnOnce() -> Result<RouteConfiguration>,
    {
        if !self.enabled {
            return build().map(Arc::new);
        }

        if let Some(cached) = self.get(name) {
            self.metrics.record_route_cache(true);
            return Ok(cached);
        }
        self.metrics.record_route_cache(false);

        let built = Arc::new(build()?);

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let stored = entries.entry(name.to_string()).or_insert_with(|| Arc::clone(&built));
        if !Arc::ptr_eq(stored, &built) {
            debug!(route_name = %name, "Discarding duplicate route configuration build");
        }
        Ok(Arc::clone(stored))
    }

    /// Drop the entry for `name`. Returns whether one existed.
    pub fn invalidate(&self, name: &str) -> bool {
        self.entries.write().unwrap_or_else(PoisonError::into_inner).remove(name).is_some()
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.entries.write().unwrap_or_else(PoisonError::into_inner).clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for RouteConfigCache {
    fn default() -> Self {
        Self::from_config(&XdsPushConfig::default())
    }
}
