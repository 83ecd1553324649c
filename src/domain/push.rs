//! Push requests
//!
//! A [`PushRequest`] describes one pending synchronization event. It is
//! built upstream by the change-delivery layer and consumed read-only by the
//! generators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use super::config_kind::{ConfigKey, ConfigKind};

/// Immutable snapshot of the mesh state a push cycle was computed against.
///
/// Collaborators that build clusters and virtual hosts resolve the mesh model
/// through this snapshot; this crate only passes it along.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushContext {
    pub push_version: String,
    pub created_at: DateTime<Utc>,
}

impl PushContext {
    pub fn new<S: Into<String>>(push_version: S) -> Self {
        Self { push_version: push_version.into(), created_at: Utc::now() }
    }
}

/// Why a push was triggered. Only used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerReason {
    EndpointUpdate,
    ConfigUpdate,
    ServiceUpdate,
    ProxyUpdate,
    GlobalUpdate,
    SecretTrigger,
    NetworksTrigger,
    ProxyRequest,
    UnknownTrigger,
}

impl fmt::Display for TriggerReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            TriggerReason::EndpointUpdate => "endpoint",
            TriggerReason::ConfigUpdate => "config",
            TriggerReason::ServiceUpdate => "service",
            TriggerReason::ProxyUpdate => "proxy",
            TriggerReason::GlobalUpdate => "global",
            TriggerReason::SecretTrigger => "secret",
            TriggerReason::NetworksTrigger => "networks",
            TriggerReason::ProxyRequest => "proxyrequest",
            TriggerReason::UnknownTrigger => "unknown",
        };
        f.write_str(reason)
    }
}

/// Pending synchronization event
#[derive(Debug, Clone)]
pub struct PushRequest {
    /// Full resync when true, incremental (endpoint-only) otherwise
    pub full: bool,

    /// Changed configuration objects. Empty means the change set is unknown.
    pub configs_updated: HashSet<ConfigKey>,

    /// Mesh snapshot for this push cycle
    pub push: Arc<PushContext>,

    pub reasons: Vec<TriggerReason>,
}

impl PushRequest {
    /// Create a full push request with an unknown change set
    pub fn full(push: Arc<PushContext>) -> Self {
        Self { full: true, configs_updated: HashSet::new(), push, reasons: Vec::new() }
    }

    /// Create an incremental push request
    pub fn incremental(push: Arc<PushContext>) -> Self {
        Self { full: false, configs_updated: HashSet::new(), push, reasons: Vec::new() }
    }

    pub fn with_config(mut self, key: ConfigKey) -> Self {
        self.configs_updated.insert(key);
        self
    }

    pub fn with_reason(mut self, reason: TriggerReason) -> Self {
        self.reasons.push(reason);
        self
    }

    /// Distinct kinds among the changed configs
    pub fn updated_kinds(&self) -> HashSet<ConfigKind> {
        self.configs_updated.iter().map(|key| key.kind).collect()
    }

    /// Comma separated reasons, for log fields
    pub fn reason_summary(&self) -> String {
        self.reasons.iter().map(ToString::to_string).collect::<Vec<_>>().join(",")
    }
}
