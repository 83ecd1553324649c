//! Proxy and subscription types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Resource name a proxy uses to subscribe to every resource of a type
pub const WILDCARD_RESOURCE_NAME: &str = "*";

/// Role of a connected data-plane instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    /// Workload sidecar
    SidecarProxy,

    /// Standalone edge router (ingress or egress gateway)
    Router,
}

impl NodeType {
    pub fn is_router(&self) -> bool {
        matches!(self, NodeType::Router)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeType::SidecarProxy => write!(f, "sidecar"),
            NodeType::Router => write!(f, "router"),
        }
    }
}

/// Connected data-plane instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proxy {
    pub id: String,
    pub node_type: NodeType,
}

impl Proxy {
    pub fn sidecar<S: Into<String>>(id: S) -> Self {
        Self { id: id.into(), node_type: NodeType::SidecarProxy }
    }

    pub fn router<S: Into<String>>(id: S) -> Self {
        Self { id: id.into(), node_type: NodeType::Router }
    }
}

/// Subscription state of one proxy for one resource type.
///
/// Owned by the subscription layer; generators only read it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchedResource {
    pub type_url: String,

    /// Subscribed names. Empty means every resource of the type.
    pub resource_names: Vec<String>,
}

impl WatchedResource {
    pub fn new<S: Into<String>>(type_url: S, resource_names: Vec<String>) -> Self {
        Self { type_url: type_url.into(), resource_names }
    }

    /// Subscription to every resource of `type_url`
    pub fn all<S: Into<String>>(type_url: S) -> Self {
        Self::new(type_url, Vec::new())
    }

    pub fn subscribes_to_all(&self) -> bool {
        self.resource_names.is_empty()
    }

    pub fn contains_wildcard(&self) -> bool {
        self.resource_names.iter().any(|name| name == WILDCARD_RESOURCE_NAME)
    }
}
