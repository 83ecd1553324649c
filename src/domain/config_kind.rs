//! Configuration kinds
//!
//! Identifies the class of a changed configuration object. A push request
//! carries the set of changed objects as [`ConfigKey`]s; the push decision only
//! looks at their [`ConfigKind`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Class of a user configuration object watched by the control plane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConfigKind {
    ServiceEntry,
    DestinationRule,
    VirtualService,
    Gateway,
    Sidecar,
    EnvoyFilter,
    WorkloadEntry,
    WorkloadGroup,
    AuthorizationPolicy,
    RequestAuthentication,
    PeerAuthentication,
    Secret,
    Telemetry,
    WasmPlugin,
    ProxyConfig,
    KubernetesGateway,
    #[serde(rename = "HTTPRoute")]
    HttpRoute,
    #[serde(rename = "GRPCRoute")]
    GrpcRoute,
    Service,
    ConfigMap,
    #[serde(rename = "DNSName")]
    DnsName,
}

impl ConfigKind {
    /// All known kinds, in declaration order
    pub const ALL: [ConfigKind; 21] = [
        ConfigKind::ServiceEntry,
        ConfigKind::DestinationRule,
        ConfigKind::VirtualService,
        ConfigKind::Gateway,
        ConfigKind::Sidecar,
        ConfigKind::EnvoyFilter,
        ConfigKind::WorkloadEntry,
        ConfigKind::WorkloadGroup,
        ConfigKind::AuthorizationPolicy,
        ConfigKind::RequestAuthentication,
        ConfigKind::PeerAuthentication,
        ConfigKind::Secret,
        ConfigKind::Telemetry,
        ConfigKind::WasmPlugin,
        ConfigKind::ProxyConfig,
        ConfigKind::KubernetesGateway,
        ConfigKind::HttpRoute,
        ConfigKind::GrpcRoute,
        ConfigKind::Service,
        ConfigKind::ConfigMap,
        ConfigKind::DnsName,
    ];

    /// Name used in logs and serialized push requests
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigKind::ServiceEntry => "ServiceEntry",
            ConfigKind::DestinationRule => "DestinationRule",
            ConfigKind::VirtualService => "VirtualService",
            ConfigKind::Gateway => "Gateway",
            ConfigKind::Sidecar => "Sidecar",
            ConfigKind::EnvoyFilter => "EnvoyFilter",
            ConfigKind::WorkloadEntry => "WorkloadEntry",
            ConfigKind::WorkloadGroup => "WorkloadGroup",
            ConfigKind::AuthorizationPolicy => "AuthorizationPolicy",
            ConfigKind::RequestAuthentication => "RequestAuthentication",
            ConfigKind::PeerAuthentication => "PeerAuthentication",
            ConfigKind::Secret => "Secret",
            ConfigKind::Telemetry => "Telemetry",
            ConfigKind::WasmPlugin => "WasmPlugin",
            ConfigKind::ProxyConfig => "ProxyConfig",
            ConfigKind::KubernetesGateway => "KubernetesGateway",
            ConfigKind::HttpRoute => "HTTPRoute",
            ConfigKind::GrpcRoute => "GRPCRoute",
            ConfigKind::Service => "Service",
            ConfigKind::ConfigMap => "ConfigMap",
            ConfigKind::DnsName => "DNSName",
        }
    }
}

impl fmt::Display for ConfigKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a known [`ConfigKind`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown config kind '{0}'")]
pub struct UnknownConfigKind(pub String);

impl FromStr for ConfigKind {
    type Err = UnknownConfigKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownConfigKind(s.to_string()))
    }
}

/// One concrete changed configuration object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConfigKey {
    pub kind: ConfigKind,
    pub namespace: String,
    pub name: String,
}

impl ConfigKey {
    pub fn new<N: Into<String>, S: Into<String>>(kind: ConfigKind, namespace: N, name: S) -> Self {
        Self { kind, namespace: namespace.into(), name: name.into() }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.kind, self.namespace, self.name)
    }
}
