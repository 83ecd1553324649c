//! Push-necessity decisions
//!
//! Decides from a [`PushRequest`] whether a resource family must be rebuilt
//! for a proxy. Kinds are matched against fixed sets of kinds that are known
//! not to matter; any kind not listed is assumed relevant, so a new kind
//! causes extra pushes rather than missed ones.

use std::collections::HashSet;
use std::ops::ControlFlow;
use std::sync::LazyLock;

use crate::domain::{ConfigKey, ConfigKind, Proxy, PushRequest};

/// Kinds that never change the cluster set of a proxy
pub static CDS_IRRELEVANT_KINDS: LazyLock<HashSet<ConfigKind>> = LazyLock::new(|| {
    HashSet::from([
        ConfigKind::Gateway,
        ConfigKind::WorkloadEntry,
        ConfigKind::WorkloadGroup,
        ConfigKind::AuthorizationPolicy,
        ConfigKind::RequestAuthentication,
        ConfigKind::Secret,
        ConfigKind::Telemetry,
        ConfigKind::WasmPlugin,
        ConfigKind::ProxyConfig,
    ])
});

/// Kinds that change the clusters of routers when gateway cluster filtering
/// is enabled
pub static GATEWAY_CLUSTER_KINDS: LazyLock<HashSet<ConfigKind>> =
    LazyLock::new(|| HashSet::from([ConfigKind::VirtualService, ConfigKind::Gateway]));

/// Kinds that never change the route configurations of a proxy
pub static RDS_IRRELEVANT_KINDS: LazyLock<HashSet<ConfigKind>> = LazyLock::new(|| {
    HashSet::from([
        ConfigKind::WorkloadEntry,
        ConfigKind::WorkloadGroup,
        ConfigKind::AuthorizationPolicy,
        ConfigKind::RequestAuthentication,
        ConfigKind::PeerAuthentication,
        ConfigKind::Secret,
        ConfigKind::WasmPlugin,
        ConfigKind::Telemetry,
        ConfigKind::ProxyConfig,
        ConfigKind::DnsName,
    ])
});

impl ConfigKind {
    /// Whether a change of this kind can alter cluster resources
    pub fn affects_clusters(&self) -> bool {
        !CDS_IRRELEVANT_KINDS.contains(self)
    }

    /// Whether a change of this kind can alter route resources
    pub fn affects_routes(&self) -> bool {
        !RDS_IRRELEVANT_KINDS.contains(self)
    }

    /// Whether a change of this kind alters router clusters under gateway filtering
    pub fn impacts_gateway_clusters(&self) -> bool {
        GATEWAY_CLUSTER_KINDS.contains(self)
    }
}

/// Checks shared by every family. `Break` carries a final answer, `Continue`
/// the changed configs still to inspect.
fn full_push_precheck(req: Option<&PushRequest>) -> ControlFlow<bool, &HashSet<ConfigKey>> {
    let Some(req) = req else {
        return ControlFlow::Break(true);
    };
    // Only full pushes rebuild clusters and routes
    if !req.full {
        return ControlFlow::Break(false);
    }
    if req.configs_updated.is_empty() {
        return ControlFlow::Break(true);
    }
    ControlFlow::Continue(&req.configs_updated)
}

/// Whether cluster resources must be regenerated for `proxy`
pub fn cds_needs_push(
    req: Option<&PushRequest>,
    proxy: &Proxy,
    filter_gateway_cluster_config: bool,
) -> bool {
    let configs = match full_push_precheck(req) {
        ControlFlow::Continue(configs) => configs,
        ControlFlow::Break(decision) => return decision,
    };

    configs.iter().any(|config| {
        (filter_gateway_cluster_config
            && proxy.node_type.is_router()
            && config.kind.impacts_gateway_clusters())
            || config.kind.affects_clusters()
    })
}

/// Whether route resources must be regenerated
pub fn rds_needs_push(req: Option<&PushRequest>) -> bool {
    match full_push_precheck(req) {
        ControlFlow::Continue(configs) => {
            configs.iter().any(|config| config.kind.affects_routes())
        }
        ControlFlow::Break(decision) => decision,
    }
}
