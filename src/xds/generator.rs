//! Generator contracts
//!
//! The discovery layer asks a generator for the resources of one type for one
//! proxy. Generators in turn delegate the expensive mesh-model work to the
//! builder traits below, which live outside this crate.

use envoy_types::pb::envoy::config::route::v3::VirtualHost;

use crate::domain::{Proxy, PushContext, PushRequest, WatchedResource};
use crate::xds::resources::{DeltaResources, Resources, XdsLogDetails};
use crate::Result;

/// Produces the full resource list of one type for a proxy.
///
/// `req` is `None` on the initial request of a stream, before any push
/// happened.
pub trait XdsResourceGenerator: Send + Sync {
    fn generate(
        &self,
        proxy: &Proxy,
        watched: &WatchedResource,
        req: Option<&PushRequest>,
    ) -> Result<(Resources, XdsLogDetails)>;
}

/// Generator that can also answer with added/updated and removed resources
pub trait XdsDeltaResourceGenerator: XdsResourceGenerator {
    fn generate_deltas(
        &self,
        proxy: &Proxy,
        req: Option<&PushRequest>,
        watched: &WatchedResource,
    ) -> Result<DeltaResources>;
}

/// Builds cluster resources from the mesh model
pub trait ClusterBuilder: Send + Sync {
    /// Every cluster visible to `proxy`
    fn build_clusters(
        &self,
        proxy: &Proxy,
        req: Option<&PushRequest>,
    ) -> Result<(Resources, XdsLogDetails)>;

    /// Clusters changed since the proxy's last push.
    ///
    /// Sets `used_delta` to false when it had to fall back to building every
    /// cluster.
    fn build_delta_clusters(
        &self,
        proxy: &Proxy,
        req: Option<&PushRequest>,
        watched: &WatchedResource,
    ) -> Result<DeltaResources>;
}

/// Builds outbound virtual hosts from the mesh model
pub trait VirtualHostBuilder: Send + Sync {
    /// Virtual hosts serving `port` for `route_name`.
    ///
    /// The result is cached by the caller per route name, so implementations
    /// must build from `push` and not serve from a cache of their own.
    fn build_outbound_virtual_hosts(
        &self,
        proxy: &Proxy,
        push: &PushContext,
        route_name: &str,
        port: u32,
    ) -> Result<Vec<VirtualHost>>;
}

/// Narrows virtual hosts to the ones serving a protocol-sniffed service port
pub trait SniffedPortMerger: Send + Sync {
    /// `merge_key` has the form `hostname:port`
    fn merge_for_sniffed_port(
        &self,
        virtual_hosts: Vec<VirtualHost>,
        merge_key: &str,
    ) -> Vec<VirtualHost>;
}
