//! In-memory stand-ins for the mesh model behind the builder traits.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use envoy_types::pb::envoy::config::cluster::v3::Cluster;
use envoy_types::pb::envoy::config::route::v3::VirtualHost;
use envoy_types::pb::google::protobuf::Any;
use meshplane::xds::{
    BuiltResource, ClusterBuilder, DeltaResources, Resources, VirtualHostBuilder,
    XdsLogDetails, CLUSTER_TYPE_URL, ROUTE_TYPE_URL,
};
use meshplane::{Error, Proxy, PushContext, PushRequest, Result, WatchedResource};
use prost::Message;

pub const REVIEWS: &str = "reviews.default.svc.cluster.local";
pub const RATINGS: &str = "ratings.default.svc.cluster.local";

pub fn cluster(name: &str) -> BuiltResource {
    let cluster = Cluster { name: name.to_string(), ..Default::default() };
    BuiltResource::new(
        name,
        Any { type_url: CLUSTER_TYPE_URL.to_string(), value: cluster.encode_to_vec() },
    )
}

pub fn names(resources: &Resources) -> Vec<&str> {
    resources.iter().map(|r| r.name.as_str()).collect()
}

pub fn strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

/// Cluster model with a fixed set of clusters and an optional real delta
#[derive(Default)]
pub struct MeshClusters {
    pub clusters: Vec<String>,
    /// `(updated, removed)` when the model can compute a real delta
    pub delta: Option<(Vec<String>, Vec<String>)>,
    pub unavailable: bool,
    pub builds: AtomicUsize,
}

impl MeshClusters {
    pub fn with_clusters(clusters: &[&str]) -> Self {
        Self { clusters: strings(clusters), ..Default::default() }
    }

    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable {
            return Err(Error::generation(CLUSTER_TYPE_URL, "cluster model not synced"));
        }
        Ok(())
    }
}

impl ClusterBuilder for MeshClusters {
    fn build_clusters(
        &self,
        _proxy: &Proxy,
        _req: Option<&PushRequest>,
    ) -> Result<(Resources, XdsLogDetails)> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        Ok((self.clusters.iter().map(|n| cluster(n)).collect(), XdsLogDetails::DEFAULT))
    }

    fn build_delta_clusters(
        &self,
        _proxy: &Proxy,
        _req: Option<&PushRequest>,
        _watched: &WatchedResource,
    ) -> Result<DeltaResources> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        Ok(match &self.delta {
            Some((updated, removed)) => DeltaResources {
                updated: updated.iter().map(|n| cluster(n)).collect(),
                removed: removed.clone(),
                log_details: XdsLogDetails::incremental("services changed"),
                used_delta: true,
            },
            None => DeltaResources {
                updated: self.clusters.iter().map(|n| cluster(n)).collect(),
                removed: Vec::new(),
                log_details: XdsLogDetails::DEFAULT,
                used_delta: false,
            },
        })
    }
}

/// Virtual hosts per hostname; each host serves `hostname` and `hostname:port`
#[derive(Default)]
pub struct MeshHosts {
    pub services: BTreeMap<String, Vec<u32>>,
    pub unavailable: bool,
    pub builds: AtomicUsize,
}

impl MeshHosts {
    pub fn with_service(mut self, hostname: &str, ports: &[u32]) -> Self {
        self.services.insert(hostname.to_string(), ports.to_vec());
        self
    }

    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }
}

impl VirtualHostBuilder for MeshHosts {
    fn build_outbound_virtual_hosts(
        &self,
        _proxy: &Proxy,
        _push: &PushContext,
        _route_name: &str,
        port: u32,
    ) -> Result<Vec<VirtualHost>> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        if self.unavailable {
            return Err(Error::generation(ROUTE_TYPE_URL, "service registry not synced"));
        }

        Ok(self
            .services
            .iter()
            .filter(|(_, ports)| ports.contains(&port))
            .map(|(host, _)| VirtualHost {
                name: format!("{}:{}", host, port),
                domains: vec![host.clone(), format!("{}:{}", host, port)],
                ..Default::default()
            })
            .collect())
    }
}
