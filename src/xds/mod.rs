//! Envoy xDS push decisions and resource generation
//!
//! Implements the cluster (CDS) and route (RDS) generators the discovery
//! layer calls for each proxy:
//! - deciding whether a push request requires regenerating a resource family
//! - narrowing generated clusters to a proxy's subscription
//! - decoding route names and caching the route configurations built for them

pub mod cds;
pub mod classifier;
pub mod filter;
pub mod generator;
pub mod rds;
pub mod resources;
pub mod route;
pub mod route_cache;
pub mod route_name;

pub use cds::CdsGenerator;
pub use classifier::{cds_needs_push, rds_needs_push};
pub use filter::filter_by_watched_names;
pub use generator::{
    ClusterBuilder, SniffedPortMerger, VirtualHostBuilder, XdsDeltaResourceGenerator,
    XdsResourceGenerator,
};
pub use rds::RdsGenerator;
pub use resources::{
    BuiltResource, DeletedResources, DeltaResources, Resources, XdsLogDetails, CLUSTER_TYPE_URL,
    ROUTE_TYPE_URL,
};
pub use route::DomainMatchMerger;
pub use route_cache::RouteConfigCache;
pub use route_name::{
    build_dns_srv_subset_key, build_subset_key, parse_subset_key, RouteName, RouteNameError,
    RouteNameVariant, SubsetKey,
};
