//! Packaged xDS resources and the result shapes returned by generators.

use envoy_types::pb::envoy::config::route::v3::RouteConfiguration;
use envoy_types::pb::google::protobuf::Any;
use prost::Message;

pub const CLUSTER_TYPE_URL: &str = "type.googleapis.com/envoy.config.cluster.v3.Cluster";
pub const ROUTE_TYPE_URL: &str = "type.googleapis.com/envoy.config.route.v3.RouteConfiguration";

/// Wrapper for a built Envoy resource along with its name.
#[derive(Clone, Debug, PartialEq)]
pub struct BuiltResource {
    pub name: String,
    pub resource: Any,
}

impl BuiltResource {
    pub fn new<S: Into<String>>(name: S, resource: Any) -> Self {
        Self { name: name.into(), resource }
    }

    /// Package a route configuration under its own name
    pub fn from_route_configuration(route_config: &RouteConfiguration) -> Self {
        Self {
            name: route_config.name.clone(),
            resource: Any {
                type_url: ROUTE_TYPE_URL.to_string(),
                value: route_config.encode_to_vec(),
            },
        }
    }

    pub fn into_any(self) -> Any {
        self.resource
    }

    pub fn type_url(&self) -> &str {
        &self.resource.type_url
    }
}

/// Ordered set of resources sent in one response
pub type Resources = Vec<BuiltResource>;

/// Names of resources the proxy must drop
pub type DeletedResources = Vec<String>;

/// Extra context attached to the push log line of a response
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct XdsLogDetails {
    pub incremental: bool,
    pub additional_info: String,
}

impl XdsLogDetails {
    /// Details for a response that carries nothing noteworthy
    pub const DEFAULT: XdsLogDetails =
        XdsLogDetails { incremental: false, additional_info: String::new() };

    pub fn incremental<S: Into<String>>(additional_info: S) -> Self {
        Self { incremental: true, additional_info: additional_info.into() }
    }
}

/// Result of a delta-capable generation
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeltaResources {
    /// Added or updated resources
    pub updated: Resources,

    pub removed: DeletedResources,

    pub log_details: XdsLogDetails,

    /// True when `updated`/`removed` form a real delta, false when they were
    /// recomputed from scratch
    pub used_delta: bool,
}

impl DeltaResources {
    /// Empty result used when no push is needed
    pub fn none() -> Self {
        Self::default()
    }
}
