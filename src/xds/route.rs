//! Virtual-host helpers for per-destination route configurations.

use envoy_types::pb::envoy::config::route::v3::{RouteConfiguration, VirtualHost};

use crate::xds::generator::SniffedPortMerger;

/// Keeps the virtual hosts that list the merge key among their domains.
///
/// Falls back to the full list when no virtual host matches, so a proxy is
/// never sent an empty route configuration for a name it asked for.
#[derive(Debug, Clone, Copy, Default)]
pub struct DomainMatchMerger;

impl SniffedPortMerger for DomainMatchMerger {
    fn merge_for_sniffed_port(
        &self,
        virtual_hosts: Vec<VirtualHost>,
        merge_key: &str,
    ) -> Vec<VirtualHost> {
        let matching: Vec<VirtualHost> = virtual_hosts
            .iter()
            .filter(|vh| vh.domains.iter().any(|domain| domain == merge_key))
            .cloned()
            .collect();

        if matching.is_empty() {
            virtual_hosts
        } else {
            matching
        }
    }
}

/// Route configuration named after the route resource it answers
pub fn route_configuration(name: &str, virtual_hosts: Vec<VirtualHost>) -> RouteConfiguration {
    RouteConfiguration { name: name.to_string(), virtual_hosts, ..Default::default() }
}
