//! Route discovery (RDS) generation
//!
//! Builds one route configuration per requested route name. Names must
//! decode to a destination (see [`crate::xds::route_name`]); anything else is
//! skipped with a warning so one bad name never fails the whole response.

use std::sync::Arc;

use envoy_types::pb::envoy::config::route::v3::RouteConfiguration;
use tracing::{debug, warn};

use crate::config::XdsPushConfig;
use crate::domain::{Proxy, PushContext, PushRequest, WatchedResource};
use crate::observability::MetricsRecorder;
use crate::xds::classifier::rds_needs_push;
use crate::xds::generator::{SniffedPortMerger, VirtualHostBuilder, XdsResourceGenerator};
use crate::xds::resources::{BuiltResource, Resources, XdsLogDetails, ROUTE_TYPE_URL};
use crate::xds::route::{route_configuration, DomainMatchMerger};
use crate::xds::route_cache::RouteConfigCache;
use crate::xds::route_name::RouteName;
use crate::xds_span;
use crate::Result;

/// Push version of the snapshot used when a proxy syncs before any push
const INITIAL_PUSH_VERSION: &str = "initial";

/// Route configuration generator
#[derive(Debug)]
pub struct RdsGenerator<V, M = DomainMatchMerger> {
    vhost_builder: V,
    merger: M,
    cache: RouteConfigCache,
    fallback_push: Arc<PushContext>,
    metrics: MetricsRecorder,
}

impl<V: VirtualHostBuilder> RdsGenerator<V> {
    pub fn new(vhost_builder: V, config: &XdsPushConfig) -> Self {
        Self::with_merger(vhost_builder, DomainMatchMerger, config)
    }
}

impl<V: VirtualHostBuilder, M: SniffedPortMerger> RdsGenerator<V, M> {
    pub fn with_merger(vhost_builder: V, merger: M, config: &XdsPushConfig) -> Self {
        Self {
            vhost_builder,
            merger,
            cache: RouteConfigCache::from_config(config),
            fallback_push: Arc::new(PushContext::new(INITIAL_PUSH_VERSION)),
            metrics: MetricsRecorder::new(),
        }
    }

    /// Snapshot used by [`XdsResourceGenerator::generate`] when called without
    /// a push request
    pub fn with_fallback_push(mut self, push: Arc<PushContext>) -> Self {
        self.fallback_push = push;
        self
    }

    pub fn cache(&self) -> &RouteConfigCache {
        &self.cache
    }

    pub fn vhost_builder(&self) -> &V {
        &self.vhost_builder
    }

    /// Build the route configurations for `route_names`, in request order.
    ///
    /// Names that do not decode are left out. The first collaborator error
    /// aborts the batch.
    pub fn build_http_routes(
        &self,
        proxy: &Proxy,
        push: &PushContext,
        route_names: &[String],
    ) -> Result<Resources> {
        let mut resources = Resources::with_capacity(route_names.len());
        for route_name in route_names {
            if let Some(route_config) = self.build_http_route(proxy, push, route_name)? {
                resources.push(BuiltResource::from_route_configuration(&route_config));
            }
        }
        Ok(resources)
    }

    /// Build, or fetch from the cache, the route configuration for one name.
    ///
    /// Returns `Ok(None)` when the name lacks a hostname or a valid port.
    pub fn build_http_route(
        &self,
        proxy: &Proxy,
        push: &PushContext,
        route_name: &str,
    ) -> Result<Option<Arc<RouteConfiguration>>> {
        let route = match RouteName::parse(route_name) {
            Ok(route) => route,
            Err(e) => {
                warn!(
                    node_id = %proxy.id,
                    route_name = %route_name,
                    error = %e,
                    "Skipping malformed route name"
                );
                self.metrics.record_malformed_route_name();
                return Ok(None);
            }
        };

        let route_config = self.cache.get_or_build(route_name, || {
            debug!(
                route_name = %route_name,
                hostname = %route.hostname(),
                port = route.port(),
                "Building route configuration"
            );
            let virtual_hosts = self.vhost_builder.build_outbound_virtual_hosts(
                proxy,
                push,
                route_name,
                route.port(),
            )?;

            let virtual_hosts = match route.sniffed_port_key() {
                Some(merge_key) => self.merger.merge_for_sniffed_port(virtual_hosts, merge_key),
                None => virtual_hosts,
            };

            Ok(route_configuration(route_name, virtual_hosts))
        })?;

        Ok(Some(route_config))
    }
}

impl<V: VirtualHostBuilder, M: SniffedPortMerger> XdsResourceGenerator for RdsGenerator<V, M> {
    fn generate(
        &self,
        proxy: &Proxy,
        watched: &WatchedResource,
        req: Option<&PushRequest>,
    ) -> Result<(Resources, XdsLogDetails)> {
        let _span = xds_span!("generate_routes", proxy.id).entered();

        let pushed = rds_needs_push(req);
        self.metrics.record_push_decision(ROUTE_TYPE_URL, pushed);
        if !pushed {
            debug!(
                node_id = %proxy.id,
                reasons = %req.map(PushRequest::reason_summary).unwrap_or_default(),
                kinds = ?req.map(PushRequest::updated_kinds),
                "Skipping route push: no relevant config changed"
            );
            return Ok((Resources::new(), XdsLogDetails::DEFAULT));
        }

        let push = req.map_or(self.fallback_push.as_ref(), |req| req.push.as_ref());
        let resources = self.build_http_routes(proxy, push, &watched.resource_names)?;

        self.metrics.record_generated_resources(ROUTE_TYPE_URL, resources.len());
        Ok((resources, XdsLogDetails::DEFAULT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConfigKey, ConfigKind};
    use crate::Error;
    use envoy_types::pb::envoy::config::route::v3::VirtualHost;
    use std::sync::Mutex;
    use tracing_test::traced_test;

    const REVIEWS_ROUTE: &str = "outbound|9080|v1|reviews.default.svc.cluster.local";

    #[derive(Debug, Clone, PartialEq)]
    struct BuildCall {
        route_name: String,
        port: u32,
        push_version: String,
    }

    /// Returns one virtual host per domain in `domains`, recording each call
    #[derive(Default)]
    struct RecordingHosts {
        domains: Vec<&'static str>,
        fail: bool,
        calls: Mutex<Vec<BuildCall>>,
    }

    impl RecordingHosts {
        fn with_domains(domains: &[&'static str]) -> Self {
            Self { domains: domains.to_vec(), ..Default::default() }
        }

        fn calls(&self) -> Vec<BuildCall> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl VirtualHostBuilder for RecordingHosts {
        fn build_outbound_virtual_hosts(
            &self,
            _proxy: &Proxy,
            push: &PushContext,
            route_name: &str,
            port: u32,
        ) -> Result<Vec<VirtualHost>> {
            self.calls.lock().unwrap().push(BuildCall {
                route_name: route_name.to_string(),
                port,
                push_version: push.push_version.clone(),
            });
            if self.fail {
                return Err(Error::generation(ROUTE_TYPE_URL, "service registry unavailable"));
            }
            Ok(self
                .domains
                .iter()
                .map(|domain| VirtualHost {
                    name: domain.to_string(),
                    domains: vec![domain.to_string()],
                    ..Default::default()
                })
                .collect())
        }
    }

    /// Records merge keys and keeps only the first virtual host
    #[derive(Default)]
    struct FirstHostMerger {
        keys: Mutex<Vec<String>>,
    }

    impl SniffedPortMerger for FirstHostMerger {
        fn merge_for_sniffed_port(
            &self,
            virtual_hosts: Vec<VirtualHost>,
            merge_key: &str,
        ) -> Vec<VirtualHost> {
            self.keys.lock().unwrap().push(merge_key.to_string());
            virtual_hosts.into_iter().take(1).collect()
        }
    }

    fn push() -> PushContext {
        PushContext::new("v1")
    }

    #[test]
    fn test_same_name_is_built_once() {
        let generator = RdsGenerator::new(
            RecordingHosts::with_domains(&["reviews.default.svc.cluster.local:9080"]),
            &XdsPushConfig::default(),
        );
        let proxy = Proxy::sidecar("a");

        let first = generator.build_http_route(&proxy, &push(), REVIEWS_ROUTE).unwrap().unwrap();
        let second = generator.build_http_route(&proxy, &push(), REVIEWS_ROUTE).unwrap().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.name, REVIEWS_ROUTE);
        assert_eq!(generator.vhost_builder().calls().len(), 1);
    }

    #[test]
    fn test_build_passes_port_and_snapshot() {
        let generator =
            RdsGenerator::new(RecordingHosts::with_domains(&["a"]), &XdsPushConfig::default());
        generator.build_http_route(&Proxy::sidecar("a"), &push(), REVIEWS_ROUTE).unwrap();

        assert_eq!(
            generator.vhost_builder().calls(),
            vec![BuildCall {
                route_name: REVIEWS_ROUTE.to_string(),
                port: 9080,
                push_version: "v1".to_string(),
            }]
        );
    }

    #[test]
    fn test_four_field_name_is_merged_for_sniffed_port() {
        let generator = RdsGenerator::with_merger(
            RecordingHosts::with_domains(&["first", "second"]),
            FirstHostMerger::default(),
            &XdsPushConfig::default(),
        );

        let route_config = generator
            .build_http_route(&Proxy::sidecar("a"), &push(), REVIEWS_ROUTE)
            .unwrap()
            .unwrap();

        assert_eq!(
            *generator.merger.keys.lock().unwrap(),
            vec!["reviews.default.svc.cluster.local:9080".to_string()]
        );
        assert_eq!(route_config.virtual_hosts.len(), 1);
        assert_eq!(route_config.virtual_hosts[0].name, "first");
    }

    #[test]
    fn test_dns_srv_name_skips_merge() {
        let generator = RdsGenerator::with_merger(
            RecordingHosts::with_domains(&["first", "second"]),
            FirstHostMerger::default(),
            &XdsPushConfig::default(),
        );

        let route_config = generator
            .build_http_route(
                &Proxy::sidecar("a"),
                &push(),
                "outbound_.9080_.v1_.reviews.default.svc.cluster.local",
            )
            .unwrap()
            .unwrap();

        assert!(generator.merger.keys.lock().unwrap().is_empty());
        assert_eq!(route_config.virtual_hosts.len(), 2);
    }

    #[traced_test]
    #[test]
    fn test_malformed_names_are_skipped_with_warning() {
        let generator =
            RdsGenerator::new(RecordingHosts::with_domains(&["a"]), &XdsPushConfig::default());
        let proxy = Proxy::sidecar("a");

        for route_name in ["outbound|9080|v1|", "outbound|0|v1|reviews"] {
            let built = generator.build_http_route(&proxy, &push(), route_name).unwrap();
            assert!(built.is_none());
        }

        assert!(generator.cache().is_empty());
        assert!(generator.vhost_builder().calls().is_empty());
        assert!(logs_contain("Skipping malformed route name"));
    }

    #[test]
    fn test_batch_keeps_request_order_and_drops_bad_names() {
        let generator =
            RdsGenerator::new(RecordingHosts::with_domains(&["a"]), &XdsPushConfig::default());
        let names = vec![
            "outbound|80||ratings.default.svc.cluster.local".to_string(),
            "80".to_string(),
            REVIEWS_ROUTE.to_string(),
        ];

        let resources = generator.build_http_routes(&Proxy::sidecar("a"), &push(), &names).unwrap();
        let built: Vec<&str> = resources.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(built, vec!["outbound|80||ratings.default.svc.cluster.local", REVIEWS_ROUTE]);
        assert!(resources.iter().all(|r| r.type_url() == ROUTE_TYPE_URL));
    }

    #[test]
    fn test_collaborator_error_aborts_batch() {
        let generator = RdsGenerator::new(
            RecordingHosts { fail: true, ..Default::default() },
            &XdsPushConfig::default(),
        );
        let names = vec![REVIEWS_ROUTE.to_string()];

        let err = generator.build_http_routes(&Proxy::sidecar("a"), &push(), &names).unwrap_err();
        assert!(matches!(err, Error::Generation { .. }));
        assert!(generator.cache().is_empty());
    }

    #[test]
    fn test_disabled_cache_rebuilds_every_time() {
        let config = XdsPushConfig { enable_route_cache: false, ..Default::default() };
        let generator = RdsGenerator::new(RecordingHosts::with_domains(&["a"]), &config);
        let proxy = Proxy::sidecar("a");

        generator.build_http_route(&proxy, &push(), REVIEWS_ROUTE).unwrap();
        generator.build_http_route(&proxy, &push(), REVIEWS_ROUTE).unwrap();

        assert_eq!(generator.vhost_builder().calls().len(), 2);
        assert!(generator.cache().is_empty());
    }

    #[test]
    fn test_generate_uses_request_snapshot() {
        let generator =
            RdsGenerator::new(RecordingHosts::with_domains(&["a"]), &XdsPushConfig::default());
        let req = PushRequest::full(Arc::new(PushContext::new("v7")));
        let watched = WatchedResource::new(ROUTE_TYPE_URL, vec![REVIEWS_ROUTE.to_string()]);

        let (resources, _) =
            generator.generate(&Proxy::sidecar("a"), &watched, Some(&req)).unwrap();
        assert_eq!(resources.len(), 1);
        assert_eq!(generator.vhost_builder().calls()[0].push_version, "v7");
    }

    #[test]
    fn test_generate_without_request_uses_fallback_snapshot() {
        let generator =
            RdsGenerator::new(RecordingHosts::with_domains(&["a"]), &XdsPushConfig::default())
                .with_fallback_push(Arc::new(PushContext::new("bootstrap")));
        let watched = WatchedResource::new(ROUTE_TYPE_URL, vec![REVIEWS_ROUTE.to_string()]);

        generator.generate(&Proxy::sidecar("a"), &watched, None).unwrap();
        assert_eq!(generator.vhost_builder().calls()[0].push_version, "bootstrap");
    }

    #[test]
    fn test_generate_skips_route_irrelevant_changes() {
        let generator =
            RdsGenerator::new(RecordingHosts::with_domains(&["a"]), &XdsPushConfig::default());
        let req = PushRequest::full(Arc::new(PushContext::new("v2")))
            .with_config(ConfigKey::new(ConfigKind::AuthorizationPolicy, "default", "deny-all"));
        let watched = WatchedResource::new(ROUTE_TYPE_URL, vec![REVIEWS_ROUTE.to_string()]);

        let (resources, log_details) =
            generator.generate(&Proxy::sidecar("a"), &watched, Some(&req)).unwrap();
        assert!(resources.is_empty());
        assert_eq!(log_details, XdsLogDetails::DEFAULT);
        assert!(generator.vhost_builder().calls().is_empty());
    }
}
