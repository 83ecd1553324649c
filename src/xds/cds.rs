//! Cluster discovery (CDS) generation
//!
//! Decides whether clusters must be pushed, asks the [`ClusterBuilder`] for
//! them and narrows the result to the proxy's subscription.

use tracing::debug;

use crate::config::XdsPushConfig;
use crate::domain::{Proxy, PushRequest, WatchedResource};
use crate::observability::MetricsRecorder;
use crate::xds::classifier::cds_needs_push;
use crate::xds::filter::filter_by_watched_names;
use crate::xds::generator::{ClusterBuilder, XdsDeltaResourceGenerator, XdsResourceGenerator};
use crate::xds::resources::{DeltaResources, Resources, XdsLogDetails, CLUSTER_TYPE_URL};
use crate::xds_span;
use crate::Result;

/// Cluster generator
#[derive(Debug)]
pub struct CdsGenerator<B> {
    builder: B,
    filter_gateway_cluster_config: bool,
    metrics: MetricsRecorder,
}

impl<B: ClusterBuilder> CdsGenerator<B> {
    pub fn new(builder: B, config: &XdsPushConfig) -> Self {
        Self {
            builder,
            filter_gateway_cluster_config: config.filter_gateway_cluster_config,
            metrics: MetricsRecorder::new(),
        }
    }

    pub fn builder(&self) -> &B {
        &self.builder
    }

    fn needs_push(&self, req: Option<&PushRequest>, proxy: &Proxy) -> bool {
        let pushed = cds_needs_push(req, proxy, self.filter_gateway_cluster_config);
        self.metrics.record_push_decision(CLUSTER_TYPE_URL, pushed);
        if !pushed {
            debug!(
                node_id = %proxy.id,
                reasons = %req.map(PushRequest::reason_summary).unwrap_or_default(),
                kinds = ?req.map(PushRequest::updated_kinds),
                "Skipping cluster push: no relevant config changed"
            );
        }
        pushed
    }
}

impl<B: ClusterBuilder> XdsResourceGenerator for CdsGenerator<B> {
    fn generate(
        &self,
        proxy: &Proxy,
        watched: &WatchedResource,
        req: Option<&PushRequest>,
    ) -> Result<(Resources, XdsLogDetails)> {
        let _span = xds_span!("generate_clusters", proxy.id).entered();
        debug!(
            watched_clusters = ?watched.resource_names,
            "Building clusters"
        );

        if !self.needs_push(req, proxy) {
            return Ok((Resources::new(), XdsLogDetails::DEFAULT));
        }

        let (clusters, log_details) = self.builder.build_clusters(proxy, req)?;
        let filtered = filter_by_watched_names(clusters, watched, false);

        self.metrics.record_generated_resources(CLUSTER_TYPE_URL, filtered.len());
        Ok((filtered, log_details))
    }
}

impl<B: ClusterBuilder> XdsDeltaResourceGenerator for CdsGenerator<B> {
    fn generate_deltas(
        &self,
        proxy: &Proxy,
        req: Option<&PushRequest>,
        watched: &WatchedResource,
    ) -> Result<DeltaResources> {
        let _span = xds_span!("generate_cluster_deltas", proxy.id).entered();
        debug!(
            watched_clusters = ?watched.resource_names,
            "Building cluster deltas"
        );

        if !self.needs_push(req, proxy) {
            return Ok(DeltaResources::none());
        }

        let delta = self.builder.build_delta_clusters(proxy, req, watched)?;
        if delta.used_delta {
            self.metrics.record_generated_resources(CLUSTER_TYPE_URL, delta.updated.len());
            return Ok(delta);
        }

        // Full recomputation: scope it to the subscription. A `*` subscription
        // keeps everything on this path.
        let updated = filter_by_watched_names(delta.updated, watched, true);
        self.metrics.record_generated_resources(CLUSTER_TYPE_URL, updated.len());

        Ok(DeltaResources {
            updated,
            removed: delta.removed,
            log_details: delta.log_details,
            used_delta: false,
        })
    }
}
