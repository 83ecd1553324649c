//! # Metrics Collection
//!
//! Counters for push decisions, generated resources and the route cache.
//! Recording is a no-op until a recorder is installed.

use crate::config::ObservabilityConfig;
use crate::errors::{Error, Result};
use ::tracing::info;
use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Metrics recorder that tracks push-core metrics
#[derive(Debug, Clone, Default)]
pub struct MetricsRecorder;

impl MetricsRecorder {
    /// Create a new metrics recorder instance
    pub fn new() -> Self {
        Self
    }

    /// Record the outcome of a push-necessity check
    pub fn record_push_decision(&self, type_url: &str, pushed: bool) {
        let outcome = if pushed { "pushed" } else { "skipped" };
        let labels = [("type_url", type_url.to_string()), ("outcome", outcome.to_string())];
        counter!("xds_push_decisions_total", &labels).increment(1);
    }

    /// Record how many resources a generation produced
    pub fn record_generated_resources(&self, type_url: &str, count: usize) {
        let labels = [("type_url", type_url.to_string())];
        histogram!("xds_generated_resources", &labels).record(count as f64);
    }

    /// Record a route cache lookup
    pub fn record_route_cache(&self, hit: bool) {
        let result = if hit { "hit" } else { "miss" };
        counter!("xds_route_cache_lookups_total", "result" => result).increment(1);
    }

    /// Record a route name that did not decode to a destination
    pub fn record_malformed_route_name(&self) {
        counter!("xds_route_names_malformed_total").increment(1);
    }

    fn describe(&self) {
        describe_counter!(
            "xds_push_decisions_total",
            Unit::Count,
            "Push-necessity checks by resource type and outcome"
        );
        describe_counter!(
            "xds_route_cache_lookups_total",
            Unit::Count,
            "Route configuration cache lookups by result"
        );
        describe_histogram!(
            "xds_generated_resources",
            Unit::Count,
            "Resources produced per generation by resource type"
        );
        describe_counter!(
            "xds_route_names_malformed_total",
            Unit::Count,
            "Requested route names skipped because they could not be decoded"
        );
    }
}

/// Install the Prometheus recorder.
///
/// Returns `None` when metrics are disabled. The handle renders the scrape
/// payload; serving it is left to the embedding server.
pub fn init_metrics(config: &ObservabilityConfig) -> Result<Option<PrometheusHandle>> {
    if !config.enable_metrics {
        return Ok(None);
    }

    let handle = PrometheusBuilder::new()
        .add_global_label("service", &config.service_name)
        .install_recorder()
        .map_err(|e| Error::config(format!("Failed to initialize metrics recorder: {}", e)))?;

    MetricsRecorder::new().describe();

    info!(service_name = %config.service_name, "Metrics collection initialized");

    Ok(Some(handle))
}
