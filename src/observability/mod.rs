//! # Observability Infrastructure
//!
//! Structured logging and metrics for the push core.

pub mod logging;
pub mod metrics;

pub use logging::{init_logging, log_config_info};
pub use metrics::{init_metrics, MetricsRecorder};

use crate::config::AppConfig;
use crate::errors::Result;
use ::tracing::info;
use metrics_exporter_prometheus::PrometheusHandle;

/// Initialize logging and, when enabled, the metrics recorder, then log the
/// loaded configuration
pub fn init_observability(config: &AppConfig) -> Result<Option<PrometheusHandle>> {
    let observability = &config.observability;
    init_logging(observability);

    let handle = init_metrics(observability)?;

    info!(
        service_name = %observability.service_name,
        log_level = %observability.log_level,
        metrics_enabled = %observability.enable_metrics,
        "Observability initialized successfully"
    );
    log_config_info(config);

    Ok(handle)
}
