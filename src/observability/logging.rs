//! # Structured Logging
//!
//! Provides the tracing subscriber setup and the span macro used around
//! generation calls.

use crate::config::{AppConfig, ObservabilityConfig};
use tracing_subscriber::{fmt, EnvFilter};

/// Create a tracing span for xDS operations
#[macro_export]
macro_rules! xds_span {
    ($operation:expr, $node_id:expr) => {
        tracing::info_span!(
            "xds_operation",
            operation = %$operation,
            node_id = %$node_id,
            operation_id = %uuid::Uuid::new_v4()
        )
    };
    ($operation:expr, $node_id:expr, $($field:tt)*) => {
        tracing::info_span!(
            "xds_operation",
            operation = %$operation,
            node_id = %$node_id,
            operation_id = %uuid::Uuid::new_v4(),
            $($field)*
        )
    };
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Returns `false` when
/// a subscriber was already installed (e.g. by a test harness).
pub fn init_logging(config: &ObservabilityConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_ascii_lowercase()));

    let result = if config.json_logging {
        tracing::subscriber::set_global_default(
            fmt().json().with_env_filter(filter).with_current_span(true).finish(),
        )
    } else {
        tracing::subscriber::set_global_default(fmt().with_env_filter(filter).finish())
    };

    result.is_ok()
}

/// Log configuration at startup
pub fn log_config_info(config: &AppConfig) {
    tracing::info!(
        route_cache_enabled = %config.xds.enable_route_cache,
        filter_gateway_cluster_config = %config.xds.filter_gateway_cluster_config,
        log_level = %config.observability.log_level,
        metrics_enabled = %config.observability.enable_metrics,
        "meshplane push core configuration"
    );
}
