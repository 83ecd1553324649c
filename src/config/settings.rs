//! # Configuration Settings
//!
//! Defines the configuration structure for the meshplane push core.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Push and generation behaviour
    #[validate(nested)]
    pub xds: XdsPushConfig,

    /// Logging and metrics
    #[validate(nested)]
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        Validate::validate(self).map_err(Error::from)?;
        Ok(())
    }
}

/// Toggles for the push-decision and generation core.
///
/// Both switches are process wide; they are read once when the generators are
/// constructed.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(default)]
pub struct XdsPushConfig {
    /// Reuse built route configurations across requests for the same route name
    pub enable_route_cache: bool,

    /// Push clusters to routers when a VirtualService or Gateway changes
    pub filter_gateway_cluster_config: bool,
}

impl Default for XdsPushConfig {
    fn default() -> Self {
        Self { enable_route_cache: true, filter_gateway_cluster_config: false }
    }
}

/// Observability configuration for logging and metrics
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error)
    #[validate(custom(function = "validate_log_level"))]
    pub log_level: String,

    /// Enable JSON structured logging
    pub json_logging: bool,

    /// Install the Prometheus metrics recorder
    pub enable_metrics: bool,

    /// Service name attached to metrics
    #[validate(length(min = 1, message = "Service name cannot be empty"))]
    pub service_name: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logging: false,
            enable_metrics: false,
            service_name: "meshplane".to_string(),
        }
    }
}

fn validate_log_level(level: &str) -> std::result::Result<(), ValidationError> {
    if LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
        return Ok(());
    }
    let mut error = ValidationError::new("log_level");
    error.message = Some("Log level must be one of trace, debug, info, warn, error".into());
    Err(error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validation() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.xds.enable_route_cache);
        assert!(!config.xds.filter_gateway_cluster_config);
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = AppConfig::default();
        config.observability.log_level = "verbose".to_string();

        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
        assert!(err.to_string().contains("observability.log_level"));
    }

    #[test]
    fn test_log_level_is_case_insensitive() {
        let mut config = AppConfig::default();
        config.observability.log_level = "DEBUG".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_service_name() {
        let mut config = AppConfig::default();
        config.observability.service_name = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: AppConfig =
            serde_yaml::from_str("xds:\n  filter_gateway_cluster_config: true\n").unwrap();
        assert!(config.xds.filter_gateway_cluster_config);
        assert!(config.xds.enable_route_cache);
        assert_eq!(config.observability, ObservabilityConfig::default());
    }
}
