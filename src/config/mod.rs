//! # Configuration Management
//!
//! Settings are layered: built-in defaults, then an optional configuration
//! file, then `MESHPLANE__`-prefixed environment variables
//! (e.g. `MESHPLANE__XDS__ENABLE_ROUTE_CACHE=false`).

pub mod settings;

pub use settings::{AppConfig, ObservabilityConfig, XdsPushConfig};

use crate::Result;
use std::path::Path;

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "MESHPLANE";

/// Separator between nested keys in environment overrides
pub const ENV_SEPARATOR: &str = "__";

impl AppConfig {
    /// Load configuration from defaults, an optional file and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder =
            config::Config::builder().add_source(config::Config::try_from(&AppConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let config: AppConfig = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from defaults and the environment only
    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }
}
