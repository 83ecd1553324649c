//! # Meshplane
//!
//! Push-decision and resource-generation core of a service-mesh control plane.
//! Given a pending push request and a connected Envoy proxy, it decides whether
//! the cluster and route families must be regenerated and produces the
//! resources the proxy subscribed to.
//!
//! ## Architecture
//!
//! ```text
//! PushRequest → classifier → CdsGenerator / RdsGenerator → Resources
//!                                 ↓               ↓
//!                          ClusterBuilder   VirtualHostBuilder + RouteConfigCache
//! ```
//!
//! The mesh model itself (clusters, virtual hosts) lives behind the builder
//! traits in [`xds::generator`]; the discovery server that streams responses
//! to proxies lives outside this crate.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use meshplane::xds::{RdsGenerator, VirtualHostBuilder};
//! use meshplane::{AppConfig, Result};
//!
//! fn routes_generator<V: VirtualHostBuilder>(builder: V) -> Result<RdsGenerator<V>> {
//!     let config = AppConfig::from_env()?;
//!     meshplane::observability::init_observability(&config)?;
//!     Ok(RdsGenerator::new(builder, &config.xds))
//! }
//! ```

pub mod config;
pub mod domain;
pub mod errors;
pub mod observability;
pub mod xds;

// Re-export commonly used types and traits
pub use config::{AppConfig, ObservabilityConfig, XdsPushConfig};
pub use domain::{ConfigKey, ConfigKind, Proxy, PushContext, PushRequest, WatchedResource};
pub use errors::{Error, Result};
pub use observability::init_observability;

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
