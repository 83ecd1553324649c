//! Domain layer
//!
//! Plain types describing what a push is about: which configuration changed,
//! which proxy is being served and what it subscribed to. Nothing in here
//! depends on the xDS wire types.
//!
//! ## Module Organization
//!
//! - `config_kind`: changed configuration kinds and keys
//! - `push`: push requests and the mesh snapshot they carry
//! - `proxy`: proxies and their per-type subscriptions

pub mod config_kind;
pub mod proxy;
pub mod push;

pub use config_kind::{ConfigKey, ConfigKind, UnknownConfigKind};
pub use proxy::{NodeType, Proxy, WatchedResource, WILDCARD_RESOURCE_NAME};
pub use push::{PushContext, PushRequest, TriggerReason};
