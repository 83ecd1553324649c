//! Route resource name encoding
//!
//! Per-destination route names reuse the subset key format of clusters:
//!
//! ```text
//! {direction}|{port}|{subset}|{hostname}       outbound|9080|v1|reviews.default.svc.cluster.local
//! {direction}_.{port}_.{subset}_.{hostname}    DNS SRV form
//! ```
//!
//! A name that splits on `|` into exactly four fields also names the port of
//! a protocol-sniffed service; its virtual hosts are narrowed with the merge
//! key `{hostname}:{port}`.

use std::fmt;

const OUTBOUND_SRV_PREFIX: &str = "outbound_";
const INBOUND_SRV_PREFIX: &str = "inbound_";
const SNIFFED_PORT_FIELDS: usize = 4;

/// Why a route name does not identify a destination
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteNameError {
    #[error("route name '{0}' has no hostname")]
    MissingHostname(String),

    #[error("route name '{0}' has no valid port")]
    InvalidPort(String),
}

/// Fields of a decoded subset key.
///
/// Decoding never fails: missing fields are empty and an unparseable port is
/// zero, so callers decide what counts as valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubsetKey {
    pub direction: String,
    pub subset: String,
    pub hostname: String,
    pub port: u32,
}

/// Encode a subset key in the pipe form
pub fn build_subset_key(direction: &str, subset: &str, hostname: &str, port: u32) -> String {
    format!("{}|{}|{}|{}", direction, port, subset, hostname)
}

/// Encode a subset key in the DNS SRV form
pub fn build_dns_srv_subset_key(
    direction: &str,
    subset: &str,
    hostname: &str,
    port: u32,
) -> String {
    format!("{}_.{}_.{}_.{}", direction, port, subset, hostname)
}

/// Decode either subset key form
pub fn parse_subset_key(key: &str) -> SubsetKey {
    let dns_srv = key.starts_with(OUTBOUND_SRV_PREFIX) || key.starts_with(INBOUND_SRV_PREFIX);
    let parts: Vec<&str> =
        if dns_srv { key.splitn(4, '.').collect() } else { key.split('|').collect() };

    if parts.len() < 4 {
        return SubsetKey::default();
    }

    let subset = if dns_srv { parts[2].trim_end_matches('_') } else { parts[2] };

    SubsetKey {
        direction: parts[0].trim_end_matches('_').to_string(),
        port: parts[1].trim_end_matches('_').parse().unwrap_or(0),
        subset: subset.to_string(),
        hostname: parts[3].to_string(),
    }
}

/// How a decoded route name must be turned into virtual hosts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteNameVariant {
    Canonical,
    SniffedPort { merge_key: String },
}

/// A route name that identifies a destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteName {
    pub name: String,
    pub key: SubsetKey,
    pub variant: RouteNameVariant,
}

impl RouteName {
    /// Decode `name`, rejecting names without a hostname or a non-zero port
    pub fn parse(name: &str) -> Result<Self, RouteNameError> {
        let key = parse_subset_key(name);
        if key.hostname.is_empty() {
            return Err(RouteNameError::MissingHostname(name.to_string()));
        }
        if key.port == 0 {
            return Err(RouteNameError::InvalidPort(name.to_string()));
        }

        let fields: Vec<&str> = name.split('|').collect();
        let variant = if fields.len() == SNIFFED_PORT_FIELDS {
            RouteNameVariant::SniffedPort { merge_key: format!("{}:{}", fields[3], fields[1]) }
        } else {
            RouteNameVariant::Canonical
        };

        Ok(Self { name: name.to_string(), key, variant })
    }

    pub fn port(&self) -> u32 {
        self.key.port
    }

    pub fn hostname(&self) -> &str {
        &self.key.hostname
    }

    /// Merge key for the sniffed-port variant
    pub fn sniffed_port_key(&self) -> Option<&str> {
        match &self.variant {
            RouteNameVariant::SniffedPort { merge_key } => Some(merge_key),
            RouteNameVariant::Canonical => None,
        }
    }
}

impl fmt::Display for RouteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
