//! Narrowing generated resources to a proxy's subscription.

use std::collections::HashSet;

use crate::domain::WatchedResource;
use crate::xds::resources::Resources;

/// Keep the resources whose name the proxy subscribed to.
///
/// A subscription without names keeps everything. With `allow_wildcard`, a
/// `*` name also keeps everything. Input order is preserved.
pub fn filter_by_watched_names(
    resources: Resources,
    watched: &WatchedResource,
    allow_wildcard: bool,
) -> Resources {
    if watched.subscribes_to_all() {
        return resources;
    }
    if allow_wildcard && watched.contains_wildcard() {
        return resources;
    }

    let watched: HashSet<&str> = watched.resource_names.iter().map(String::as_str).collect();
    resources.into_iter().filter(|resource| watched.contains(resource.name.as_str())).collect()
}
