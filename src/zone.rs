// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Zone ownership resolution.
//!
//! Given an arbitrary hostname and the zones a provider account can author
//! records in, [`find_zone_for_host`] picks the most specific zone owning the
//! host by walking up the name one label at a time.
//!
//! # Rules
//!
//! - A host equal to its own public suffix (`com`, `co.uk`) is never owned.
//! - With `deny_apex`, a host equal to a zone name is rejected: apex names can
//!   only carry address records, not the aliases this crate manages.
//! - Two zones with the same name are a configuration error, never resolved
//!   automatically.
//!
//! # Example
//!
//! ```rust
//! use hostroute::zone::{find_zone_for_host, Zone};
//!
//! let zones = vec![
//!     Zone::new("z1", "example.com"),
//!     Zone::new("z2", "test.example.com"),
//! ];
//!
//! let host = "app.test.example.com";
//! let (zone, subdomain) = find_zone_for_host(host, host, &zones, false).unwrap();
//! assert_eq!(zone.id, "z2");
//! assert_eq!(subdomain, "app");
//! ```

use crate::dns_errors::ZoneError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// A DNS zone a provider can author records in.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Zone {
    /// Provider-specific zone identifier
    pub id: String,
    /// Zone name (e.g. `example.com`)
    pub name: String,
}

impl Zone {
    /// Create a zone from its identifier and name.
    #[must_use]
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
        }
    }
}

/// Find the most specific zone owning `host`.
///
/// `original_host` is the host as requested and stays fixed across the walk;
/// `host` is the suffix being examined. Callers pass the same value for both.
///
/// Returns the owning zone and the subdomain of `original_host` relative to it
/// (empty when the host is the zone apex).
///
/// # Errors
///
/// - [`ZoneError::NoZoneForHost`] when no suffix matches, the host is a bare
///   public suffix, or it has a single label.
/// - [`ZoneError::ApexDomainNotAllowed`] when `deny_apex` is set and
///   `original_host` is a zone name.
/// - [`ZoneError::MultipleZonesFound`] when several zones share the matched name.
pub fn find_zone_for_host<'a>(
    original_host: &str,
    host: &str,
    zones: &'a [Zone],
    deny_apex: bool,
) -> Result<(&'a Zone, String), ZoneError> {
    let no_zone = || ZoneError::NoZoneForHost {
        host: original_host.to_string(),
    };

    if zones.is_empty() {
        return Err(no_zone());
    }

    let host = normalize(host);
    let original = normalize(original_host);
    trace!(host, original_host = original, "Looking up zone for host");

    let lowered = host.to_ascii_lowercase();
    match psl::suffix_str(&lowered) {
        Some(suffix) if suffix != lowered => {}
        _ => return Err(no_zone()),
    }

    if deny_apex {
        if let Some(zone) = zones
            .iter()
            .find(|z| normalize(&z.name).eq_ignore_ascii_case(original))
        {
            return Err(ZoneError::ApexDomainNotAllowed {
                host: original_host.to_string(),
                zone: zone.name.clone(),
            });
        }
    }

    let parent_domain = match host.split_once('.') {
        Some((_, parent)) if !parent.is_empty() => parent,
        _ => return Err(no_zone()),
    };

    if deny_apex && host.eq_ignore_ascii_case(original) {
        return find_zone_for_host(original_host, parent_domain, zones, deny_apex);
    }

    let matches: Vec<&Zone> = zones
        .iter()
        .filter(|z| normalize(&z.name).eq_ignore_ascii_case(host))
        .collect();

    match matches.as_slice() {
        [] => find_zone_for_host(original_host, parent_domain, zones, deny_apex),
        [zone] => {
            let subdomain = subdomain_of(original, normalize(&zone.name));
            trace!(zone = %zone.name, subdomain = %subdomain, "Matched zone for host");
            Ok((*zone, subdomain))
        }
        _ => Err(ZoneError::MultipleZonesFound {
            host: original_host.to_string(),
            zone: host.to_string(),
        }),
    }
}

/// Strip the zone name from the end of `host`, dropping the joining dot.
fn subdomain_of(host: &str, zone_name: &str) -> String {
    if host.eq_ignore_ascii_case(zone_name) {
        return String::new();
    }
    host.get(..host.len().saturating_sub(zone_name.len()))
        .unwrap_or_default()
        .trim_end_matches('.')
        .to_string()
}

fn normalize(name: &str) -> &str {
    name.trim_end_matches('.')
}

#[cfg(test)]
#[path = "zone_tests.rs"]
mod zone_tests;
