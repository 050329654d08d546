// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! DNS provider abstraction and selection.
//!
//! A [`Provider`] is a backend able to list and mutate records in the zones of
//! one account. Providers are never constructed directly by reconcilers: the
//! [`factory::Factory`] reads the credential secret an accessor references,
//! maps the secret type to a provider name, and dispatches to the constructor
//! registered under that name in a [`registry::ProviderRegistry`].
//!
//! When the accessor asks for delegation, or the resolved provider cannot be
//! authoritative for it, the factory hands the accessor to a delegation
//! function instead.
//!
//! # Modules
//!
//! - [`registry`] - Provider name to constructor mapping
//! - [`factory`] - Provider selection for an accessor
//! - [`secrets`] - Credential secret lookup
//! - [`inmemory`] - In-process provider

pub mod factory;
pub mod inmemory;
pub mod registry;
pub mod secrets;

#[cfg(test)]
pub(crate) mod test_support;

use crate::dns_errors::ProviderError;
use crate::endpoint::{Changes, Endpoint};
use crate::zone::Zone;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A DNS backend holding the records of one account.
#[async_trait]
pub trait Provider: Send + Sync {
    /// List every record the provider manages.
    async fn list_records(&self) -> Result<Vec<Endpoint>, ProviderError>;

    /// Apply a batch of record mutations.
    async fn apply_changes(&self, changes: &Changes) -> Result<(), ProviderError>;

    /// List the zones the account can author records in.
    async fn zones_for_account(&self) -> Result<Vec<Zone>, ProviderError>;

    /// Registered name of the provider.
    fn name(&self) -> &str;

    /// Whether records of `accessor` must be routed to the delegation backend.
    fn requires_delegation(&self, _accessor: &dyn ProviderAccessor) -> bool {
        false
    }
}

/// Reference to a credential secret in the accessor's namespace.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ProviderRef {
    /// Secret name
    pub name: String,
}

/// Anything that owns records and can be handed to a provider.
pub trait ProviderAccessor: Send + Sync {
    /// `namespace/name` identifier used in errors and logs.
    fn accessor_name(&self) -> String;

    /// Namespace credential secrets are looked up in.
    fn namespace(&self) -> String;

    /// Credential secret reference, if any.
    fn provider_ref(&self) -> Option<&ProviderRef>;

    /// Whether the accessor explicitly asks for delegation.
    fn is_delegating(&self) -> bool;

    /// Hostname at the root of the accessor's answer tree.
    fn root_host(&self) -> &str;
}

/// Restricts the domains a provider operates on.
///
/// An empty filter matches everything. Otherwise a name matches when it equals,
/// or is a subdomain of, one of `filters` and of none of `exclusions`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DomainFilter {
    /// Included domains
    pub filters: Vec<String>,
    /// Excluded domains
    pub exclusions: Vec<String>,
}

impl DomainFilter {
    /// Filter including `domains`.
    #[must_use]
    pub fn new(domains: &[&str]) -> Self {
        Self {
            filters: domains.iter().map(ToString::to_string).collect(),
            exclusions: Vec::new(),
        }
    }

    /// Whether `name` passes the filter.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        let included =
            self.filters.is_empty() || self.filters.iter().any(|d| is_same_or_subdomain(name, d));
        included
            && !self
                .exclusions
                .iter()
                .any(|d| is_same_or_subdomain(name, d))
    }
}

fn is_same_or_subdomain(name: &str, domain: &str) -> bool {
    let name = name.trim_end_matches('.').to_ascii_lowercase();
    let domain = domain.trim_end_matches('.').to_ascii_lowercase();
    if domain.is_empty() {
        return false;
    }
    name == domain || name.ends_with(&format!(".{domain}"))
}

/// Settings passed to every provider constructor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Domains the provider may touch
    pub domain_filter: DomainFilter,
    /// Zone identifiers the provider may touch; empty means all
    pub zone_id_filter: Vec<String>,
}

impl ProviderConfig {
    /// Whether `zone` passes the domain and zone-id filters.
    #[must_use]
    pub fn allows_zone(&self, zone: &Zone) -> bool {
        (self.zone_id_filter.is_empty() || self.zone_id_filter.iter().any(|id| *id == zone.id))
            && self.domain_filter.matches(&zone.name)
    }
}
