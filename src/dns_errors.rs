// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Error types for zone resolution and provider selection.
//!
//! This module provides specialized error types for:
//! - Matching a hostname to the zone that owns it
//! - Resolving a provider from a credential secret
//! - Routing a record to the delegation backend
//!
//! Every error is terminal for the operation that raised it. Nothing in this crate
//! retries; callers decide whether a failure is worth requeueing.

use thiserror::Error;

/// Errors that can occur while matching a hostname to a managed zone.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ZoneError {
    /// No zone matches any suffix of the host
    ///
    /// Also returned when the host collapses to a bare public suffix (e.g. `co.uk`)
    /// or is a single label with no parent domain.
    #[error("no zone found for host '{host}'")]
    NoZoneForHost {
        /// The host that could not be placed
        host: String,
    },

    /// The host is the apex of a zone and apex records are not allowed
    ///
    /// Apex names can only carry address records, never aliases.
    #[error("host '{host}' is the apex of zone '{zone}' and apex domains are not allowed")]
    ApexDomainNotAllowed {
        /// The host that was requested
        host: String,
        /// The zone whose apex matched
        zone: String,
    },

    /// More than one zone shares the matched name
    #[error("multiple zones named '{zone}' found for host '{host}'")]
    MultipleZonesFound {
        /// The host that was requested
        host: String,
        /// The ambiguous zone name
        zone: String,
    },
}

/// Errors that can occur while registering, selecting or constructing a provider.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// A non-delegating accessor carries no reference to a credential secret
    #[error("provider ref is required for '{accessor}'")]
    ProviderRefRequired {
        /// Name of the accessor missing the reference
        accessor: String,
    },

    /// Delegation was required but no delegation function was supplied
    #[error("delegation provider is not configured (required by '{accessor}')")]
    DelegationProviderNotConfigured {
        /// Name of the accessor that needed delegation
        accessor: String,
    },

    /// The secret's declared type has no provider mapping
    #[error("unsupported provider secret type '{secret_type}'")]
    UnsupportedProvider {
        /// The declared secret type (empty when unset)
        secret_type: String,
    },

    /// A provider selected at dispatch time has no constructor registered
    #[error("provider '{name}' is not registered")]
    Unregistered {
        /// The provider name
        name: String,
    },

    /// One or more providers passed to factory construction have no constructor
    #[error("{}", unregistered_message(.names))]
    UnregisteredProviders {
        /// Every unregistered provider name, in the order they were requested
        names: Vec<String>,
    },

    /// The provider is registered but not enabled for this factory
    #[error("provider '{name}' is not enabled")]
    NotEnabled {
        /// The provider name
        name: String,
    },

    /// The referenced credential secret could not be found
    #[error("secret '{namespace}/{name}' not found")]
    SecretNotFound {
        /// Namespace the secret was looked up in
        namespace: String,
        /// Secret name
        name: String,
    },

    /// A provider constructor rejected its configuration
    #[error("failed to construct provider '{provider}': {reason}")]
    Construction {
        /// The provider name
        provider: String,
        /// Why construction failed
        reason: String,
    },

    /// A backend operation failed
    #[error("provider '{provider}' failed: {reason}")]
    Backend {
        /// The provider name
        provider: String,
        /// Why the operation failed
        reason: String,
    },

    /// A record could not be placed in a zone
    #[error(transparent)]
    Zone(#[from] ZoneError),

    /// Kubernetes API error while reading the credential secret
    #[error(transparent)]
    Kube(#[from] kube::Error),
}

fn unregistered_message(names: &[String]) -> String {
    names
        .iter()
        .map(|name| format!("provider '{name}' is not registered"))
        .collect::<Vec<_>>()
        .join("\n")
}

impl ProviderError {
    /// Whether this error names an unregistered provider, singly or as part of a joined error.
    #[must_use]
    pub fn is_unregistered(&self) -> bool {
        matches!(
            self,
            Self::Unregistered { .. } | Self::UnregisteredProviders { .. }
        )
    }
}

#[cfg(test)]
#[path = "dns_errors_tests.rs"]
mod dns_errors_tests;
