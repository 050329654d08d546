// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Provider selection for an accessor.
//!
//! [`Factory::provider_for`] decides which backend services an accessor:
//!
//! 1. An accessor asking for delegation goes straight to the delegation function.
//! 2. Otherwise it must reference a credential secret. The secret is fetched,
//!    its type mapped to a provider name, and the registered constructor for
//!    that name is run, provided the name is enabled on this factory.
//! 3. If the constructed provider reports that it cannot be authoritative for
//!    the accessor, the accessor is delegated after all.
//!
//! Delegation without a configured delegation function is an error, even when a
//! concrete provider was resolved.

use super::registry::{name_for_provider_secret, ProviderRegistry};
use super::secrets::SecretStore;
use super::{Provider, ProviderAccessor, ProviderConfig};
use crate::constants::ENV_ENABLED_PROVIDERS;
use crate::dns_errors::ProviderError;
use futures::future::BoxFuture;
use std::sync::Arc;
use tracing::{debug, info};

/// Builds the backend used when an accessor's records must be delegated.
///
/// Read what is needed from the accessor before building the future; the future
/// itself may await the secret store.
pub type DelegationFn = Arc<
    dyn Fn(
            Arc<dyn SecretStore>,
            &dyn ProviderAccessor,
            &ProviderConfig,
        ) -> BoxFuture<'static, Result<Arc<dyn Provider>, ProviderError>>
        + Send
        + Sync,
>;

/// Factory settings read from the environment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FactoryOptions {
    /// Enabled provider names; empty means the registry defaults
    pub providers: Vec<String>,
}

impl FactoryOptions {
    /// Read [`ENV_ENABLED_PROVIDERS`] (comma-separated provider names).
    #[must_use]
    pub fn from_env() -> Self {
        Self::parse(&std::env::var(ENV_ENABLED_PROVIDERS).unwrap_or_default())
    }

    /// Parse a comma-separated provider list, ignoring blanks.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        Self {
            providers: value
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(ToString::to_string)
                .collect(),
        }
    }
}

/// Resolves the provider servicing an accessor.
pub struct Factory {
    registry: Arc<ProviderRegistry>,
    store: Arc<dyn SecretStore>,
    providers: Vec<String>,
    delegation: Option<DelegationFn>,
}

impl Factory {
    /// Create a factory enabling `providers` (registry defaults when empty).
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::UnregisteredProviders`] naming every enabled
    /// provider that has no registered constructor.
    pub fn new(
        registry: Arc<ProviderRegistry>,
        store: Arc<dyn SecretStore>,
        providers: &[String],
        delegation: Option<DelegationFn>,
    ) -> Result<Self, ProviderError> {
        let providers = if providers.is_empty() {
            registry.default_providers()
        } else {
            providers.to_vec()
        };

        let unregistered: Vec<String> = providers
            .iter()
            .filter(|name| !registry.is_registered(name))
            .cloned()
            .collect();
        if !unregistered.is_empty() {
            return Err(ProviderError::UnregisteredProviders {
                names: unregistered,
            });
        }

        info!(
            providers = ?providers,
            delegation = delegation.is_some(),
            "Created provider factory"
        );
        Ok(Self {
            registry,
            store,
            providers,
            delegation,
        })
    }

    /// Provider names enabled on this factory.
    #[must_use]
    pub fn enabled_providers(&self) -> &[String] {
        &self.providers
    }

    /// Resolve the provider servicing `accessor`.
    ///
    /// # Errors
    ///
    /// - [`ProviderError::ProviderRefRequired`] for a non-delegating accessor without a secret reference
    /// - [`ProviderError::UnsupportedProvider`] when the secret type has no provider
    /// - [`ProviderError::Unregistered`] / [`ProviderError::NotEnabled`] for the resolved provider name
    /// - [`ProviderError::DelegationProviderNotConfigured`] when delegation is needed but unavailable
    /// - secret lookup and constructor errors
    pub async fn provider_for(
        &self,
        accessor: &dyn ProviderAccessor,
        config: &ProviderConfig,
    ) -> Result<Arc<dyn Provider>, ProviderError> {
        if accessor.is_delegating() {
            debug!(accessor = %accessor.accessor_name(), "Accessor requests delegation");
            return self.delegate(accessor, config).await;
        }

        let provider_ref = accessor
            .provider_ref()
            .filter(|r| !r.name.is_empty())
            .ok_or_else(|| ProviderError::ProviderRefRequired {
                accessor: accessor.accessor_name(),
            })?;

        let secret = self
            .store
            .get_secret(&accessor.namespace(), &provider_ref.name)
            .await?;
        let name = name_for_provider_secret(&secret)?;

        let constructor =
            self.registry
                .constructor(name)
                .ok_or_else(|| ProviderError::Unregistered {
                    name: name.to_string(),
                })?;
        if !self.providers.iter().any(|p| p == name) {
            return Err(ProviderError::NotEnabled {
                name: name.to_string(),
            });
        }

        let provider = constructor.construct(&self.store, &secret, config).await?;
        if provider.requires_delegation(accessor) {
            debug!(
                accessor = %accessor.accessor_name(),
                provider = name,
                "Provider cannot be authoritative, delegating"
            );
            return self.delegate(accessor, config).await;
        }

        debug!(accessor = %accessor.accessor_name(), provider = name, "Resolved provider");
        Ok(provider)
    }

    async fn delegate(
        &self,
        accessor: &dyn ProviderAccessor,
        config: &ProviderConfig,
    ) -> Result<Arc<dyn Provider>, ProviderError> {
        let delegation =
            self.delegation
                .as_ref()
                .ok_or_else(|| ProviderError::DelegationProviderNotConfigured {
                    accessor: accessor.accessor_name(),
                })?;
        delegation(Arc::clone(&self.store), accessor, config).await
    }
}

#[cfg(test)]
#[path = "factory_tests.rs"]
mod factory_tests;
