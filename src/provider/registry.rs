// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Provider constructor registry.
//!
//! Each backend registers a constructor under its provider name at process
//! start, optionally marking itself as enabled by default. The registry is an
//! explicit object rather than global state: build one, register every backend
//! into it, then share it with the [`Factory`](super::factory::Factory).
//!
//! Registration may race between initialization paths, so the constructor map
//! and the default list are guarded by a single mutex.
//!
//! # Example
//!
//! ```rust
//! use hostroute::provider::registry::{register_defaults, ProviderRegistry};
//!
//! let registry = ProviderRegistry::new();
//! register_defaults(&registry);
//!
//! assert!(registry.is_registered("inmemory"));
//! assert_eq!(registry.default_providers(), vec!["inmemory".to_string()]);
//! ```

use super::inmemory::InMemoryProvider;
use super::secrets::SecretStore;
use super::{Provider, ProviderConfig};
use crate::constants::{
    PROVIDER_AWS, PROVIDER_AZURE, PROVIDER_COREDNS, PROVIDER_ENDPOINT, PROVIDER_GOOGLE,
    PROVIDER_INMEMORY, SECRET_TYPE_AWS, SECRET_TYPE_AZURE, SECRET_TYPE_COREDNS,
    SECRET_TYPE_ENDPOINT, SECRET_TYPE_GOOGLE, SECRET_TYPE_INMEMORY,
};
use crate::dns_errors::ProviderError;
use futures::future::BoxFuture;
use k8s_openapi::api::core::v1::Secret;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

/// Constructor taking only the credential secret and provider settings.
pub type SecretConstructorFn =
    dyn Fn(&Secret, &ProviderConfig) -> Result<Arc<dyn Provider>, ProviderError> + Send + Sync;

/// Constructor additionally receiving the secret store, for providers that read more state.
///
/// The returned future owns everything it needs; clone the secret or config
/// fields before moving them into it.
pub type StoreConstructorFn = dyn Fn(
        Arc<dyn SecretStore>,
        &Secret,
        &ProviderConfig,
    ) -> BoxFuture<'static, Result<Arc<dyn Provider>, ProviderError>>
    + Send
    + Sync;

/// The two constructor shapes a provider can register.
#[derive(Clone)]
pub enum ProviderConstructor {
    /// Built from the secret alone
    Secret(Arc<SecretConstructorFn>),
    /// Built from the secret and the store it came from
    WithStore(Arc<StoreConstructorFn>),
}

impl ProviderConstructor {
    /// Wrap a constructor that only needs the secret.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Secret, &ProviderConfig) -> Result<Arc<dyn Provider>, ProviderError>
            + Send
            + Sync
            + 'static,
    {
        Self::Secret(Arc::new(f))
    }

    /// Wrap a constructor that also needs the secret store.
    pub fn with_store<F>(f: F) -> Self
    where
        F: Fn(
                Arc<dyn SecretStore>,
                &Secret,
                &ProviderConfig,
            ) -> BoxFuture<'static, Result<Arc<dyn Provider>, ProviderError>>
            + Send
            + Sync
            + 'static,
    {
        Self::WithStore(Arc::new(f))
    }

    /// Run the constructor.
    ///
    /// # Errors
    ///
    /// Returns whatever the constructor returns.
    pub async fn construct(
        &self,
        store: &Arc<dyn SecretStore>,
        secret: &Secret,
        config: &ProviderConfig,
    ) -> Result<Arc<dyn Provider>, ProviderError> {
        match self {
            Self::Secret(f) => f(secret, config),
            Self::WithStore(f) => f(Arc::clone(store), secret, config).await,
        }
    }
}

#[derive(Default)]
struct RegistryState {
    constructors: HashMap<String, ProviderConstructor>,
    default_providers: Vec<String>,
}

/// Mapping from provider name to constructor.
#[derive(Default)]
pub struct ProviderRegistry {
    state: Mutex<RegistryState>,
}

impl ProviderRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `constructor` under `name`, replacing any previous registration.
    ///
    /// With `is_default`, `name` is added to the providers a factory enables when
    /// none are requested explicitly.
    pub fn register_provider(&self, name: &str, constructor: ProviderConstructor, is_default: bool) {
        let mut state = self.lock();
        let replaced = state
            .constructors
            .insert(name.to_string(), constructor)
            .is_some();
        if is_default && !state.default_providers.iter().any(|p| p == name) {
            state.default_providers.push(name.to_string());
        }
        if replaced {
            debug!(provider = name, "Replaced provider constructor");
        } else {
            info!(provider = name, is_default, "Registered provider");
        }
    }

    /// Constructor registered under `name`.
    #[must_use]
    pub fn constructor(&self, name: &str) -> Option<ProviderConstructor> {
        self.lock().constructors.get(name).cloned()
    }

    /// Whether a constructor is registered under `name`.
    #[must_use]
    pub fn is_registered(&self, name: &str) -> bool {
        self.lock().constructors.contains_key(name)
    }

    /// Providers registered as defaults, in registration order.
    #[must_use]
    pub fn default_providers(&self) -> Vec<String> {
        self.lock().default_providers.clone()
    }

    /// Every registered provider name, sorted.
    #[must_use]
    pub fn registered_providers(&self) -> Vec<String> {
        let mut names: Vec<String> = self.lock().constructors.keys().cloned().collect();
        names.sort();
        names
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        // the state is a map plus a list; a panic mid-registration leaves both usable
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Register the providers implemented in this crate.
pub fn register_defaults(registry: &ProviderRegistry) {
    registry.register_provider(
        PROVIDER_INMEMORY,
        ProviderConstructor::new(InMemoryProvider::from_secret),
        true,
    );
}

/// Map a credential secret's declared type to a provider name.
///
/// # Errors
///
/// Returns [`ProviderError::UnsupportedProvider`] for unknown or missing types.
pub fn name_for_provider_secret(secret: &Secret) -> Result<&'static str, ProviderError> {
    let secret_type = secret.type_.as_deref().unwrap_or_default();
    match secret_type {
        SECRET_TYPE_AWS => Ok(PROVIDER_AWS),
        SECRET_TYPE_GOOGLE => Ok(PROVIDER_GOOGLE),
        SECRET_TYPE_AZURE => Ok(PROVIDER_AZURE),
        SECRET_TYPE_COREDNS => Ok(PROVIDER_COREDNS),
        SECRET_TYPE_INMEMORY => Ok(PROVIDER_INMEMORY),
        SECRET_TYPE_ENDPOINT => Ok(PROVIDER_ENDPOINT),
        other => Err(ProviderError::UnsupportedProvider {
            secret_type: other.to_string(),
        }),
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod registry_tests;
