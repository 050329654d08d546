// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Credential secret lookup.
//!
//! The factory never talks to the Kubernetes API directly; it reads provider
//! credentials through a [`SecretStore`]. [`KubeSecretStore`] is the
//! production implementation, [`InMemorySecretStore`] serves local runs and tests.

use crate::dns_errors::ProviderError;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::{Api, Client};
use std::collections::BTreeMap;
use tracing::debug;

/// Read access to credential secrets.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Fetch the secret `name` in `namespace`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::SecretNotFound`] when the secret does not exist,
    /// or the underlying API error.
    async fn get_secret(&self, namespace: &str, name: &str) -> Result<Secret, ProviderError>;
}

/// Secret store backed by the Kubernetes API.
#[derive(Clone)]
pub struct KubeSecretStore {
    client: Client,
}

impl KubeSecretStore {
    /// Wrap a Kubernetes client.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SecretStore for KubeSecretStore {
    async fn get_secret(&self, namespace: &str, name: &str) -> Result<Secret, ProviderError> {
        debug!(namespace, name, "Fetching provider secret");
        let api: Api<Secret> = Api::namespaced(self.client.clone(), namespace);
        api.get_opt(name)
            .await?
            .ok_or_else(|| ProviderError::SecretNotFound {
                namespace: namespace.to_string(),
                name: name.to_string(),
            })
    }
}

/// Secret store holding secrets in memory, keyed by namespace and name.
#[derive(Clone, Debug, Default)]
pub struct InMemorySecretStore {
    secrets: BTreeMap<(String, String), Secret>,
}

impl InMemorySecretStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a secret. Namespace and name are taken from its metadata.
    pub fn insert(&mut self, secret: Secret) {
        let namespace = secret.metadata.namespace.clone().unwrap_or_default();
        let name = secret.metadata.name.clone().unwrap_or_default();
        self.secrets.insert((namespace, name), secret);
    }

    /// Builder-style [`Self::insert`].
    #[must_use]
    pub fn with_secret(mut self, secret: Secret) -> Self {
        self.insert(secret);
        self
    }
}

#[async_trait]
impl SecretStore for InMemorySecretStore {
    async fn get_secret(&self, namespace: &str, name: &str) -> Result<Secret, ProviderError> {
        self.secrets
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| ProviderError::SecretNotFound {
                namespace: namespace.to_string(),
                name: name.to_string(),
            })
    }
}

/// Build a typed provider secret, as created by users for each provider account.
#[must_use]
pub fn provider_secret(
    namespace: &str,
    name: &str,
    secret_type: &str,
    string_data: &[(&str, &str)],
) -> Secret {
    Secret {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        },
        type_: Some(secret_type.to_string()),
        string_data: Some(
            string_data
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        ),
        ..Default::default()
    }
}

/// Read a value from a secret, preferring `data` over `stringData`.
#[must_use]
pub fn secret_value(secret: &Secret, key: &str) -> Option<String> {
    secret
        .data
        .as_ref()
        .and_then(|data| data.get(key))
        .and_then(|bytes| String::from_utf8(bytes.0.clone()).ok())
        .or_else(|| {
            secret
                .string_data
                .as_ref()
                .and_then(|data| data.get(key).cloned())
        })
}

#[cfg(test)]
#[path = "secrets_tests.rs"]
mod secrets_tests;
