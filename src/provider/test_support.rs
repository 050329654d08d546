// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Stub providers and accessors shared by the provider unit tests.

use super::{Provider, ProviderAccessor, ProviderRef};
use crate::dns_errors::ProviderError;
use crate::endpoint::{Changes, Endpoint};
use crate::zone::Zone;
use async_trait::async_trait;
use std::sync::Arc;

/// Provider doing nothing, optionally refusing to be authoritative.
pub struct StubProvider {
    pub name: String,
    pub requires_delegation: bool,
}

impl StubProvider {
    pub fn arc(name: &str, requires_delegation: bool) -> Arc<dyn Provider> {
        Arc::new(Self {
            name: name.to_string(),
            requires_delegation,
        })
    }
}

#[async_trait]
impl Provider for StubProvider {
    async fn list_records(&self) -> Result<Vec<Endpoint>, ProviderError> {
        Ok(Vec::new())
    }

    async fn apply_changes(&self, _changes: &Changes) -> Result<(), ProviderError> {
        Ok(())
    }

    async fn zones_for_account(&self) -> Result<Vec<Zone>, ProviderError> {
        Ok(Vec::new())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn requires_delegation(&self, _accessor: &dyn ProviderAccessor) -> bool {
        self.requires_delegation
    }
}

/// Minimal accessor.
pub struct StubAccessor {
    pub provider_ref: Option<ProviderRef>,
    pub delegate: bool,
}

impl StubAccessor {
    pub fn with_ref(name: &str) -> Self {
        Self {
            provider_ref: Some(ProviderRef {
                name: name.to_string(),
            }),
            delegate: false,
        }
    }

    pub fn delegating() -> Self {
        Self {
            provider_ref: None,
            delegate: true,
        }
    }
}

impl ProviderAccessor for StubAccessor {
    fn accessor_name(&self) -> String {
        "dns/app".to_string()
    }

    fn namespace(&self) -> String {
        "dns".to_string()
    }

    fn provider_ref(&self) -> Option<&ProviderRef> {
        self.provider_ref.as_ref()
    }

    fn is_delegating(&self) -> bool {
        self.delegate
    }

    fn root_host(&self) -> &str {
        "app.example.com"
    }
}
