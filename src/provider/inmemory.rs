// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! In-process DNS provider.
//!
//! Records are kept per zone in memory. Every record written is placed in the
//! zone owning its name with [`find_zone_for_host`], the same placement a cloud
//! backend performs before calling its API.
//!
//! The zone list comes from the `zones` key of the credential secret
//! (comma-separated zone names; each zone's id is its name).

use super::secrets::secret_value;
use super::{Provider, ProviderConfig};
use crate::constants::{PROVIDER_INMEMORY, SECRET_KEY_INMEMORY_ZONES};
use crate::dns_errors::ProviderError;
use crate::endpoint::{Changes, Endpoint};
use crate::zone::{find_zone_for_host, Zone};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

fn parse_zone(name: &str) -> Result<Zone, ProviderError> {
    let malformed = name
        .strip_suffix('.')
        .unwrap_or(name)
        .split('.')
        .any(|label| label.is_empty() || label.contains(char::is_whitespace));
    if malformed {
        return Err(ProviderError::Construction {
            provider: PROVIDER_INMEMORY.to_string(),
            reason: format!("invalid zone name '{name}'"),
        });
    }
    Ok(Zone::new(name, name))
}

/// Provider keeping records in memory, grouped by zone id.
pub struct InMemoryProvider {
    zones: Vec<Zone>,
    config: ProviderConfig,
    records: RwLock<BTreeMap<String, Vec<Endpoint>>>,
}

impl InMemoryProvider {
    /// Provider authoring records in `zones`, restricted by `config`.
    #[must_use]
    pub fn new(zones: Vec<Zone>, config: ProviderConfig) -> Self {
        Self {
            zones,
            config,
            records: RwLock::new(BTreeMap::new()),
        }
    }

    /// Constructor registered under [`PROVIDER_INMEMORY`].
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Construction` when a zone entry is not a valid
    /// domain name (empty label or embedded whitespace).
    pub fn from_secret(
        secret: &Secret,
        config: &ProviderConfig,
    ) -> Result<Arc<dyn Provider>, ProviderError> {
        let zones = secret_value(secret, SECRET_KEY_INMEMORY_ZONES)
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(parse_zone)
            .collect::<Result<Vec<Zone>, ProviderError>>()?;

        info!(zones = zones.len(), "Created in-memory provider");
        Ok(Arc::new(Self::new(zones, config.clone())))
    }

    fn visible_zones(&self) -> Vec<Zone> {
        self.zones
            .iter()
            .filter(|z| self.config.allows_zone(z))
            .cloned()
            .collect()
    }

    fn zone_id_for(&self, zones: &[Zone], ep: &Endpoint) -> Result<String, ProviderError> {
        let (zone, _) = find_zone_for_host(&ep.dns_name, &ep.dns_name, zones, false)?;
        Ok(zone.id.clone())
    }

    fn backend_error(&self, reason: String) -> ProviderError {
        ProviderError::Backend {
            provider: PROVIDER_INMEMORY.to_string(),
            reason,
        }
    }
}

#[async_trait]
impl Provider for InMemoryProvider {
    async fn list_records(&self) -> Result<Vec<Endpoint>, ProviderError> {
        let records = self.records.read().await;
        Ok(records.values().flatten().cloned().collect())
    }

    async fn apply_changes(&self, changes: &Changes) -> Result<(), ProviderError> {
        if changes.update_old.len() != changes.update_new.len() {
            return Err(self.backend_error(format!(
                "{} old records for {} updates",
                changes.update_old.len(),
                changes.update_new.len()
            )));
        }

        let zones = self.visible_zones();
        let mut records = self.records.write().await;
        // apply to a copy so a failing batch leaves the stored state untouched
        let mut staged = records.clone();

        for ep in changes.delete.iter().chain(&changes.update_old) {
            let zone_id = self.zone_id_for(&zones, ep)?;
            let zone_records = staged.entry(zone_id).or_default();
            let before = zone_records.len();
            zone_records.retain(|existing| existing.key() != ep.key());
            if zone_records.len() == before {
                return Err(self.backend_error(format!("record not found: {ep}")));
            }
        }

        for ep in changes.create.iter().chain(&changes.update_new) {
            let zone_id = self.zone_id_for(&zones, ep)?;
            let zone_records = staged.entry(zone_id).or_default();
            if zone_records.iter().any(|existing| existing.key() == ep.key()) {
                return Err(self.backend_error(format!("record already exists: {ep}")));
            }
            zone_records.push(ep.clone());
        }

        staged.retain(|_, zone_records| !zone_records.is_empty());
        *records = staged;

        debug!(
            create = changes.create.len(),
            update = changes.update_new.len(),
            delete = changes.delete.len(),
            "Applied changes to in-memory provider"
        );
        Ok(())
    }

    async fn zones_for_account(&self) -> Result<Vec<Zone>, ProviderError> {
        Ok(self.visible_zones())
    }

    fn name(&self) -> &str {
        PROVIDER_INMEMORY
    }
}

#[cfg(test)]
#[path = "inmemory_tests.rs"]
mod inmemory_tests;
