// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Flat DNS record model exchanged with providers.
//!
//! An [`Endpoint`] is one record variant: a name, a type, a TTL, an ordered
//! target list and the routing metadata (set identifier, provider-specific
//! properties) that distinguishes it from sibling variants of the same name.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Opaque key/value labels attached to a record variant.
pub type Labels = BTreeMap<String, String>;

/// One provider-specific routing property (e.g. `geo-code=EU`, `weight=120`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ProviderSpecificProperty {
    /// Property name
    pub name: String,
    /// Property value
    pub value: String,
}

/// A single DNS record variant.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    /// Fully qualified record name
    pub dns_name: String,

    /// Record type (`A`, `AAAA`, `CNAME`, ...)
    pub record_type: String,

    /// Time To Live in seconds. Zero means "provider default".
    #[serde(default)]
    pub record_ttl: i64,

    /// Ordered list of targets: addresses or hostnames
    #[serde(default)]
    pub targets: Vec<String>,

    /// Distinguishes variants sharing the same name and type
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub set_identifier: String,

    /// Opaque labels carried with the record
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: Labels,

    /// Ordered provider-specific routing properties
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub provider_specific: Vec<ProviderSpecificProperty>,
}

impl Endpoint {
    /// Create a record with the given name, type, TTL and targets.
    #[must_use]
    pub fn new(dns_name: &str, record_type: &str, record_ttl: i64, targets: &[&str]) -> Self {
        Self {
            dns_name: dns_name.to_string(),
            record_type: record_type.to_string(),
            record_ttl,
            targets: targets.iter().map(ToString::to_string).collect(),
            ..Default::default()
        }
    }

    /// Builder-style setter for the set identifier.
    #[must_use]
    pub fn with_set_identifier(mut self, set_identifier: &str) -> Self {
        self.set_identifier = set_identifier.to_string();
        self
    }

    /// Builder-style setter for a single label.
    #[must_use]
    pub fn with_label(mut self, key: &str, value: &str) -> Self {
        self.labels.insert(key.to_string(), value.to_string());
        self
    }

    /// Builder-style setter for a provider-specific property.
    #[must_use]
    pub fn with_provider_specific(mut self, name: &str, value: &str) -> Self {
        self.set_provider_specific(name, value);
        self
    }

    /// Look up a provider-specific property by name.
    #[must_use]
    pub fn get_provider_specific(&self, name: &str) -> Option<&str> {
        self.provider_specific
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }

    /// Set a provider-specific property, replacing an existing one of the same name in place.
    pub fn set_provider_specific(&mut self, name: &str, value: &str) {
        if let Some(existing) = self.provider_specific.iter_mut().find(|p| p.name == name) {
            existing.value = value.to_string();
            return;
        }
        self.provider_specific.push(ProviderSpecificProperty {
            name: name.to_string(),
            value: value.to_string(),
        });
    }

    /// Remove a provider-specific property.
    pub fn delete_provider_specific(&mut self, name: &str) {
        self.provider_specific.retain(|p| p.name != name);
    }

    /// Key identifying this variant within a record set: name, type and set identifier.
    #[must_use]
    pub fn key(&self) -> (String, String, String) {
        (
            self.dns_name.to_lowercase(),
            self.record_type.clone(),
            self.set_identifier.clone(),
        )
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} IN {} {} {:?}",
            self.dns_name,
            self.record_ttl,
            self.record_type,
            self.set_identifier,
            self.targets
        )?;
        if !self.provider_specific.is_empty() {
            let props: Vec<String> = self
                .provider_specific
                .iter()
                .map(|p| format!("{}={}", p.name, p.value))
                .collect();
            write!(f, " [{}]", props.join(","))?;
        }
        Ok(())
    }
}

/// A batch of record mutations handed to a provider in one call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Changes {
    /// Records to create
    pub create: Vec<Endpoint>,
    /// Current state of records being updated
    pub update_old: Vec<Endpoint>,
    /// Desired state of records being updated (index-aligned with `update_old`)
    pub update_new: Vec<Endpoint>,
    /// Records to delete
    pub delete: Vec<Endpoint>,
}

impl Changes {
    /// Whether the batch contains no mutations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.create.is_empty()
            && self.update_old.is_empty()
            && self.update_new.is_empty()
            && self.delete.is_empty()
    }
}

#[cfg(test)]
#[path = "endpoint_tests.rs"]
mod endpoint_tests;
