// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Custom Resource Definition for declarative DNS records.
//!
//! A [`DNSRecord`] carries the full set of record variants answering for one
//! root hostname, plus the credential secret of the provider that should serve
//! them. It is the accessor handed to the provider
//! [`Factory`](crate::provider::factory::Factory).
//!
//! # Example: Creating a DNS record
//!
//! ```rust,no_run
//! use hostroute::crd::{DNSRecord, DNSRecordSpec};
//! use hostroute::endpoint::Endpoint;
//! use hostroute::provider::ProviderRef;
//!
//! let spec = DNSRecordSpec {
//!     root_host: "app.example.com".to_string(),
//!     endpoints: vec![
//!         Endpoint::new("app.example.com", "CNAME", 60, &["lb.app.example.com"]),
//!         Endpoint::new("lb.app.example.com", "A", 60, &["192.0.2.1"]),
//!     ],
//!     provider_ref: Some(ProviderRef {
//!         name: "aws-credentials".to_string(),
//!     }),
//!     delegate: false,
//! };
//!
//! let record = DNSRecord::new("app", spec);
//! let tree = record.desired_tree();
//! ```

use crate::dns_tree::{build_tree, DnsTree};
use crate::endpoint::Endpoint;
use crate::provider::{ProviderAccessor, ProviderRef};
use crate::zone::Zone;
use kube::{CustomResource, ResourceExt};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// `DNSRecord` publishes a tree of DNS records rooted at one hostname.
///
/// # Example
///
/// ```yaml
/// apiVersion: hostroute.io/v1alpha1
/// kind: DNSRecord
/// metadata:
///   name: app
///   namespace: dns
/// spec:
///   rootHost: app.example.com
///   providerRef:
///     name: aws-credentials
///   endpoints:
///     - dnsName: app.example.com
///       recordType: CNAME
///       recordTtl: 60
///       targets: [lb.app.example.com]
///     - dnsName: lb.app.example.com
///       recordType: A
///       recordTtl: 60
///       targets: [192.0.2.1]
/// ```
#[derive(CustomResource, Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "hostroute.io",
    version = "v1alpha1",
    kind = "DNSRecord",
    namespaced,
    shortname = "dnsrec",
    doc = "DNSRecord publishes a tree of DNS records rooted at one hostname through a DNS provider selected by its credential secret."
)]
#[kube(status = "DNSRecordStatus")]
#[serde(rename_all = "camelCase")]
pub struct DNSRecordSpec {
    /// Hostname clients resolve; the root of the answer tree.
    pub root_host: String,

    /// Every record variant reachable from `rootHost`.
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,

    /// Credential secret selecting the provider. Required unless `delegate` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_ref: Option<ProviderRef>,

    /// Hand the records to the delegation provider instead of a credentialed one.
    #[serde(default)]
    pub delegate: bool,
}

/// `DNSRecord` status
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DNSRecordStatus {
    /// Provider id of the zone owning `rootHost`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone_id: Option<String>,

    /// Domain name of the zone owning `rootHost`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone_domain_name: Option<String>,

    /// Records last published
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub endpoints: Vec<Endpoint>,

    /// `metadata.generation` of the record these endpoints were published from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,
}

impl DNSRecordStatus {
    /// Status after publishing `endpoints` into `zone`.
    #[must_use]
    pub fn published(zone: &Zone, endpoints: Vec<Endpoint>, generation: Option<i64>) -> Self {
        Self {
            zone_id: Some(zone.id.clone()),
            zone_domain_name: Some(zone.name.clone()),
            endpoints,
            observed_generation: generation,
        }
    }
}

impl DNSRecord {
    /// Build the answer tree for this record's endpoints.
    #[must_use]
    pub fn desired_tree(&self) -> DnsTree {
        build_tree(&self.spec.root_host, &self.spec.endpoints)
    }
}

impl ProviderAccessor for DNSRecord {
    fn accessor_name(&self) -> String {
        format!("{}/{}", ProviderAccessor::namespace(self), self.name_any())
    }

    fn namespace(&self) -> String {
        ResourceExt::namespace(self).unwrap_or_default()
    }

    fn provider_ref(&self) -> Option<&ProviderRef> {
        self.spec.provider_ref.as_ref()
    }

    fn is_delegating(&self) -> bool {
        self.spec.delegate
    }

    fn root_host(&self) -> &str {
        &self.spec.root_host
    }
}

#[cfg(test)]
#[path = "crd_tests.rs"]
mod crd_tests;
