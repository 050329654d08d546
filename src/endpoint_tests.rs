// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `endpoint.rs`

use crate::constants::{PROVIDER_SPECIFIC_GEO_CODE, PROVIDER_SPECIFIC_WEIGHT};
use crate::endpoint::{Changes, Endpoint};

#[test]
fn test_set_provider_specific_replaces_in_place() {
    let mut ep = Endpoint::new("eu.klb.example.com", "CNAME", 60, &["cluster1.example.com"])
        .with_provider_specific(PROVIDER_SPECIFIC_GEO_CODE, "EU")
        .with_provider_specific(PROVIDER_SPECIFIC_WEIGHT, "100");

    ep.set_provider_specific(PROVIDER_SPECIFIC_GEO_CODE, "US");

    assert_eq!(ep.get_provider_specific(PROVIDER_SPECIFIC_GEO_CODE), Some("US"));
    assert_eq!(ep.provider_specific[0].name, PROVIDER_SPECIFIC_GEO_CODE);
    assert_eq!(ep.provider_specific.len(), 2);
}

#[test]
fn test_delete_provider_specific() {
    let mut ep =
        Endpoint::new("a.example.com", "A", 60, &["1.1.1.1"]).with_provider_specific(PROVIDER_SPECIFIC_WEIGHT, "1");

    ep.delete_provider_specific(PROVIDER_SPECIFIC_WEIGHT);

    assert_eq!(ep.get_provider_specific(PROVIDER_SPECIFIC_WEIGHT), None);
    assert!(ep.provider_specific.is_empty());
}

#[test]
fn test_endpoint_serializes_camel_case() {
    let ep = Endpoint::new("app.example.com", "CNAME", 300, &["klb.app.example.com"])
        .with_set_identifier("default");

    let json = serde_json::to_value(&ep).expect("serialize");

    assert_eq!(json["dnsName"], "app.example.com");
    assert_eq!(json["recordTtl"], 300);
    assert_eq!(json["setIdentifier"], "default");
    assert!(json.get("labels").is_none());
}

#[test]
fn test_endpoint_key_is_case_insensitive_on_name() {
    let a = Endpoint::new("App.Example.com", "A", 60, &["1.1.1.1"]);
    let b = Endpoint::new("app.example.com", "A", 60, &["2.2.2.2"]);

    assert_eq!(a.key(), b.key());
}

#[test]
fn test_changes_is_empty() {
    let mut changes = Changes::default();
    assert!(changes.is_empty());

    changes
        .delete
        .push(Endpoint::new("a.example.com", "A", 60, &["1.1.1.1"]));
    assert!(!changes.is_empty());
}
