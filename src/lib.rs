// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! # Hostroute - DNS answer trees and provider selection
//!
//! Hostroute is the core of a declarative DNS controller that publishes
//! geo-aware and weighted record sets through pluggable DNS backends.
//!
//! ## Overview
//!
//! This library provides:
//!
//! - An answer tree modelling which records reach which targets, with label
//!   propagation and pruning of unhealthy or deleted branches
//! - Zone resolution: finding the hosted zone owning a hostname, honouring
//!   public suffixes and apex restrictions
//! - Provider selection: mapping a credential secret to a registered DNS
//!   backend, with delegation when no backend can be authoritative
//!
//! ## Modules
//!
//! - [`endpoint`] - Record variants and change sets
//! - [`dns_tree`] - Answer tree construction, labelling and pruning
//! - [`zone`] - Hosted zone lookup for hostnames
//! - [`provider`] - Provider trait, registry, factory and in-memory backend
//! - [`crd`] - `DNSRecord` custom resource
//! - [`dns_errors`] - Error types
//! - [`logging`] - Tracing subscriber bootstrap
//!
//! ## Example
//!
//! ```rust
//! use hostroute::dns_tree::build_tree;
//! use hostroute::endpoint::Endpoint;
//! use hostroute::labels::{SOFT_DELETE_LABEL, STOP_SOFT_DELETE_LABEL, LABEL_VALUE_TRUE};
//!
//! let endpoints = vec![
//!     Endpoint::new("app.example.com", "CNAME", 60, &["lb-a.example.com"]),
//!     Endpoint::new("lb-a.example.com", "A", 60, &["192.0.2.1"]),
//! ];
//! let mut tree = build_tree("app.example.com", &endpoints);
//!
//! let lb = tree.find_node("lb-a.example.com").unwrap();
//! tree.label_edge(lb, "192.0.2.1", SOFT_DELETE_LABEL, LABEL_VALUE_TRUE);
//! tree.propagate_stoppable_label(SOFT_DELETE_LABEL, LABEL_VALUE_TRUE, STOP_SOFT_DELETE_LABEL);
//!
//! assert_eq!(tree.to_endpoints().len(), 2);
//! ```

pub mod constants;
pub mod crd;
pub mod dns_errors;
pub mod dns_tree;
pub mod endpoint;
pub mod labels;
pub mod logging;
pub mod provider;
pub mod zone;
