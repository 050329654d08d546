// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for hostroute.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// API Constants
// ============================================================================

/// API group for the hostroute CRDs
pub const API_GROUP: &str = "hostroute.io";

/// API version for the hostroute CRDs
pub const API_VERSION: &str = "v1alpha1";

/// Kind name for `DNSRecord` resource
pub const KIND_DNS_RECORD: &str = "DNSRecord";

// ============================================================================
// Provider Names
// ============================================================================

/// Amazon Route 53
pub const PROVIDER_AWS: &str = "aws";

/// Google Cloud DNS
pub const PROVIDER_GOOGLE: &str = "google";

/// Azure DNS
pub const PROVIDER_AZURE: &str = "azure";

/// CoreDNS serving records from the cluster
pub const PROVIDER_COREDNS: &str = "coredns";

/// In-process provider used for local development and tests
pub const PROVIDER_INMEMORY: &str = "inmemory";

/// Delegation backend writing authoritative records instead of provider records
pub const PROVIDER_ENDPOINT: &str = "endpoint";

// ============================================================================
// Provider Secret Types
// ============================================================================

/// Secret type selecting the `aws` provider
pub const SECRET_TYPE_AWS: &str = "hostroute.io/aws";

/// Secret type selecting the `google` provider
pub const SECRET_TYPE_GOOGLE: &str = "hostroute.io/gcp";

/// Secret type selecting the `azure` provider
pub const SECRET_TYPE_AZURE: &str = "hostroute.io/azure";

/// Secret type selecting the `coredns` provider
pub const SECRET_TYPE_COREDNS: &str = "hostroute.io/coredns";

/// Secret type selecting the `inmemory` provider
pub const SECRET_TYPE_INMEMORY: &str = "hostroute.io/inmemory";

/// Secret type selecting the `endpoint` provider
pub const SECRET_TYPE_ENDPOINT: &str = "hostroute.io/endpoint";

/// Secret data key holding a comma-separated list of zone names (in-memory provider)
pub const SECRET_KEY_INMEMORY_ZONES: &str = "zones";

// ============================================================================
// DNS Record Constants
// ============================================================================

/// Record type for IPv4 address records
pub const RECORD_TYPE_A: &str = "A";

/// Record type for canonical name records
pub const RECORD_TYPE_CNAME: &str = "CNAME";

/// Default TTL applied to generated records (seconds)
pub const DEFAULT_TTL: i64 = 60;

/// Provider-specific property carrying a geo code
pub const PROVIDER_SPECIFIC_GEO_CODE: &str = "geo-code";

/// Provider-specific property carrying a routing weight
pub const PROVIDER_SPECIFIC_WEIGHT: &str = "weight";

/// Geo code matching every client location
pub const DEFAULT_GEO: &str = "*";

// ============================================================================
// Environment
// ============================================================================

/// Comma-separated list of provider names the factory enables
pub const ENV_ENABLED_PROVIDERS: &str = "HOSTROUTE_PROVIDERS";

/// Log output format (`text` or `json`)
pub const ENV_LOG_FORMAT: &str = "RUST_LOG_FORMAT";
