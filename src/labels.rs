// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Label keys carried on answer-tree edges.
//!
//! Labels are attached to individual record variants rather than to hostnames, so
//! derived state such as "this branch is unhealthy" follows routing branches.

// ============================================================================
// Soft Delete
// ============================================================================

/// Marks an edge (and, after propagation, its whole branch) as eligible for removal
pub const SOFT_DELETE_LABEL: &str = "hostroute.io/soft-delete";

/// Vetoes propagation of [`SOFT_DELETE_LABEL`] through the branch that carries it
pub const STOP_SOFT_DELETE_LABEL: &str = "hostroute.io/stop-soft-delete";

/// Value written by propagation for boolean markers
pub const LABEL_VALUE_TRUE: &str = "true";

// ============================================================================
// Health
// ============================================================================

/// Health state reported for the target of an edge
pub const HEALTH_LABEL: &str = "hostroute.io/health";

/// Value of [`HEALTH_LABEL`] for an unhealthy target
pub const HEALTH_UNHEALTHY: &str = "unhealthy";
