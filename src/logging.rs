// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Tracing subscriber bootstrap for binaries and local runs.
//!
//! The library itself only emits `tracing` events. Binaries call
//! [`init_tracing`] once at startup:
//!
//! - `RUST_LOG` selects the filter, defaulting to `info`
//! - `RUST_LOG_FORMAT=json` switches to JSON output, anything else is compact text
//!
//! Output carries file and line numbers, e.g.
//! `2025-11-29T23:45:00.123456Z dns_tree.rs:412 DEBUG Removed node`.

use crate::constants::ENV_LOG_FORMAT;
use tracing_subscriber::EnvFilter;

/// Log output format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Compact human readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

impl LogFormat {
    /// Parse a format name; unknown values fall back to text.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    /// Format selected by [`ENV_LOG_FORMAT`].
    #[must_use]
    pub fn from_env() -> Self {
        std::env::var(ENV_LOG_FORMAT)
            .map(|v| Self::parse(&v))
            .unwrap_or_default()
    }
}

/// Install the global subscriber.
///
/// Returns `false` when a subscriber was already installed, which happens when
/// several tests in one process initialize logging.
pub fn init_tracing() -> bool {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = match LogFormat::from_env() {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_file(true)
            .with_line_number(true)
            .with_thread_names(true)
            .with_target(false)
            .json()
            .try_init(),
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_file(true)
            .with_line_number(true)
            .with_thread_names(true)
            .with_target(false)
            .with_ansi(true)
            .compact()
            .try_init(),
    };
    installed.is_ok()
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod logging_tests;
