// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! CRD YAML Generator
//!
//! Generates the `DNSRecord` CRD YAML from the Rust types defined in src/crd.rs.
//!
//! Usage:
//!   cargo run --bin crdgen            # print to stdout
//!   cargo run --bin crdgen -- deploy  # write deploy/dnsrecords.crd.yaml
//!
//! With a directory argument the file is written there with a header.

use anyhow::{Context, Result};
use hostroute::crd::DNSRecord;
use hostroute::logging::init_tracing;
use kube::CustomResourceExt;
use std::fs;
use std::path::Path;
use tracing::info;

const COPYRIGHT_HEADER: &str = "# Copyright (c) 2025 Erick Bourgeois, firestoned
# SPDX-License-Identifier: MIT
#
# This file is AUTO-GENERATED from src/crd.rs
# DO NOT EDIT MANUALLY - Run `cargo run --bin crdgen` to regenerate
#
";

const CRD_FILENAME: &str = "dnsrecords.crd.yaml";

fn main() -> Result<()> {
    init_tracing();

    let yaml = render_crd::<DNSRecord>()?;

    match std::env::args().nth(1) {
        Some(dir) => {
            let output_dir = Path::new(&dir);
            fs::create_dir_all(output_dir)
                .with_context(|| format!("creating {}", output_dir.display()))?;

            let output_path = output_dir.join(CRD_FILENAME);
            fs::write(&output_path, format!("{COPYRIGHT_HEADER}{yaml}"))
                .with_context(|| format!("writing {}", output_path.display()))?;
            info!(path = %output_path.display(), "Generated CRD");
        }
        None => print!("{yaml}"),
    }

    Ok(())
}

fn render_crd<T>() -> Result<String>
where
    T: CustomResourceExt,
{
    serde_yaml::to_string(&T::crd()).context("serializing CRD")
}
