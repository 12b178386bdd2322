// SPDX-License-Identifier: Apache-2.0

use clap::ArgMatches;
use std::path::Path;
use vflow::sim_config::{builtin_sweeps, SweepFile};
use vflow::{RunManifest, VflowError};

use crate::toolchain_config::{get_sweep_file, ToolchainConfig};

/// Loads the configured sweep file, or the built-in sweeps if there is none,
/// and registers everything into a fresh manifest.
pub fn load_manifest(
    matches: &ArgMatches,
    config: &Option<ToolchainConfig>,
) -> Result<RunManifest, VflowError> {
    let sweeps = match get_sweep_file(matches, config) {
        Some(path) => SweepFile::load(Path::new(&path))?,
        None => {
            log::info!("no sweep file configured; using built-in sweeps");
            builtin_sweeps()?
        }
    };

    let mut manifest = RunManifest::default();
    let total = sweeps.register_all(&mut manifest)?;
    log::info!(
        "{} configuration(s) across {} test bench(es)",
        total,
        manifest.test_benches.len()
    );
    Ok(manifest)
}

pub fn handle_sweep(
    matches: &ArgMatches,
    config: &Option<ToolchainConfig>,
) -> Result<(), VflowError> {
    let manifest = load_manifest(matches, config)?;
    if matches.get_flag("json") {
        let json = serde_json::to_string_pretty(&manifest)
            .map_err(|e| VflowError::Serialization(e.to_string()))?;
        println!("{}", json);
        return Ok(());
    }
    for tb in &manifest.test_benches {
        for run_config in &tb.configs {
            println!("{}.{}", tb.name, run_config.name);
        }
    }
    Ok(())
}
