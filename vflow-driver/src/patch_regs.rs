// SPDX-License-Identifier: Apache-2.0

//! Adapts register-file generator output to the local namespace.
//!
//! The generator itself runs beforehand; this subcommand only patches the
//! VHDL it left under `<build_dir>/regs_out/<name>/hdl`.

use clap::ArgMatches;
use std::path::Path;
use vflow::regfile::{hdl_output_dir, patch_register_artifacts, register_map_name};
use vflow::{PatchOutcome, VflowError};

use crate::toolchain_config::{get_build_dir, ToolchainConfig};

fn outcome_str(outcome: PatchOutcome) -> &'static str {
    match outcome {
        PatchOutcome::Applied => "applied",
        PatchOutcome::NotFound => "not found",
    }
}

pub fn handle_patch_regs(
    matches: &ArgMatches,
    config: &Option<ToolchainConfig>,
) -> Result<(), VflowError> {
    let build_dir = get_build_dir(matches, config);
    let hdl_dir_override = matches.get_one::<String>("hdl_dir");
    let toml_files: Vec<&String> = matches
        .get_many::<String>("register_toml")
        .map(|v| v.collect())
        .unwrap_or_default();

    for toml_file in toml_files {
        let toml_path = Path::new(toml_file);
        // Register maps that do not exist are skipped, like the generator does.
        if !toml_path.exists() {
            log::warn!("skipping nonexistent register map: {}", toml_file);
            continue;
        }
        let name = register_map_name(toml_path)
            .ok_or_else(|| {
            VflowError::Config(format!("cannot derive a register map name from {}", toml_file))
        })?;
        let hdl_dir = match hdl_dir_override {
            Some(dir) => Path::new(dir).to_path_buf(),
            None => hdl_output_dir(&build_dir, &name),
        };
        let reports = patch_register_artifacts(&hdl_dir, &name)?;
        for report in reports {
            println!(
                "{}: {}: {}",
                report.file.display(),
                report.label,
                outcome_str(report.outcome)
            );
        }
    }
    Ok(())
}
