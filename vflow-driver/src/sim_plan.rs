// SPDX-License-Identifier: Apache-2.0

use clap::ArgMatches;
use std::path::Path;
use vflow::plan::RunPlan;
use vflow::simulator::{resolve_simulator, DEFAULT_VHDL_STANDARD};
use vflow::sources::{collect_sources, source_globs};
use vflow::{vhdl_ls, Simulator, VflowError};

use crate::sweep::load_manifest;
use crate::toolchain_config::{get_root_dir, ToolchainConfig};

fn simulator_flag(matches: &ArgMatches) -> Option<Simulator> {
    if matches.get_flag("ghdl") {
        Some(Simulator::Ghdl)
    } else if matches.get_flag("nvc") {
        Some(Simulator::Nvc)
    } else {
        None
    }
}

/// `simulator_env` is the value of the simulator environment variable as read
/// by `main`, if it was set.
///
/// With `--vhdl_ls` the platform sources are added and only
/// `<root>/vhdl_ls.toml` is written; no run plan is emitted.
pub fn handle_sim_plan(
    matches: &ArgMatches,
    config: &Option<ToolchainConfig>,
    simulator_env: Option<&str>,
) -> Result<(), VflowError> {
    let simulator = resolve_simulator(
        simulator_env,
        simulator_flag(matches),
        config.as_ref().and_then(|c| c.simulator),
    )?;
    log::info!("sim-plan; simulator: {}", simulator);

    let root_dir = get_root_dir(matches, config);
    let vhdl_ls_only = matches.get_flag("vhdl_ls");
    let sources = collect_sources(&source_globs(&root_dir, vhdl_ls_only))?;
    log::info!("sim-plan; {} source file(s)", sources.len());

    if vhdl_ls_only {
        let path = vhdl_ls::write_config(&root_dir, RunPlan::LIBRARY, &sources)?;
        println!("{}", path.display());
        return Ok(());
    }

    if which::which(simulator.binary_name()).is_err() {
        log::warn!(
            "{} not found on PATH; the test runner will not be able to start it",
            simulator.binary_name()
        );
    }

    let vhdl_standard = config
        .as_ref()
        .and_then(|c| c.vhdl_standard.clone())
        .unwrap_or_else(|| DEFAULT_VHDL_STANDARD.to_string());

    let manifest = load_manifest(matches, config)?;
    let plan = RunPlan::new(simulator, &vhdl_standard, sources, manifest);
    let json = plan.to_json()?;

    match matches.get_one::<String>("output") {
        Some(output) => std::fs::write(output, json + "\n")
            .map_err(|e| VflowError::file_access(Path::new(output), e))?,
        None => println!("{}", json),
    }
    Ok(())
}
