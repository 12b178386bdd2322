// SPDX-License-Identifier: Apache-2.0

use clap::ArgMatches;
use serde::Deserialize;
use std::path::PathBuf;
use vflow::Simulator;

/// Name of the config file picked up from the working directory when no
/// `--toolchain` flag is given.
pub const DEFAULT_TOOLCHAIN_FILE: &str = "vflow-toolchain.toml";

#[derive(Deserialize, Default)]
pub struct ToolchainConfig {
    /// Project root; source patterns and a relative build directory are
    /// resolved against it.
    pub root_dir: Option<String>,

    /// Directory the register generator writes into (`<build_dir>/regs_out`).
    pub build_dir: Option<String>,

    /// Simulator to plan for when neither the environment nor a flag picks
    /// one.
    pub simulator: Option<Simulator>,

    /// Sweep definition file to use instead of the built-in sweeps.
    pub sweep_file: Option<String>,

    /// VHDL standard revision passed to the test runner, e.g. "2019".
    pub vhdl_standard: Option<String>,
}

/// Project root from the `--root_dir` flag, else the toolchain config, else
/// the working directory.
pub fn get_root_dir(matches: &ArgMatches, config: &Option<ToolchainConfig>) -> PathBuf {
    if let Some(root_dir) = matches.get_one::<String>("root_dir") {
        PathBuf::from(root_dir)
    } else if let Some(root_dir) = config.as_ref().and_then(|c| c.root_dir.as_ref()) {
        PathBuf::from(root_dir)
    } else {
        PathBuf::from(".")
    }
}

/// Build directory from the `--build_dir` flag, else the toolchain config
/// (relative to the root), else `<root>/build`.
pub fn get_build_dir(matches: &ArgMatches, config: &Option<ToolchainConfig>) -> PathBuf {
    if let Some(build_dir) = matches.get_one::<String>("build_dir") {
        return PathBuf::from(build_dir);
    }
    let root_dir = get_root_dir(matches, config);
    match config.as_ref().and_then(|c| c.build_dir.as_ref()) {
        Some(build_dir) => root_dir.join(build_dir),
        None => root_dir.join("build"),
    }
}

/// Sweep file from the positional argument, if given, else the toolchain
/// config. `None` means the built-in sweeps.
pub fn get_sweep_file(matches: &ArgMatches, config: &Option<ToolchainConfig>) -> Option<String> {
    if let Some(sweep_file) = matches.get_one::<String>("sweep_file") {
        Some(sweep_file.to_string())
    } else if let Some(config) = config {
        config.sweep_file.clone()
    } else {
        None
    }
}
