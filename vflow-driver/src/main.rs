// SPDX-License-Identifier: Apache-2.0

//! This is a command line driver program for the build glue around the
//! register-file generator and the VHDL simulation test runner.
//!
//! Commands are given like:
//!
//! ```text
//! vflow-driver <global-options> <command> <command-args-and-options>
//! ```
//!
//! Commands are:
//!
//! - patch-regs: Patches generated register-file VHDL into the `work` namespace.
//! - patch-file: Applies an ordered list of first-occurrence rules to a file.
//! - sweep: Lists the run configurations produced by the generic sweeps, one
//!   `test_bench.config` name per line, or the full configurations with
//!   `--json`.
//! - sim-plan: Emits the JSON run plan (simulator, options, sources and
//!   configurations) for the test runner. With `--vhdl_ls` it writes
//!   `vhdl_ls.toml` at the project root instead.
//!
//! Sample usage:
//!
//! ```shell
//! $ cargo run -- --toolchain=vflow-toolchain.toml patch-regs regs/ctrl.toml
//! $ cargo run -- sweep sims/sweeps.toml
//! $ cargo run -- sweep --json
//! $ VUNIT_SIMULATOR=ghdl cargo run -- sim-plan --output build/run_plan.json
//! $ cargo run -- sim-plan --vhdl_ls
//! ```

mod patch_file;
mod patch_regs;
mod report_cli_error;
mod sim_plan;
mod sweep;
mod toolchain_config;

use crate::toolchain_config::{ToolchainConfig, DEFAULT_TOOLCHAIN_FILE};
use clap::{Arg, ArgAction};
use report_cli_error::{report_cli_error_and_exit, report_vflow_error_and_exit};
use serde::Deserialize;
use vflow::simulator::SIMULATOR_ENV_VAR;

#[derive(Deserialize)]
struct VflowToolchain {
    toolchain: ToolchainConfig,
}

trait AppExt {
    fn add_root_dir_arg(self) -> Self;
    fn add_build_dir_arg(self) -> Self;
    fn add_sweep_file_arg(self) -> Self;
}

impl AppExt for clap::Command {
    fn add_root_dir_arg(self) -> Self {
        (self as clap::Command).arg(
            Arg::new("root_dir")
                .long("root_dir")
                .value_name("ROOT_DIR")
                .help("Project root directory (default: working directory)")
                .action(ArgAction::Set),
        )
    }

    fn add_build_dir_arg(self) -> Self {
        (self as clap::Command).arg(
            Arg::new("build_dir")
                .long("build_dir")
                .value_name("BUILD_DIR")
                .help("Build directory holding regs_out/ (default: <root>/build)")
                .action(ArgAction::Set),
        )
    }

    fn add_sweep_file_arg(self) -> Self {
        (self as clap::Command).arg(
            Arg::new("sweep_file")
                .value_name("SWEEP_TOML")
                .help("Sweep definition file (default: toolchain config, else built-in sweeps)")
                .index(1),
        )
    }
}

fn load_toolchain_config(toolchain_flag: Option<&String>) -> Option<ToolchainConfig> {
    let mut toml_path: Option<String> = toolchain_flag.map(|s| s.to_string());

    // If there is no toolchain flag specified, but there is a
    // vflow-toolchain.toml in the current directory, use that.
    if toml_path.is_none() {
        let cwd_toml_path = std::path::Path::new(DEFAULT_TOOLCHAIN_FILE);
        if cwd_toml_path.exists() {
            log::info!(
                "Using {} in current directory",
                DEFAULT_TOOLCHAIN_FILE
            );
            toml_path = Some(DEFAULT_TOOLCHAIN_FILE.to_string());
        }
    }

    let path = toml_path?;
    if !std::path::Path::new(&path).exists() {
        let cwd = std::env::current_dir()
            .map(|d| d.display().to_string())
            .unwrap_or_else(|_| "<unknown>".to_string());
        report_cli_error_and_exit(
            "toolchain toml file does not exist",
            None,
            vec![("path", &path), ("working directory", &cwd)],
        );
    }
    let toml_str = match std::fs::read_to_string(&path) {
        Ok(s) => s,
        Err(e) => report_cli_error_and_exit(
            "could not read toolchain toml file",
            None,
            vec![("path", &path), ("error", &e.to_string())],
        ),
    };
    match toml::from_str::<VflowToolchain>(&toml_str) {
        Ok(toolchain) => Some(toolchain.toolchain),
        Err(e) => report_cli_error_and_exit(
            "could not parse toolchain toml file",
            None,
            vec![("path", &path), ("error", &e.to_string())],
        ),
    }
}

fn main() {
    let _ = env_logger::try_init();

    log::info!(
        "vflow-driver starting; version: {}",
        env!("CARGO_PKG_VERSION")
    );

    let matches = clap::Command::new("vflow-driver")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Command line driver for register patching and simulation sweeps")
        .arg(
            Arg::new("toolchain")
                .long("toolchain")
                .value_name("TOOLCHAIN")
                .help("Path to a vflow-toolchain.toml file")
                .action(ArgAction::Set),
        )
        .subcommand(clap::Command::new("version").about("Prints the version of the driver"))
        .subcommand(
            clap::Command::new("patch-regs")
                .about("Patches generated register-file VHDL for the given register maps")
                .arg(
                    Arg::new("register_toml")
                        .value_name("REG_TOML")
                        .help("Register map TOML file(s); the file stem names the map")
                        .required(true)
                        .num_args(1..),
                )
                .arg(
                    Arg::new("hdl_dir")
                        .long("hdl_dir")
                        .value_name("HDL_DIR")
                        .help("Directory holding the generated VHDL (default: <build>/regs_out/<name>/hdl)")
                        .action(ArgAction::Set),
                )
                .add_root_dir_arg()
                .add_build_dir_arg(),
        )
        .subcommand(
            clap::Command::new("patch-file")
                .about("Applies an ordered rule file to a text file, first occurrence only")
                .arg(
                    Arg::new("file")
                        .value_name("FILE")
                        .help("File to patch in place")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("rules")
                        .long("rules")
                        .value_name("RULES_TOML")
                        .help("TOML file with [[rule]] entries (old_text/new_text)")
                        .required(true)
                        .action(ArgAction::Set),
                ),
        )
        .subcommand(
            clap::Command::new("sweep")
                .about("Lists the run configurations of every test bench")
                .add_sweep_file_arg()
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print the full configurations (generics included) as JSON")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            clap::Command::new("sim-plan")
                .about("Emits the JSON run plan for the simulation test runner")
                .add_sweep_file_arg()
                .add_root_dir_arg()
                .arg(
                    Arg::new("ghdl")
                        .long("ghdl")
                        .help("Plan for GHDL (the VUNIT_SIMULATOR environment variable wins)")
                        .conflicts_with("nvc")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("nvc")
                        .long("nvc")
                        .help("Plan for NVC (the VUNIT_SIMULATOR environment variable wins)")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("vhdl_ls")
                        .long("vhdl_ls")
                        .help("Write vhdl_ls.toml (including platform sources) at the root instead of a plan")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .value_name("PATH")
                        .help("Write the plan here instead of stdout")
                        .action(ArgAction::Set),
                ),
        )
        .get_matches();

    let config = load_toolchain_config(matches.get_one::<String>("toolchain"));

    // The only place the environment is consulted.
    let simulator_env = std::env::var(SIMULATOR_ENV_VAR).ok();

    let (subcommand, result) = if let Some(matches) = matches.subcommand_matches("patch-regs") {
        ("patch-regs", patch_regs::handle_patch_regs(matches, &config))
    } else if let Some(matches) = matches.subcommand_matches("patch-file") {
        ("patch-file", patch_file::handle_patch_file(matches))
    } else if let Some(matches) = matches.subcommand_matches("sweep") {
        ("sweep", sweep::handle_sweep(matches, &config))
    } else if let Some(matches) = matches.subcommand_matches("sim-plan") {
        (
            "sim-plan",
            sim_plan::handle_sim_plan(matches, &config, simulator_env.as_deref()),
        )
    } else if let Some(_matches) = matches.subcommand_matches("version") {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return;
    } else {
        report_cli_error_and_exit("No valid subcommand provided.", None, vec![]);
    };

    if let Err(e) = result {
        report_vflow_error_and_exit(&e, subcommand);
    }
}
