// SPDX-License-Identifier: Apache-2.0

//! Simulator selection and the per-simulator options handed to the test
//! runner.
//!
//! The environment is never consulted here: the driver reads
//! [`SIMULATOR_ENV_VAR`] once at startup and passes the value in.

use crate::vflow_error::VflowError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Environment variable the test runner itself uses to pick a simulator.
pub const SIMULATOR_ENV_VAR: &str = "VUNIT_SIMULATOR";

pub const DEFAULT_VHDL_STANDARD: &str = "2019";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Simulator {
    Ghdl,
    Nvc,
}

impl Default for Simulator {
    fn default() -> Self {
        Simulator::Nvc
    }
}

impl fmt::Display for Simulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Simulator::Ghdl => "ghdl",
            Simulator::Nvc => "nvc",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for Simulator {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ghdl" => Ok(Self::Ghdl),
            "nvc" => Ok(Self::Nvc),
            _ => Err(format!("invalid simulator: {}", s)),
        }
    }
}

impl Simulator {
    /// Name of the simulator executable.
    pub fn binary_name(&self) -> &'static str {
        match self {
            Simulator::Ghdl => "ghdl",
            Simulator::Nvc => "nvc",
        }
    }
}

/// Picks the simulator. An explicit environment setting wins over the
/// command line flag, which wins over the toolchain config.
pub fn resolve_simulator(
    env_value: Option<&str>,
    flag: Option<Simulator>,
    config: Option<Simulator>,
) -> Result<Simulator, VflowError> {
    if let Some(env_value) = env_value {
        let simulator = env_value.parse::<Simulator>().map_err(|e| {
            VflowError::Config(format!("{} environment variable: {}", SIMULATOR_ENV_VAR, e))
        })?;
        log::info!("simulator {} selected by {}", simulator, SIMULATOR_ENV_VAR);
        return Ok(simulator);
    }
    Ok(flag.or(config).unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OptionValue {
    Flag(bool),
    Text(String),
    List(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolOption {
    pub name: String,
    pub value: OptionValue,
}

fn list(name: &str, items: &[&str]) -> ToolOption {
    ToolOption {
        name: name.to_string(),
        value: OptionValue::List(items.iter().map(|s| s.to_string()).collect()),
    }
}

fn text(name: &str, value: &str) -> ToolOption {
    ToolOption {
        name: name.to_string(),
        value: OptionValue::Text(value.to_string()),
    }
}

/// Compile and simulation options for one simulator.
#[derive(Debug, Clone, Serialize)]
pub struct SimOptions {
    pub compile_options: Vec<ToolOption>,
    pub sim_options: Vec<ToolOption>,
}

impl SimOptions {
    pub fn for_simulator(simulator: Simulator) -> Self {
        let mut sim_options = vec![ToolOption {
            name: "disable_ieee_warnings".to_string(),
            value: OptionValue::Flag(true),
        }];
        let compile_options = match simulator {
            Simulator::Ghdl => {
                sim_options.push(list("ghdl.elab_flags", &["-frelaxed"]));
                sim_options.push(text("ghdl.viewer.gui", "surfer"));
                vec![list(
                    "ghdl.a_flags",
                    &["-frelaxed-rules", "-Wno-hide", "-Wno-shared"],
                )]
            }
            Simulator::Nvc => {
                sim_options.push(text("nvc.heap_size", "4096m"));
                sim_options.push(text("nvc.viewer.gui", "surfer"));
                sim_options.push(list("nvc.sim_flags", &["--dump-arrays"]));
                vec![list("nvc.a_flags", &["--relaxed"])]
            }
        };
        SimOptions {
            compile_options,
            sim_options,
        }
    }
}
