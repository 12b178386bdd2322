// SPDX-License-Identifier: Apache-2.0

//! The complete description of a simulation run handed to the external test
//! runner: which simulator, which sources, which options and which
//! configurations of which test benches.

use crate::registry::RunManifest;
use crate::simulator::{SimOptions, Simulator};
use crate::vflow_error::VflowError;
use serde::Serialize;
use std::path::PathBuf;

/// Test-runner support libraries enabled before any sources are added, in
/// the order the runner loads them.
pub const RUNNER_LIBRARIES: &[&str] = &[
    "vhdl_builtins",
    "com",
    "osvvm",
    "random",
    "verification_components",
];

#[derive(Debug, Clone, Serialize)]
pub struct RunPlan {
    pub simulator: Simulator,
    pub vhdl_standard: String,
    pub runner_libraries: Vec<String>,
    pub library: String,
    pub sources: Vec<PathBuf>,
    #[serde(flatten)]
    pub options: SimOptions,
    #[serde(flatten)]
    pub manifest: RunManifest,
}

impl RunPlan {
    /// Library every source is compiled into.
    pub const LIBRARY: &'static str = "lib";

    pub fn new(
        simulator: Simulator,
        vhdl_standard: &str,
        sources: Vec<PathBuf>,
        manifest: RunManifest,
    ) -> Self {
        RunPlan {
            simulator,
            vhdl_standard: vhdl_standard.to_string(),
            runner_libraries: RUNNER_LIBRARIES.iter().map(|l| l.to_string()).collect(),
            library: Self::LIBRARY.to_string(),
            sources,
            options: SimOptions::for_simulator(simulator),
            manifest,
        }
    }

    pub fn to_json(&self) -> Result<String, VflowError> {
        serde_json::to_string_pretty(self).map_err(|e| VflowError::Serialization(e.to_string()))
    }
}
