// SPDX-License-Identifier: Apache-2.0

//! Build glue for a VHDL library: patches the register-file generator's
//! output into the local namespace and expands generic sweeps into named run
//! configurations for the simulation test runner.

pub mod patch;
pub mod plan;
pub mod regfile;
pub mod registry;
pub mod sim_config;
pub mod simulator;
pub mod sources;
pub mod sweep;
pub mod vflow_error;
pub mod vhdl_ls;

pub use patch::{apply, apply_rules, PatchOutcome, PatchRule};
pub use registry::{ConfigRegistrar, RunManifest};
pub use simulator::Simulator;
pub use sweep::{expand, register, register_filtered, GenericValue, ParameterSet, RunConfig};
pub use vflow_error::VflowError;
