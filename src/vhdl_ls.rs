// SPDX-License-Identifier: Apache-2.0

//! Project configuration for the VHDL language server (`vhdl_ls.toml`).
//!
//! The file maps each library name to its source files:
//!
//! ```toml
//! [libraries.lib]
//! files = ["src/fifo/hdl/fifo.vhd"]
//! ```
//!
//! Relative paths are resolved by the server against the directory holding
//! the file, so sources under the project root are written relative to it.

use crate::vflow_error::VflowError;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const VHDL_LS_FILE: &str = "vhdl_ls.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VhdlLsLibrary {
    pub files: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VhdlLsConfig {
    pub libraries: BTreeMap<String, VhdlLsLibrary>,
}

impl VhdlLsConfig {
    /// A configuration with the single library `library` holding `sources`.
    pub fn for_library(library: &str, root: &Path, sources: &[PathBuf]) -> Self {
        let files = sources
            .iter()
            .map(|p| {
                p.strip_prefix(root)
                    .unwrap_or(p)
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        let mut libraries = BTreeMap::new();
        libraries.insert(library.to_string(), VhdlLsLibrary { files });
        VhdlLsConfig { libraries }
    }

    pub fn to_toml(&self) -> Result<String, VflowError> {
        toml::to_string(self).map_err(|e| VflowError::Serialization(e.to_string()))
    }
}

/// Writes `<root>/vhdl_ls.toml` for `library` and returns its path.
pub fn write_config(root: &Path, library: &str, sources: &[PathBuf]) -> Result<PathBuf, VflowError> {
    let config = VhdlLsConfig::for_library(library, root, sources);
    let path = root.join(VHDL_LS_FILE);
    std::fs::write(&path, config.to_toml()?).map_err(|e| VflowError::file_access(&path, e))?;
    log::info!(
        "wrote {} with {} source file(s)",
        path.display(),
        sources.len()
    );
    Ok(path)
}
