// SPDX-License-Identifier: Apache-2.0

//! VHDL source discovery for a project tree.

use crate::vflow_error::VflowError;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Source patterns, relative to the project root, in compile order.
const SOURCE_PATTERNS: &[&str] = &[
    "src/**/hdl/*.vhd",
    "src/**/sim/*.vhd",
    "lib/**/src/**/hdl/*.vhd",
    "lib/**/src/**/sim/*.vhd",
    "test/**/*.vhd",
    "build/regs_out/**/hdl/*.vhd",
];

/// Only wanted when generating language-server configuration.
const PLATFORM_PATTERN: &str = "platforms/**/hdl/*.vhd";

pub fn source_globs(root: &Path, include_platforms: bool) -> Vec<String> {
    let mut patterns: Vec<&str> = SOURCE_PATTERNS.to_vec();
    if include_platforms {
        patterns.push(PLATFORM_PATTERN);
    }
    patterns
        .into_iter()
        .map(|p| root.join(p).to_string_lossy().into_owned())
        .collect()
}

/// Expands `patterns` in order. A pattern matching nothing is fine; a file
/// matched by several patterns is listed once, at its first match.
pub fn collect_sources(patterns: &[String]) -> Result<Vec<PathBuf>, VflowError> {
    let mut seen = HashSet::new();
    let mut sources = Vec::new();
    for pattern in patterns {
        let paths = glob::glob(pattern)
            .map_err(|e| VflowError::Config(format!("bad source pattern {}: {}", pattern, e)))?;
        let mut matched = 0;
        for entry in paths {
            let path = entry.map_err(|e| {
                let path = e.path().to_path_buf();
                VflowError::file_access(&path, e.into_error())
            })?;
            matched += 1;
            if seen.insert(path.clone()) {
                sources.push(path);
            }
        }
        log::debug!("collect_sources; {} matched {} file(s)", pattern, matched);
    }
    Ok(sources)
}
