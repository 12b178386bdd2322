// SPDX-License-Identifier: Apache-2.0

use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum VflowError {
    /// A file could not be read or written. Missing patterns are not errors;
    /// only I/O on the target path is.
    FileAccess { path: PathBuf, source: std::io::Error },

    /// A sweep, rule or toolchain file was malformed.
    Config(String),

    /// The configuration registrar refused a run configuration.
    Registrar(String),

    /// A plan or config could not be rendered to JSON or TOML.
    Serialization(String),
}

impl VflowError {
    pub fn file_access(path: &Path, source: std::io::Error) -> Self {
        VflowError::FileAccess {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl std::fmt::Display for VflowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VflowError::FileAccess { path, source } => {
                write!(f, "vflow error: cannot access {}: {}", path.display(), source)
            }
            VflowError::Config(msg) => write!(f, "vflow error: bad configuration: {}", msg),
            VflowError::Registrar(msg) => write!(f, "vflow error: registrar: {}", msg),
            VflowError::Serialization(msg) => write!(f, "vflow error: serialization: {}", msg),
        }
    }
}

impl std::error::Error for VflowError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VflowError::FileAccess { source, .. } => Some(source),
            _ => None,
        }
    }
}
