// SPDX-License-Identifier: Apache-2.0

//! Sweep definition files.
//!
//! A sweep file lists test benches, the candidate values of each swept
//! generic, optional exclusions and optional fixed variants:
//!
//! ```toml
//! [[test_bench]]
//! name = "axis_fifo_tb"
//! generics = [
//!   { name = "G_PACKET_MODE", values = [true, false] },
//!   { name = "G_DROP_OVERSIZE", values = [true, false] },
//! ]
//! exclude = [{ G_PACKET_MODE = false, G_DROP_OVERSIZE = true }]
//! ```
//!
//! Generics are given as an array so their order (and so the configuration
//! names) is exactly the file order.

use crate::registry::ConfigRegistrar;
use crate::sweep::{self, GenericValue, ParameterSet, RunConfig, SweepParameter};
use crate::vflow_error::VflowError;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

const BUILTIN_SWEEPS: &str = include_str!("builtin_sweeps.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct GenericSweep {
    pub name: String,
    pub values: Vec<GenericValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FixedGeneric {
    pub name: String,
    pub value: GenericValue,
}

/// A group of fixed generic values crossed with every swept combination.
#[derive(Debug, Clone, Deserialize)]
pub struct Variant {
    #[serde(default)]
    pub label: Option<String>,
    pub generics: Vec<FixedGeneric>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TestBenchSweep {
    pub name: String,
    #[serde(default)]
    pub generics: Vec<GenericSweep>,
    /// A combination is skipped when it matches every entry of any of these
    /// maps.
    #[serde(default)]
    pub exclude: Vec<BTreeMap<String, GenericValue>>,
    #[serde(default, rename = "variant")]
    pub variants: Vec<Variant>,
}

impl TestBenchSweep {
    pub fn parameter_set(&self) -> ParameterSet {
        ParameterSet::from(
            self.generics
                .iter()
                .map(|g| SweepParameter {
                    name: g.name.clone(),
                    values: g.values.clone(),
                })
                .collect::<Vec<_>>(),
        )
    }

    fn validate(&self) -> Result<(), VflowError> {
        if self.name.is_empty() {
            return Err(VflowError::Config("test bench with empty name".to_string()));
        }
        let mut swept = HashSet::new();
        for g in &self.generics {
            if !swept.insert(g.name.as_str()) {
                return Err(VflowError::Config(format!(
                    "{}: generic {} is swept more than once",
                    self.name, g.name
                )));
            }
        }
        for variant in &self.variants {
            let mut seen = swept.clone();
            for g in &variant.generics {
                if !seen.insert(g.name.as_str()) {
                    return Err(VflowError::Config(format!(
                        "{}: variant {:?} sets generic {} more than once",
                        self.name,
                        variant.label.as_deref().unwrap_or(""),
                        g.name
                    )));
                }
            }
        }
        for entry in &self.exclude {
            for key in entry.keys() {
                let known = swept.contains(key.as_str())
                    || self
                        .variants
                        .iter()
                        .any(|v| v.generics.iter().any(|g| &g.name == key));
                if !known {
                    return Err(VflowError::Config(format!(
                        "{}: exclusion refers to unknown generic {}",
                        self.name, key
                    )));
                }
            }
        }
        let count = self
            .parameter_set()
            .combination_count()
            .and_then(|n| n.checked_mul(self.variants.len().max(1)));
        match count {
            Some(n) if n <= sweep::MAX_COMBINATIONS => Ok(()),
            _ => Err(VflowError::Config(format!(
                "{}: sweep exceeds {} combinations",
                self.name,
                sweep::MAX_COMBINATIONS
            ))),
        }
    }

    pub fn is_excluded(&self, config: &RunConfig) -> bool {
        self.exclude.iter().any(|entry| {
            entry
                .iter()
                .all(|(k, v)| config.get(k).map_or(false, |actual| actual == v))
        })
    }

    /// All configurations of this test bench in registration order.
    pub fn configs(&self) -> Result<Vec<RunConfig>, VflowError> {
        self.validate()?;
        let swept = sweep::expand(&self.parameter_set());
        let configs = if self.variants.is_empty() {
            swept
        } else {
            let mut crossed = Vec::with_capacity(swept.len() * self.variants.len());
            for config in &swept {
                for variant in &self.variants {
                    let mut generics = config.generics.clone();
                    generics.extend(
                        variant
                            .generics
                            .iter()
                            .map(|g| (g.name.clone(), g.value.clone())),
                    );
                    crossed.push(RunConfig::new(generics));
                }
            }
            crossed
        };
        Ok(configs.into_iter().filter(|c| !self.is_excluded(c)).collect())
    }

    pub fn register<R: ConfigRegistrar + ?Sized>(
        &self,
        registrar: &mut R,
    ) -> Result<usize, VflowError> {
        if self.variants.is_empty() {
            self.validate()?;
            return sweep::register_filtered(registrar, &self.name, &self.parameter_set(), |c| {
                !self.is_excluded(c)
            });
        }
        let configs = self.configs()?;
        sweep::register_configs(registrar, &self.name, &configs)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SweepFile {
    #[serde(default, rename = "test_bench")]
    pub test_benches: Vec<TestBenchSweep>,
}

impl SweepFile {
    /// Parses and validates every test bench.
    pub fn parse(toml_text: &str) -> Result<Self, VflowError> {
        let file: SweepFile =
            toml::from_str(toml_text).map_err(|e| VflowError::Config(e.to_string()))?;
        file.validate()?;
        Ok(file)
    }

    pub fn load(path: &Path) -> Result<Self, VflowError> {
        log::info!("loading sweep file: {}", path.display());
        let text = std::fs::read_to_string(path).map_err(|e| VflowError::file_access(path, e))?;
        let file: SweepFile = toml::from_str(&text)
            .map_err(|e| VflowError::Config(format!("{}: {}", path.display(), e)))?;
        file.validate().map_err(|e| match e {
            VflowError::Config(msg) => VflowError::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })?;
        Ok(file)
    }

    fn validate(&self) -> Result<(), VflowError> {
        self.test_benches.iter().try_for_each(TestBenchSweep::validate)
    }

    /// Registers every test bench in file order; returns the total number of
    /// configurations.
    pub fn register_all<R: ConfigRegistrar + ?Sized>(
        &self,
        registrar: &mut R,
    ) -> Result<usize, VflowError> {
        let mut total = 0;
        for tb in &self.test_benches {
            total += tb.register(registrar)?;
        }
        Ok(total)
    }
}

/// Sweeps for the library's own test benches, used when no sweep file is
/// configured.
pub fn builtin_sweeps() -> Result<SweepFile, VflowError> {
    SweepFile::parse(BUILTIN_SWEEPS)
}
