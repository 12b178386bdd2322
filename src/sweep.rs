// SPDX-License-Identifier: Apache-2.0

//! Expansion of generic sweeps into named run configurations.
//!
//! A sweep maps each generic name to a list of candidate values; the run
//! configurations are the Cartesian product of those lists in nested-loop
//! order (the last generic varies fastest). Each configuration is named by
//! joining `name=value` fragments with `-` in the order the generics were
//! given, e.g. `G_STAGES=1-G_READY_PIPE=True`.

use crate::registry::ConfigRegistrar;
use crate::vflow_error::VflowError;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Separator between `name=value` fragments in a configuration name.
pub const NAME_SEPARATOR: &str = "-";

/// Largest number of configurations a single test bench may sweep.
pub const MAX_COMBINATIONS: usize = 1 << 20;

/// Value of a single VHDL generic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GenericValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

/// Booleans render as `True`/`False`, matching the names the test runner
/// reports.
impl fmt::Display for GenericValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenericValue::Bool(true) => write!(f, "True"),
            GenericValue::Bool(false) => write!(f, "False"),
            GenericValue::Int(i) => write!(f, "{}", i),
            GenericValue::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for GenericValue {
    fn from(value: bool) -> Self {
        GenericValue::Bool(value)
    }
}

impl From<i64> for GenericValue {
    fn from(value: i64) -> Self {
        GenericValue::Int(value)
    }
}

impl From<i32> for GenericValue {
    fn from(value: i32) -> Self {
        GenericValue::Int(value as i64)
    }
}

impl From<&str> for GenericValue {
    fn from(value: &str) -> Self {
        GenericValue::Str(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepParameter {
    pub name: String,
    pub values: Vec<GenericValue>,
}

/// Ordered mapping from generic name to candidate values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterSet {
    params: Vec<SweepParameter>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a generic; its values vary faster than those of every generic
    /// added before it.
    pub fn param<V: Into<GenericValue>>(mut self, name: &str, values: Vec<V>) -> Self {
        self.params.push(SweepParameter {
            name: name.to_string(),
            values: values.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn params(&self) -> &[SweepParameter] {
        &self.params
    }

    /// Number of configurations `expand` produces, or `None` if that does
    /// not fit in a `usize`.
    pub fn combination_count(&self) -> Option<usize> {
        if self.params.iter().any(|p| p.values.is_empty()) {
            return Some(0);
        }
        self.params
            .iter()
            .try_fold(1usize, |acc, p| acc.checked_mul(p.values.len()))
    }
}

impl From<Vec<SweepParameter>> for ParameterSet {
    fn from(params: Vec<SweepParameter>) -> Self {
        ParameterSet { params }
    }
}

/// One concrete assignment of values to a test bench's generics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunConfig {
    pub name: String,
    #[serde(serialize_with = "serialize_generics")]
    pub generics: Vec<(String, GenericValue)>,
}

fn serialize_generics<S: Serializer>(
    generics: &[(String, GenericValue)],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    // Emitted as a map in declaration order.
    serializer.collect_map(generics.iter().map(|(k, v)| (k, v)))
}

impl RunConfig {
    pub fn new(generics: Vec<(String, GenericValue)>) -> Self {
        RunConfig {
            name: config_name(&generics),
            generics,
        }
    }

    pub fn get(&self, name: &str) -> Option<&GenericValue> {
        self.generics
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }
}

/// Derives the configuration name for an ordered generic assignment.
pub fn config_name(generics: &[(String, GenericValue)]) -> String {
    generics
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(NAME_SEPARATOR)
}

/// Computes the full Cartesian product of `parameter_set`.
///
/// Any generic with no candidate values makes the product empty. A set with
/// no generics at all has exactly one (empty) combination.
pub fn expand(parameter_set: &ParameterSet) -> Vec<RunConfig> {
    let params = parameter_set.params();
    if params.iter().any(|p| p.values.is_empty()) {
        return Vec::new();
    }
    let capacity = parameter_set
        .combination_count()
        .map_or(MAX_COMBINATIONS, |n| n.min(MAX_COMBINATIONS));
    let mut configs = Vec::with_capacity(capacity);
    let mut indices = vec![0usize; params.len()];
    loop {
        let generics = params
            .iter()
            .zip(indices.iter())
            .map(|(p, &i)| (p.name.clone(), p.values[i].clone()))
            .collect();
        configs.push(RunConfig::new(generics));

        // Odometer step, last position fastest. Done once every position
        // has wrapped.
        let mut wrapped = true;
        for pos in (0..indices.len()).rev() {
            indices[pos] += 1;
            if indices[pos] < params[pos].values.len() {
                wrapped = false;
                break;
            }
            indices[pos] = 0;
        }
        if wrapped {
            return configs;
        }
    }
}

/// Forwards each configuration to the registrar exactly once, in order.
pub fn register_configs<R: ConfigRegistrar + ?Sized>(
    registrar: &mut R,
    test_bench: &str,
    configs: &[RunConfig],
) -> Result<usize, VflowError> {
    for config in configs {
        registrar.add_config(test_bench, &config.name, &config.generics)?;
    }
    log::info!(
        "registered {} configuration(s) for {}",
        configs.len(),
        test_bench
    );
    Ok(configs.len())
}

/// Expands `parameter_set` and registers every combination for `test_bench`.
/// Returns the number of registered configurations.
pub fn register<R: ConfigRegistrar + ?Sized>(
    registrar: &mut R,
    test_bench: &str,
    parameter_set: &ParameterSet,
) -> Result<usize, VflowError> {
    register_configs(registrar, test_bench, &expand(parameter_set))
}

/// Like [`register`], but only combinations for which `keep` returns true are
/// registered.
pub fn register_filtered<R, F>(
    registrar: &mut R,
    test_bench: &str,
    parameter_set: &ParameterSet,
    keep: F,
) -> Result<usize, VflowError>
where
    R: ConfigRegistrar + ?Sized,
    F: Fn(&RunConfig) -> bool,
{
    let configs: Vec<RunConfig> = expand(parameter_set).into_iter().filter(keep).collect();
    register_configs(registrar, test_bench, &configs)
}
