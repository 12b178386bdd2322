// SPDX-License-Identifier: Apache-2.0

//! Destination for expanded run configurations.

use crate::sweep::{GenericValue, RunConfig};
use crate::vflow_error::VflowError;
use serde::Serialize;

/// Receives named run configurations for test benches. Implementations decide
/// what happens on a name collision; callers do not deduplicate.
pub trait ConfigRegistrar {
    fn add_config(
        &mut self,
        test_bench: &str,
        name: &str,
        generics: &[(String, GenericValue)],
    ) -> Result<(), VflowError>;
}

#[derive(Debug, Clone, Serialize)]
pub struct TestBenchConfigs {
    pub name: String,
    pub configs: Vec<RunConfig>,
}

/// Records configurations in registration order, grouped by test bench, for
/// handing to the external test runner as JSON.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunManifest {
    pub test_benches: Vec<TestBenchConfigs>,
}

impl RunManifest {
    pub fn config_names(&self, test_bench: &str) -> Vec<&str> {
        self.test_benches
            .iter()
            .filter(|tb| tb.name == test_bench)
            .flat_map(|tb| tb.configs.iter().map(|c| c.name.as_str()))
            .collect()
    }

    pub fn config_count(&self) -> usize {
        self.test_benches.iter().map(|tb| tb.configs.len()).sum()
    }
}

impl ConfigRegistrar for RunManifest {
    fn add_config(
        &mut self,
        test_bench: &str,
        name: &str,
        generics: &[(String, GenericValue)],
    ) -> Result<(), VflowError> {
        if test_bench.is_empty() {
            return Err(VflowError::Registrar(format!(
                "configuration {:?} has no test bench",
                name
            )));
        }
        let config = RunConfig {
            name: name.to_string(),
            generics: generics.to_vec(),
        };
        match self.test_benches.iter_mut().find(|tb| tb.name == test_bench) {
            Some(tb) => tb.configs.push(config),
            None => self.test_benches.push(TestBenchConfigs {
                name: test_bench.to_string(),
                configs: vec![config],
            }),
        }
        Ok(())
    }
}
