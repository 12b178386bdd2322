// SPDX-License-Identifier: Apache-2.0

//! First-occurrence text patching for generated artifacts.
//!
//! Generated files are adapted with literal find/replace rules. Each rule
//! replaces at most one occurrence (the first by position) and a rule whose
//! pattern is absent leaves the file untouched: not every artifact contains
//! every pattern, so "nothing to do" is reported as an outcome rather than an
//! error. Only failing to read or write the file is an error.

use crate::vflow_error::VflowError;
use serde::Deserialize;
use std::path::Path;

/// A literal find-and-replace-first-occurrence instruction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PatchRule {
    /// Short label used in logs and reports.
    #[serde(default)]
    pub label: String,
    pub old_text: String,
    pub new_text: String,
}

impl PatchRule {
    pub fn new(label: &str, old_text: &str, new_text: &str) -> Self {
        PatchRule {
            label: label.to_string(),
            old_text: old_text.to_string(),
            new_text: new_text.to_string(),
        }
    }

    /// Applies the rule to in-memory text, returning the new text if the
    /// pattern was found.
    pub fn apply_to_str(&self, text: &str) -> Option<String> {
        replace_first(text, &self.old_text, &self.new_text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    Applied,
    NotFound,
}

fn replace_first(text: &str, old_text: &str, new_text: &str) -> Option<String> {
    let start = text.find(old_text)?;
    let end = start + old_text.len();
    let mut result = String::with_capacity(text.len() - old_text.len() + new_text.len());
    result.push_str(&text[..start]);
    result.push_str(new_text);
    result.push_str(&text[end..]);
    Some(result)
}

fn read_text(file_path: &Path) -> Result<String, VflowError> {
    std::fs::read_to_string(file_path).map_err(|e| VflowError::file_access(file_path, e))
}

fn write_text(file_path: &Path, text: &str) -> Result<(), VflowError> {
    std::fs::write(file_path, text).map_err(|e| VflowError::file_access(file_path, e))
}

/// Replaces the first occurrence of `old_text` in the file at `file_path`.
///
/// The whole file is read, patched in memory and written back. When the
/// pattern does not occur the file is not rewritten at all.
pub fn apply(file_path: &Path, old_text: &str, new_text: &str) -> Result<PatchOutcome, VflowError> {
    apply_rule(file_path, &PatchRule::new("", old_text, new_text))
}

/// Like [`apply`], taking the replacement from `rule`.
pub fn apply_rule(file_path: &Path, rule: &PatchRule) -> Result<PatchOutcome, VflowError> {
    let text = read_text(file_path)?;

    let patched = match rule.apply_to_str(&text) {
        Some(patched) => patched,
        None => {
            log::debug!("apply_rule; no match in {}", file_path.display());
            return Ok(PatchOutcome::NotFound);
        }
    };

    write_text(file_path, &patched)?;
    log::debug!("apply_rule; patched {}", file_path.display());
    Ok(PatchOutcome::Applied)
}

/// Applies `rules` to `file_path` in the given order, each one seeing the
/// result of the previous ones. Unmatched rules are logged as warnings so a
/// change in the generator's output format does not go unnoticed. The first
/// file access error ends the run; later rules are not attempted.
pub fn apply_rules(file_path: &Path, rules: &[PatchRule]) -> Result<Vec<PatchOutcome>, VflowError> {
    let mut outcomes = Vec::with_capacity(rules.len());
    for rule in rules {
        let outcome = apply_rule(file_path, rule)?;
        if outcome == PatchOutcome::NotFound {
            log::warn!(
                "patch rule {:?} did not match anything in {}",
                rule.label,
                file_path.display()
            );
        }
        outcomes.push(outcome);
    }
    Ok(outcomes)
}

#[derive(Deserialize)]
struct RuleFile {
    #[serde(default)]
    rule: Vec<PatchRule>,
}

/// Parses an ordered rule list from TOML text of the form:
///
/// ```toml
/// [[rule]]
/// label = "lib"
/// old_text = "library foo;"
/// new_text = "use work.all;"
/// ```
pub fn parse_rules(toml_text: &str) -> Result<Vec<PatchRule>, VflowError> {
    let file: RuleFile =
        toml::from_str(toml_text).map_err(|e| VflowError::Config(e.to_string()))?;
    Ok(file.rule)
}

/// Reads and parses a rule file; parse errors name the file.
pub fn load_rules(path: &Path) -> Result<Vec<PatchRule>, VflowError> {
    let text = read_text(path)?;
    parse_rules(&text).map_err(|e| match e {
        VflowError::Config(msg) => VflowError::Config(format!("{}: {}", path.display(), msg)),
        other => other,
    })
}
