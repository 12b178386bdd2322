// SPDX-License-Identifier: Apache-2.0

//! Rules that adapt the register-file generator's VHDL output to this
//! library's `work`-only namespace.
//!
//! The generator emits code that refers to the `axi_lite` and `register_file`
//! libraries and exposes the AXI-Lite bus as `axi_lite_m2s`/`axi_lite_s2m`.
//! The rules below rewrite those artifacts to use `work` and the local
//! `axil_req_t`/`axil_rsp_t` bus types. Rules run in table order: rule 3
//! declares the internal `axi_lite_m2s`/`axi_lite_s2m` signals that replace
//! the ports removed by rule 2.

use crate::patch::{self, PatchOutcome, PatchRule};
use crate::vflow_error::VflowError;
use std::path::{Path, PathBuf};

/// One of the generated VHDL files that gets patched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegfileArtifact {
    AxiLiteWrapper,
    RecordPackage,
    RegsPackage,
}

impl RegfileArtifact {
    /// File name the generator uses for register map `name`.
    pub fn file_name(&self, name: &str) -> String {
        match self {
            RegfileArtifact::AxiLiteWrapper => format!("{}_register_file_axi_lite.vhd", name),
            RegfileArtifact::RecordPackage => format!("{}_register_record_pkg.vhd", name),
            RegfileArtifact::RegsPackage => format!("{}_regs_pkg.vhd", name),
        }
    }
}

pub struct RegfileRule {
    pub label: &'static str,
    pub artifact: RegfileArtifact,
    pub old_text: &'static str,
    pub new_text: &'static str,
}

impl RegfileRule {
    pub fn to_patch_rule(&self) -> PatchRule {
        PatchRule::new(self.label, self.old_text, self.new_text)
    }
}

const AXI_LITE_LIBRARIES_OLD: &str = "-- This VHDL file is a required dependency:
-- https://github.com/hdl-modules/hdl-modules/blob/main/modules/axi_lite/src/axi_lite_pkg.vhd
-- See https://hdl-registers.com/rst/generator/generator_vhdl.html for dependency details.
library axi_lite;
use axi_lite.axi_lite_pkg.all;

-- This VHDL file is a required dependency:
-- https://github.com/hdl-modules/hdl-modules/blob/main/modules/register_file/src/axi_lite_register_file.vhd
-- See https://hdl-registers.com/rst/generator/generator_vhdl.html for dependency details.
library register_file;";

const AXI_LITE_LIBRARIES_NEW: &str = "use work.axi_lite_pkg.all;
use work.util_pkg.all;
use work.hdlm_conv_pkg.all;
";

const AXI_LITE_PORTS_OLD: &str = "    --# {}
    --# Register control bus.
    axi_lite_m2s : in axi_lite_m2s_t;
    axi_lite_s2m : out axi_lite_s2m_t := axi_lite_s2m_init;
";

const AXI_LITE_PORTS_NEW: &str = "    --# {}
    --# Register control bus.
    s_axil_req  : in    axil_req_t;
    s_axil_rsp  : out   axil_rsp_t;
";

const AXI_LITE_INSTANCE_OLD: &str = "
begin

  ------------------------------------------------------------------------------
  -- Instantiate the generic register file implementation:
  -- https://github.com/hdl-modules/hdl-modules/blob/main/modules/register_file/src/axi_lite_register_file.vhd
  -- See https://hdl-registers.com/rst/generator/generator_vhdl.html for dependency details.
  axi_lite_register_file_inst : entity register_file.axi_lite_register_file";

const AXI_LITE_INSTANCE_NEW: &str = "
  signal axi_lite_m2s : axi_lite_m2s_t;
  signal axi_lite_s2m : axi_lite_s2m_t;

begin

  axi_lite_m2s <= to_hdlm(s_axil_req);
  s_axil_rsp   <= to_hdlm(axi_lite_s2m);

  ------------------------------------------------------------------------------
  -- Instantiate the generic register file implementation
  axi_lite_register_file_inst : entity work.axi_lite_register_file";

const RECORD_PKG_OLD: &str = "library register_file;
use register_file.register_file_pkg.register_t;";

const RECORD_PKG_NEW: &str = "use work.register_file_pkg.register_t;";

const REGS_PKG_OLD: &str = "library register_file;
use register_file.register_file_pkg.all;";

const REGS_PKG_NEW: &str = "use work.register_file_pkg.all;";

pub const REGFILE_RULES: &[RegfileRule] = &[
    RegfileRule {
        label: "axi_lite_libraries",
        artifact: RegfileArtifact::AxiLiteWrapper,
        old_text: AXI_LITE_LIBRARIES_OLD,
        new_text: AXI_LITE_LIBRARIES_NEW,
    },
    RegfileRule {
        label: "axi_lite_ports",
        artifact: RegfileArtifact::AxiLiteWrapper,
        old_text: AXI_LITE_PORTS_OLD,
        new_text: AXI_LITE_PORTS_NEW,
    },
    RegfileRule {
        label: "axi_lite_instance",
        artifact: RegfileArtifact::AxiLiteWrapper,
        old_text: AXI_LITE_INSTANCE_OLD,
        new_text: AXI_LITE_INSTANCE_NEW,
    },
    RegfileRule {
        label: "record_pkg_library",
        artifact: RegfileArtifact::RecordPackage,
        old_text: RECORD_PKG_OLD,
        new_text: RECORD_PKG_NEW,
    },
    RegfileRule {
        label: "regs_pkg_library",
        artifact: RegfileArtifact::RegsPackage,
        old_text: REGS_PKG_OLD,
        new_text: REGS_PKG_NEW,
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleReport {
    pub label: &'static str,
    pub file: PathBuf,
    pub outcome: PatchOutcome,
}

/// Register map name for a register TOML file, i.e. its file stem.
pub fn register_map_name(toml_file: &Path) -> Option<String> {
    toml_file
        .file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
}

/// Directory the generator writes HDL for map `name` into.
pub fn hdl_output_dir(build_dir: &Path, name: &str) -> PathBuf {
    build_dir.join("regs_out").join(name).join("hdl")
}

/// Applies every rule of [`REGFILE_RULES`] to the artifacts of register map
/// `name` under `hdl_dir`, in table order.
pub fn patch_register_artifacts(hdl_dir: &Path, name: &str) -> Result<Vec<RuleReport>, VflowError> {
    log::info!(
        "patch_register_artifacts; name: {} hdl_dir: {}",
        name,
        hdl_dir.display()
    );
    let mut reports = Vec::with_capacity(REGFILE_RULES.len());
    // The table is grouped by artifact; each run of rules shares one file.
    for group in REGFILE_RULES.chunk_by(|a, b| a.artifact == b.artifact) {
        let file = hdl_dir.join(group[0].artifact.file_name(name));
        let rules: Vec<PatchRule> = group.iter().map(RegfileRule::to_patch_rule).collect();
        let outcomes = patch::apply_rules(&file, &rules)?;
        for (rule, outcome) in group.iter().zip(outcomes) {
            reports.push(RuleReport {
                label: rule.label,
                file: file.clone(),
                outcome,
            });
        }
    }
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0; "axi_lite_libraries")]
    #[test_case(1; "axi_lite_ports")]
    #[test_case(2; "axi_lite_instance")]
    #[test_case(3; "record_pkg_library")]
    #[test_case(4; "regs_pkg_library")]
    fn test_rule_in_isolation(index: usize) {
        let rule = &REGFILE_RULES[index];
        let before = format!("-- header\n{}\n-- trailer\n", rule.old_text);
        let after = rule.to_patch_rule().apply_to_str(&before).unwrap();
        assert_eq!(after, format!("-- header\n{}\n-- trailer\n", rule.new_text));
        // The replacement never reintroduces its own pattern.
        assert!(!after.contains(rule.old_text));
    }

    #[test]
    fn test_rule_order_and_targets() {
        let labels: Vec<&str> = REGFILE_RULES.iter().map(|r| r.label).collect();
        assert_eq!(
            labels,
            vec![
                "axi_lite_libraries",
                "axi_lite_ports",
                "axi_lite_instance",
                "record_pkg_library",
                "regs_pkg_library"
            ]
        );
        assert_eq!(
            REGFILE_RULES[3].artifact.file_name("ctrl"),
            "ctrl_register_record_pkg.vhd"
        );
        assert_eq!(REGFILE_RULES[4].artifact.file_name("ctrl"), "ctrl_regs_pkg.vhd");
        assert_eq!(
            REGFILE_RULES[0].artifact.file_name("ctrl"),
            "ctrl_register_file_axi_lite.vhd"
        );
    }

    #[test]
    fn test_register_map_name_and_output_dir() {
        let name = register_map_name(Path::new("regs/ctrl.toml")).unwrap();
        assert_eq!(name, "ctrl");
        assert_eq!(
            hdl_output_dir(Path::new("build"), &name),
            Path::new("build/regs_out/ctrl/hdl")
        );
    }

    #[test]
    fn test_rules_grouped_by_artifact() {
        let mut seen = Vec::new();
        for rule in REGFILE_RULES {
            if seen.last() != Some(&rule.artifact) {
                assert!(!seen.contains(&rule.artifact), "{} out of group", rule.label);
                seen.push(rule.artifact);
            }
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_missing_artifact_is_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = patch_register_artifacts(temp_dir.path(), "ctrl").unwrap_err();
        assert!(matches!(err, VflowError::FileAccess { .. }), "{}", err);
    }
}
