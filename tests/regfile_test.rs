// SPDX-License-Identifier: Apache-2.0

use vflow::regfile::{hdl_output_dir, patch_register_artifacts, REGFILE_RULES};
use vflow::PatchOutcome;
use vflow_test_helpers::{assert_work_namespace_only, init_test_logging, write_regfile_artifacts};

#[test]
fn test_patch_generated_artifacts() {
    init_test_logging();
    let temp_dir = tempfile::tempdir().unwrap();
    let hdl_dir = hdl_output_dir(temp_dir.path(), "ctrl");
    let artifacts = write_regfile_artifacts(&hdl_dir, "ctrl");

    let reports = patch_register_artifacts(&hdl_dir, "ctrl").unwrap();
    assert_eq!(reports.len(), REGFILE_RULES.len());
    for report in &reports {
        assert_eq!(report.outcome, PatchOutcome::Applied, "{}", report.label);
    }

    let wrapper = std::fs::read_to_string(&artifacts.axi_lite_wrapper).unwrap();
    assert_work_namespace_only(&wrapper);
    assert!(wrapper.contains("    s_axil_req  : in    axil_req_t;\n"));
    assert!(wrapper.contains("  axi_lite_m2s <= to_hdlm(s_axil_req);\n"));
    assert!(wrapper.contains("entity work.axi_lite_register_file\n    generic map ("));
    // The internal signals are declared before `begin`.
    let decl = wrapper.find("  signal axi_lite_m2s : axi_lite_m2s_t;").unwrap();
    let begin = wrapper.find("\nbegin\n").unwrap();
    assert!(decl < begin);

    let record_pkg = std::fs::read_to_string(&artifacts.record_pkg).unwrap();
    assert_work_namespace_only(&record_pkg);
    assert!(record_pkg.contains("use work.register_file_pkg.register_t;\n\nuse work.ctrl_regs_pkg.all;"));

    let regs_pkg = std::fs::read_to_string(&artifacts.regs_pkg).unwrap();
    assert_work_namespace_only(&regs_pkg);
    assert!(regs_pkg.contains("use ieee.fixed_pkg.all;\n\nuse work.register_file_pkg.all;\n"));
}

#[test]
fn test_repatching_changes_nothing() {
    init_test_logging();
    let temp_dir = tempfile::tempdir().unwrap();
    let hdl_dir = temp_dir.path().join("hdl");
    let artifacts = write_regfile_artifacts(&hdl_dir, "dma");

    patch_register_artifacts(&hdl_dir, "dma").unwrap();
    let once = std::fs::read(&artifacts.axi_lite_wrapper).unwrap();

    let reports = patch_register_artifacts(&hdl_dir, "dma").unwrap();
    assert!(reports.iter().all(|r| r.outcome == PatchOutcome::NotFound));
    assert_eq!(std::fs::read(&artifacts.axi_lite_wrapper).unwrap(), once);
}
