// SPDX-License-Identifier: Apache-2.0

use pretty_assertions::assert_eq;
use std::process::{Command, Output};

fn run_driver(cwd: &std::path::Path, args: &[&str]) -> Output {
    let command_path = env!("CARGO_BIN_EXE_vflow-driver");
    Command::new(command_path)
        .current_dir(cwd)
        .env_remove("VUNIT_SIMULATOR")
        .args(args)
        .output()
        .expect("Failed to run vflow-driver")
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "stdout: {}\nstderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn test_patch_regs_subcommand() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path();
    std::fs::create_dir(root.join("regs")).unwrap();
    std::fs::write(root.join("regs/ctrl.toml"), "[config]\nmode = \"r_w\"\n").unwrap();
    let hdl_dir = root.join("build/regs_out/ctrl/hdl");
    let artifacts = vflow_test_helpers::write_regfile_artifacts(&hdl_dir, "ctrl");

    // The second map does not exist and is skipped.
    let output = run_driver(root, &["patch-regs", "regs/ctrl.toml", "regs/missing.toml"]);
    assert_success(&output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 5);
    assert!(stdout.lines().all(|l| l.ends_with(": applied")), "{}", stdout);

    let wrapper = std::fs::read_to_string(&artifacts.axi_lite_wrapper).unwrap();
    vflow_test_helpers::assert_work_namespace_only(&wrapper);
}

#[test]
fn test_patch_regs_without_generated_output_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path();
    std::fs::write(root.join("ctrl.toml"), "").unwrap();
    let output = run_driver(root, &["patch-regs", "ctrl.toml"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("patch-regs: "), "{}", stderr);
    assert!(stderr.contains("cannot access file"), "{}", stderr);
    let path_line = stderr
        .lines()
        .find(|l| l.starts_with("  path: "))
        .unwrap_or_else(|| panic!("no path detail in {}", stderr));
    assert!(path_line.ends_with("ctrl_register_file_axi_lite.vhd"), "{}", path_line);
    assert!(stderr.lines().any(|l| l.starts_with("  error: ")), "{}", stderr);
}

#[test]
fn test_bad_sweep_file_reports_configuration_error() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path();
    std::fs::write(
        root.join("sweeps.toml"),
        "[[test_bench]]\nname = \"tb\"\ngenerics = [{ name = \"A\", values = 3 }]\n",
    )
    .unwrap();
    let output = run_driver(root, &["sweep", "sweeps.toml"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("sweep: "), "{}", stderr);
    assert!(stderr.contains("bad configuration"), "{}", stderr);
    assert!(
        stderr.lines().any(|l| l.starts_with("  error: ") && l.contains("sweeps.toml")),
        "{}",
        stderr
    );
}

#[test]
fn test_patch_file_subcommand() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path();
    std::fs::write(root.join("top.vhd"), "xfooyfooz").unwrap();
    std::fs::write(
        root.join("rules.toml"),
        r#"
[[rule]]
label = "foo"
old_text = "foo"
new_text = "bar"

[[rule]]
label = "absent"
old_text = "qux"
new_text = "quux"
"#,
    )
    .unwrap();

    let output = run_driver(root, &["patch-file", "top.vhd", "--rules", "rules.toml"]);
    assert_success(&output);
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "top.vhd: applied 1 of 2 rule(s)"
    );
    assert_eq!(std::fs::read_to_string(root.join("top.vhd")).unwrap(), "xbaryfooz");
}

#[test]
fn test_sweep_subcommand_lists_names() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path();
    std::fs::write(
        root.join("sweeps.toml"),
        r#"
[[test_bench]]
name = "ab_tb"
generics = [
  { name = "A", values = [1, 2] },
  { name = "B", values = [true, false] },
]
"#,
    )
    .unwrap();

    let output = run_driver(root, &["sweep", "sweeps.toml"]);
    assert_success(&output);
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "ab_tb.A=1-B=True\nab_tb.A=1-B=False\nab_tb.A=2-B=True\nab_tb.A=2-B=False\n"
    );
}

#[test]
fn test_sweep_json_carries_generics() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path();
    std::fs::write(
        root.join("sweeps.toml"),
        r#"
[[test_bench]]
name = "ab_tb"
generics = [
  { name = "A", values = [1, 2] },
  { name = "B", values = [true, false] },
]
"#,
    )
    .unwrap();

    let output = run_driver(root, &["sweep", "sweeps.toml", "--json"]);
    assert_success(&output);
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let configs = value["test_benches"][0]["configs"].as_array().unwrap();
    assert_eq!(configs.len(), 4);
    assert_eq!(configs[1]["name"], "A=1-B=False");
    assert_eq!(configs[1]["generics"]["A"], 1);
    assert_eq!(configs[1]["generics"]["B"], false);
}

#[test]
fn test_sweep_file_from_toolchain_toml() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path();
    std::fs::write(
        root.join("mine.toml"),
        "[[test_bench]]\nname = \"x_tb\"\ngenerics = [{ name = \"X\", values = [\"a\"] }]\n",
    )
    .unwrap();
    std::fs::write(
        root.join("vflow-toolchain.toml"),
        "[toolchain]\nsweep_file = \"mine.toml\"\n",
    )
    .unwrap();

    let output = run_driver(root, &["sweep", "--json"]);
    assert_success(&output);
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["test_benches"][0]["name"], "x_tb");
    assert_eq!(value["test_benches"][0]["configs"][0]["name"], "X=a");
}

#[test]
fn test_sweep_builtin_default() {
    let temp_dir = tempfile::tempdir().unwrap();
    let output = run_driver(temp_dir.path(), &["sweep"]);
    assert_success(&output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 70);
    assert!(stdout.contains(
        "axis_fifo_tb.G_ENABLE_JITTER=True-G_DEPTH=64-G_PACKET_MODE=False-G_DROP_OVERSIZE=False\n"
    ));
    assert!(!stdout.contains("G_PACKET_MODE=False-G_DROP_OVERSIZE=True"));
}

#[test]
fn test_sim_plan_flag_and_environment() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path();
    std::fs::create_dir_all(root.join("src/fifo/hdl")).unwrap();
    std::fs::write(root.join("src/fifo/hdl/fifo.vhd"), "").unwrap();

    let output = run_driver(root, &["sim-plan", "--ghdl", "--output", "plan.json"]);
    assert_success(&output);
    let plan: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(root.join("plan.json")).unwrap()).unwrap();
    assert_eq!(plan["simulator"], "ghdl");
    assert_eq!(plan["vhdl_standard"], "2019");
    assert_eq!(plan["sources"].as_array().unwrap().len(), 1);
    assert_eq!(plan["compile_options"][0]["name"], "ghdl.a_flags");
    assert_eq!(plan["runner_libraries"][0], "vhdl_builtins");
    assert_eq!(plan["runner_libraries"].as_array().unwrap().len(), 5);

    // The environment variable overrides the flag.
    let output = Command::new(env!("CARGO_BIN_EXE_vflow-driver"))
        .current_dir(root)
        .env("VUNIT_SIMULATOR", "nvc")
        .args(["sim-plan", "--ghdl"])
        .output()
        .unwrap();
    assert_success(&output);
    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(plan["simulator"], "nvc");
}

#[test]
fn test_sim_plan_vhdl_ls_writes_config() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path();
    for rel in ["src/fifo/hdl/fifo.vhd", "platforms/board/hdl/top.vhd"] {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "").unwrap();
    }

    let output = run_driver(root, &["sim-plan", "--vhdl_ls"]);
    assert_success(&output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.trim().ends_with("vhdl_ls.toml"), "{}", stdout);
    // Only the language-server config is produced, not a plan.
    assert!(serde_json::from_slice::<serde_json::Value>(&output.stdout).is_err());

    let text = std::fs::read_to_string(root.join("vhdl_ls.toml")).unwrap();
    let value: toml::Value = toml::from_str(&text).unwrap();
    let files: Vec<&str> = value["libraries"]["lib"]["files"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f.as_str().unwrap())
        .collect();
    assert_eq!(files.len(), 2, "{}", text);
    assert!(files.iter().any(|f| f.ends_with("src/fifo/hdl/fifo.vhd")), "{}", text);
    assert!(files.iter().any(|f| f.ends_with("platforms/board/hdl/top.vhd")), "{}", text);
}

#[test]
fn test_sim_plan_rejects_both_simulator_flags() {
    let temp_dir = tempfile::tempdir().unwrap();
    let output = run_driver(temp_dir.path(), &["sim-plan", "--ghdl", "--nvc"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--ghdl"), "{}", stderr);
}

#[test]
fn test_missing_toolchain_file_is_reported() {
    let temp_dir = tempfile::tempdir().unwrap();
    let output = run_driver(temp_dir.path(), &["--toolchain", "nope.toml", "sweep"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("toolchain toml file does not exist"), "{}", stderr);
}
