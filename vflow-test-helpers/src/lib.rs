// SPDX-License-Identifier: Apache-2.0

//! Fixtures shaped like the register-file generator's VHDL output, for tests
//! that exercise patching without running the generator.

use std::path::{Path, PathBuf};

const NAME_PLACEHOLDER: &str = "@NAME@";

const AXI_LITE_WRAPPER: &str = "-- This file is automatically generated by hdl-registers.
-- Do not edit this file manually.

library ieee;
use ieee.std_logic_1164.all;
use ieee.numeric_std.all;

-- This VHDL file is a required dependency:
-- https://github.com/hdl-modules/hdl-modules/blob/main/modules/axi_lite/src/axi_lite_pkg.vhd
-- See https://hdl-registers.com/rst/generator/generator_vhdl.html for dependency details.
library axi_lite;
use axi_lite.axi_lite_pkg.all;

-- This VHDL file is a required dependency:
-- https://github.com/hdl-modules/hdl-modules/blob/main/modules/register_file/src/axi_lite_register_file.vhd
-- See https://hdl-registers.com/rst/generator/generator_vhdl.html for dependency details.
library register_file;

use work.@NAME@_regs_pkg.all;
use work.@NAME@_register_record_pkg.all;


entity @NAME@_register_file_axi_lite is
  port (
    clk : in std_ulogic;
    reset : in std_ulogic := '0';
    --# {}
    --# Register control bus.
    axi_lite_m2s : in axi_lite_m2s_t;
    axi_lite_s2m : out axi_lite_s2m_t := axi_lite_s2m_init;
    --# {}
    -- Register values.
    regs_up : in @NAME@_regs_up_t := @NAME@_regs_up_init;
    regs_down : out @NAME@_regs_down_t := @NAME@_regs_down_init
  );
end entity;

architecture axi_lite of @NAME@_register_file_axi_lite is

  signal regs_up_slv, regs_down_slv : @NAME@_slv_regs_t(@NAME@_register_range);

begin

  ------------------------------------------------------------------------------
  -- Instantiate the generic register file implementation:
  -- https://github.com/hdl-modules/hdl-modules/blob/main/modules/register_file/src/axi_lite_register_file.vhd
  -- See https://hdl-registers.com/rst/generator/generator_vhdl.html for dependency details.
  axi_lite_register_file_inst : entity register_file.axi_lite_register_file
    generic map (
      registers => @NAME@_register_map,
      default_values => @NAME@_regs_init
    )
    port map(
      clk => clk,
      reset => reset,
      axi_lite_m2s => axi_lite_m2s,
      axi_lite_s2m => axi_lite_s2m,
      regs_up => regs_up_slv,
      regs_down => regs_down_slv
    );

  regs_up_slv <= to_slv(regs_up);
  regs_down <= to_@NAME@_regs_down(regs_down_slv);

end architecture;
";

const RECORD_PKG: &str = "-- This file is automatically generated by hdl-registers.
-- Do not edit this file manually.

library ieee;
use ieee.fixed_pkg.all;
use ieee.std_logic_1164.all;
use ieee.numeric_std.all;

library register_file;
use register_file.register_file_pkg.register_t;

use work.@NAME@_regs_pkg.all;


package @NAME@_register_record_pkg is

  type @NAME@_regs_down_t is record
    config : std_ulogic_vector(31 downto 0);
  end record;

end package;
";

const REGS_PKG: &str = "-- This file is automatically generated by hdl-registers.
-- Do not edit this file manually.

library ieee;
use ieee.std_logic_1164.all;
use ieee.numeric_std.all;
use ieee.fixed_pkg.all;

library register_file;
use register_file.register_file_pkg.all;


package @NAME@_regs_pkg is

  constant @NAME@_config : natural := 0;

end package;
";

/// Paths of the three generated artifacts written by
/// [`write_regfile_artifacts`].
pub struct RegfileArtifacts {
    pub axi_lite_wrapper: PathBuf,
    pub record_pkg: PathBuf,
    pub regs_pkg: PathBuf,
}

/// Writes generator-shaped VHDL for register map `name` into `hdl_dir`,
/// creating the directory if needed.
pub fn write_regfile_artifacts(hdl_dir: &Path, name: &str) -> RegfileArtifacts {
    std::fs::create_dir_all(hdl_dir).expect("create hdl dir");
    let artifacts = RegfileArtifacts {
        axi_lite_wrapper: hdl_dir.join(format!("{}_register_file_axi_lite.vhd", name)),
        record_pkg: hdl_dir.join(format!("{}_register_record_pkg.vhd", name)),
        regs_pkg: hdl_dir.join(format!("{}_regs_pkg.vhd", name)),
    };
    for (path, template) in [
        (&artifacts.axi_lite_wrapper, AXI_LITE_WRAPPER),
        (&artifacts.record_pkg, RECORD_PKG),
        (&artifacts.regs_pkg, REGS_PKG),
    ] {
        log::info!("write_regfile_artifacts; writing {}", path.display());
        std::fs::write(path, template.replace(NAME_PLACEHOLDER, name)).expect("write artifact");
    }
    artifacts
}

/// Asserts that `text` no longer refers to the generator's external
/// libraries.
pub fn assert_work_namespace_only(text: &str) {
    for needle in ["library axi_lite;", "library register_file;", "register_file."] {
        assert!(
            !text.contains(needle),
            "patched VHDL still contains {:?}:\n{}",
            needle,
            text
        );
    }
}

/// Initializes logging once for a test binary; later calls are no-ops.
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
