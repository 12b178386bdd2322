// SPDX-License-Identifier: Apache-2.0

use clap::ArgMatches;
use std::path::Path;
use vflow::patch::{apply_rules, load_rules};
use vflow::{PatchOutcome, VflowError};

pub fn handle_patch_file(matches: &ArgMatches) -> Result<(), VflowError> {
    let file = matches.get_one::<String>("file").unwrap();
    let rules_path = matches.get_one::<String>("rules").unwrap();

    let rules = load_rules(Path::new(rules_path))?;
    log::info!("patch-file; {} rule(s) from {}", rules.len(), rules_path);

    let outcomes = apply_rules(Path::new(file), &rules)?;
    let applied = outcomes
        .iter()
        .filter(|o| **o == PatchOutcome::Applied)
        .count();
    println!("{}: applied {} of {} rule(s)", file, applied, rules.len());
    Ok(())
}
