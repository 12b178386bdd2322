// SPDX-License-Identifier: Apache-2.0

use colored::Colorize;
use vflow::VflowError;

pub fn report_cli_error_and_exit(
    message: &str,
    subcommand: Option<&str>,
    details: Vec<(&str, &str)>,
) -> ! {
    let subcommand_str = if let Some(subcommand) = subcommand {
        format!("{}: ", subcommand)
    } else {
        String::new()
    };
    eprintln!("vflow-driver: {}{}", subcommand_str, message.red().bold());
    for (key, value) in details {
        eprintln!("  {}: {}", key, value);
    }
    std::process::exit(1);
}

/// Reports a library error with its fields broken out as detail lines.
pub fn report_vflow_error_and_exit(error: &VflowError, subcommand: &str) -> ! {
    match error {
        VflowError::FileAccess { path, source } => report_cli_error_and_exit(
            "cannot access file",
            Some(subcommand),
            vec![
                ("path", &path.display().to_string()),
                ("error", &source.to_string()),
            ],
        ),
        VflowError::Config(msg) => {
            report_cli_error_and_exit("bad configuration", Some(subcommand), vec![("error", msg)])
        }
        VflowError::Registrar(msg) => report_cli_error_and_exit(
            "configuration rejected by registrar",
            Some(subcommand),
            vec![("error", msg)],
        ),
        VflowError::Serialization(msg) => report_cli_error_and_exit(
            "could not render output",
            Some(subcommand),
            vec![("error", msg)],
        ),
    }
}
