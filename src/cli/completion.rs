//! Shell completion generation for pebble-complete
//!
//! Generates completion scripts for bash, zsh and fish. Catalog names are
//! fixed, so the generated scripts need no dynamic lookups.

use clap::CommandFactory;
use clap_complete::{Shell, generate};
use std::io::Write;

use crate::cli::CliArgs;
use crate::error::{PebbleError, Result};

/// Binary name used in generated scripts
const BIN_NAME: &str = "pebble-complete";

/// Generate a shell completion script and write it to stdout
///
/// # Arguments
/// * `shell_name` - Shell type (bash, zsh, fish)
///
/// # Returns
/// * `Result<()>` - Success or error
pub fn generate_completion(shell_name: &str) -> Result<()> {
    let script = completion_script(shell_name)?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&script)?;
    stdout.flush()?;
    Ok(())
}

/// Render the completion script for a shell
pub fn completion_script(shell_name: &str) -> Result<Vec<u8>> {
    let shell = parse_shell(shell_name)?;
    let mut cmd = CliArgs::command();
    let mut buffer = Vec::new();
    generate(shell, &mut cmd, BIN_NAME, &mut buffer);
    Ok(buffer)
}

/// Parse shell name string to Shell enum
fn parse_shell(shell_name: &str) -> Result<Shell> {
    match shell_name.to_lowercase().as_str() {
        "bash" => Ok(Shell::Bash),
        "zsh" => Ok(Shell::Zsh),
        "fish" => Ok(Shell::Fish),
        _ => Err(PebbleError::Usage(format!(
            "Unsupported shell: {shell_name}. Supported shells: bash, zsh, fish"
        ))),
    }
}
