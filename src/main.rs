//! pebble-complete
//!
//! Context-aware completion for Pebble templates.
//!
//! # Usage
//!
//! ```bash
//! # One-shot completion
//! pebble-complete complete '{{ user.name | '
//!
//! # Line-oriented completion for editor integrations
//! printf '{%% if x is \n' | pebble-complete --format json complete
//!
//! # Interactive playground
//! pebble-complete
//! ```

use pebble_complete::cli::CliInterface;
use pebble_complete::error::Result;
use pebble_complete::repl::ReplEngine;

/// Application entry point
fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Main application logic
///
/// This function orchestrates the application startup:
/// 1. Parse command-line arguments
/// 2. Load configuration
/// 3. Initialize logging
/// 4. Handle subcommands or start the playground
///
/// # Returns
/// * `Result<()>` - Success or error
fn run() -> Result<()> {
    let cli = CliInterface::new()?;

    initialize_logging(&cli);

    if cli.handle_subcommand()? {
        return Ok(());
    }

    run_interactive_mode(&cli)
}

/// Run the interactive playground
fn run_interactive_mode(cli: &CliInterface) -> Result<()> {
    if !cli.args().quiet {
        println!(
            "pebble-complete {} - Tab to complete, Enter to classify, :quit to leave",
            env!("CARGO_PKG_VERSION")
        );
    }

    let mut repl = ReplEngine::new(cli.config())?;
    repl.run()?;

    if !cli.args().quiet {
        println!("Goodbye!");
    }
    Ok(())
}

/// Initialize logging system based on the effective log level
///
/// Logs go to stderr so that stdout carries only completion output.
///
/// # Arguments
/// * `cli` - CLI interface with the effective configuration
fn initialize_logging(cli: &CliInterface) {
    let level = cli.config().logging.level.to_tracing_level();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr);

    if cli.config().logging.timestamps {
        subscriber.init();
    } else {
        subscriber.without_time().init();
    }
}
