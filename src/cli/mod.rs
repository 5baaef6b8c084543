//! Command-line interface for pebble-complete
//!
//! This module handles:
//! - Command-line argument parsing using clap
//! - Configuration loading and validation
//! - One-shot and streaming completion (`complete`)
//! - Catalog listing, config inspection and shell completion scripts

pub mod completion;

use clap::{Parser, Subcommand};
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

use crate::completion::{
    CandidateProvider, CatalogKind, CompletionEngine, LinePrefix, TriggerPolicy,
};
use crate::config::{Config, LogLevel, OutputFormat};
use crate::error::Result;
use crate::formatter::Formatter;

/// Pebble template completion
#[derive(Parser, Debug)]
#[command(
    name = "pebble-complete",
    version,
    about = "Context-aware completion for Pebble templates",
    long_about = "Classifies the text before the cursor in a Pebble template and lists the
keywords, operators, filters, functions, tests and loop variables that fit there.
Without a subcommand an interactive playground is started."
)]
pub struct CliArgs {
    /// Configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    pub config_file: Option<PathBuf>,

    /// Output format (plain, table, json, json-pretty)
    #[arg(long, value_name = "FORMAT", global = true)]
    pub format: Option<String>,

    /// Disable colored output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Quiet mode (errors only)
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Very verbose mode (trace logging)
    #[arg(long = "vv", global = true)]
    pub very_verbose: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands for pebble-complete
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Complete a line prefix, or each line read from stdin
    Complete {
        /// Text before the cursor; stdin lines are read when omitted
        #[arg(value_name = "PREFIX")]
        prefix: Option<String>,

        /// Treat input as whole lines and cut them at this character column
        #[arg(long, value_name = "N")]
        column: Option<usize>,

        /// Print the classification before the candidates
        #[arg(long)]
        explain: bool,

        /// Print nothing unless the prefix ends with a trigger character
        #[arg(long)]
        on_trigger: bool,
    },

    /// List the entries of a catalog, or all catalogs
    Catalog {
        /// Catalog name (keywords, operators, filters, functions, tests, loop)
        #[arg(value_name = "NAME")]
        name: Option<String>,
    },

    /// Start the interactive playground
    Repl,

    /// Show configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Validate configuration file
        #[arg(long)]
        validate: bool,
    },

    /// Generate shell completion script
    Completion {
        /// Shell type (bash, zsh, fish)
        #[arg(value_name = "SHELL")]
        shell: String,
    },

    /// Show version information
    Version,
}

/// Options of the `complete` subcommand
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompleteOptions {
    pub column: Option<usize>,
    pub explain: bool,
    pub on_trigger: bool,
}

/// CLI interface handler
pub struct CliInterface {
    /// Parsed command-line arguments
    args: CliArgs,

    /// Loaded configuration
    config: Config,
}

impl CliInterface {
    /// Create a new CLI interface from the process arguments
    ///
    /// # Returns
    /// * `Result<Self>` - New CLI interface or error
    pub fn new() -> Result<Self> {
        Self::from_args(CliArgs::parse())
    }

    /// Create a CLI interface from already parsed arguments
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let config = Self::load_config(&args)?;
        Ok(Self { args, config })
    }

    /// Load configuration from file and merge with arguments
    ///
    /// # Arguments
    /// * `args` - Command-line arguments
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    fn load_config(args: &CliArgs) -> Result<Config> {
        let mut config = Config::load_from_file(args.config_file.as_deref())?;

        if let Err(e) = config.validate() {
            eprintln!("Warning: Configuration validation failed: {e}");
            eprintln!("Using default configuration instead.");
            config = Config::default();
        }

        Self::apply_args_to_config(&mut config, args);

        Ok(config)
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the CLI arguments
    pub fn args(&self) -> &CliArgs {
        &self.args
    }

    /// Apply CLI arguments to configuration
    ///
    /// Overrides configuration values with CLI arguments where provided
    fn apply_args_to_config(config: &mut Config, args: &CliArgs) {
        Self::apply_display_args(config, args);
        Self::apply_logging_args(config, args);
    }

    /// Apply display-related CLI arguments to configuration
    fn apply_display_args(config: &mut Config, args: &CliArgs) {
        if let Some(format_str) = &args.format {
            config.display.format = Self::parse_output_format(format_str);
        }

        if args.no_color {
            config.display.color_output = false;
        }
    }

    /// Apply logging-related CLI arguments to configuration
    fn apply_logging_args(config: &mut Config, args: &CliArgs) {
        config.logging.level = if args.very_verbose {
            LogLevel::Trace
        } else if args.verbose {
            LogLevel::Debug
        } else if args.quiet {
            LogLevel::Error
        } else {
            config.logging.level
        };
    }

    /// Parse output format string
    fn parse_output_format(format_str: &str) -> OutputFormat {
        match format_str.to_lowercase().as_str() {
            "plain" | "text" => OutputFormat::Plain,
            "table" => OutputFormat::Table,
            "json" => OutputFormat::Json,
            "json-pretty" | "jsonpretty" => OutputFormat::JsonPretty,
            _ => {
                eprintln!("Warning: Unknown format '{format_str}', using plain");
                OutputFormat::Plain
            }
        }
    }

    /// Formatter for stdout, with colors only on a terminal
    fn formatter(&self) -> Formatter {
        let use_colors = self.config.display.color_output && io::stdout().is_terminal();
        Formatter::new(self.config.display.format, use_colors)
    }

    /// Handle subcommands
    ///
    /// # Returns
    /// * `Result<bool>` - True if subcommand was handled, false to start the playground
    pub fn handle_subcommand(&self) -> Result<bool> {
        match &self.args.command {
            Some(Commands::Complete {
                prefix,
                column,
                explain,
                on_trigger,
            }) => {
                let options = CompleteOptions {
                    column: *column,
                    explain: *explain,
                    on_trigger: *on_trigger,
                };
                self.run_complete(prefix.as_deref(), options)?;
                Ok(true)
            }
            Some(Commands::Catalog { name }) => {
                self.show_catalog(name.as_deref())?;
                Ok(true)
            }
            Some(Commands::Config { show, validate }) => {
                self.handle_config_command(*show, *validate)?;
                Ok(true)
            }
            Some(Commands::Completion { shell }) => {
                completion::generate_completion(shell)?;
                Ok(true)
            }
            Some(Commands::Version) => {
                self.show_version();
                Ok(true)
            }
            Some(Commands::Repl) | None => Ok(false),
        }
    }

    /// Run the `complete` subcommand
    ///
    /// With a prefix argument one result is printed. Otherwise every stdin
    /// line is completed and each result is terminated by an empty line.
    fn run_complete(&self, prefix: Option<&str>, options: CompleteOptions) -> Result<()> {
        let engine = self.config.engine();
        let trigger = self.config.completion.trigger_policy();
        let formatter = self.formatter();

        if let Some(prefix) = prefix {
            if let Some(output) = render_completion(&engine, &trigger, &formatter, prefix, options)?
                && !output.is_empty()
            {
                println!("{output}");
            }
            return Ok(());
        }

        let stdin = io::stdin();
        let mut stdout = io::stdout().lock();
        for line in stdin.lock().lines() {
            let line = line?;
            let output = render_completion(&engine, &trigger, &formatter, &line, options)?
                .unwrap_or_default();
            if !output.is_empty() {
                writeln!(stdout, "{output}")?;
            }
            writeln!(stdout)?;
            stdout.flush()?;
        }

        Ok(())
    }

    /// Print one catalog, or all catalogs
    fn show_catalog(&self, name: Option<&str>) -> Result<()> {
        let provider = self.config.completion.provider();
        let formatter = self.formatter();

        let output = match name {
            Some(name) => {
                let kind: CatalogKind = name.parse()?;
                formatter.format_catalog(kind, &provider.entries(kind))?
            }
            None => {
                let catalogs: Vec<_> = CatalogKind::ALL
                    .iter()
                    .map(|kind| (*kind, provider.entries(*kind)))
                    .collect();
                formatter.format_catalog_index(&catalogs)?
            }
        };

        println!("{output}");
        Ok(())
    }

    /// Show version information
    fn show_version(&self) {
        println!("pebble-complete version {}", env!("CARGO_PKG_VERSION"));
        println!("Rust version: {}", env!("CARGO_PKG_RUST_VERSION"));
    }

    /// Handle config subcommand
    ///
    /// # Arguments
    /// * `show` - Whether to show configuration
    /// * `validate` - Whether to validate configuration
    ///
    /// # Returns
    /// * `Result<()>` - Success or error
    fn handle_config_command(&self, show: bool, validate: bool) -> Result<()> {
        if validate {
            self.validate_config_file();
        }

        if show || !validate {
            self.show_config()?;
        }

        Ok(())
    }

    /// Validate configuration file
    fn validate_config_file(&self) {
        let path = self.get_config_path();
        println!("Validating configuration file: {}", path.display());

        if !path.exists() {
            println!("❌ Configuration file does not exist");
            return;
        }

        match Config::load_from_file(Some(&path)) {
            Ok(config) => match config.validate() {
                Ok(()) => println!("✅ Configuration is valid"),
                Err(e) => println!("❌ Configuration validation failed: {e}"),
            },
            Err(e) => println!("❌ Failed to load configuration: {e}"),
        }
    }

    /// Show effective configuration
    fn show_config(&self) -> Result<()> {
        let path = self.get_config_path();
        println!("# Configuration file: {}", path.display());
        println!();
        println!("{}", self.config.to_toml()?);
        Ok(())
    }

    /// Get configuration file path (from args or default)
    fn get_config_path(&self) -> PathBuf {
        self.args
            .config_file
            .clone()
            .unwrap_or_else(Config::default_config_path)
    }
}

/// Complete one input according to the `complete` options
///
/// # Returns
/// * `Result<Option<String>>` - Formatted output, or `None` when the trigger
///   policy suppressed it
pub fn render_completion(
    engine: &CompletionEngine,
    trigger: &TriggerPolicy,
    formatter: &Formatter,
    input: &str,
    options: CompleteOptions,
) -> Result<Option<String>> {
    let prefix = match options.column {
        Some(column) => LinePrefix::from_line(input, column),
        None => LinePrefix::new(input),
    };

    if options.on_trigger && !trigger.should_trigger(prefix.as_str()) {
        tracing::debug!(prefix = prefix.as_str(), "no trigger character, skipping");
        return Ok(None);
    }

    let (classification, set) = engine.classify_with_context(prefix.as_str());
    let output = if options.explain {
        formatter.format_explained(&classification, &set)?
    } else {
        formatter.format_candidates(&set)?
    };

    Ok(Some(output))
}
