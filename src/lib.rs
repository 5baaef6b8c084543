//! Pebble template completion
//!
//! This library classifies the text before the cursor in a Pebble template
//! and returns the keywords, operators, filters, functions, tests and loop
//! variables that fit at that position. It can be embedded in editor
//! integrations or driven through the `pebble-complete` binary.
//!
//! # Modules
//!
//! - `cli`: Command-line interface and argument parsing
//! - `completion`: Catalogs, context classification and the completion engine
//! - `config`: Configuration management
//! - `error`: Error types and handling
//! - `formatter`: Output formatting and display
//! - `repl`: Interactive playground
//!
//! # Example
//!
//! ```
//! use pebble_complete::completion::{CatalogKind, CompletionEngine};
//!
//! let engine = CompletionEngine::default();
//! let candidates = engine.classify("{{ title | ");
//!
//! assert!(candidates.iter().all(|c| c.catalog == CatalogKind::Filters));
//! assert!(candidates.names().contains(&"upper"));
//! ```

pub mod cli;
pub mod completion;
pub mod config;
pub mod error;
pub mod formatter;
pub mod repl;

// Re-export commonly used types
pub use completion::{CandidateSet, Classification, CompletionEngine};
pub use config::Config;
pub use error::{PebbleError, Result};
pub use formatter::Formatter;
pub use repl::ReplEngine;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
///
/// # Returns
/// * `&str` - Version string
pub fn version() -> &'static str {
    VERSION
}
