//! Error handling module for pebble-complete.
//!
//! Completion itself is total and never returns an error. The types here
//! cover the surrounding tool: loading configuration, parsing command-line
//! input, formatting output and driving the interactive editor.
//!
//! # Example
//!
//! ```rust,no_run
//! use pebble_complete::error::{ConfigError, Result};
//!
//! fn require_delimiter(value: &str) -> Result<()> {
//!     if value.is_empty() {
//!         return Err(ConfigError::InvalidValue {
//!             field: "syntax.statement_open".to_string(),
//!             value: value.to_string(),
//!         }
//!         .into());
//!     }
//!     Ok(())
//! }
//! ```

pub mod kinds;

// Re-export commonly used types
pub use kinds::{ConfigError, PebbleError, Result};
