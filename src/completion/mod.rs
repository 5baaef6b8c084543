//! Template completion
//!
//! The completion system has these components:
//! - **Catalog**: static keyword, operator, filter, function, test and loop
//!   variable tables
//! - **Context**: line-local detection of statement/expression regions and
//!   sub-contexts (after a pipe, after `is`, after `loop.`)
//! - **Provider**: trait through which the engine fetches catalog entries
//! - **Engine**: classifies a line prefix and assembles the candidate set
//! - **Snippet**: parsing and expansion of insertion templates
//! - **Trigger**: which keystrokes should request completion

pub mod catalog;
pub mod context;
pub mod engine;
pub mod provider;
pub mod snippet;
pub mod trigger;

pub use catalog::{Catalog, CatalogEntry, CatalogKind, ItemKind, catalog};
pub use context::{Classification, Context, LinePrefix, SubContexts, Syntax};
pub use engine::{Candidate, CandidateSet, CompletionEngine};
pub use provider::{BuiltinProvider, CandidateProvider, ConfiguredProvider};
pub use snippet::{Snippet, SnippetPart};
pub use trigger::TriggerPolicy;
