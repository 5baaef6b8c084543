//! JSON formatting for completion results
//!
//! Every entry is rendered as `{name, detail, insert_template, catalog, kind}`
//! so that editor integrations can consume the output directly.

use serde::Serialize;

use super::EntryRow;
use crate::completion::{CatalogKind, Classification};
use crate::error::Result;

/// `--explain` output: the classification followed by its candidates
#[derive(Serialize)]
struct Explained<'a> {
    classification: &'a Classification,
    candidates: &'a [EntryRow<'a>],
}

/// One catalog in a full listing
#[derive(Serialize)]
struct CatalogListing<'a> {
    catalog: CatalogKind,
    size: usize,
    entries: &'a [EntryRow<'a>],
}

/// JSON formatter with pretty printing support
#[derive(Debug, Clone, Copy)]
pub struct JsonFormatter {
    /// Enable pretty printing
    pretty: bool,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    ///
    /// # Arguments
    /// * `pretty` - Enable pretty printing
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn render<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        let text = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(text)
    }

    /// Format entries as a JSON array
    pub fn format_rows(&self, rows: &[EntryRow<'_>]) -> Result<String> {
        self.render(rows)
    }

    /// Format a classification together with its candidates
    pub fn format_explained(
        &self,
        classification: &Classification,
        rows: &[EntryRow<'_>],
    ) -> Result<String> {
        self.render(&Explained {
            classification,
            candidates: rows,
        })
    }

    /// Format several catalogs, each with its entries
    pub fn format_listing(&self, catalogs: &[(CatalogKind, Vec<EntryRow<'_>>)]) -> Result<String> {
        let listing: Vec<CatalogListing<'_>> = catalogs
            .iter()
            .map(|(kind, rows)| CatalogListing {
                catalog: *kind,
                size: rows.len(),
                entries: rows,
            })
            .collect();
        self.render(&listing)
    }
}
