//! Output formatting for completion results
//!
//! This module renders candidate sets, classifications and catalog listings
//! in the configured output format:
//! - Plain `name<TAB>detail` lines for shell pipelines
//! - Tables for reading in a terminal
//! - JSON (compact and pretty-printed) for editor integrations

pub mod colorizer;
pub mod json;
pub mod table;

pub use colorizer::Colorizer;
pub use json::JsonFormatter;
pub use table::TableFormatter;

use serde::Serialize;

use crate::completion::{
    Candidate, CandidateSet, CatalogEntry, CatalogKind, Classification, ItemKind, SubContexts,
};
use crate::config::OutputFormat;
use crate::error::Result;

/// Borrowed view of one entry as it appears in output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EntryRow<'a> {
    pub name: &'a str,
    pub detail: &'a str,
    pub insert_template: Option<&'a str>,
    pub catalog: CatalogKind,
    pub kind: ItemKind,
}

impl<'a> EntryRow<'a> {
    pub fn new(catalog: CatalogKind, entry: &'a CatalogEntry) -> Self {
        Self {
            name: &entry.name,
            detail: &entry.detail,
            insert_template: entry.insert_template.as_deref(),
            catalog,
            kind: catalog.item_kind(),
        }
    }
}

impl<'a> From<&'a Candidate> for EntryRow<'a> {
    fn from(candidate: &'a Candidate) -> Self {
        Self::new(candidate.catalog, &candidate.entry)
    }
}

/// Main formatter for completion output
pub struct Formatter {
    /// Output format type
    format_type: OutputFormat,

    /// Colorizer for output highlighting
    colorizer: Colorizer,
}

impl Formatter {
    /// Create a new formatter
    ///
    /// # Arguments
    /// * `format_type` - Output format type
    /// * `use_colors` - Enable colored output
    pub fn new(format_type: OutputFormat, use_colors: bool) -> Self {
        Self {
            format_type,
            colorizer: Colorizer::new(use_colors),
        }
    }

    pub fn format_type(&self) -> OutputFormat {
        self.format_type
    }

    pub fn colorizer(&self) -> &Colorizer {
        &self.colorizer
    }

    /// Format a candidate set
    ///
    /// # Arguments
    /// * `set` - Candidates to format
    ///
    /// # Returns
    /// * `Result<String>` - Formatted output; empty in plain format when there are no candidates
    pub fn format_candidates(&self, set: &CandidateSet) -> Result<String> {
        let rows: Vec<EntryRow<'_>> = set.iter().map(EntryRow::from).collect();
        self.format_rows(&rows)
    }

    /// Format a classification followed by its candidates
    pub fn format_explained(
        &self,
        classification: &Classification,
        set: &CandidateSet,
    ) -> Result<String> {
        let rows: Vec<EntryRow<'_>> = set.iter().map(EntryRow::from).collect();

        match self.format_type {
            OutputFormat::Json => JsonFormatter::new(false).format_explained(classification, &rows),
            OutputFormat::JsonPretty => {
                JsonFormatter::new(true).format_explained(classification, &rows)
            }
            OutputFormat::Table => {
                let summary = self
                    .table()
                    .format_pairs(["Field", "Value"], &summary_pairs(classification));
                Ok(format!("{summary}\n{}", self.table().format_rows(&rows)))
            }
            OutputFormat::Plain => {
                let mut lines: Vec<String> = summary_pairs(classification)
                    .into_iter()
                    .map(|(key, value)| format!("{}: {value}", self.colorizer.label(&key)))
                    .collect();
                lines.extend(rows.iter().map(|row| self.plain_line(row)));
                Ok(lines.join("\n"))
            }
        }
    }

    /// Format the entries of one catalog
    pub fn format_catalog(&self, kind: CatalogKind, entries: &[CatalogEntry]) -> Result<String> {
        let rows: Vec<EntryRow<'_>> = entries.iter().map(|e| EntryRow::new(kind, e)).collect();
        self.format_rows(&rows)
    }

    /// Format several catalogs
    ///
    /// Plain and table output summarize each catalog by size; JSON output
    /// includes every entry.
    pub fn format_catalog_index(&self, catalogs: &[(CatalogKind, Vec<CatalogEntry>)]) -> Result<String> {
        match self.format_type {
            OutputFormat::Json | OutputFormat::JsonPretty => {
                let listing: Vec<(CatalogKind, Vec<EntryRow<'_>>)> = catalogs
                    .iter()
                    .map(|(kind, entries)| {
                        (*kind, entries.iter().map(|e| EntryRow::new(*kind, e)).collect())
                    })
                    .collect();
                self.json().format_listing(&listing)
            }
            OutputFormat::Table => {
                let pairs: Vec<(String, String)> = catalogs
                    .iter()
                    .map(|(kind, entries)| (kind.to_string(), entries.len().to_string()))
                    .collect();
                Ok(self.table().format_pairs(["Catalog", "Entries"], &pairs))
            }
            OutputFormat::Plain => Ok(catalogs
                .iter()
                .map(|(kind, entries)| format!("{kind}\t{}", entries.len()))
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    fn format_rows(&self, rows: &[EntryRow<'_>]) -> Result<String> {
        match self.format_type {
            OutputFormat::Json | OutputFormat::JsonPretty => self.json().format_rows(rows),
            OutputFormat::Table => Ok(self.table().format_rows(rows)),
            OutputFormat::Plain => Ok(rows
                .iter()
                .map(|row| self.plain_line(row))
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    /// `name<TAB>detail`, with the name colored by kind
    fn plain_line(&self, row: &EntryRow<'_>) -> String {
        format!(
            "{}\t{}",
            self.colorizer.candidate(row.kind, row.name),
            self.colorizer.dim(row.detail)
        )
    }

    fn json(&self) -> JsonFormatter {
        JsonFormatter::new(self.format_type == OutputFormat::JsonPretty)
    }

    fn table(&self) -> TableFormatter {
        TableFormatter::new(self.colorizer.is_enabled())
    }
}

/// Make newlines and tabs in templates visible on one line
pub(crate) fn escape_control(text: &str) -> String {
    text.replace('\n', "\\n").replace('\t', "\\t")
}

/// Names of the sub-contexts that hold
pub fn sub_context_labels(sub: &SubContexts) -> Vec<&'static str> {
    let flags = [
        (sub.after_pipe, "after-pipe"),
        (sub.after_is_keyword, "after-is"),
        (sub.after_loop_dot, "after-loop-dot"),
        (sub.plain_identifier_position, "identifier"),
    ];
    flags
        .into_iter()
        .filter_map(|(set, label)| set.then_some(label))
        .collect()
}

/// Human-readable summary of a classification
pub fn summary_pairs(classification: &Classification) -> Vec<(String, String)> {
    let context = match classification.context {
        crate::completion::Context::None => "none",
        crate::completion::Context::Statement => "statement",
        crate::completion::Context::Expression => "expression",
    };
    let subs = sub_context_labels(&classification.sub_contexts);
    let catalogs: Vec<&str> = classification.catalogs().iter().map(|k| k.name()).collect();

    vec![
        ("context".to_string(), context.to_string()),
        (
            "in_statement".to_string(),
            classification.in_statement.to_string(),
        ),
        (
            "in_expression".to_string(),
            classification.in_expression.to_string(),
        ),
        ("sub_contexts".to_string(), join_or_dash(&subs)),
        ("catalogs".to_string(), join_or_dash(&catalogs)),
    ]
}

fn join_or_dash(items: &[&str]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::CompletionEngine;

    #[test]
    fn test_plain_candidates() {
        let engine = CompletionEngine::default();
        let set = engine.classify("{{ loop.");

        let output = Formatter::new(OutputFormat::Plain, false)
            .format_candidates(&set)
            .unwrap();
        let first = output.lines().next().unwrap();
        assert_eq!(first, "index\tZero-based index");
        assert_eq!(output.lines().count(), 5);
    }

    #[test]
    fn test_plain_candidates_colored_by_kind() {
        let engine = CompletionEngine::default();
        let set = engine.classify("{{ loop.");

        let output = Formatter::new(OutputFormat::Plain, true)
            .format_candidates(&set)
            .unwrap();
        let first = output.lines().next().unwrap();
        let colorizer = Colorizer::new(true);
        assert!(first.contains('\x1b'));
        assert!(first.starts_with(&colorizer.candidate(ItemKind::Property, "index")));
        assert!(first.ends_with(&colorizer.dim("Zero-based index")));
    }

    #[test]
    fn test_plain_empty_is_empty() {
        let output = Formatter::new(OutputFormat::Plain, true)
            .format_candidates(&CandidateSet::default())
            .unwrap();
        assert!(output.is_empty());
    }

    #[test]
    fn test_plain_explained() {
        let engine = CompletionEngine::default();
        let (classification, set) = engine.classify_with_context("{{ x | ");

        let output = Formatter::new(OutputFormat::Plain, false)
            .format_explained(&classification, &set)
            .unwrap();
        assert!(output.starts_with("context: expression\n"));
        assert!(output.contains("sub_contexts: after-pipe\n"));
        assert!(output.contains("catalogs: filters\n"));
        assert!(output.contains("upper\t"));
    }

    #[test]
    fn test_summary_outside_template() {
        let engine = CompletionEngine::default();
        let pairs = summary_pairs(&engine.explain("Hello"));
        assert_eq!(pairs[0], ("context".to_string(), "none".to_string()));
        assert_eq!(pairs[3].1, "-");
        assert_eq!(pairs[4].1, "-");
    }

    #[test]
    fn test_catalog_index_plain() {
        let catalogs: Vec<(CatalogKind, Vec<CatalogEntry>)> = CatalogKind::ALL
            .iter()
            .map(|k| (*k, crate::completion::catalog(*k).entries().to_vec()))
            .collect();

        let output = Formatter::new(OutputFormat::Plain, false)
            .format_catalog_index(&catalogs)
            .unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "keywords\t29");
        assert_eq!(lines[5], "loop-variables\t5");
    }

    #[test]
    fn test_json_catalog() {
        let entries = crate::completion::catalog(CatalogKind::Tests).entries();
        let output = Formatter::new(OutputFormat::Json, false)
            .format_catalog(CatalogKind::Tests, entries)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 6);
        assert_eq!(value[0]["kind"], "keyword");
    }
}
