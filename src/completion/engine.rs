//! Completion engine - orchestrates the completion flow
//!
//! This module ties the completion components together: the line prefix is
//! classified, the applicable catalogs are fetched from the candidate
//! provider, and the results are concatenated in priority order.

use std::sync::Arc;

use super::catalog::{CatalogEntry, CatalogKind, ItemKind};
use super::context::{Classification, LinePrefix, Syntax};
use super::provider::{BuiltinProvider, CandidateProvider};
use super::snippet::Snippet;

/// A catalog entry together with the catalog it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub entry: CatalogEntry,
    pub catalog: CatalogKind,
}

impl Candidate {
    pub fn name(&self) -> &str {
        &self.entry.name
    }

    pub fn detail(&self) -> &str {
        &self.entry.detail
    }

    pub fn insert_template(&self) -> Option<&str> {
        self.entry.insert_template.as_deref()
    }

    pub fn kind(&self) -> ItemKind {
        self.catalog.item_kind()
    }

    /// Markdown documentation for filters, functions and tests
    pub fn documentation(&self) -> Option<String> {
        self.catalog
            .documentation_label()
            .map(|label| format!("**{}** {}\n\n{}", self.name(), label, self.detail()))
    }

    /// Text to insert in a snippet-aware editor
    pub fn insert_text(&self) -> &str {
        self.insert_template().unwrap_or_else(|| self.name())
    }

    /// Text to insert in an editor without snippet support
    pub fn plain_insert_text(&self) -> String {
        match self.insert_template() {
            Some(template) => Snippet::parse(template).expand(),
            None => self.name().to_string(),
        }
    }
}

/// Ordered result of one classification
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateSet {
    candidates: Vec<Candidate>,
}

impl CandidateSet {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.candidates.iter()
    }

    pub fn as_slice(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Candidate names in order
    pub fn names(&self) -> Vec<&str> {
        self.candidates.iter().map(Candidate::name).collect()
    }

    /// Whether any candidate came from the given catalog
    pub fn contains_catalog(&self, kind: CatalogKind) -> bool {
        self.candidates.iter().any(|c| c.catalog == kind)
    }

    /// Candidates from one catalog
    pub fn from_catalog(&self, kind: CatalogKind) -> impl Iterator<Item = &Candidate> {
        self.candidates.iter().filter(move |c| c.catalog == kind)
    }

    /// Keep only candidates whose name starts with `prefix`
    pub fn retain_prefix(&mut self, prefix: &str) {
        if !prefix.is_empty() {
            self.candidates.retain(|c| c.name().starts_with(prefix));
        }
    }

    fn extend(&mut self, kind: CatalogKind, entries: Vec<CatalogEntry>) {
        self.candidates.extend(entries.into_iter().map(|entry| Candidate {
            entry,
            catalog: kind,
        }));
    }
}

impl IntoIterator for CandidateSet {
    type Item = Candidate;
    type IntoIter = std::vec::IntoIter<Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.into_iter()
    }
}

impl<'a> IntoIterator for &'a CandidateSet {
    type Item = &'a Candidate;
    type IntoIter = std::slice::Iter<'a, Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.iter()
    }
}

/// Main completion engine
#[derive(Clone)]
pub struct CompletionEngine {
    /// Candidate provider for fetching suggestions
    provider: Arc<dyn CandidateProvider>,

    /// Region delimiters
    syntax: Syntax,
}

impl CompletionEngine {
    /// Create a new completion engine
    ///
    /// # Arguments
    /// * `provider` - Candidate provider for fetching suggestions
    pub fn new(provider: Arc<dyn CandidateProvider>) -> Self {
        Self {
            provider,
            syntax: Syntax::default(),
        }
    }

    /// Use custom region delimiters
    pub fn with_syntax(mut self, syntax: Syntax) -> Self {
        self.syntax = syntax;
        self
    }

    /// Describe the context of a line prefix without fetching candidates
    pub fn explain(&self, prefix: &str) -> Classification {
        Classification::of(LinePrefix::new(prefix), &self.syntax)
    }

    /// Classify a line prefix and collect the matching candidates
    ///
    /// # Arguments
    /// * `prefix` - Text of the current line up to the cursor
    ///
    /// # Returns
    /// * `CandidateSet` - Candidates in priority order, empty outside templates
    pub fn classify(&self, prefix: &str) -> CandidateSet {
        self.classify_with_context(prefix).1
    }

    /// Like [`classify`](Self::classify), also returning the classification
    pub fn classify_with_context(&self, prefix: &str) -> (Classification, CandidateSet) {
        let classification = self.explain(prefix);
        let kinds = classification.catalogs();

        let mut set = CandidateSet::default();
        for kind in &kinds {
            set.extend(*kind, self.provider.entries(*kind));
        }

        tracing::trace!(
            prefix,
            context = ?classification.context,
            catalogs = ?kinds,
            candidates = set.len(),
            "classified line prefix"
        );

        (classification, set)
    }

    /// Complete the input at the given cursor position
    ///
    /// Candidates are narrowed to those extending the word under the cursor,
    /// and a candidate equal to the typed word is dropped.
    ///
    /// # Arguments
    /// * `line` - The input line
    /// * `pos` - Cursor position (byte index, clamped to the line)
    ///
    /// # Returns
    /// * `(usize, CandidateSet)` - Start of the word being completed and candidates
    pub fn complete(&self, line: &str, pos: usize) -> (usize, CandidateSet) {
        self.complete_at(line, pos, true)
    }

    /// Like [`complete`](Self::complete), optionally keeping every candidate
    ///
    /// Without word filtering the returned start is the cursor itself, so
    /// candidates are inserted rather than replacing the current word.
    pub fn complete_at(&self, line: &str, pos: usize, filter_by_word: bool) -> (usize, CandidateSet) {
        let mut pos = pos.min(line.len());
        while !line.is_char_boundary(pos) {
            pos -= 1;
        }

        let prefix = LinePrefix::new(&line[..pos]);
        let mut set = self.classify(prefix.as_str());
        if !filter_by_word {
            return (pos, set);
        }

        let word = prefix.current_word();
        set.retain_prefix(word);
        if !word.is_empty() {
            set.candidates.retain(|c| c.name() != word);
        }

        (prefix.word_start(), set)
    }
}

impl Default for CompletionEngine {
    fn default() -> Self {
        Self::new(Arc::new(BuiltinProvider::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::catalog::catalog;
    use crate::completion::provider::ConfiguredProvider;

    fn engine() -> CompletionEngine {
        CompletionEngine::default()
    }

    #[test]
    fn test_no_markers_gives_empty_set() {
        let engine = engine();
        for prefix in ["", "<p>Hello world ", "plain text | with pipe", "loop."] {
            assert!(engine.classify(prefix).is_empty(), "prefix {prefix:?}");
        }
    }

    #[test]
    fn test_operators_in_expression() {
        let set = engine().classify("<p>{{ user.name ");

        let operators: Vec<&str> = set
            .from_catalog(CatalogKind::Operators)
            .map(Candidate::name)
            .collect();
        assert_eq!(operators.len(), 20);
        for op in ["+", "and", "==", "?", "or", "*", "!=", ":"] {
            assert!(operators.contains(&op), "missing {op}");
        }
        assert!(!set.contains_catalog(CatalogKind::Keywords));
        assert!(!set.contains_catalog(CatalogKind::Filters));
    }

    #[test]
    fn test_operators_and_keywords_in_statement() {
        let set = engine().classify("{% if user.active ");

        assert_eq!(set.from_catalog(CatalogKind::Operators).count(), 20);
        assert_eq!(set.from_catalog(CatalogKind::Keywords).count(), 29);
        assert!(set.names().contains(&"and"));
        assert!(set.names().contains(&"=="));
    }

    #[test]
    fn test_closed_expression_is_empty() {
        assert!(engine().classify("<p>{{ user.name }} and more ").is_empty());
    }

    #[test]
    fn test_filters_after_pipe_are_unique() {
        let set = engine().classify("<p>{{ user.name | ");

        assert_eq!(set.len(), 27);
        assert!(set.iter().all(|c| c.catalog == CatalogKind::Filters));
        let names = set.names();
        for filter in ["upper", "lower", "default", "date"] {
            assert_eq!(names.iter().filter(|n| **n == filter).count(), 1);
        }
        assert!(!set.contains_catalog(CatalogKind::Operators));
        assert!(!set.contains_catalog(CatalogKind::Keywords));
    }

    #[test]
    fn test_no_filters_without_pipe() {
        let engine = engine();
        assert!(!engine.classify("<p>{{ user.name ").contains_catalog(CatalogKind::Filters));
        assert!(engine.classify("<p>Hello world | ").is_empty());
    }

    #[test]
    fn test_tests_after_is_not() {
        let set = engine().classify("{% if x is not e");
        assert!(set.contains_catalog(CatalogKind::Tests));
        assert_eq!(set.from_catalog(CatalogKind::Tests).count(), 6);
    }

    #[test]
    fn test_loop_dot_gives_only_loop_variables() {
        let set = engine().classify("{{ loop.");
        assert_eq!(
            set.names(),
            vec!["index", "length", "first", "last", "revindex"]
        );
        assert!(set.iter().all(|c| c.catalog == CatalogKind::LoopVariables));
    }

    #[test]
    fn test_fixed_priority_order() {
        let set = engine().classify("{% if x is n");
        let order: Vec<CatalogKind> = set.iter().map(|c| c.catalog).fold(Vec::new(), |mut acc, k| {
            if acc.last() != Some(&k) {
                acc.push(k);
            }
            acc
        });
        assert_eq!(
            order,
            vec![
                CatalogKind::Keywords,
                CatalogKind::Operators,
                CatalogKind::Functions,
                CatalogKind::Tests,
            ]
        );
    }

    #[test]
    fn test_classification_is_idempotent() {
        let engine = engine();
        for prefix in ["{% if x is not e", "{{ a | ", "{{ loop.", "<p>x"] {
            assert_eq!(engine.classify(prefix), engine.classify(prefix));
        }
    }

    #[test]
    fn test_candidate_rendering() {
        let set = engine().classify("{{ a | ");
        let date = set.iter().find(|c| c.name() == "date").unwrap();
        assert_eq!(date.kind(), ItemKind::Function);
        assert_eq!(date.insert_text(), "date(\"${1:yyyy-MM-dd}\")");
        assert_eq!(date.plain_insert_text(), "date(\"yyyy-MM-dd\")");
        assert_eq!(
            date.documentation().as_deref(),
            Some("**date** filter\n\nFormat date")
        );

        let abs = set.iter().find(|c| c.name() == "abs").unwrap();
        assert_eq!(abs.insert_text(), "abs");
        assert_eq!(abs.plain_insert_text(), "abs");
    }

    #[test]
    fn test_operator_has_no_documentation() {
        let set = engine().classify("{{ a ");
        let plus = set.iter().find(|c| c.name() == "+").unwrap();
        assert_eq!(plus.kind(), ItemKind::Operator);
        assert!(plus.documentation().is_none());
    }

    #[test]
    fn test_complete_filters_by_word() {
        let (start, set) = engine().complete("{{ name | up", 12);
        assert_eq!(start, 10);
        assert_eq!(set.names(), vec!["upper"]);
    }

    #[test]
    fn test_complete_drops_exact_match() {
        let (_, set) = engine().complete("{{ name | upper", 15);
        assert!(set.is_empty());
    }

    #[test]
    fn test_complete_without_word_filter() {
        let (start, set) = engine().complete_at("{{ name | up", 12, false);
        assert_eq!(start, 12);
        assert_eq!(set.len(), catalog(CatalogKind::Filters).len());
    }

    #[test]
    fn test_complete_clamps_cursor() {
        let (start, set) = engine().complete("{{ loop.", 100);
        assert_eq!(start, 8);
        assert_eq!(set.len(), 5);
    }

    #[test]
    fn test_complete_mid_line() {
        let line = "{{ loop. }}";
        let (start, set) = engine().complete(line, 8);
        assert_eq!(start, 8);
        assert_eq!(set.len(), catalog(CatalogKind::LoopVariables).len());
    }

    #[test]
    fn test_custom_provider_and_syntax() {
        let provider = ConfiguredProvider::new([(
            CatalogKind::Filters,
            CatalogEntry::new("slugify", "Make URL slug"),
        )]);
        let engine = CompletionEngine::new(Arc::new(provider)).with_syntax(Syntax {
            expression_open: "[[".to_string(),
            expression_close: "]]".to_string(),
            ..Syntax::default()
        });

        let set = engine.classify("[[ title | ");
        assert_eq!(set.len(), 28);
        assert_eq!(set.names().last(), Some(&"slugify"));
        assert!(engine.classify("{{ title | ").is_empty());
    }
}
