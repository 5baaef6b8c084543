//! Completer for reedline - provides completion suggestions

use reedline::{Completer, Span, Suggestion};

use crate::completion::CompletionEngine;

/// Template completer for reedline
pub struct TemplateCompleter {
    /// Completion engine for context-aware suggestions
    completion_engine: CompletionEngine,

    /// Narrow suggestions to the word under the cursor
    filter_by_word: bool,
}

impl TemplateCompleter {
    /// Create a new template completer
    ///
    /// # Arguments
    /// * `completion_engine` - Engine to classify the line with
    /// * `filter_by_word` - Narrow suggestions to the word under the cursor
    pub fn new(completion_engine: CompletionEngine, filter_by_word: bool) -> Self {
        Self {
            completion_engine,
            filter_by_word,
        }
    }
}

impl Completer for TemplateCompleter {
    /// Complete the input at the given cursor position
    ///
    /// Reedline has no snippet support, so templates are inserted with their
    /// placeholders expanded to default text.
    ///
    /// # Arguments
    /// * `line` - The input line
    /// * `pos` - Cursor position (byte index)
    ///
    /// # Returns
    /// * `Vec<Suggestion>` - List of completion suggestions
    fn complete(&mut self, line: &str, pos: usize) -> Vec<Suggestion> {
        let (start, candidates) = self
            .completion_engine
            .complete_at(line, pos, self.filter_by_word);
        let end = pos.min(line.len()).max(start);

        candidates
            .iter()
            .map(|candidate| Suggestion {
                value: candidate.plain_insert_text(),
                description: Some(candidate.detail().to_string()),
                span: Span::new(start, end),
                append_whitespace: false,
                ..Default::default()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_completer() -> TemplateCompleter {
        TemplateCompleter::new(CompletionEngine::default(), true)
    }

    #[test]
    fn test_complete_outside_template() {
        let mut completer = create_test_completer();
        assert!(completer.complete("Hello world", 11).is_empty());
    }

    #[test]
    fn test_complete_loop_variables() {
        let mut completer = create_test_completer();
        let suggestions = completer.complete("{{ loop.", 8);

        let values: Vec<&str> = suggestions.iter().map(|s| s.value.as_str()).collect();
        assert_eq!(values, vec!["index", "length", "first", "last", "revindex"]);
    }

    #[test]
    fn test_complete_with_prefix() {
        let mut completer = create_test_completer();
        let suggestions = completer.complete("{{ title | ab", 13);

        assert!(suggestions.iter().any(|s| s.value == "abbreviate(length)"));
        assert!(suggestions.iter().any(|s| s.value == "abs"));
        assert!(!suggestions.iter().any(|s| s.value == "upper"));
    }

    #[test]
    fn test_span_position() {
        let mut completer = create_test_completer();
        let suggestions = completer.complete("{{ title | up", 13);

        assert!(!suggestions.is_empty());
        for suggestion in suggestions {
            assert_eq!(suggestion.span.start, 11);
            assert_eq!(suggestion.span.end, 13);
        }
    }

    #[test]
    fn test_snippet_expanded_for_insertion() {
        let mut completer = create_test_completer();
        let suggestions = completer.complete("{% fo", 5);

        let for_loop = suggestions
            .iter()
            .find(|s| s.value.starts_with("for "))
            .unwrap();
        assert!(!for_loop.value.contains('$'));
        assert!(for_loop.description.is_some());
    }
}
