//! Completion context detection
//!
//! This module decides, from the text before the cursor on the current line,
//! whether the cursor sits inside a statement (`{% ... %}`) or an expression
//! (`{{ ... }}`) and which sub-contexts apply. Detection is line-local: only
//! the most recent open and close delimiters on the line are compared.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::catalog::CatalogKind;

/// Ends with an identifier-like token (`user`, `loop_index`, `x1`)
static IDENTIFIER_TAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-zA-Z_][a-zA-Z0-9_]*$").expect("valid identifier regex"));

/// `is`, optionally `not`, then a partial test name at the end of the line
static IS_TEST_TAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?-u:\b)is\s+(not\s+)?[a-zA-Z]*$").expect("valid test regex"));

/// `loop.` at the end of the line
static LOOP_DOT_TAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?-u:\b)loop\.$").expect("valid loop regex"));

/// Delimiters that open and close template regions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Syntax {
    /// Opens a statement, `{%` by default
    pub statement_open: String,

    /// Closes a statement, `%}` by default
    pub statement_close: String,

    /// Opens an expression, `{{` by default
    pub expression_open: String,

    /// Closes an expression, `}}` by default
    pub expression_close: String,
}

impl Default for Syntax {
    fn default() -> Self {
        Self {
            statement_open: "{%".to_string(),
            statement_close: "%}".to_string(),
            expression_open: "{{".to_string(),
            expression_close: "}}".to_string(),
        }
    }
}

/// The text of the current line up to the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinePrefix<'a>(&'a str);

impl<'a> LinePrefix<'a> {
    pub fn new(prefix: &'a str) -> Self {
        Self(prefix)
    }

    /// Cut a full line at a cursor column
    ///
    /// The column counts characters, not bytes, and is clamped to the end of
    /// the line.
    pub fn from_line(line: &'a str, column: usize) -> Self {
        let end = line
            .char_indices()
            .nth(column)
            .map(|(idx, _)| idx)
            .unwrap_or(line.len());
        Self(&line[..end])
    }

    pub fn as_str(&self) -> &'a str {
        self.0
    }

    /// Byte offset where the word under the cursor starts
    pub fn word_start(&self) -> usize {
        self.0
            .char_indices()
            .rev()
            .take_while(|(_, c)| c.is_alphanumeric() || *c == '_')
            .last()
            .map(|(idx, _)| idx)
            .unwrap_or(self.0.len())
    }

    /// The partially typed word under the cursor
    pub fn current_word(&self) -> &'a str {
        &self.0[self.word_start()..]
    }
}

impl<'a> From<&'a str> for LinePrefix<'a> {
    fn from(prefix: &'a str) -> Self {
        Self::new(prefix)
    }
}

/// The four delimiter kinds tracked on a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkerKind {
    StatementOpen,
    StatementClose,
    ExpressionOpen,
    ExpressionClose,
}

/// Rightmost occurrence of a delimiter in the line prefix
///
/// `None` orders before every `Some`, which makes "not found" compare lower
/// than any real position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DelimiterMarker {
    pub kind: MarkerKind,
    pub last_index: Option<usize>,
}

impl DelimiterMarker {
    fn find(kind: MarkerKind, prefix: &str, delimiter: &str) -> Self {
        let last_index = if delimiter.is_empty() {
            None
        } else {
            prefix.rfind(delimiter)
        };
        Self { kind, last_index }
    }
}

/// Delimiter positions for one line prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Markers {
    pub statement_open: DelimiterMarker,
    pub statement_close: DelimiterMarker,
    pub expression_open: DelimiterMarker,
    pub expression_close: DelimiterMarker,
}

impl Markers {
    pub fn scan(prefix: &str, syntax: &Syntax) -> Self {
        Self {
            statement_open: DelimiterMarker::find(
                MarkerKind::StatementOpen,
                prefix,
                &syntax.statement_open,
            ),
            statement_close: DelimiterMarker::find(
                MarkerKind::StatementClose,
                prefix,
                &syntax.statement_close,
            ),
            expression_open: DelimiterMarker::find(
                MarkerKind::ExpressionOpen,
                prefix,
                &syntax.expression_open,
            ),
            expression_close: DelimiterMarker::find(
                MarkerKind::ExpressionClose,
                prefix,
                &syntax.expression_close,
            ),
        }
    }

    /// A statement was opened and not closed after it
    pub fn in_statement(&self) -> bool {
        self.statement_open.last_index > self.statement_close.last_index
    }

    /// An expression was opened and not closed after it
    pub fn in_expression(&self) -> bool {
        self.expression_open.last_index > self.expression_close.last_index
    }
}

/// Region the cursor is in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Context {
    None,
    Statement,
    Expression,
}

/// Finer-grained positions inside a region
///
/// These are independent flags; several may hold at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SubContexts {
    /// A pipe follows the opening delimiter of the open region
    pub after_pipe: bool,

    /// The line ends with `is`, `is not`, and a partial test name
    pub after_is_keyword: bool,

    /// The line ends with `loop.`
    pub after_loop_dot: bool,

    /// The line ends with an identifier-like token
    pub plain_identifier_position: bool,
}

/// Whether the last pipe on the line belongs to the open region
pub fn is_after_pipe(prefix: &str, markers: &Markers) -> bool {
    let Some(last_pipe) = prefix.rfind('|') else {
        return false;
    };
    let last_pipe = Some(last_pipe);

    (markers.in_statement() && last_pipe > markers.statement_open.last_index)
        || (markers.in_expression() && last_pipe > markers.expression_open.last_index)
}

/// Whether the line ends in an identifier-like token
pub fn is_identifier_position(prefix: &str) -> bool {
    IDENTIFIER_TAIL.is_match(prefix)
}

/// Whether the line ends after `is` / `is not` with a partial test name
pub fn is_after_is_keyword(prefix: &str) -> bool {
    IS_TEST_TAIL.is_match(prefix)
}

/// Whether the line ends with `loop.`
pub fn is_after_loop_dot(prefix: &str) -> bool {
    LOOP_DOT_TAIL.is_match(prefix)
}

/// Everything the classifier derives from one line prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub markers: Markers,
    pub in_statement: bool,
    pub in_expression: bool,
    pub context: Context,
    pub sub_contexts: SubContexts,
}

impl Classification {
    /// Classify a line prefix
    pub fn of(prefix: LinePrefix<'_>, syntax: &Syntax) -> Self {
        let text = prefix.as_str();
        let markers = Markers::scan(text, syntax);
        let in_statement = markers.in_statement();
        let in_expression = markers.in_expression();

        let context = match (in_statement, in_expression) {
            (false, false) => Context::None,
            (true, false) => Context::Statement,
            (false, true) => Context::Expression,
            (true, true) => {
                if markers.statement_open.last_index > markers.expression_open.last_index {
                    Context::Statement
                } else {
                    Context::Expression
                }
            }
        };

        // Outside any region nothing else is evaluated.
        let sub_contexts = if context == Context::None {
            SubContexts::default()
        } else {
            SubContexts {
                after_pipe: is_after_pipe(text, &markers),
                after_is_keyword: is_after_is_keyword(text),
                after_loop_dot: is_after_loop_dot(text),
                plain_identifier_position: is_identifier_position(text),
            }
        };

        Self {
            markers,
            in_statement,
            in_expression,
            context,
            sub_contexts,
        }
    }

    /// Whether the cursor is inside any template region
    pub fn is_active(&self) -> bool {
        self.context != Context::None
    }

    /// Catalogs that apply, in priority order
    ///
    /// `loop.` is a member access, so only loop variables are offered. After
    /// a pipe only filter names fit, plus tests when `is` follows the pipe.
    pub fn catalogs(&self) -> Vec<CatalogKind> {
        if !self.is_active() {
            return Vec::new();
        }

        let sub = &self.sub_contexts;
        if sub.after_loop_dot {
            return vec![CatalogKind::LoopVariables];
        }

        let mut kinds = Vec::new();
        if sub.after_pipe {
            kinds.push(CatalogKind::Filters);
        } else {
            if self.in_statement {
                kinds.push(CatalogKind::Keywords);
            }
            kinds.push(CatalogKind::Operators);
            if sub.plain_identifier_position {
                kinds.push(CatalogKind::Functions);
            }
        }

        if sub.after_is_keyword {
            kinds.push(CatalogKind::Tests);
        }

        kinds
    }
}
