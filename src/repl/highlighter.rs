//! Delimiter-aware highlighter for template lines
//!
//! Literal text is left unstyled. Statement regions are magenta and
//! expression regions cyan, with their delimiters in bold. Inside a region,
//! keywords and operator words are emphasized and pipes stand out.

use nu_ansi_term::{Color, Style};
use reedline::{Highlighter, StyledText};

use crate::completion::{CatalogKind, Syntax, catalog};

/// Region a span of text belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    Statement,
    Expression,
}

/// Highlighter for Pebble template lines
pub struct TemplateHighlighter {
    syntax: Syntax,
    enabled: bool,
}

impl TemplateHighlighter {
    /// Create a new highlighter
    ///
    /// # Arguments
    /// * `syntax` - Region delimiters
    /// * `enabled` - Apply styles; when false the line is returned as-is
    pub fn new(syntax: Syntax, enabled: bool) -> Self {
        Self { syntax, enabled }
    }

    fn opening(&self, rest: &str) -> Option<(&str, Region)> {
        let candidates = [
            (self.syntax.statement_open.as_str(), Region::Statement),
            (self.syntax.expression_open.as_str(), Region::Expression),
        ];
        candidates
            .into_iter()
            .filter(|(delim, _)| !delim.is_empty() && rest.starts_with(delim))
            .max_by_key(|(delim, _)| delim.len())
    }

    fn closing(&self, region: Region) -> &str {
        match region {
            Region::Statement => &self.syntax.statement_close,
            Region::Expression => &self.syntax.expression_close,
        }
    }
}

impl Default for TemplateHighlighter {
    fn default() -> Self {
        Self::new(Syntax::default(), true)
    }
}

fn base_style(region: Region) -> Style {
    match region {
        Region::Statement => Color::Magenta.into(),
        Region::Expression => Color::Cyan.into(),
    }
}

fn delimiter_style(region: Region) -> Style {
    base_style(region).bold()
}

fn word_style(region: Region, word: &str) -> Style {
    if region == Region::Statement && catalog(CatalogKind::Keywords).lookup(word).is_some() {
        Color::Magenta.bold()
    } else if catalog(CatalogKind::Operators).lookup(word).is_some() {
        Color::Yellow.into()
    } else {
        base_style(region)
    }
}

fn flush(styled: &mut StyledText, style: Style, text: &mut String) {
    if !text.is_empty() {
        styled.push((style, std::mem::take(text)));
    }
}

/// Push the body of a region, styling words and pipes
fn push_region_body(styled: &mut StyledText, region: Region, body: &mut String) {
    let mut word = String::new();
    let mut other = String::new();

    for ch in body.chars() {
        if ch.is_alphanumeric() || ch == '_' {
            flush(styled, base_style(region), &mut other);
            word.push(ch);
            continue;
        }

        let style = word_style(region, &word);
        flush(styled, style, &mut word);
        if ch == '|' {
            flush(styled, base_style(region), &mut other);
            styled.push((Color::Yellow.bold(), ch.to_string()));
        } else {
            other.push(ch);
        }
    }

    let style = word_style(region, &word);
    flush(styled, style, &mut word);
    flush(styled, base_style(region), &mut other);
    body.clear();
}

impl Highlighter for TemplateHighlighter {
    fn highlight(&self, line: &str, _cursor: usize) -> StyledText {
        let mut styled = StyledText::new();
        if !self.enabled {
            styled.push((Style::default(), line.to_string()));
            return styled;
        }

        let mut region: Option<Region> = None;
        let mut buffer = String::new();
        let mut rest = line;

        while !rest.is_empty() {
            match region {
                None => {
                    if let Some((delim, opened)) = self.opening(rest) {
                        flush(&mut styled, Style::default(), &mut buffer);
                        styled.push((delimiter_style(opened), delim.to_string()));
                        rest = &rest[delim.len()..];
                        region = Some(opened);
                        continue;
                    }
                }
                Some(open) => {
                    let close = self.closing(open);
                    if !close.is_empty() && rest.starts_with(close) {
                        push_region_body(&mut styled, open, &mut buffer);
                        styled.push((delimiter_style(open), close.to_string()));
                        rest = &rest[close.len()..];
                        region = None;
                        continue;
                    }
                }
            }

            let Some(ch) = rest.chars().next() else {
                break;
            };
            buffer.push(ch);
            rest = &rest[ch.len_utf8()..];
        }

        match region {
            Some(open) => push_region_body(&mut styled, open, &mut buffer),
            None => flush(&mut styled, Style::default(), &mut buffer),
        }

        styled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments(line: &str) -> Vec<(Style, String)> {
        TemplateHighlighter::default().highlight(line, 0).buffer
    }

    fn joined(line: &str) -> String {
        segments(line).into_iter().map(|(_, text)| text).collect()
    }

    #[test]
    fn test_text_is_preserved() {
        for line in ["Hello", "{% if x %}yes{% endif %}", "a {{ b | upper }} c", "{{ ünï |"] {
            assert_eq!(joined(line), line);
        }
    }

    #[test]
    fn test_literal_text_unstyled() {
        let segs = segments("Hello world");
        assert_eq!(segs, vec![(Style::default(), "Hello world".to_string())]);
    }

    #[test]
    fn test_delimiters_are_styled() {
        let segs = segments("{% if user %}");
        assert_eq!(segs[0], (Color::Magenta.bold(), "{%".to_string()));
        assert!(segs.contains(&(Color::Magenta.bold(), "if".to_string())));
        assert_eq!(segs.last().unwrap().1, "%}");
    }

    #[test]
    fn test_pipe_in_expression() {
        let segs = segments("{{ name | upper");
        assert_eq!(segs[0], (Color::Cyan.bold(), "{{".to_string()));
        assert!(segs.contains(&(Color::Yellow.bold(), "|".to_string())));
    }

    #[test]
    fn test_disabled_highlighter() {
        let highlighter = TemplateHighlighter::new(Syntax::default(), false);
        let styled = highlighter.highlight("{{ x }}", 0);
        assert_eq!(styled.buffer, vec![(Style::default(), "{{ x }}".to_string())]);
    }
}
