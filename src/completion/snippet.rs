//! Insertion templates
//!
//! Templates use numbered tab-stops (`$1`, `${1:default}`) and a final
//! cursor marker (`$0`). Editors with snippet support take the template
//! as-is; [`Snippet::expand`] flattens it for editors without.

/// One piece of a parsed template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnippetPart {
    /// Literal text
    Text(String),

    /// A numbered placeholder; index 0 is the final cursor position
    Placeholder {
        index: u32,
        default: Option<String>,
    },
}

/// A parsed insertion template
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Snippet {
    parts: Vec<SnippetPart>,
}

impl Snippet {
    /// Parse a template
    ///
    /// Parsing never fails: a `$` that does not start a valid placeholder is
    /// kept as literal text. `\$`, `\}` and `\\` escape the next character.
    pub fn parse(template: &str) -> Self {
        let mut parts = Vec::new();
        let mut text = String::new();
        let mut rest = template;

        while let Some(ch) = rest.chars().next() {
            match ch {
                '\\' => {
                    let mut chars = rest.chars();
                    chars.next();
                    match chars.next() {
                        Some(escaped @ ('$' | '}' | '\\')) => {
                            text.push(escaped);
                            rest = chars.as_str();
                        }
                        _ => {
                            text.push('\\');
                            rest = &rest[1..];
                        }
                    }
                }
                '$' => match parse_placeholder(&rest[1..]) {
                    Some((part, remaining)) => {
                        if !text.is_empty() {
                            parts.push(SnippetPart::Text(std::mem::take(&mut text)));
                        }
                        parts.push(part);
                        rest = remaining;
                    }
                    None => {
                        text.push('$');
                        rest = &rest[1..];
                    }
                },
                _ => {
                    text.push(ch);
                    rest = &rest[ch.len_utf8()..];
                }
            }
        }

        if !text.is_empty() {
            parts.push(SnippetPart::Text(text));
        }

        Self { parts }
    }

    pub fn parts(&self) -> &[SnippetPart] {
        &self.parts
    }

    /// Plain text with every placeholder replaced by its default
    pub fn expand(&self) -> String {
        let mut out = String::new();
        for part in &self.parts {
            match part {
                SnippetPart::Text(text) => out.push_str(text),
                SnippetPart::Placeholder { default, .. } => {
                    if let Some(default) = default {
                        out.push_str(default);
                    }
                }
            }
        }
        out
    }

    /// Numbered tab-stops in navigation order, excluding the final cursor
    pub fn tab_stops(&self) -> Vec<(u32, Option<&str>)> {
        let mut stops: Vec<(u32, Option<&str>)> = Vec::new();
        for part in &self.parts {
            if let SnippetPart::Placeholder { index, default } = part {
                if *index > 0 && !stops.iter().any(|(i, _)| i == index) {
                    stops.push((*index, default.as_deref()));
                }
            }
        }
        stops.sort_by_key(|(index, _)| *index);
        stops
    }

    /// Whether the template contains a `$0` marker
    pub fn has_final_cursor(&self) -> bool {
        self.parts
            .iter()
            .any(|part| matches!(part, SnippetPart::Placeholder { index: 0, .. }))
    }
}

/// Parse what follows a `$`: `N` or `{N}` or `{N:default}`
fn parse_placeholder(input: &str) -> Option<(SnippetPart, &str)> {
    if let Some(body) = input.strip_prefix('{') {
        let digits = leading_digits(body);
        if digits.is_empty() {
            return None;
        }
        let index = digits.parse().ok()?;
        let after = &body[digits.len()..];

        if let Some(after) = after.strip_prefix('}') {
            return Some((SnippetPart::Placeholder { index, default: None }, after));
        }

        let after = after.strip_prefix(':')?;
        let close = after.find('}')?;
        let default = after[..close].to_string();
        Some((
            SnippetPart::Placeholder {
                index,
                default: Some(default),
            },
            &after[close + 1..],
        ))
    } else {
        let digits = leading_digits(input);
        if digits.is_empty() {
            return None;
        }
        let index = digits.parse().ok()?;
        Some((
            SnippetPart::Placeholder {
                index,
                default: None,
            },
            &input[digits.len()..],
        ))
    }
}

fn leading_digits(input: &str) -> &str {
    let end = input
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(input.len());
    &input[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keyword_template() {
        let snippet = Snippet::parse("if ${1:condition}\n\t$0\n{% endif %}");
        assert_eq!(
            snippet.parts(),
            &[
                SnippetPart::Text("if ".to_string()),
                SnippetPart::Placeholder {
                    index: 1,
                    default: Some("condition".to_string()),
                },
                SnippetPart::Text("\n\t".to_string()),
                SnippetPart::Placeholder {
                    index: 0,
                    default: None,
                },
                SnippetPart::Text("\n{% endif %}".to_string()),
            ]
        );
        assert!(snippet.has_final_cursor());
    }

    #[test]
    fn test_expand_substitutes_defaults() {
        assert_eq!(
            Snippet::parse("for ${1:item} in ${2:items}\n\t$0\n{% endfor %}").expand(),
            "for item in items\n\t\n{% endfor %}"
        );
        assert_eq!(
            Snippet::parse("slice(${1:start}, ${2:length})").expand(),
            "slice(start, length)"
        );
        assert_eq!(Snippet::parse("parent()").expand(), "parent()");
    }

    #[test]
    fn test_expand_keeps_braces_in_defaults_context() {
        assert_eq!(
            Snippet::parse("replace({\"${1:search}\": \"${2:replace}\"})").expand(),
            "replace({\"search\": \"replace\"})"
        );
        assert_eq!(
            Snippet::parse("numberformat(\"${1:#,##0.00}\")").expand(),
            "numberformat(\"#,##0.00\")"
        );
    }

    #[test]
    fn test_tab_stops_in_order() {
        let snippet = Snippet::parse("from \"${2:b}\" import ${1:a} $0");
        assert_eq!(snippet.tab_stops(), vec![(1, Some("a")), (2, Some("b"))]);
    }

    #[test]
    fn test_bare_placeholders() {
        let snippet = Snippet::parse("fn($1, ${2})$0");
        assert_eq!(snippet.tab_stops(), vec![(1, None), (2, None)]);
        assert_eq!(snippet.expand(), "fn(, )");
    }

    #[test]
    fn test_literal_dollars_survive() {
        assert_eq!(Snippet::parse("cost $ and ${x}").expand(), "cost $ and ${x}");
        assert_eq!(Snippet::parse("${1:unterminated").expand(), "${1:unterminated");
        assert_eq!(Snippet::parse("trailing $").expand(), "trailing $");
    }

    #[test]
    fn test_escapes() {
        assert_eq!(Snippet::parse(r"\$1 and \\").expand(), r"$1 and \");
        assert_eq!(Snippet::parse(r"a\nb").expand(), r"a\nb");
    }

    #[test]
    fn test_empty_template() {
        let snippet = Snippet::parse("");
        assert!(snippet.parts().is_empty());
        assert_eq!(snippet.expand(), "");
    }
}
