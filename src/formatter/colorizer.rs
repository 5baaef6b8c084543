//! Color output support for terminal formatting
//!
//! Candidate names are colored by presentation kind in plain and table
//! output, which includes what the playground prints on Enter.

use nu_ansi_term::{Color, Style};

use crate::completion::ItemKind;

/// Color scheme for output highlighting
#[derive(Debug, Clone, Copy)]
pub struct Colorizer {
    /// Enable colors
    enabled: bool,
}

impl Colorizer {
    /// Create a new colorizer
    ///
    /// # Arguments
    /// * `enabled` - Enable color output
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn paint(&self, style: Style, text: &str) -> String {
        if self.enabled {
            style.paint(text).to_string()
        } else {
            text.to_string()
        }
    }

    /// Colorize a candidate name by its kind
    pub fn candidate(&self, kind: ItemKind, text: &str) -> String {
        let style = match kind {
            ItemKind::Keyword => Color::Magenta.bold(),
            ItemKind::Operator => Style::new().fg(Color::Yellow),
            ItemKind::Function => Style::new().fg(Color::Blue),
            ItemKind::Property => Style::new().fg(Color::Cyan),
        };
        self.paint(style, text)
    }

    /// Secondary text such as candidate details
    pub fn dim(&self, text: &str) -> String {
        self.paint(Style::new().dimmed(), text)
    }

    /// Field labels in summaries
    pub fn label(&self, text: &str) -> String {
        self.paint(Color::Cyan.bold(), text)
    }

    /// Colorize text as error (red)
    ///
    /// # Arguments
    /// * `text` - Text to colorize
    ///
    /// # Returns
    /// * `String` - `Error: <text>`, red when colors are enabled
    pub fn error(&self, text: &str) -> String {
        self.paint(Style::new().fg(Color::Red), &format!("Error: {text}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colorizer_no_colors() {
        let colorizer = Colorizer::new(false);
        assert_eq!(colorizer.error("bad input"), "Error: bad input");
        assert_eq!(colorizer.candidate(ItemKind::Keyword, "for"), "for");
        assert!(!colorizer.dim("detail").contains('\x1b'));
    }

    #[test]
    fn test_colorizer_with_colors() {
        let colorizer = Colorizer::new(true);
        let painted = colorizer.candidate(ItemKind::Function, "upper");
        assert!(painted.contains('\x1b'));
        assert!(painted.contains("upper"));
    }
}
