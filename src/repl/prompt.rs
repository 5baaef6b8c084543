//! Custom prompt implementation for the template playground

use std::borrow::Cow;

use reedline::{Prompt, PromptEditMode, PromptHistorySearch, PromptHistorySearchStatus};

/// Default prompt label
pub const DEFAULT_LABEL: &str = "pebble";

/// Custom prompt for the playground REPL
pub struct TemplatePrompt {
    /// Text shown before `> `
    label: String,
}

impl TemplatePrompt {
    /// Create a new prompt
    ///
    /// # Arguments
    /// * `label` - Text shown before `> `
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl Default for TemplatePrompt {
    fn default() -> Self {
        Self::new(DEFAULT_LABEL)
    }
}

impl Prompt for TemplatePrompt {
    /// Render the left prompt (main prompt)
    fn render_prompt_left(&self) -> Cow<'_, str> {
        format!("{}> ", self.label).into()
    }

    /// Render the right prompt (empty in our case)
    fn render_prompt_right(&self) -> Cow<'_, str> {
        "".into()
    }

    /// Render the prompt indicator (empty since it is part of the left prompt)
    fn render_prompt_indicator(&self, _prompt_mode: PromptEditMode) -> Cow<'_, str> {
        "".into()
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        "... ".into()
    }

    /// Render the history search prompt
    ///
    /// # Arguments
    /// * `history_search` - History search state
    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "failing ",
        };

        format!("({}reverse-search: {}) ", prefix, history_search.term).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompt() {
        let prompt = TemplatePrompt::default();
        assert_eq!(prompt.render_prompt_left(), "pebble> ");
    }

    #[test]
    fn test_custom_label() {
        let prompt = TemplatePrompt::new("tpl");
        assert_eq!(prompt.render_prompt_left(), "tpl> ");
    }

    #[test]
    fn test_right_prompt_and_indicator_empty() {
        let prompt = TemplatePrompt::default();
        assert_eq!(prompt.render_prompt_right(), "");
        assert_eq!(prompt.render_prompt_indicator(PromptEditMode::Default), "");
    }

    #[test]
    fn test_multiline_indicator() {
        let prompt = TemplatePrompt::default();
        assert_eq!(prompt.render_prompt_multiline_indicator(), "... ");
    }
}
