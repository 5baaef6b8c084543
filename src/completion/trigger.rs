//! Keystroke trigger policy
//!
//! Hosts decide when to ask for completions. The classifier itself produces
//! correct output for any prefix; this policy only mirrors the common editor
//! convention of opening the completion list after a space, pipe or dot.

use serde::{Deserialize, Serialize};

/// Characters after which completion is requested automatically
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerPolicy {
    characters: Vec<char>,
}

impl TriggerPolicy {
    pub fn new<I: IntoIterator<Item = char>>(characters: I) -> Self {
        Self {
            characters: characters.into_iter().collect(),
        }
    }

    /// Trigger on every keystroke
    pub fn always() -> Self {
        Self {
            characters: Vec::new(),
        }
    }

    pub fn characters(&self) -> &[char] {
        &self.characters
    }

    /// Whether a prefix ending with the last typed character should trigger
    pub fn should_trigger(&self, prefix: &str) -> bool {
        if self.characters.is_empty() {
            return true;
        }
        prefix
            .chars()
            .next_back()
            .is_some_and(|c| self.characters.contains(&c))
    }
}

impl Default for TriggerPolicy {
    fn default() -> Self {
        Self::new([' ', '|', '.'])
    }
}
