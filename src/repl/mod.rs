//! Interactive template playground
//!
//! This module provides a line editor for trying out completions:
//! - Tab opens a completion menu fed by the classifier
//! - Command history backed by a file
//! - Highlighting of statement and expression regions
//! - On Enter, the classification of the whole line is printed

pub mod completer;
pub mod highlighter;
pub mod prompt;

pub use completer::TemplateCompleter;
pub use highlighter::TemplateHighlighter;
pub use prompt::TemplatePrompt;

use reedline::{
    ColumnarMenu, Emacs, FileBackedHistory, KeyCode, KeyModifiers, MenuBuilder, Reedline,
    ReedlineEvent, ReedlineMenu, Signal, default_emacs_keybindings,
};

use crate::completion::CompletionEngine;
use crate::config::Config;
use crate::error::{PebbleError, Result};
use crate::formatter::Formatter;

/// Name of the completion menu registered with the editor
const COMPLETION_MENU: &str = "completion_menu";

/// What the playground should do with one input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// Leave the playground
    Exit,
    /// Print usage help
    Help,
    /// Nothing to do
    Empty,
    /// Classify the line
    Classify(String),
}

impl ReplCommand {
    /// Interpret one input line
    pub fn parse(input: &str) -> Self {
        match input.trim() {
            "" => ReplCommand::Empty,
            ":quit" | ":exit" | ":q" => ReplCommand::Exit,
            ":help" | ":h" => ReplCommand::Help,
            _ => ReplCommand::Classify(input.to_string()),
        }
    }
}

/// REPL engine for the template playground
pub struct ReplEngine {
    /// Line editor
    editor: Reedline,

    /// Prompt shown before each line
    prompt: TemplatePrompt,

    /// Engine used for Enter-time classification
    completion_engine: CompletionEngine,

    /// Formatter for classification output
    formatter: Formatter,

    /// Whether to continue running
    running: bool,
}

impl ReplEngine {
    /// Create a new REPL engine
    ///
    /// # Arguments
    /// * `config` - Effective configuration
    ///
    /// # Returns
    /// * `Result<Self>` - New REPL engine or error
    pub fn new(config: &Config) -> Result<Self> {
        let completion_engine = config.engine();

        let completer = Box::new(TemplateCompleter::new(
            completion_engine.clone(),
            config.completion.filter_by_word,
        ));
        let menu = Box::new(ColumnarMenu::default().with_name(COMPLETION_MENU));

        let mut keybindings = default_emacs_keybindings();
        keybindings.add_binding(
            KeyModifiers::NONE,
            KeyCode::Tab,
            ReedlineEvent::UntilFound(vec![
                ReedlineEvent::Menu(COMPLETION_MENU.to_string()),
                ReedlineEvent::MenuNext,
            ]),
        );

        let highlighter = Box::new(TemplateHighlighter::new(
            config.syntax.clone(),
            config.display.color_output,
        ));

        let mut editor = Reedline::create()
            .with_completer(completer)
            .with_menu(ReedlineMenu::EngineCompleter(menu))
            .with_edit_mode(Box::new(Emacs::new(keybindings)))
            .with_highlighter(highlighter);

        if config.history.persist {
            match FileBackedHistory::with_file(
                config.history.max_size,
                config.history.file_path.clone(),
            ) {
                Ok(history) => editor = editor.with_history(Box::new(history)),
                Err(e) => tracing::warn!(
                    path = %config.history.file_path.display(),
                    "history disabled: {e}"
                ),
            }
        }

        Ok(Self {
            editor,
            prompt: TemplatePrompt::default(),
            completion_engine,
            formatter: Formatter::new(config.display.format, config.display.color_output),
            running: true,
        })
    }

    /// Read a single line of input
    ///
    /// # Returns
    /// * `Result<Option<String>>` - Input line, empty after Ctrl-C, `None` on Ctrl-D
    pub fn read_line(&mut self) -> Result<Option<String>> {
        match self.editor.read_line(&self.prompt) {
            Ok(Signal::Success(line)) => Ok(Some(line)),
            Ok(Signal::CtrlC) => Ok(Some(String::new())),
            Ok(Signal::CtrlD) => {
                self.running = false;
                Ok(None)
            }
            #[allow(unreachable_patterns)]
            Ok(_) => Ok(Some(String::new())),
            Err(err) => Err(PebbleError::Readline(err.to_string())),
        }
    }

    /// Handle one input line
    ///
    /// # Returns
    /// * `Result<Option<String>>` - Text to print, if any
    pub fn process_input(&mut self, input: &str) -> Result<Option<String>> {
        match ReplCommand::parse(input) {
            ReplCommand::Exit => {
                self.running = false;
                Ok(None)
            }
            ReplCommand::Empty => Ok(None),
            ReplCommand::Help => Ok(Some(help_text())),
            ReplCommand::Classify(line) => {
                let (classification, set) = self.completion_engine.classify_with_context(&line);
                self.formatter
                    .format_explained(&classification, &set)
                    .map(Some)
            }
        }
    }

    /// Run until `:quit` or Ctrl-D
    pub fn run(&mut self) -> Result<()> {
        while self.running {
            let Some(line) = self.read_line()? else {
                break;
            };

            match self.process_input(&line) {
                Ok(Some(output)) => println!("{output}"),
                Ok(None) => {}
                Err(e) => eprintln!("{}", self.formatter.colorizer().error(&e.to_string())),
            }
        }
        Ok(())
    }

    /// Check if REPL is still running
    pub fn is_running(&self) -> bool {
        self.running
    }
}

fn help_text() -> String {
    [
        "Type a template line and press Tab to complete, Enter to classify it.",
        "  :help   show this help",
        "  :quit   leave (also :exit or Ctrl-D)",
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(ReplCommand::parse("  "), ReplCommand::Empty);
        assert_eq!(ReplCommand::parse(":quit"), ReplCommand::Exit);
        assert_eq!(ReplCommand::parse(" :exit "), ReplCommand::Exit);
        assert_eq!(ReplCommand::parse(":help"), ReplCommand::Help);
        assert_eq!(
            ReplCommand::parse("{{ x |"),
            ReplCommand::Classify("{{ x |".to_string())
        );
    }

    fn test_engine() -> ReplEngine {
        let mut config = Config::default();
        config.history.persist = false;
        config.display.color_output = false;
        ReplEngine::new(&config).unwrap()
    }

    #[test]
    fn test_process_classifies_line() {
        let mut repl = test_engine();
        let output = repl.process_input("{{ loop.").unwrap().unwrap();
        assert!(output.contains("context: expression"));
        assert!(output.contains("catalogs: loop-variables"));
        assert!(repl.is_running());
    }

    #[test]
    fn test_process_exit() {
        let mut repl = test_engine();
        assert!(repl.process_input(":quit").unwrap().is_none());
        assert!(!repl.is_running());
    }
}
