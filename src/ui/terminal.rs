//! Styled terminal output.

use super::{OutputMode, UserInterface};
use console::style;

/// Terminal implementation of [`UserInterface`] using console styling.
///
/// Colors are disabled automatically when `NO_COLOR` is set or stdout is
/// not a terminal; the console crate handles both.
pub struct TerminalUI {
    mode: OutputMode,
}

impl TerminalUI {
    /// Create a terminal UI with the given output mode.
    pub fn new(mode: OutputMode) -> Self {
        Self { mode }
    }

    fn quiet(&self) -> bool {
        self.mode == OutputMode::Quiet
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if !self.quiet() {
            println!("{msg}");
        }
    }

    fn success(&mut self, msg: &str) {
        if !self.quiet() {
            println!("{} {msg}", style("✓").green().bold());
        }
    }

    fn warning(&mut self, msg: &str) {
        eprintln!("{} {msg}", style("!").yellow().bold());
    }

    fn error(&mut self, msg: &str) {
        eprintln!("{} {msg}", style("✗").red().bold());
    }
}

/// Create the UI for the given output mode.
pub fn create_ui(mode: OutputMode) -> Box<dyn UserInterface> {
    Box::new(TerminalUI::new(mode))
}
