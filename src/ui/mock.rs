//! Mock UI for tests.

use super::{OutputMode, UserInterface};

/// Records everything written through the [`UserInterface`] trait.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    messages: Vec<String>,
    errors: Vec<String>,
    warnings: Vec<String>,
    successes: Vec<String>,
}

impl MockUI {
    /// Create a mock in normal output mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock in verbose output mode.
    pub fn verbose() -> Self {
        Self {
            mode: OutputMode::Verbose,
            ..Self::default()
        }
    }

    /// All plain messages in order.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// All error messages in order.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// All warning messages in order.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// All success messages in order.
    pub fn successes(&self) -> &[String] {
        &self.successes
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }
}
