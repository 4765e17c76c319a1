//! Terminal output components.
//!
//! This module provides:
//! - [`UserInterface`] trait for output abstraction
//! - [`TerminalUI`] for styled terminal output
//! - [`MockUI`] for capturing output in tests

pub mod mock;
pub mod terminal;

pub use mock::MockUI;
pub use terminal::{create_ui, TerminalUI};

/// How much output to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Failures and the final summary only.
    Quiet,
    /// Standard output.
    #[default]
    Normal,
    /// Everything, including per-command detail.
    Verbose,
}

/// Trait for user-facing output.
///
/// This trait allows capturing output in tests.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Display a message.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message.
    fn error(&mut self, msg: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_mode_defaults_to_normal() {
        assert_eq!(OutputMode::default(), OutputMode::Normal);
    }
}
