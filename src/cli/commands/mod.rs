//! Command implementations.

pub mod completions;
pub mod dispatcher;
pub mod list;
pub mod run;
pub mod show;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
