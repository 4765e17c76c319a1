//! Command execution.
//!
//! Resolved command lines are already in argv form, so commands run
//! directly without a shell in between. Environment variables from the
//! resolved spec are exported on top of the inherited process environment.

use crate::error::{Result, RetortError};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Result of executing one command line.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Captured standard output.
    pub stdout: String,

    /// Captured standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether the command exited zero.
    pub success: bool,
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Working directory.
    pub cwd: Option<PathBuf>,

    /// Variables exported on top of the inherited environment.
    pub env: BTreeMap<String, String>,

    /// Capture output (if false, the child inherits the terminal).
    pub capture: bool,
}

/// Render an argv for display and error messages.
pub fn display_command(argv: &[String]) -> String {
    shell_words::join(argv)
}

/// Execute one argv-form command line.
///
/// # Errors
///
/// Returns `CommandFailed` if the program cannot be spawned. A non-zero
/// exit is not an error here; callers inspect [`CommandResult::success`].
pub fn execute(argv: &[String], options: &CommandOptions) -> Result<CommandResult> {
    let (program, args) = argv.split_first().ok_or_else(|| RetortError::CommandFailed {
        command: String::new(),
        code: None,
    })?;

    let start = Instant::now();

    let mut cmd = Command::new(program);
    cmd.args(args);

    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }

    for (key, value) in &options.env {
        cmd.env(key, value);
    }

    if options.capture {
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
    } else {
        cmd.stdout(Stdio::inherit());
        cmd.stderr(Stdio::inherit());
    }

    let output = cmd.output().map_err(|_| RetortError::CommandFailed {
        command: display_command(argv),
        code: None,
    })?;

    let duration = start.elapsed();
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    Ok(CommandResult {
        exit_code: output.status.code(),
        stdout,
        stderr,
        duration,
        success: output.status.success(),
    })
}

/// Execute with captured output in the given directory.
pub fn execute_quiet(argv: &[String], cwd: Option<&Path>) -> Result<CommandResult> {
    let options = CommandOptions {
        cwd: cwd.map(Path::to_path_buf),
        capture: true,
        ..Default::default()
    };
    execute(argv, &options)
}
