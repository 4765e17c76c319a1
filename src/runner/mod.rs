//! Per-environment execution orchestration.
//!
//! The runner takes requested environment names, resolves each one against
//! the document, and executes the resolved plan: dependencies first, then
//! command lines in order. Failure handling follows two rules:
//!
//! - **fail-fast within an environment**: the first non-zero exit halts
//!   that environment's remaining commands
//! - **independence between environments**: a failing environment never
//!   stops the others; the report aggregates per-environment outcomes
//!
//! Each environment gets its own working area under `.retort/<name>`;
//! commands themselves run at the project root with the environment's
//! variables exported.

pub mod exec;
pub mod installer;

pub use exec::{display_command, execute, execute_quiet, CommandOptions, CommandResult};
pub use installer::{DependencyInstaller, NoopInstaller, ProcessInstaller};

use crate::config::Document;
use crate::error::Result;
use crate::resolver::{self, Bindings, EnvironmentSpec};
use crate::ui::{OutputMode, UserInterface};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Directory under the project root holding per-environment working areas.
pub const ENVS_DIR: &str = ".retort";

/// Terminal state of one environment's run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvStatus {
    /// Every command exited zero.
    Passed,
    /// Resolution, install, or a command failed.
    Failed { reason: String },
    /// Dry run: resolved and printed, nothing executed.
    Skipped,
}

/// Outcome of one environment.
#[derive(Debug)]
pub struct EnvOutcome {
    /// Environment name.
    pub name: String,
    /// Pass/fail state.
    pub status: EnvStatus,
    /// Wall-clock time spent on this environment.
    pub duration: Duration,
}

impl EnvOutcome {
    /// Whether this environment counts as passing.
    pub fn passed(&self) -> bool {
        !matches!(self.status, EnvStatus::Failed { .. })
    }
}

/// Aggregated result of a run across environments.
#[derive(Debug)]
pub struct RunReport {
    /// Per-environment outcomes in execution order.
    pub outcomes: Vec<EnvOutcome>,
}

impl RunReport {
    /// Overall status: fail if any requested environment failed.
    pub fn success(&self) -> bool {
        self.outcomes.iter().all(EnvOutcome::passed)
    }
}

/// Options for a run.
#[derive(Debug, Default)]
pub struct RunOptions {
    /// Environment names to run, in order.
    pub envs: Vec<String>,
    /// Extra arguments spliced into `{posargs}`.
    pub posargs: Vec<String>,
    /// Resolve and print without installing or executing.
    pub dry_run: bool,
}

/// Orchestrates resolution and execution of requested environments.
pub struct EnvRunner<'a> {
    document: &'a Document,
    project_root: PathBuf,
    installer: Box<dyn DependencyInstaller>,
}

impl<'a> EnvRunner<'a> {
    /// Create a runner over a parsed document.
    ///
    /// The installer program comes from the global `installer` key,
    /// defaulting to `pip`.
    pub fn new(document: &'a Document, project_root: &Path) -> Self {
        let program = document
            .global()
            .and_then(|g| g.get("installer"))
            .unwrap_or(ProcessInstaller::DEFAULT_PROGRAM);
        Self {
            document,
            project_root: project_root.to_path_buf(),
            installer: Box::new(ProcessInstaller::new(program)),
        }
    }

    /// Replace the installer (dry runs, tests).
    pub fn with_installer(mut self, installer: Box<dyn DependencyInstaller>) -> Self {
        self.installer = installer;
        self
    }

    /// The working directory allocated for an environment.
    pub fn envdir(&self, name: &str) -> PathBuf {
        self.project_root.join(ENVS_DIR).join(name)
    }

    /// Resolve one environment with the bindings this runner would use.
    pub fn resolve_env(&self, name: &str, posargs: &[String]) -> Result<EnvironmentSpec> {
        let bindings = self.bindings(name, posargs);
        resolver::resolve(self.document, name, &bindings)
    }

    /// The substitution bindings this runner injects for an environment.
    pub fn bindings(&self, name: &str, posargs: &[String]) -> Bindings {
        Bindings::new(
            self.envdir(name).display().to_string(),
            self.project_root.display().to_string(),
        )
        .with_posargs(posargs.to_vec())
    }

    /// Run every requested environment, independently.
    ///
    /// Per-environment failures (including resolution errors) are captured
    /// in the report; only setup failures of the runner itself propagate.
    pub fn run(&self, options: &RunOptions, ui: &mut dyn UserInterface) -> Result<RunReport> {
        let mut outcomes = Vec::with_capacity(options.envs.len());

        for name in &options.envs {
            let start = Instant::now();
            let status = self.run_env(name, options, ui);
            let duration = start.elapsed();

            match &status {
                EnvStatus::Passed => ui.success(&format!("{name}: passed")),
                EnvStatus::Skipped => ui.message(&format!("{name}: resolved (dry run)")),
                EnvStatus::Failed { reason } => ui.error(&format!("{name}: failed - {reason}")),
            }

            outcomes.push(EnvOutcome {
                name: name.clone(),
                status,
                duration,
            });
        }

        Ok(RunReport { outcomes })
    }

    fn run_env(&self, name: &str, options: &RunOptions, ui: &mut dyn UserInterface) -> EnvStatus {
        info!(env = name, "starting environment");

        let spec = match self.resolve_env(name, &options.posargs) {
            Ok(spec) => spec,
            Err(e) => {
                return EnvStatus::Failed {
                    reason: e.to_string(),
                }
            }
        };

        if options.dry_run {
            for argv in &spec.commands {
                ui.message(&format!("{name}: would run {}", display_command(argv)));
            }
            return EnvStatus::Skipped;
        }

        let envdir = self.envdir(name);
        if let Err(e) = std::fs::create_dir_all(&envdir) {
            return EnvStatus::Failed {
                reason: format!("could not create {}: {e}", envdir.display()),
            };
        }

        if let Err(e) = self.installer.install(&spec.deps, &envdir) {
            return EnvStatus::Failed {
                reason: e.to_string(),
            };
        }

        for argv in &spec.commands {
            let rendered = display_command(argv);
            debug!(env = name, command = %rendered, "running command");
            ui.message(&format!("{name}: {rendered}"));

            let exec_options = CommandOptions {
                cwd: Some(self.project_root.clone()),
                env: spec.variables.clone(),
                capture: true,
            };

            match execute(argv, &exec_options) {
                Ok(result) if result.success => {
                    if ui.output_mode() == OutputMode::Verbose && !result.stdout.is_empty() {
                        ui.message(result.stdout.trim_end());
                    }
                }
                Ok(result) => {
                    if !result.stdout.is_empty() {
                        ui.message(result.stdout.trim_end());
                    }
                    if !result.stderr.is_empty() {
                        ui.error(result.stderr.trim_end());
                    }
                    // Fail fast: remaining commands of this environment
                    // are not run.
                    return EnvStatus::Failed {
                        reason: format!(
                            "command exited with code {:?}: {rendered}",
                            result.exit_code
                        ),
                    };
                }
                Err(e) => {
                    return EnvStatus::Failed {
                        reason: e.to_string(),
                    }
                }
            }
        }

        EnvStatus::Passed
    }
}
