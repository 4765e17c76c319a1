//! Run command implementation.
//!
//! The `retort run` command resolves and executes the requested
//! environments (or the configured envlist) and reports a per-environment
//! pass/fail summary.

use std::path::{Path, PathBuf};

use crate::cli::args::RunArgs;
use crate::config::{load_config, CONFIG_FILE_NAME};
use crate::error::{Result, RetortError};
use crate::runner::{EnvRunner, NoopInstaller, RunOptions};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The run command implementation.
pub struct RunCommand {
    project_root: PathBuf,
    config_override: Option<PathBuf>,
    args: RunArgs,
}

impl RunCommand {
    /// Create a new run command.
    pub fn new(project_root: &Path, config_override: Option<&Path>, args: RunArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_override: config_override.map(Path::to_path_buf),
            args,
        }
    }
}

impl Command for RunCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let document = match load_config(&self.project_root, self.config_override.as_deref()) {
            Ok(doc) => doc,
            Err(RetortError::ConfigNotFound { .. }) => {
                ui.error(&format!(
                    "No configuration found. Create {CONFIG_FILE_NAME} at the project root."
                ));
                return Ok(CommandResult::failure(2));
            }
            Err(e) => return Err(e),
        };

        // Requested environments, the envlist, or every declared section.
        let envs = if !self.args.envs.is_empty() {
            self.args.envs.clone()
        } else {
            let listed = crate::resolver::envlist(&document);
            if listed.is_empty() {
                document
                    .env_names()
                    .into_iter()
                    .map(ToString::to_string)
                    .collect()
            } else {
                listed
            }
        };

        if envs.is_empty() {
            ui.error("No environments configured: declare an envlist or [env:<name>] sections.");
            return Ok(CommandResult::failure(2));
        }

        let mut runner = EnvRunner::new(&document, &self.project_root);
        if self.args.dry_run {
            runner = runner.with_installer(Box::new(NoopInstaller));
        }

        let options = RunOptions {
            envs,
            posargs: self.args.posargs.clone(),
            dry_run: self.args.dry_run,
        };

        let report = runner.run(&options, ui)?;

        let passed = report.outcomes.iter().filter(|o| o.passed()).count();
        let summary = format!("{passed}/{} environments passed", report.outcomes.len());
        if report.success() {
            ui.success(&summary);
            Ok(CommandResult::success())
        } else {
            ui.error(&summary);
            Ok(CommandResult::failure(1))
        }
    }
}
