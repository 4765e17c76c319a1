//! Show command implementation.
//!
//! The `retort show` command resolves one environment (or auxiliary
//! section) and prints the resulting plan, optionally as JSON. Nothing is
//! installed or executed; this is the resolver's output verbatim.

use std::path::{Path, PathBuf};

use crate::cli::args::ShowArgs;
use crate::config::{load_config, CONFIG_FILE_NAME};
use crate::error::{Result, RetortError};
use crate::resolver::{resolve_checker, EnvironmentSpec};
use crate::runner::{display_command, EnvRunner};
use crate::ui::UserInterface;
use console::style;

use super::dispatcher::{Command, CommandResult};

/// The show command implementation.
pub struct ShowCommand {
    project_root: PathBuf,
    config_override: Option<PathBuf>,
    args: ShowArgs,
}

impl ShowCommand {
    /// Create a new show command.
    pub fn new(project_root: &Path, config_override: Option<&Path>, args: ShowArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_override: config_override.map(Path::to_path_buf),
            args,
        }
    }

    fn print_env(&self, spec: &EnvironmentSpec, ui: &mut dyn UserInterface) -> Result<()> {
        if self.args.json {
            ui.message(&serde_json::to_string_pretty(spec).map_err(anyhow::Error::from)?);
            return Ok(());
        }

        ui.message(&format!("  {} {}", style("Environment:").bold(), spec.name));

        ui.message(&format!("  {}", style("Variables:").bold()));
        for (key, value) in &spec.variables {
            ui.message(&format!("    {key}={value}"));
        }

        ui.message(&format!("  {}", style("Deps:").bold()));
        for dep in &spec.deps {
            ui.message(&format!("    {dep}"));
        }

        ui.message(&format!("  {}", style("Commands:").bold()));
        for argv in &spec.commands {
            ui.message(&format!("    {}", display_command(argv)));
        }

        Ok(())
    }
}

impl Command for ShowCommand {
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

        let runner = EnvRunner::new(&document, &self.project_root);
        let bindings = runner.bindings(&self.args.env, &self.args.posargs);

        if self.args.checker {
            let spec = match resolve_checker(&document, &self.args.env, &bindings) {
                Ok(spec) => spec,
                Err(e) => {
                    ui.error(&e.to_string());
                    return Ok(CommandResult::failure(1));
                }
            };
            if self.args.json {
                ui.message(&serde_json::to_string_pretty(&spec).map_err(anyhow::Error::from)?);
            } else {
                ui.message(&format!("  {} {}", style("Checker:").bold(), spec.name));
                ui.message(&format!("    ignore: {}", spec.ignore.join(", ")));
                ui.message(&format!("    exclude: {}", spec.exclude.join(", ")));
                ui.message(&format!("    show-source: {}", spec.show_source));
                for argv in &spec.commands {
                    ui.message(&format!("    command: {}", display_command(argv)));
                }
            }
            return Ok(CommandResult::success());
        }

        match runner.resolve_env(&self.args.env, &self.args.posargs) {
            Ok(spec) => {
                self.print_env(&spec, ui)?;
                Ok(CommandResult::success())
            }
            Err(e) => {
                ui.error(&e.to_string());
                Ok(CommandResult::failure(1))
            }
        }
    }
}
