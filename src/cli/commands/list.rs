//! List command implementation.
//!
//! The `retort list` command lists the configured envlist, declared
//! environment overrides, and auxiliary tool sections.

use std::path::{Path, PathBuf};

use crate::cli::args::ListArgs;
use crate::config::{load_config, SectionKind, CONFIG_FILE_NAME};
use crate::error::{Result, RetortError};
use crate::resolver::envlist;
use crate::ui::UserInterface;
use console::style;

use super::dispatcher::{Command, CommandResult};

/// The list command implementation.
pub struct ListCommand {
    project_root: PathBuf,
    config_override: Option<PathBuf>,
    args: ListArgs,
}

impl ListCommand {
    /// Create a new list command.
    pub fn new(project_root: &Path, config_override: Option<&Path>, args: ListArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_override: config_override.map(Path::to_path_buf),
            args,
        }
    }
}

impl Command for ListCommand {
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

        let listed = envlist(&document);
        let declared = document.env_names();
        let auxiliary: Vec<&str> = document
            .sections()
            .iter()
            .filter_map(|s| match s.kind() {
                SectionKind::Auxiliary(name) => Some(name.as_str()),
                _ => None,
            })
            .collect();

        if self.args.json {
            let json = serde_json::json!({
                "envlist": listed,
                "environments": declared,
                "auxiliary": auxiliary,
            });
            ui.message(&serde_json::to_string_pretty(&json).map_err(anyhow::Error::from)?);
            return Ok(CommandResult::success());
        }

        ui.message(&format!("  {}", style("Envlist:").bold()));
        for name in &listed {
            ui.message(&format!("    {name}"));
        }

        ui.message(&format!("  {}", style("Environments:").bold()));
        for name in &declared {
            let marker = if listed.iter().any(|l| l == name) {
                ""
            } else {
                " (not in envlist)"
            };
            ui.message(&format!("    {name}{}", style(marker).dim()));
        }

        if !auxiliary.is_empty() {
            ui.message(&format!("  {}", style("Auxiliary:").bold()));
            for name in &auxiliary {
                ui.message(&format!("    {name}"));
            }
        }

        Ok(CommandResult::success())
    }
}
