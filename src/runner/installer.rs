//! The dependency-installer collaborator boundary.
//!
//! The resolver hands the runner an ordered list of [`DepSpec`] values;
//! installing them is delegated through the [`DependencyInstaller`] trait
//! so the runner can be tested without touching a real package index.
//! `-r` requirement-file references are forwarded untouched; retort never
//! reads the referenced file itself.

use crate::error::{Result, RetortError};
use crate::resolver::DepSpec;
use crate::runner::exec::{execute, CommandOptions};
use std::path::Path;
use tracing::debug;

/// Installs resolved dependency lines into an environment's working area.
pub trait DependencyInstaller {
    /// Install each dependency line in order, failing on the first line
    /// that cannot be installed.
    fn install(&self, deps: &[DepSpec], envdir: &Path) -> Result<()>;
}

/// Installer that shells out to a package-manager program, one invocation
/// per dependency line so failures are reported per line.
pub struct ProcessInstaller {
    program: String,
}

impl ProcessInstaller {
    /// Default installer program when the global section names none.
    pub const DEFAULT_PROGRAM: &'static str = "pip";

    /// Create an installer around the given program.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for ProcessInstaller {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PROGRAM)
    }
}

impl DependencyInstaller for ProcessInstaller {
    fn install(&self, deps: &[DepSpec], envdir: &Path) -> Result<()> {
        for dep in deps {
            let argv = vec![
                self.program.clone(),
                "install".to_string(),
                dep.as_argument(),
            ];
            debug!(dep = %dep, "installing dependency");

            let options = CommandOptions {
                cwd: Some(envdir.to_path_buf()),
                capture: true,
                ..Default::default()
            };
            let result = execute(&argv, &options).map_err(|e| RetortError::InstallFailed {
                dep: dep.as_argument(),
                message: e.to_string(),
            })?;

            if !result.success {
                return Err(RetortError::InstallFailed {
                    dep: dep.as_argument(),
                    message: format!(
                        "installer exited with code {:?}: {}",
                        result.exit_code,
                        result.stderr.trim()
                    ),
                });
            }
        }
        Ok(())
    }
}

/// Installer that records requested lines and installs nothing.
///
/// Used for dry runs and in tests.
#[derive(Debug, Default)]
pub struct NoopInstaller;

impl DependencyInstaller for NoopInstaller {
    fn install(&self, deps: &[DepSpec], _envdir: &Path) -> Result<()> {
        for dep in deps {
            debug!(dep = %dep, "skipping install (noop installer)");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn deps(lines: &[&str]) -> Vec<DepSpec> {
        lines
            .iter()
            .map(|l| DepSpec::parse(l, "test").unwrap())
            .collect()
    }

    #[test]
    fn noop_installer_accepts_anything() {
        let temp = TempDir::new().unwrap();
        let installer = NoopInstaller;
        installer
            .install(&deps(&["pytest", "-r/nonexistent/reqs.txt"]), temp.path())
            .unwrap();
    }

    #[test]
    fn process_installer_reports_failing_line() {
        let temp = TempDir::new().unwrap();
        // `false` ignores its arguments and exits 1.
        let installer = ProcessInstaller::new("false");
        let err = installer.install(&deps(&["pytest"]), temp.path()).unwrap_err();
        match err {
            RetortError::InstallFailed { dep, .. } => assert_eq!(dep, "pytest"),
            other => panic!("expected InstallFailed, got {other:?}"),
        }
    }

    #[test]
    fn process_installer_missing_program_fails() {
        let temp = TempDir::new().unwrap();
        let installer = ProcessInstaller::new("retort-no-such-installer-xyz");
        let result = installer.install(&deps(&["pytest"]), temp.path());
        assert!(matches!(result, Err(RetortError::InstallFailed { .. })));
    }

    #[test]
    fn process_installer_succeeds_with_no_deps() {
        let temp = TempDir::new().unwrap();
        let installer = ProcessInstaller::new("false");
        installer.install(&[], temp.path()).unwrap();
    }

    #[test]
    fn default_program_is_pip() {
        assert_eq!(ProcessInstaller::DEFAULT_PROGRAM, "pip");
    }
}
