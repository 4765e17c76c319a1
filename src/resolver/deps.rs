//! Typed dependency specifications.
//!
//! Each line of a `deps` block is either a plain requirement token
//! (`pytest`, `coverage>=7`) or a requirement-file reference
//! (`-r{rootdir}/requirements.txt`). Referenced files are passed through
//! to the installer untouched; their contents are never read here.

use crate::error::{Result, RetortError};
use serde::Serialize;
use std::path::PathBuf;

/// One resolved dependency line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DepSpec {
    /// A plain requirement token handed to the installer as-is.
    Requirement { spec: String },
    /// A `-r<path>` reference to a requirements file.
    RequirementsFile { path: PathBuf },
}

impl DepSpec {
    /// Parse one already-substituted `deps` line.
    ///
    /// # Errors
    ///
    /// Returns `Malformed` if the line is neither a plain requirement
    /// token nor a `-r` reference: unknown `-` flags, embedded whitespace,
    /// or an empty `-r` path.
    pub fn parse(line: &str, location: &str) -> Result<Self> {
        let line = line.trim();

        if let Some(path) = line.strip_prefix("-r") {
            let path = path.trim();
            if path.is_empty() {
                return Err(RetortError::malformed(
                    location,
                    "'-r' reference with no path",
                ));
            }
            return Ok(Self::RequirementsFile {
                path: PathBuf::from(path),
            });
        }

        if line.starts_with('-') {
            return Err(RetortError::malformed(
                location,
                format!("unrecognized dependency flag: {line}"),
            ));
        }

        if line.is_empty() || line.contains(char::is_whitespace) {
            return Err(RetortError::malformed(
                location,
                format!("dependency must be a single requirement token: {line:?}"),
            ));
        }

        Ok(Self::Requirement {
            spec: line.to_string(),
        })
    }

    /// Render the spec as a single installer argument.
    pub fn as_argument(&self) -> String {
        match self {
            Self::Requirement { spec } => spec.clone(),
            Self::RequirementsFile { path } => format!("-r{}", path.display()),
        }
    }
}

impl std::fmt::Display for DepSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_argument())
    }
}
