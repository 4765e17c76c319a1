//! Configuration file discovery and loading.
//!
//! Retort reads a single `retort.ini` at the project root. Discovery walks
//! up from the starting directory so the tool can be invoked from anywhere
//! inside the project tree.

use crate::config::document::Document;
use crate::error::{Result, RetortError};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the configuration file retort looks for.
pub const CONFIG_FILE_NAME: &str = "retort.ini";

/// Find the project root by walking up from the starting directory.
///
/// The root is the first ancestor containing `retort.ini`, with a `.git`
/// directory as fallback.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        if current.join(CONFIG_FILE_NAME).is_file() {
            return Some(current);
        }

        if current.join(".git").exists() {
            return Some(current);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load and parse the configuration document at the given path.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist, or `Malformed` with
/// the path prefixed to the location if parsing fails.
pub fn load_document(path: &Path) -> Result<Document> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            RetortError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            RetortError::Io(e)
        }
    })?;

    Document::parse(&content).map_err(|e| match e {
        RetortError::Malformed { location, message } => RetortError::Malformed {
            location: format!("{} {location}", path.display()),
            message,
        },
        other => other,
    })
}

/// Load configuration for a project root, with an optional explicit path.
///
/// When `config_override` is given, that file is loaded directly; otherwise
/// `retort.ini` under the project root is used.
pub fn load_config(project_root: &Path, config_override: Option<&Path>) -> Result<Document> {
    match config_override {
        Some(path) => load_document(path),
        None => load_document(&project_root.join(CONFIG_FILE_NAME)),
    }
}
