//! Configuration loading and parsing for retort.
//!
//! This module handles the configuration document:
//! - Section header grammar in [`section`]
//! - Document model and parser in [`document`]
//! - File discovery and loading in [`loader`]
//!
//! The configuration file (`retort.ini`) is INI-style text with
//! indentation-based multi-line values. Section headers are classified
//! into a tagged [`SectionKind`] at parse time, so the resolver works
//! against a structured document rather than raw strings.

pub mod document;
pub mod loader;
pub mod section;

pub use document::{Document, Section};
pub use loader::{find_project_root, load_config, load_document, CONFIG_FILE_NAME};
pub use section::{SectionKind, ENV_DEFAULTS_SECTION, GLOBAL_SECTION};
