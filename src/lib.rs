//! Retort - configuration-driven test environment matrix runner.
//!
//! Retort runs a project's test suite and auxiliary checks across a matrix
//! of named, isolated environments, driven by a declarative `retort.ini`
//! at the project root. Named environments extend a default template with
//! override-wins, whole-list replacement semantics, and values support
//! `{token}` substitution bound at run time.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration document model, grammar, and loading
//! - [`resolver`] - Environment resolution and token substitution
//! - [`runner`] - Per-environment execution orchestration
//! - [`error`] - Error types and result aliases
//! - [`ui`] - Terminal output abstraction
//!
//! # Example
//!
//! ```
//! use retort::config::Document;
//! use retort::resolver::{resolve, Bindings};
//!
//! let doc = Document::parse(
//!     "[env]\n\
//!      deps = pytest\n\
//!      commands = pytest {posargs}\n",
//! )
//! .unwrap();
//!
//! let bindings = Bindings::new("/work/.retort/py311", "/work")
//!     .with_posargs(vec!["-v".to_string()]);
//! let spec = resolve(&doc, "py311", &bindings).unwrap();
//! assert_eq!(spec.commands, vec![vec!["pytest".to_string(), "-v".to_string()]]);
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod resolver;
pub mod runner;
pub mod ui;

pub use error::{Result, RetortError};
