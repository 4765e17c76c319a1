//! Section header grammar.
//!
//! Every section header in a retort configuration file matches exactly one
//! of four patterns. Classifying headers into a tagged [`SectionKind`] at
//! parse time means the resolver never has to sniff strings, and grammar
//! violations surface as parse errors rather than resolution surprises.
//!
//! | Header | Kind |
//! |---|---|
//! | `[retort]` | global settings |
//! | `[env]` | default template for all environments |
//! | `[env:<name>]` | override for one named environment |
//! | `[<name>]` | standalone auxiliary tool configuration |

use crate::error::{Result, RetortError};
use regex::Regex;
use std::sync::OnceLock;

/// Name of the global settings section.
pub const GLOBAL_SECTION: &str = "retort";

/// Name of the default environment template section.
pub const ENV_DEFAULTS_SECTION: &str = "env";

/// The kind of a configuration section, derived from its header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionKind {
    /// `[retort]` - global settings (envlist, installer).
    Global,
    /// `[env]` - default template inherited by all named environments.
    EnvDefaults,
    /// `[env:<name>]` - override for a specific named environment.
    Env(String),
    /// `[<name>]` - auxiliary tool configuration, independent of the
    /// environment template (e.g. a style checker's settings).
    Auxiliary(String),
}

fn name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").unwrap())
}

impl SectionKind {
    /// Classify a section header (without surrounding brackets).
    ///
    /// # Errors
    ///
    /// Returns `Malformed` if the header matches none of the four
    /// recognized patterns.
    pub fn parse(header: &str) -> Result<Self> {
        if header == GLOBAL_SECTION {
            return Ok(Self::Global);
        }
        if header == ENV_DEFAULTS_SECTION {
            return Ok(Self::EnvDefaults);
        }
        if let Some(name) = header.strip_prefix("env:") {
            if name_pattern().is_match(name) {
                return Ok(Self::Env(name.to_string()));
            }
            return Err(RetortError::malformed(
                format!("[{header}]"),
                "environment name must be non-empty and contain only alphanumerics, '.', '_' or '-'",
            ));
        }
        if name_pattern().is_match(header) {
            return Ok(Self::Auxiliary(header.to_string()));
        }
        Err(RetortError::malformed(
            format!("[{header}]"),
            "section header matches no recognized pattern",
        ))
    }

    /// The environment name for `Env` sections.
    pub fn env_name(&self) -> Option<&str> {
        match self {
            Self::Env(name) => Some(name),
            _ => None,
        }
    }
}

impl std::fmt::Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Global => write!(f, "[{GLOBAL_SECTION}]"),
            Self::EnvDefaults => write!(f, "[{ENV_DEFAULTS_SECTION}]"),
            Self::Env(name) => write!(f, "[env:{name}]"),
            Self::Auxiliary(name) => write!(f, "[{name}]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global() {
        assert_eq!(SectionKind::parse("retort").unwrap(), SectionKind::Global);
    }

    #[test]
    fn parses_env_defaults() {
        assert_eq!(SectionKind::parse("env").unwrap(), SectionKind::EnvDefaults);
    }

    #[test]
    fn parses_named_env() {
        assert_eq!(
            SectionKind::parse("env:py311").unwrap(),
            SectionKind::Env("py311".to_string())
        );
    }

    #[test]
    fn parses_env_name_with_dots_and_dashes() {
        assert_eq!(
            SectionKind::parse("env:py3.11-cover").unwrap(),
            SectionKind::Env("py3.11-cover".to_string())
        );
    }

    #[test]
    fn parses_auxiliary() {
        assert_eq!(
            SectionKind::parse("pep8checker").unwrap(),
            SectionKind::Auxiliary("pep8checker".to_string())
        );
    }

    #[test]
    fn rejects_empty_env_name() {
        let result = SectionKind::parse("env:");
        assert!(matches!(result, Err(RetortError::Malformed { .. })));
    }

    #[test]
    fn rejects_nested_colons() {
        let result = SectionKind::parse("env:a:b");
        assert!(matches!(result, Err(RetortError::Malformed { .. })));
    }

    #[test]
    fn rejects_unknown_colon_prefix() {
        let result = SectionKind::parse("checker:pep8");
        assert!(matches!(result, Err(RetortError::Malformed { .. })));
    }

    #[test]
    fn rejects_whitespace_in_header() {
        let result = SectionKind::parse("env defaults");
        assert!(matches!(result, Err(RetortError::Malformed { .. })));
    }

    #[test]
    fn env_name_accessor() {
        let kind = SectionKind::parse("env:cover").unwrap();
        assert_eq!(kind.env_name(), Some("cover"));
        assert_eq!(SectionKind::Global.env_name(), None);
    }

    #[test]
    fn display_round_trips_headers() {
        for header in ["retort", "env", "env:py311", "pep8checker"] {
            let kind = SectionKind::parse(header).unwrap();
            assert_eq!(kind.to_string(), format!("[{header}]"));
        }
    }
}
