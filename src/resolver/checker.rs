//! Auxiliary tool section resolution.
//!
//! Auxiliary sections (e.g. a style checker's `[pep8checker]`) are a
//! disjoint environment type: their settings resolve independently and
//! never merge with the `[env]` template. Recognized keys are `ignore`
//! (rule codes to suppress), `exclude` (path globs to skip),
//! `show-source` (boolean flag), and `commands`.

use crate::config::Document;
use crate::error::{Result, RetortError};
use crate::resolver::bindings::{substitute, Bindings};
use crate::resolver::resolve_command_lines;
use serde::Serialize;

/// Resolved settings of an auxiliary tool section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckerSpec {
    /// The section name.
    pub name: String,

    /// Rule codes to suppress.
    pub ignore: Vec<String>,

    /// Path globs to skip.
    pub exclude: Vec<String>,

    /// Whether the checker should print offending source lines.
    pub show_source: bool,

    /// Command lines, taken verbatim with substitution applied.
    pub commands: Vec<Vec<String>>,
}

/// Resolve an auxiliary section by name.
///
/// # Errors
///
/// Returns `UnknownEnvironment` if no such section is declared,
/// `Malformed` for an invalid `show-source` value, and substitution
/// errors as in environment resolution.
pub fn resolve_checker(
    document: &Document,
    name: &str,
    bindings: &Bindings,
) -> Result<CheckerSpec> {
    let section = document
        .auxiliary(name)
        .ok_or_else(|| RetortError::UnknownEnvironment {
            name: name.to_string(),
        })?;

    let mut ignore = Vec::new();
    for line in section.lines("ignore") {
        for code in split_list(line) {
            ignore.push(code.to_string());
        }
    }

    let mut exclude = Vec::new();
    for line in section.lines("exclude") {
        for glob in split_list(line) {
            exclude.push(substitute(glob, bindings)?);
        }
    }

    let show_source = match section.get("show-source").map(str::trim) {
        None | Some("") => false,
        Some(value) => parse_bool(value).ok_or_else(|| {
            RetortError::malformed(
                format!("{} show-source", section.kind()),
                format!("expected a boolean, got: {value}"),
            )
        })?,
    };

    Ok(CheckerSpec {
        name: name.to_string(),
        ignore,
        exclude,
        show_source,
        commands: resolve_command_lines(section, "commands", bindings)?,
    })
}

/// Split one line of a list value on commas and/or whitespace.
fn split_list(line: &str) -> impl Iterator<Item = &str> {
    line.split([',', ' ', '\t']).filter(|entry| !entry.is_empty())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Document;

    const CONFIG: &str = "\
[env]
setenv = LANG=C
commands = pytest

[pep8checker]
ignore = E125,H302
exclude = .venv,.git,{envdir}/tmp
show-source = True
commands = flake8 {rootdir}/src
";

    fn bindings() -> Bindings {
        Bindings::new("/work/.retort/pep8", "/work")
    }

    #[test]
    fn resolves_all_keys() {
        let doc = Document::parse(CONFIG).unwrap();
        let spec = resolve_checker(&doc, "pep8checker", &bindings()).unwrap();

        assert_eq!(spec.ignore, vec!["E125", "H302"]);
        assert_eq!(
            spec.exclude,
            vec![".venv", ".git", "/work/.retort/pep8/tmp"]
        );
        assert!(spec.show_source);
        assert_eq!(
            spec.commands,
            vec![vec!["flake8".to_string(), "/work/src".to_string()]]
        );
    }

    #[test]
    fn never_merges_with_env_template() {
        let doc = Document::parse(CONFIG).unwrap();
        let spec = resolve_checker(&doc, "pep8checker", &bindings()).unwrap();
        // No inheritance of [env] keys: the section's own commands only.
        assert_eq!(spec.commands.len(), 1);
        assert_ne!(spec.commands[0][0], "pytest");
    }

    #[test]
    fn ignore_accepts_multiline_lists() {
        let doc = Document::parse("[checker]\nignore =\n  E125\n  H302, H404\n").unwrap();
        let spec = resolve_checker(&doc, "checker", &bindings()).unwrap();
        assert_eq!(spec.ignore, vec!["E125", "H302", "H404"]);
    }

    #[test]
    fn ignore_and_exclude_split_on_whitespace_and_commas() {
        let doc =
            Document::parse("[checker]\nignore = E125 H302, H404\nexclude = .venv .git\n").unwrap();
        let spec = resolve_checker(&doc, "checker", &bindings()).unwrap();
        assert_eq!(spec.ignore, vec!["E125", "H302", "H404"]);
        assert_eq!(spec.exclude, vec![".venv", ".git"]);
    }

    #[test]
    fn missing_keys_default_empty_and_false() {
        let doc = Document::parse("[checker]\n").unwrap();
        let spec = resolve_checker(&doc, "checker", &bindings()).unwrap();
        assert!(spec.ignore.is_empty());
        assert!(spec.exclude.is_empty());
        assert!(!spec.show_source);
        assert!(spec.commands.is_empty());
    }

    #[test]
    fn unknown_section_fails() {
        let doc = Document::parse("[env]\n").unwrap();
        let result = resolve_checker(&doc, "pep8checker", &bindings());
        assert!(matches!(
            result,
            Err(RetortError::UnknownEnvironment { .. })
        ));
    }

    #[test]
    fn invalid_show_source_fails() {
        let doc = Document::parse("[checker]\nshow-source = maybe\n").unwrap();
        let result = resolve_checker(&doc, "checker", &bindings());
        assert!(matches!(result, Err(RetortError::Malformed { .. })));
    }

    #[test]
    fn bool_spellings() {
        for value in ["true", "Yes", "ON", "1"] {
            assert_eq!(parse_bool(value), Some(true), "{value}");
        }
        for value in ["false", "No", "off", "0"] {
            assert_eq!(parse_bool(value), Some(false), "{value}");
        }
        assert_eq!(parse_bool("2"), None);
    }
}
