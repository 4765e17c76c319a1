//! Environment resolution.
//!
//! The resolver turns a parsed [`Document`] plus a requested environment
//! name into a fully-resolved, immutable [`EnvironmentSpec`]: variables,
//! dependency specs, and command lines, with tokens substituted.
//!
//! # Merge semantics
//!
//! A named environment `[env:NAME]` extends the `[env]` default template.
//! For each recognized key (`setenv`, `deps`, `commands`) the override
//! wins with whole-list replacement: a key present in the override is used
//! verbatim, a key absent in the override inherits the base's value
//! unchanged, and a key absent in both is empty. Lists never concatenate.
//!
//! Resolution is a pure function: the same document, name, and bindings
//! always produce the same spec, and nothing outside the returned value is
//! touched.

pub mod bindings;
pub mod checker;
pub mod deps;

pub use bindings::{expand_word, parse_tokens, substitute, Bindings, Segment};
pub use checker::{resolve_checker, CheckerSpec};
pub use deps::DepSpec;

use crate::config::{Document, Section};
use crate::error::{Result, RetortError};
use serde::Serialize;
use std::collections::BTreeMap;

/// Keys with environment-merge semantics.
const SETENV_KEY: &str = "setenv";
const DEPS_KEY: &str = "deps";
const COMMANDS_KEY: &str = "commands";

/// A fully-resolved execution plan for one environment.
///
/// Constructed once per resolution request and never mutated afterwards;
/// safe to hand to independent executors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvironmentSpec {
    /// The environment name as requested.
    pub name: String,

    /// Variables exported into every command of this environment.
    pub variables: BTreeMap<String, String>,

    /// Dependency requirements in declaration order.
    pub deps: Vec<DepSpec>,

    /// Command lines in declaration order, each tokenized into argv form.
    pub commands: Vec<Vec<String>>,
}

/// Resolve a named environment against the document.
///
/// The `[env]` section acts as the base template; `[env:<name>]` overrides
/// it key by key. A missing override is not an error while a base exists,
/// which is how passthrough environments with no declared keys work.
///
/// # Errors
///
/// - `UnknownEnvironment` when neither `[env:<name>]` nor `[env]` exists
/// - `Malformed` for structural violations (`setenv` line without `=`,
///   invalid deps line, empty command line, unparsable quoting)
/// - `UnresolvedToken` for `{token}` values with no binding
pub fn resolve(document: &Document, name: &str, bindings: &Bindings) -> Result<EnvironmentSpec> {
    let base = document.env_defaults();
    let overlay = document.env(name);

    if base.is_none() && overlay.is_none() {
        return Err(RetortError::UnknownEnvironment {
            name: name.to_string(),
        });
    }

    let setenv = pick(overlay, base, SETENV_KEY);
    let deps = pick(overlay, base, DEPS_KEY);
    let commands = pick(overlay, base, COMMANDS_KEY);

    Ok(EnvironmentSpec {
        name: name.to_string(),
        variables: resolve_setenv(setenv, bindings)?,
        deps: resolve_deps(deps, bindings)?,
        commands: resolve_commands(commands, bindings)?,
    })
}

/// Names from the global `envlist` key, in declaration order.
///
/// Entries are separated by commas and/or whitespace.
pub fn envlist(document: &Document) -> Vec<String> {
    document
        .global()
        .map(|global| {
            global
                .lines("envlist")
                .iter()
                .flat_map(|line| line.split([',', ' ', '\t']))
                .filter(|entry| !entry.is_empty())
                .map(ToString::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Override-wins key selection: the section whose value applies for a key
/// is the overlay when it declares the key, otherwise the base.
fn pick<'a>(
    overlay: Option<&'a Section>,
    base: Option<&'a Section>,
    key: &str,
) -> Option<&'a Section> {
    [overlay, base]
        .into_iter()
        .flatten()
        .find(|section| section.has(key))
}

fn resolve_setenv(
    source: Option<&Section>,
    bindings: &Bindings,
) -> Result<BTreeMap<String, String>> {
    let mut variables = BTreeMap::new();
    let Some(section) = source else {
        return Ok(variables);
    };
    let location = format!("{} {SETENV_KEY}", section.kind());

    for line in section.lines(SETENV_KEY) {
        let Some((key, value)) = line.split_once('=') else {
            return Err(RetortError::malformed(
                &location,
                format!("expected KEY=VALUE, got: {line}"),
            ));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(RetortError::malformed(&location, "empty variable name"));
        }
        let value = substitute(value.trim(), bindings)?;
        if variables.insert(key.to_string(), value).is_some() {
            return Err(RetortError::malformed(
                &location,
                format!("duplicate variable '{key}'"),
            ));
        }
    }

    Ok(variables)
}

fn resolve_deps(source: Option<&Section>, bindings: &Bindings) -> Result<Vec<DepSpec>> {
    let Some(section) = source else {
        return Ok(Vec::new());
    };
    let location = format!("{} {DEPS_KEY}", section.kind());

    section
        .lines(DEPS_KEY)
        .iter()
        .map(|line| {
            let substituted = substitute(line, bindings)?;
            DepSpec::parse(&substituted, &location)
        })
        .collect()
}

fn resolve_commands(source: Option<&Section>, bindings: &Bindings) -> Result<Vec<Vec<String>>> {
    let Some(section) = source else {
        return Ok(Vec::new());
    };
    resolve_command_lines(section, COMMANDS_KEY, bindings)
}

/// Tokenize and substitute each line of a `commands` block.
///
/// Lines are split shell-style before substitution, so a binding value
/// containing spaces stays one argument. A word that is exactly
/// `{posargs}` splices the user's arguments in place.
pub(crate) fn resolve_command_lines(
    section: &Section,
    key: &str,
    bindings: &Bindings,
) -> Result<Vec<Vec<String>>> {
    let location = format!("{} {key}", section.kind());
    let mut commands = Vec::new();

    for line in section.lines(key) {
        let words = shell_words::split(line).map_err(|e| {
            RetortError::malformed(&location, format!("unparsable command line: {e}"))
        })?;

        let mut argv = Vec::new();
        for word in &words {
            argv.extend(expand_word(word, bindings)?);
        }

        if argv.is_empty() {
            return Err(RetortError::malformed(
                &location,
                format!("empty command line: {line:?}"),
            ));
        }
        commands.push(argv);
    }

    Ok(commands)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Document;

    const FULL_CONFIG: &str = "\
[retort]
envlist = py311,py312,cover,pep8

[env]
setenv =
  VIRTUAL_ENV={envdir}
  LANG=en_US.utf-8
deps =
  pytest
  -r{rootdir}/requirements.txt
commands = pytest {posargs}

[env:py312]

[env:cover]
setenv =
  VIRTUAL_ENV={envdir}
  PYTHON=coverage run --source retort --parallel-mode

[env:pep8]
deps = flake8
commands = flake8 src

[env:venv]
commands = {posargs}
";

    fn doc() -> Document {
        Document::parse(FULL_CONFIG).unwrap()
    }

    fn bindings() -> Bindings {
        Bindings::new("/work/.retort/py311", "/work")
    }

    #[test]
    fn no_override_resolves_to_base_with_substitution() {
        let spec = resolve(&doc(), "py312", &bindings()).unwrap();
        assert_eq!(
            spec.variables.get("VIRTUAL_ENV"),
            Some(&"/work/.retort/py311".to_string())
        );
        assert_eq!(spec.variables.get("LANG"), Some(&"en_US.utf-8".to_string()));
        assert_eq!(spec.deps[0].as_argument(), "pytest");
        assert_eq!(spec.deps[1].as_argument(), "-r/work/requirements.txt");
        assert_eq!(spec.commands, vec![vec!["pytest".to_string()]]);
    }

    #[test]
    fn missing_override_section_still_resolves() {
        // "venv"-style passthrough is declared; a name the envlist carries
        // but no section declares also resolves to the base alone.
        let spec = resolve(&doc(), "py311", &bindings()).unwrap();
        assert_eq!(spec.name, "py311");
        assert_eq!(spec.commands, vec![vec!["pytest".to_string()]]);
    }

    #[test]
    fn override_commands_replace_base_wholesale() {
        let spec = resolve(&doc(), "pep8", &bindings()).unwrap();
        assert_eq!(
            spec.commands,
            vec![vec!["flake8".to_string(), "src".to_string()]]
        );
        assert_eq!(spec.deps, vec![DepSpec::parse("flake8", "t").unwrap()]);
        // setenv absent in the override inherits the base's block.
        assert!(spec.variables.contains_key("LANG"));
    }

    #[test]
    fn cover_inherits_base_commands_with_own_setenv() {
        let spec = resolve(&doc(), "cover", &bindings()).unwrap();
        assert_eq!(
            spec.variables.get("PYTHON"),
            Some(&"coverage run --source retort --parallel-mode".to_string())
        );
        // LANG is in the base's setenv block, which cover replaced wholesale.
        assert!(!spec.variables.contains_key("LANG"));
        assert_eq!(spec.commands, vec![vec!["pytest".to_string()]]);
    }

    #[test]
    fn posargs_splice_in_place() {
        let b = bindings().with_posargs(vec!["-v".to_string(), "-x".to_string()]);
        let spec = resolve(&doc(), "py311", &b).unwrap();
        assert_eq!(
            spec.commands,
            vec![vec![
                "pytest".to_string(),
                "-v".to_string(),
                "-x".to_string()
            ]]
        );
    }

    #[test]
    fn unknown_environment_without_base_fails() {
        let empty = Document::parse("[retort]\nenvlist = py99\n").unwrap();
        let result = resolve(&empty, "py99", &bindings());
        assert!(matches!(
            result,
            Err(RetortError::UnknownEnvironment { .. })
        ));
    }

    #[test]
    fn unknown_environment_with_base_succeeds() {
        let spec = resolve(&doc(), "py313", &bindings()).unwrap();
        assert_eq!(spec.name, "py313");
        assert_eq!(spec.commands, vec![vec!["pytest".to_string()]]);
    }

    #[test]
    fn resolution_is_deterministic() {
        let document = doc();
        let b = bindings().with_posargs(vec!["-q".to_string()]);
        let first = resolve(&document, "cover", &b).unwrap();
        let second = resolve(&document, "cover", &b).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn setenv_line_without_equals_fails() {
        let document = Document::parse("[env]\nsetenv = NOVALUE\n").unwrap();
        let err = resolve(&document, "any", &bindings()).unwrap_err();
        match err {
            RetortError::Malformed { location, .. } => assert!(location.contains("setenv")),
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_setenv_variable_fails() {
        let document = Document::parse("[env]\nsetenv =\n  A=1\n  A=2\n").unwrap();
        let result = resolve(&document, "any", &bindings());
        assert!(matches!(result, Err(RetortError::Malformed { .. })));
    }

    #[test]
    fn invalid_deps_line_fails() {
        let document = Document::parse("[env]\ndeps = --editable\n").unwrap();
        let result = resolve(&document, "any", &bindings());
        assert!(matches!(result, Err(RetortError::Malformed { .. })));
    }

    #[test]
    fn unresolved_token_fails_only_that_environment() {
        let document =
            Document::parse("[env]\ncommands = pytest\n[env:bad]\ncommands = run {basedir}\n")
                .unwrap();
        assert!(matches!(
            resolve(&document, "bad", &bindings()),
            Err(RetortError::UnresolvedToken { .. })
        ));
        // Sibling environments resolve fine from the same document.
        assert!(resolve(&document, "good", &bindings()).is_ok());
    }

    #[test]
    fn empty_command_line_fails() {
        let document = Document::parse("[env]\ncommands = \"\"\n").unwrap();
        let result = resolve(&document, "any", &bindings());
        assert!(matches!(result, Err(RetortError::Malformed { .. })));
    }

    #[test]
    fn posargs_only_command_with_no_args_fails_as_empty() {
        let result = resolve(&doc(), "venv", &bindings());
        assert!(matches!(result, Err(RetortError::Malformed { .. })));
    }

    #[test]
    fn posargs_only_command_runs_supplied_args() {
        let b = bindings().with_posargs(vec!["python".to_string(), "-V".to_string()]);
        let spec = resolve(&doc(), "venv", &b).unwrap();
        assert_eq!(
            spec.commands,
            vec![vec!["python".to_string(), "-V".to_string()]]
        );
    }

    #[test]
    fn quoted_words_stay_single_arguments() {
        let document =
            Document::parse("[env]\ncommands = sh -c 'echo hello world'\n").unwrap();
        let spec = resolve(&document, "any", &bindings()).unwrap();
        assert_eq!(
            spec.commands,
            vec![vec![
                "sh".to_string(),
                "-c".to_string(),
                "echo hello world".to_string()
            ]]
        );
    }

    #[test]
    fn envlist_splits_commas_and_lines() {
        assert_eq!(envlist(&doc()), vec!["py311", "py312", "cover", "pep8"]);

        let multiline =
            Document::parse("[retort]\nenvlist =\n  py311, py312\n  pep8\n").unwrap();
        assert_eq!(envlist(&multiline), vec!["py311", "py312", "pep8"]);
    }

    #[test]
    fn envlist_splits_whitespace_within_a_line() {
        let document = Document::parse("[retort]\nenvlist = py311 py312,  pep8\n").unwrap();
        assert_eq!(envlist(&document), vec!["py311", "py312", "pep8"]);
    }

    #[test]
    fn envlist_empty_without_global_section() {
        let document = Document::parse("[env]\ncommands = pytest\n").unwrap();
        assert!(envlist(&document).is_empty());
    }

    #[test]
    fn spec_serializes_to_json() {
        let spec = resolve(&doc(), "pep8", &bindings()).unwrap();
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["name"], "pep8");
        assert_eq!(json["commands"][0][0], "flake8");
    }
}
