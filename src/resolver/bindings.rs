//! Token substitution with externally supplied bindings.
//!
//! Configuration values may reference `{token}`-style placeholders. The
//! recognized tokens are bound outside the document:
//!
//! - `{envdir}` - the isolated working directory allocated for the
//!   environment being resolved
//! - `{rootdir}` - the directory containing the configuration document
//! - `{posargs}` - extra arguments forwarded by the invoking user; empty
//!   expansion when none are supplied
//!
//! Substitution is textual and performed in a single pass: a token's
//! replacement is never re-scanned for further tokens. `{{` and `}}`
//! escape to literal braces.

use crate::error::{Result, RetortError};

/// A segment of a value containing token references.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Literal text
    Literal(String),
    /// Token reference: {name}
    Token(String),
}

/// Parse a value into literal and token segments.
///
/// `{{` and `}}` produce literal braces. An unterminated `{` is kept as
/// literal text.
pub fn parse_tokens(input: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut chars = input.chars().peekable();
    let mut current_literal = String::new();

    while let Some(c) = chars.next() {
        match c {
            '{' => {
                if chars.peek() == Some(&'{') {
                    chars.next();
                    current_literal.push('{');
                    continue;
                }

                let mut token = String::new();
                let mut terminated = false;
                for inner in chars.by_ref() {
                    if inner == '}' {
                        terminated = true;
                        break;
                    }
                    token.push(inner);
                }

                if terminated {
                    if !current_literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut current_literal)));
                    }
                    segments.push(Segment::Token(token));
                } else {
                    current_literal.push('{');
                    current_literal.push_str(&token);
                }
            }
            '}' => {
                if chars.peek() == Some(&'}') {
                    chars.next();
                }
                current_literal.push('}');
            }
            _ => current_literal.push(c),
        }
    }

    if !current_literal.is_empty() {
        segments.push(Segment::Literal(current_literal));
    }

    segments
}

/// Externally supplied values for the recognized substitution tokens.
///
/// The resolver treats all of these as opaque injected strings; it never
/// derives them itself.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    /// Working directory allocated for the environment.
    pub envdir: String,

    /// Directory containing the configuration document.
    pub rootdir: String,

    /// Extra run-time arguments forwarded by the invoking user.
    pub posargs: Vec<String>,
}

impl Bindings {
    /// Create bindings for an environment's working area and project root.
    pub fn new(envdir: impl Into<String>, rootdir: impl Into<String>) -> Self {
        Self {
            envdir: envdir.into(),
            rootdir: rootdir.into(),
            posargs: Vec::new(),
        }
    }

    /// Attach user-supplied positional arguments.
    pub fn with_posargs(mut self, posargs: Vec<String>) -> Self {
        self.posargs = posargs;
        self
    }

    /// Resolve a token name to its scalar replacement.
    ///
    /// `posargs` joins to a single space-separated string here; command
    /// words use [`expand_word`] to splice it as separate tokens instead.
    pub fn lookup(&self, name: &str) -> Option<String> {
        match name {
            "envdir" => Some(self.envdir.clone()),
            "rootdir" => Some(self.rootdir.clone()),
            "posargs" => Some(self.posargs.join(" ")),
            _ => None,
        }
    }
}

/// Substitute every recognized token in a scalar value.
///
/// # Errors
///
/// Returns `UnresolvedToken` for a token with no known binding.
pub fn substitute(input: &str, bindings: &Bindings) -> Result<String> {
    let mut result = String::new();

    for segment in parse_tokens(input) {
        match segment {
            Segment::Literal(text) => result.push_str(&text),
            Segment::Token(name) => {
                let value =
                    bindings
                        .lookup(&name)
                        .ok_or_else(|| RetortError::UnresolvedToken {
                            token: name,
                            value: input.to_string(),
                        })?;
                result.push_str(&value);
            }
        }
    }

    Ok(result)
}

/// Expand one word of a command line.
///
/// A word that is exactly `{posargs}` splices into the user-supplied
/// arguments in place (zero words when none were given). Any other word
/// substitutes to exactly one word.
pub fn expand_word(word: &str, bindings: &Bindings) -> Result<Vec<String>> {
    if word == "{posargs}" {
        return Ok(bindings.posargs.clone());
    }
    Ok(vec![substitute(word, bindings)?])
}
