//! Configuration document model and parser.
//!
//! A retort configuration file is INI-style text: `[header]` lines open
//! sections, `key = value` lines add entries, and indented lines continue
//! the previous entry's value as a multi-line block. Full-line comments
//! start with `#` or `;`. Blank lines are ignored, including inside
//! multi-line blocks.
//!
//! # Example
//!
//! ```
//! use retort::config::Document;
//!
//! let doc = Document::parse(
//!     "[env]\n\
//!      commands =\n\
//!      \x20 pytest\n\
//!      [env:py311]\n\
//!      deps = pytest\n",
//! )
//! .unwrap();
//! assert!(doc.env("py311").is_some());
//! assert_eq!(doc.env_defaults().unwrap().lines("commands"), vec!["pytest"]);
//! ```

use crate::config::section::SectionKind;
use crate::error::{Result, RetortError};

/// One parsed configuration section.
#[derive(Debug, Clone)]
pub struct Section {
    kind: SectionKind,
    /// Entries in declaration order. Values keep internal newlines for
    /// multi-line blocks.
    entries: Vec<(String, String)>,
}

impl Section {
    fn new(kind: SectionKind) -> Self {
        Self {
            kind,
            entries: Vec::new(),
        }
    }

    /// The section's kind, as classified from its header.
    pub fn kind(&self) -> &SectionKind {
        &self.kind
    }

    /// Whether the section declares the given key.
    pub fn has(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// The raw value for a key, multi-line blocks included.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The value for a key split into trimmed, non-blank lines in
    /// declaration order. Missing keys yield an empty list.
    pub fn lines(&self, key: &str) -> Vec<&str> {
        self.get(key)
            .map(|value| {
                value
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

/// A parsed configuration document: an ordered collection of sections with
/// unique headers.
#[derive(Debug, Clone)]
pub struct Document {
    sections: Vec<Section>,
}

impl Document {
    /// Parse configuration text into a document.
    ///
    /// # Errors
    ///
    /// Returns `Malformed` for content outside any section, unrecognized
    /// headers, duplicate sections, duplicate keys within a section,
    /// key lines without `=`, or continuation lines with no preceding key.
    pub fn parse(content: &str) -> Result<Self> {
        let mut sections: Vec<Section> = Vec::new();
        // Index of the entry currently accepting continuation lines.
        let mut open_entry: Option<usize> = None;

        for (index, raw_line) in content.lines().enumerate() {
            let line_no = index + 1;
            let line = raw_line.trim_end();
            let trimmed = line.trim_start();

            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
                continue;
            }

            if line.starts_with('[') {
                let header = line
                    .strip_prefix('[')
                    .and_then(|rest| rest.strip_suffix(']'))
                    .ok_or_else(|| {
                        RetortError::malformed(
                            format!("line {line_no}"),
                            format!("unterminated section header: {line}"),
                        )
                    })?;
                let kind = SectionKind::parse(header)?;
                if sections.iter().any(|s| s.kind == kind) {
                    return Err(RetortError::malformed(
                        format!("line {line_no}"),
                        format!("duplicate section {kind}"),
                    ));
                }
                sections.push(Section::new(kind));
                open_entry = None;
                continue;
            }

            let Some(section) = sections.last_mut() else {
                return Err(RetortError::malformed(
                    format!("line {line_no}"),
                    "content before any section header",
                ));
            };

            if line.starts_with(char::is_whitespace) {
                // Continuation line for the most recent key.
                let Some(entry) = open_entry.and_then(|i| section.entries.get_mut(i)) else {
                    return Err(RetortError::malformed(
                        format!("{} line {line_no}", section.kind),
                        "indented line with no preceding key",
                    ));
                };
                if !entry.1.is_empty() {
                    entry.1.push('\n');
                }
                entry.1.push_str(trimmed);
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                return Err(RetortError::malformed(
                    format!("{} line {line_no}", section.kind),
                    format!("expected 'key = value', got: {line}"),
                ));
            };
            let key = key.trim();
            if key.is_empty() {
                return Err(RetortError::malformed(
                    format!("{} line {line_no}", section.kind),
                    "empty key",
                ));
            }
            if section.has(key) {
                return Err(RetortError::malformed(
                    format!("{} line {line_no}", section.kind),
                    format!("duplicate key '{key}'"),
                ));
            }
            section
                .entries
                .push((key.to_string(), value.trim().to_string()));
            open_entry = Some(section.entries.len() - 1);
        }

        Ok(Self { sections })
    }

    /// All sections in declaration order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    fn find(&self, kind: &SectionKind) -> Option<&Section> {
        self.sections.iter().find(|s| &s.kind == kind)
    }

    /// The `[retort]` global settings section.
    pub fn global(&self) -> Option<&Section> {
        self.find(&SectionKind::Global)
    }

    /// The `[env]` default template section.
    pub fn env_defaults(&self) -> Option<&Section> {
        self.find(&SectionKind::EnvDefaults)
    }

    /// The `[env:<name>]` override section, if declared.
    pub fn env(&self, name: &str) -> Option<&Section> {
        self.sections
            .iter()
            .find(|s| s.kind.env_name() == Some(name))
    }

    /// An auxiliary tool section by name.
    pub fn auxiliary(&self, name: &str) -> Option<&Section> {
        self.find(&SectionKind::Auxiliary(name.to_string()))
    }

    /// Names of all declared `[env:<name>]` sections in order.
    pub fn env_names(&self) -> Vec<&str> {
        self.sections
            .iter()
            .filter_map(|s| s.kind.env_name())
            .collect()
    }
}
