//! Data model for parsed snippets — format-agnostic.

use crate::error::SnippetError;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// A parsed snippet file.
///
/// Built only by the parser, read-only afterwards. A snippet always has
/// some text or some imports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    pub(crate) name: String,
    pub(crate) path: PathBuf,
    /// Every line that is not a `// snippet:` comment, in order
    pub(crate) text: Vec<String>,
    /// `note:` lines, untrimmed
    pub(crate) docs: Vec<String>,
    /// Sorted, deduplicated
    pub(crate) imports: Vec<String>,
    /// Sorted, deduplicated; includes everything in `follows`
    pub(crate) expects: Vec<String>,
    /// Sorted, deduplicated
    pub(crate) follows: Vec<String>,
    /// Tag name → values in the order they were declared
    pub(crate) tags: BTreeMap<String, Vec<String>>,
}

impl Snippet {
    /// The name the snippet was requested or discovered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The file the snippet was read from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &[String] {
        &self.text
    }

    pub fn docs(&self) -> &[String] {
        &self.docs
    }

    pub fn imports(&self) -> &[String] {
        &self.imports
    }

    /// Snippets expected to be used alongside this one.
    pub fn expects(&self) -> &[String] {
        &self.expects
    }

    /// Snippets that should come before this one.
    pub fn follows(&self) -> &[String] {
        &self.follows
    }

    pub fn tags(&self) -> &BTreeMap<String, Vec<String>> {
        &self.tags
    }
}

impl fmt::Display for Snippet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::render::FormatConfig::default().render(self))
    }
}

/// A named part of a snippet that can be selected for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Part {
    Name,
    Path,
    Text,
    Note,
    Imports,
    Expects,
    Follows,
    Tag,
}

impl Part {
    pub const ALL: [Part; 8] = [
        Part::Name,
        Part::Path,
        Part::Text,
        Part::Note,
        Part::Imports,
        Part::Expects,
        Part::Follows,
        Part::Tag,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Part::Name => "name",
            Part::Path => "path",
            Part::Text => "text",
            Part::Note => "note",
            Part::Imports => "imports",
            Part::Expects => "expects",
            Part::Follows => "follows",
            Part::Tag => "tag",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Part::Name => "the snippet name",
            Part::Path => "the name of the snippet file",
            Part::Text => "the snippet code to be used",
            Part::Note => "how the snippet should be used",
            Part::Imports => "packages this snippet imports",
            Part::Expects => "snippets used with this",
            Part::Follows => "snippets coming before this",
            Part::Tag => "colon-separated name/value pairs",
        }
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Part {
    type Err = SnippetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Part::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| SnippetError::BadPart(s.to_string()))
    }
}

/// Every valid part name with a one-line description of it.
pub fn valid_parts() -> BTreeMap<&'static str, &'static str> {
    Part::ALL
        .into_iter()
        .map(|p| (p.as_str(), p.description()))
        .collect()
}
