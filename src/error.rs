//! Error types and the diagnostics sink used while listing.

use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, Write};
use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong locating, parsing or listing snippets.
#[derive(Error, Debug)]
pub enum SnippetError {
    #[error("there are no snippet directories to search")]
    NoSearchDirs,

    #[error("snippet {name:?} is not in the snippet directory: {}", DirList(.dirs))]
    NotInDir { name: String, dirs: Vec<PathBuf> },

    #[error("snippet {name:?} is not in any snippet directory: {}", DirList(.dirs))]
    NotInAnyDir { name: String, dirs: Vec<PathBuf> },

    #[error("snippet {name:?} ({}) has no text and no imports", .path.display())]
    Empty { name: String, path: PathBuf },

    #[error("snippet {name:?}: {source}")]
    Io {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("{0:?} is not a valid pre-defined part of a snippet")]
    BadPart(String),

    #[error("{0:?} is not in the snippet cache")]
    NotCached(String),

    #[error("snippet {expected:?} is missing but is expected by {expected_by:?}")]
    MissingSnippet { expected: String, expected_by: String },

    #[error("snippet {name:?} does not exist but is 'expected' by {}", QuotedList(.expected_by))]
    MissingExpected {
        name: String,
        expected_by: Vec<String>,
    },

    #[error("{name:?} in {:?} is eclipsed by the entry in {:?}", .dir.display().to_string(), .by.display().to_string())]
    Eclipsed {
        name: String,
        dir: PathBuf,
        by: PathBuf,
    },

    #[error("snippet {:?} is a duplicate of {:?}", .path.display().to_string(), .original.display().to_string())]
    Duplicate { path: PathBuf, original: PathBuf },

    #[error("{:?}: unexpected file type {file_type}", .path.display().to_string())]
    UnexpectedFileType { path: PathBuf, file_type: String },

    #[error("{:?}: {source}", .dir.display().to_string())]
    BadDirectory {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{sub_dir:?}: {source}")]
    BadSubDirectory {
        sub_dir: String,
        #[source]
        source: io::Error,
    },
}

/// Result type alias using SnippetError
pub type Result<T> = std::result::Result<T, SnippetError>;

/// Directories rendered as `"a", "b"`.
struct DirList<'a>(&'a [PathBuf]);

impl fmt::Display for DirList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.0.iter().map(|d| d.display().to_string()).collect();
        QuotedList(&names).fmt(f)
    }
}

/// Names rendered as `"a", "b"`.
struct QuotedList<'a>(&'a [String]);

impl fmt::Display for QuotedList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, s) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{:?}", s)?;
        }
        Ok(())
    }
}

/// The kinds of problem recorded while walking snippet directories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    BadSnippetsDirectory,
    BadSubDirectory,
    BadSpecificSnippet,
    EclipsedSnippet,
    DuplicateSnippet,
    BadSnippet,
    UnexpectedFileType,
    MissingExpectedSnippet,
    MissingSnippet,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::BadSnippetsDirectory => "Bad snippets directory",
            Category::BadSubDirectory => "Bad sub-directory",
            Category::BadSpecificSnippet => "Bad specific snippet",
            Category::EclipsedSnippet => "Eclipsed snippet",
            Category::DuplicateSnippet => "Duplicate snippet",
            Category::BadSnippet => "Bad snippet",
            Category::UnexpectedFileType => "Unexpected file type",
            Category::MissingExpectedSnippet => "Missing expected snippet",
            Category::MissingSnippet => "Missing snippet",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accumulates non-fatal problems by category. Recording never aborts
/// the operation that found the problem.
#[derive(Debug, Default)]
pub struct Diagnostics {
    errs: BTreeMap<Category, Vec<SnippetError>>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, category: Category, err: SnippetError) {
        self.errs.entry(category).or_default().push(err);
    }

    /// The errors recorded under `category`, in the order they were found.
    pub fn get(&self, category: Category) -> &[SnippetError] {
        self.errs.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of errors across all categories.
    pub fn len(&self) -> usize {
        self.errs.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.errs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &[SnippetError])> {
        self.errs.iter().map(|(c, e)| (*c, e.as_slice()))
    }

    /// Write a human-readable summary of every recorded error.
    pub fn report<W: Write>(&self, w: &mut W, title: &str) -> io::Result<()> {
        if self.is_empty() {
            return Ok(());
        }
        writeln!(w, "{}:", title)?;
        for (category, errs) in self.iter() {
            let plural = if errs.len() == 1 { "" } else { "s" };
            writeln!(w, "{} ({} error{}):", category, errs.len(), plural)?;
            for err in errs {
                writeln!(w, "    {}", err)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_in_any_dir_joins_quoted() {
        let err = SnippetError::NotInAnyDir {
            name: "any".to_string(),
            dirs: vec![PathBuf::from("noDir1"), PathBuf::from("noDir2")],
        };
        assert_eq!(
            err.to_string(),
            r#"snippet "any" is not in any snippet directory: "noDir1", "noDir2""#
        );
    }

    #[test]
    fn missing_expected_lists_all_expecters() {
        let err = SnippetError::MissingExpected {
            name: "gone".to_string(),
            expected_by: vec!["a".to_string(), "b/c".to_string()],
        };
        assert_eq!(
            err.to_string(),
            r#"snippet "gone" does not exist but is 'expected' by "a", "b/c""#
        );
    }

    #[test]
    fn diagnostics_accumulate_and_report() {
        let mut diags = Diagnostics::new();
        assert!(diags.is_empty());
        diags.add(Category::BadSnippet, SnippetError::NoSearchDirs);
        diags.add(Category::BadSnippet, SnippetError::NotCached("x".to_string()));
        diags.add(Category::EclipsedSnippet, SnippetError::NoSearchDirs);

        assert_eq!(diags.len(), 3);
        assert_eq!(diags.get(Category::BadSnippet).len(), 2);
        assert!(diags.get(Category::DuplicateSnippet).is_empty());

        let mut out = Vec::new();
        diags.report(&mut out, "Snippet errors").unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with("Snippet errors:\n"));
        assert!(out.contains("Eclipsed snippet (1 error):"));
        assert!(out.contains("Bad snippet (2 errors):"));
        assert!(out.contains(r#"    "x" is not in the snippet cache"#));
    }
}
