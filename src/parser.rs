//! Snippet directive parser — line-by-line, no look-ahead.
//!
//! A directive is a comment line of the form `// snippet: <keyword>: <payload>`
//! (case-blind, leading whitespace allowed). Every other line is snippet text.
//!
//! Rendering a snippet is lossy: notes, tags and the expects/follows overlap
//! are presented for reading, so parsing a rendered snippet does not give
//! back the original record.

use crate::error::{Result, SnippetError};
use crate::model::Snippet;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

/// The marker every directive line starts with.
pub const COMMENT_STR: &str = "snippet:";


/// What a recognised directive line contributes to the snippet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Directive {
    Import,
    Expect,
    Follow,
    Note,
    Tag,
}

/// Keywords and their synonyms, in match priority order.
const DIRECTIVES: &[(Directive, &[&str])] = &[
    (Directive::Import, &["imports", "import"]),
    (Directive::Expect, &["expects", "expect", "comesbefore"]),
    (Directive::Follow, &["follows", "follow", "comesafter"]),
    (Directive::Note, &["note", "notes", "doc", "docs"]),
    (Directive::Tag, &["tag", "tags"]),
];

// -- Regex patterns -----------------------------------------------------------

/// `// snippet:` at the start of a line, case-blind.
static COMMENT_PATTERN: LazyLock<String> =
    LazyLock::new(|| format!(r"(?i)^\s*//\s*{}", regex::escape(COMMENT_STR)));

static RE_COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(&COMMENT_PATTERN).unwrap());

static RE_DIRECTIVES: LazyLock<Vec<(Directive, Regex)>> = LazyLock::new(|| {
    DIRECTIVES
        .iter()
        .map(|(directive, keywords)| {
            let pattern = format!(r"{}\s*(?:{}):\s*", *COMMENT_PATTERN, keywords.join("|"));
            (*directive, Regex::new(&pattern).unwrap())
        })
        .collect()
});

// -- Parser state -------------------------------------------------------------

#[derive(Default)]
struct Builder {
    text: Vec<String>,
    docs: Vec<String>,
    imports: Vec<String>,
    expects: Vec<String>,
    follows: Vec<String>,
    tags: BTreeMap<String, Vec<String>>,
}

impl Builder {
    fn directive(&mut self, directive: Directive, payload: &str) {
        match directive {
            Directive::Import => push_trimmed(payload, &mut [&mut self.imports]),
            Directive::Expect => push_trimmed(payload, &mut [&mut self.expects]),
            Directive::Follow => {
                push_trimmed(payload, &mut [&mut self.expects, &mut self.follows])
            }
            Directive::Note => self.docs.push(payload.to_string()),
            Directive::Tag => {
                let (tag, value) = split_tag(payload);
                self.tags.entry(tag).or_default().push(value);
            }
        }
    }
}

// -- Public API ---------------------------------------------------------------

/// Parse snippet file content into a [`Snippet`].
///
/// Fails if, once the directives are removed, the snippet has neither
/// text nor imports.
pub fn parse(content: &[u8], path: &Path, name: &str) -> Result<Snippet> {
    let content = String::from_utf8_lossy(content);
    let mut b = Builder::default();

    for line in content.lines() {
        if !RE_COMMENT.is_match(line) {
            b.text.push(line.to_string());
            continue;
        }
        // Marker lines with an unknown keyword are dropped.
        if let Some((directive, end)) = RE_DIRECTIVES
            .iter()
            .find_map(|(d, re)| re.find(line).map(|m| (*d, m.end())))
        {
            b.directive(directive, &line[end..]);
        }
    }

    if b.text.is_empty() && b.imports.is_empty() {
        return Err(SnippetError::Empty {
            name: name.to_string(),
            path: path.to_path_buf(),
        });
    }

    Ok(Snippet {
        name: name.to_string(),
        path: path.to_path_buf(),
        text: b.text,
        docs: b.docs,
        imports: tidy_slice(b.imports),
        expects: tidy_slice(b.expects),
        follows: tidy_slice(b.follows),
        tags: b.tags,
    })
}

/// Sort, then drop blank and duplicate entries.
pub fn tidy_slice(mut v: Vec<String>) -> Vec<String> {
    v.retain(|s| !s.is_empty());
    v.sort();
    v.dedup();
    v
}

// -- Helper functions ---------------------------------------------------------

/// Append the trimmed payload to every list, unless it is blank.
fn push_trimmed(payload: &str, lists: &mut [&mut Vec<String>]) {
    let text = payload.trim();
    if text.is_empty() {
        return;
    }
    for list in lists.iter_mut() {
        list.push(text.to_string());
    }
}

/// Split `name: value` on the first colon. A missing value is empty.
fn split_tag(payload: &str) -> (String, String) {
    match payload.trim().split_once(':') {
        Some((tag, value)) => (tag.trim().to_string(), value.trim().to_string()),
        None => (payload.trim().to_string(), String::new()),
    }
}
