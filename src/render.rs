//! Plain-text rendering of a snippet, restricted to selected parts and tags.

use crate::error::Result;
use crate::model::{Part, Snippet};
use std::borrow::Cow;
use std::collections::BTreeSet;

/// Indent of the snippet name line.
const NAME_INDENT: usize = 4;
/// Indent of every other part.
const DEFAULT_INDENT: usize = 8;

/// Controls which parts of a snippet are shown and how.
///
/// With no parts and no tags selected, the default view is shown: the
/// name, notes, imports, follows, expects and every tag.
#[derive(Debug, Clone, Default)]
pub struct FormatConfig {
    parts: BTreeSet<Part>,
    tags: BTreeSet<String>,
    hide_intro: bool,
}

/// One labelled block of output lines.
struct Section<'a> {
    intro: String,
    indent: usize,
    values: Vec<Cow<'a, str>>,
}

impl<'a> Section<'a> {
    fn new(intro: impl Into<String>, values: impl IntoIterator<Item = &'a String>) -> Self {
        Section {
            intro: intro.into(),
            indent: DEFAULT_INDENT,
            values: values.into_iter().map(|v| Cow::Borrowed(v.as_str())).collect(),
        }
    }
}

impl FormatConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select parts by name, rejecting any name that is not a valid part.
    pub fn with_parts<I, S>(mut self, names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            self.parts.insert(name.as_ref().parse()?);
        }
        Ok(self)
    }

    pub fn with_part(mut self, part: Part) -> Self {
        self.parts.insert(part);
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Suppress the part labels and indentation.
    pub fn hide_intro(mut self, hide: bool) -> Self {
        self.hide_intro = hide;
        self
    }

    pub fn intro_hidden(&self) -> bool {
        self.hide_intro
    }

    fn is_default_view(&self) -> bool {
        self.parts.is_empty() && self.tags.is_empty()
    }

    fn shows(&self, part: Part) -> bool {
        self.parts.contains(&part)
    }

    fn sections<'a>(&self, s: &'a Snippet) -> Vec<Section<'a>> {
        let dflt = self.is_default_view();
        let mut sections = Vec::new();

        if dflt || self.shows(Part::Name) {
            let mut name = Section::new("", [&s.name]);
            name.indent = NAME_INDENT;
            sections.push(name);
        }
        if self.shows(Part::Path) {
            sections.push(Section {
                intro: "Pathname:".to_string(),
                indent: DEFAULT_INDENT,
                values: vec![s.path.to_string_lossy()],
            });
        }
        if dflt || self.shows(Part::Note) {
            sections.push(Section::new("Note:", &s.docs));
        }
        if dflt || self.shows(Part::Imports) {
            sections.push(Section::new("Imports:", &s.imports));
        }
        if dflt || self.shows(Part::Follows) {
            sections.push(Section::new("Follows:", &s.follows));
        }
        if dflt || self.shows(Part::Expects) {
            // follows already implies expects
            let expects = s.expects.iter().filter(|e| !s.follows.contains(*e));
            sections.push(Section::new("Expects:", expects));
        }
        if self.shows(Part::Tag) {
            sections.push(Section::new("Tags:", s.tags.keys()));
        }
        for (tag, values) in &s.tags {
            if dflt || self.tags.contains(tag) {
                sections.push(Section::new(format!("{}:", tag), values));
            }
        }
        if self.shows(Part::Text) {
            sections.push(Section::new("", &s.text));
        }

        sections
    }

    /// Render the snippet. The result always starts with a blank line.
    pub fn render(&self, s: &Snippet) -> String {
        let sections = self.sections(s);
        let mut out = String::from("\n");

        if self.hide_intro {
            for line in sections.iter().flat_map(|p| &p.values) {
                out.push_str(line);
                out.push('\n');
            }
            return out;
        }

        let width = sections.iter().map(|p| p.intro.len()).max().unwrap_or(0);
        for section in &sections {
            let mut intro = " ".repeat(section.indent);
            if !section.intro.is_empty() {
                intro.push_str(&format!("{:>width$} ", section.intro, width = width));
            }
            let blanks = " ".repeat(intro.len());

            for (i, line) in section.values.iter().enumerate() {
                out.push_str(if i == 0 { &intro } else { &blanks });
                out.push_str(line);
                out.push('\n');
            }
        }

        out
    }
}
