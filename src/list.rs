//! Directory lister — walks snippet directories and renders what it finds.
//!
//! Roots are searched in order and the first root holding a given name
//! wins; the same name in a later root is reported as eclipsed. Problems
//! found along the way are recorded in a [`Diagnostics`] sink and the walk
//! carries on.
//!
//! | Entry | Behavior |
//! |-------|----------|
//! | Regular file / symlink | Parse and render as a snippet |
//! | Directory | Descend, names become `sub/dir/file` |
//! | Anything else | "Unexpected file type" |

use crate::error::{Category, Diagnostics, Result, SnippetError};
use crate::model::{Part, Snippet};
use crate::parser;
use crate::render::FormatConfig;
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs::{self, DirEntry, FileType};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Whether the walk still has to test names against the constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConstraintCheck {
    Check,
    Skip,
}

/// Configuration for a listing run.
#[derive(Debug, Clone, Default)]
pub struct ListConfig {
    /// Snippet directories, searched in order
    dirs: Vec<PathBuf>,
    /// If non-empty, only matching snippets are shown
    constraints: BTreeSet<String>,
    format: FormatConfig,
}

impl ListConfig {
    pub fn new<I, P>(dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        ListConfig {
            dirs: dirs.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Restrict the listing to these snippet names, sub-directories or
    /// absolute paths.
    pub fn with_constraints<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.constraints.extend(names.into_iter().map(Into::into));
        self
    }

    /// Select the parts to show. Unknown part names are rejected here,
    /// before anything is scanned.
    pub fn with_parts<I, S>(mut self, names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.format = self.format.with_parts(names)?;
        Ok(self)
    }

    pub fn with_part(mut self, part: Part) -> Self {
        self.format = self.format.with_part(part);
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.format = self.format.with_tags(tags);
        self
    }

    pub fn hide_intro(mut self, hide: bool) -> Self {
        self.format = self.format.hide_intro(hide);
        self
    }

    pub fn with_format(mut self, format: FormatConfig) -> Self {
        self.format = format;
        self
    }

    /// Walk every snippet directory, writing each snippet to `out` as it is
    /// found. Only a failure to write `out` stops the walk.
    pub fn list<W: Write>(&self, out: &mut W, diags: &mut Diagnostics) -> io::Result<()> {
        let mut lister = Lister::new(self, out, diags);

        for c in &self.constraints {
            let path = Path::new(c);
            if path.is_absolute() {
                lister.list_specific(path)?;
            }
        }

        for dir in &self.dirs {
            lister.list_root(dir, ConstraintCheck::Check)?;
        }

        lister.check_expected_snippets_exist();
        Ok(())
    }

    /// True if a file with this snippet name should be shown.
    fn file_selected(&self, name: &str) -> bool {
        self.constraints.is_empty() || self.constraints.contains(name)
    }

    /// True if this sub-directory is a constraint or leads to one.
    fn dir_selected(&self, sub_dir: &str) -> bool {
        if self.constraints.is_empty() || self.constraints.contains(sub_dir) {
            return true;
        }
        let prefix = format!("{}/", sub_dir);
        self.constraints.iter().any(|c| c.starts_with(&prefix))
    }
}

/// List every snippet in `dirs` with the default view.
pub fn list<W, I, P>(out: &mut W, dirs: I, diags: &mut Diagnostics) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    ListConfig::new(dirs).list(out, diags)
}

// -- Walk state ---------------------------------------------------------------

struct Lister<'a, W> {
    cfg: &'a ListConfig,
    out: &'a mut W,
    diags: &'a mut Diagnostics,

    /// Snippet name → root it was first found in
    location: HashMap<String, PathBuf>,
    /// Content digest → first file with that content
    content_hash: HashMap<Vec<u8>, PathBuf>,
    /// Expected snippet name → snippets expecting it
    expected_by: BTreeMap<String, Vec<String>>,
    /// "in: <root>" line, printed before the root's first snippet only
    intro: Option<String>,
}

impl<'a, W: Write> Lister<'a, W> {
    fn new(cfg: &'a ListConfig, out: &'a mut W, diags: &'a mut Diagnostics) -> Self {
        Lister {
            cfg,
            out,
            diags,
            location: HashMap::new(),
            content_hash: HashMap::new(),
            expected_by: BTreeMap::new(),
            intro: None,
        }
    }

    /// Show an absolute path given as a constraint: a file is shown as is,
    /// a directory is walked with no further constraint checks.
    fn list_specific(&mut self, path: &Path) -> io::Result<()> {
        let name = path.to_string_lossy().into_owned();
        match fs::metadata(path) {
            Err(source) => {
                self.diags.add(
                    Category::BadSpecificSnippet,
                    SnippetError::Io { name, source },
                );
                Ok(())
            }
            Ok(meta) if meta.is_dir() => self.list_root(path, ConstraintCheck::Skip),
            Ok(_) => {
                self.intro = None;
                self.show_snippet(None, path, &name)
            }
        }
    }

    fn list_root(&mut self, root: &Path, ck: ConstraintCheck) -> io::Result<()> {
        let entries = match read_dir_sorted(root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(root = %root.display(), "no such snippet directory");
                return Ok(());
            }
            Err(source) => {
                self.diags.add(
                    Category::BadSnippetsDirectory,
                    SnippetError::BadDirectory {
                        dir: root.to_path_buf(),
                        source,
                    },
                );
                return Ok(());
            }
        };
        debug!(root = %root.display(), entries = entries.len(), "listing snippet directory");

        self.intro = if self.cfg.format.intro_hidden() {
            None
        } else {
            Some(format!("in: {}\n", root.display()))
        };

        for entry in &entries {
            self.visit(root, None, entry, ck)?;
        }
        Ok(())
    }

    fn descend(&mut self, root: &Path, sub_dir: &str, ck: ConstraintCheck) -> io::Result<()> {
        let entries = match read_dir_sorted(&root.join(sub_dir)) {
            Ok(entries) => entries,
            Err(source) => {
                self.diags.add(
                    Category::BadSubDirectory,
                    SnippetError::BadSubDirectory {
                        sub_dir: sub_dir.to_string(),
                        source,
                    },
                );
                return Ok(());
            }
        };

        for entry in &entries {
            self.visit(root, Some(sub_dir), entry, ck)?;
        }
        Ok(())
    }

    fn visit(
        &mut self,
        root: &Path,
        sub_dir: Option<&str>,
        entry: &DirEntry,
        ck: ConstraintCheck,
    ) -> io::Result<()> {
        let file_name = entry.file_name().to_string_lossy().into_owned();
        let name = match sub_dir {
            Some(sub) => Path::new(sub).join(&file_name).to_string_lossy().into_owned(),
            None => file_name,
        };
        let path = root.join(&name);

        let file_type = match entry.file_type() {
            Ok(ft) => ft,
            Err(source) => {
                self.diags
                    .add(Category::BadSnippet, SnippetError::Io { name, source });
                return Ok(());
            }
        };

        if file_type.is_file() || file_type.is_symlink() {
            if ck == ConstraintCheck::Check && !self.cfg.file_selected(&name) {
                trace!(name = %name, "not selected");
                return Ok(());
            }
            self.show_snippet(Some(root), &path, &name)
        } else if file_type.is_dir() {
            let mut ck = ck;
            if ck == ConstraintCheck::Check {
                if !self.cfg.dir_selected(&name) {
                    trace!(name = %name, "sub-directory not selected");
                    return Ok(());
                }
                if self.cfg.constraints.contains(&name) {
                    ck = ConstraintCheck::Skip;
                }
            }
            self.descend(root, &name, ck)
        } else {
            self.diags.add(
                Category::UnexpectedFileType,
                SnippetError::UnexpectedFileType {
                    path,
                    file_type: describe(file_type).to_string(),
                },
            );
            Ok(())
        }
    }

    /// Read, parse and render one snippet. `root` is `None` for a file
    /// named directly, which is exempt from the eclipse and duplicate checks.
    ///
    /// An unreadable file claims no name, so the same name in a later root
    /// is still shown.
    fn show_snippet(&mut self, root: Option<&Path>, path: &Path, name: &str) -> io::Result<()> {
        let content = match fs::read(path) {
            Ok(content) => content,
            Err(source) => {
                let name = name.to_string();
                self.diags
                    .add(Category::BadSnippet, SnippetError::Io { name, source });
                return Ok(());
            }
        };

        if let Some(root) = root {
            if self.is_eclipsed(name, root) {
                return Ok(());
            }
            self.record_content_hash(&content, path);
        }

        let snippet = match parser::parse(&content, path, name) {
            Ok(s) => s,
            Err(e) => {
                self.diags.add(Category::BadSnippet, e);
                return Ok(());
            }
        };

        self.record_expected_by(&snippet);

        let text = self.cfg.format.render(&snippet);
        self.print_intro_once()?;
        self.out.write_all(text.as_bytes())
    }

    /// Record where `name` was found, or report it as hidden behind the
    /// same name in an earlier root.
    fn is_eclipsed(&mut self, name: &str, root: &Path) -> bool {
        match self.location.get(name) {
            Some(other) if other.as_path() != root => {
                self.diags.add(
                    Category::EclipsedSnippet,
                    SnippetError::Eclipsed {
                        name: name.to_string(),
                        dir: root.to_path_buf(),
                        by: other.clone(),
                    },
                );
                true
            }
            _ => {
                self.location.insert(name.to_string(), root.to_path_buf());
                false
            }
        }
    }

    /// Duplicates are reported but still shown.
    fn record_content_hash(&mut self, content: &[u8], path: &Path) {
        let hash = Sha256::digest(content).to_vec();
        match self.content_hash.get(&hash) {
            Some(original) if original.as_path() != path => {
                self.diags.add(
                    Category::DuplicateSnippet,
                    SnippetError::Duplicate {
                        path: path.to_path_buf(),
                        original: original.clone(),
                    },
                );
            }
            Some(_) => {}
            None => {
                self.content_hash.insert(hash, path.to_path_buf());
            }
        }
    }

    fn record_expected_by(&mut self, s: &Snippet) {
        for expected in s.expects() {
            self.expected_by
                .entry(expected.clone())
                .or_default()
                .push(s.name().to_string());
        }
    }

    fn print_intro_once(&mut self) -> io::Result<()> {
        match self.intro.take() {
            Some(intro) => self.out.write_all(intro.as_bytes()),
            None => Ok(()),
        }
    }

    /// Report expected snippets that were never found. A constrained
    /// listing only sees part of the tree so nothing is checked.
    fn check_expected_snippets_exist(&mut self) {
        if !self.cfg.constraints.is_empty() {
            return;
        }
        for (name, expected_by) in &self.expected_by {
            if !self.location.contains_key(name) {
                self.diags.add(
                    Category::MissingExpectedSnippet,
                    SnippetError::MissingExpected {
                        name: name.clone(),
                        expected_by: expected_by.clone(),
                    },
                );
            }
        }
    }
}

// -- Helper functions ---------------------------------------------------------

/// Directory entries sorted by file name.
fn read_dir_sorted(dir: &Path) -> io::Result<Vec<DirEntry>> {
    let mut entries = fs::read_dir(dir)?.collect::<io::Result<Vec<_>>>()?;
    entries.sort_by_key(DirEntry::file_name);
    Ok(entries)
}

#[cfg_attr(not(unix), allow(unused_variables))]
fn describe(ft: FileType) -> &'static str {
    #[cfg(unix)]
    {
        use std::os::unix::fs::FileTypeExt;
        if ft.is_socket() {
            return "socket";
        }
        if ft.is_fifo() {
            return "named pipe";
        }
        if ft.is_block_device() {
            return "block device";
        }
        if ft.is_char_device() {
            return "character device";
        }
    }
    "unknown"
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn constrained(constraints: &[&str]) -> ListConfig {
        ListConfig::new(Vec::<PathBuf>::new()).with_constraints(constraints.iter().copied())
    }

    #[test]
    fn file_match_without_constraints() {
        assert!(constrained(&[]).file_selected("file"));
    }

    #[test]
    fn file_match_with_constraints() {
        let cfg = constrained(&["dir/file"]);
        assert!(cfg.file_selected("dir/file"));
        assert!(!cfg.file_selected("dir/file2"));

        let cfg = constrained(&["not/matching", "dir/file"]);
        assert!(cfg.file_selected("dir/file"));

        let cfg = constrained(&["not/matching", "not/matching/either"]);
        assert!(!cfg.file_selected("dir/file2"));
    }

    #[test]
    fn dir_match() {
        assert!(constrained(&[]).dir_selected("dir"));
        assert!(constrained(&["dir"]).dir_selected("dir"));
        assert!(constrained(&["dir/subDir"]).dir_selected("dir/subDir"));
        assert!(constrained(&["dir/subDir/file"]).dir_selected("dir"));
        assert!(constrained(&["dir/subDir/file"]).dir_selected("dir/subDir"));
        assert!(!constrained(&["dir/subDir/file"]).dir_selected("di"));
        assert!(!constrained(&["other"]).dir_selected("dir"));
    }

    #[test]
    fn whole_subtree_match_stops_checking() {
        let root = TempDir::new().unwrap();
        let deep = root.path().join("sub").join("deeper");
        fs::create_dir_all(&deep).unwrap();
        fs::write(deep.join("a"), "a\n").unwrap();
        fs::write(root.path().join("sub").join("b"), "b\n").unwrap();
        fs::write(root.path().join("c"), "c\n").unwrap();

        let mut out = Vec::new();
        let mut diags = Diagnostics::new();
        ListConfig::new([root.path()])
            .with_constraints(["sub"])
            .list(&mut out, &mut diags)
            .unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("    sub/deeper/a\n"), "Got: {out}");
        assert!(out.contains("    sub/b\n"), "Got: {out}");
        assert!(!out.contains("    c\n"), "Got: {out}");
        assert!(diags.is_empty());
    }

    #[test]
    fn bad_part_rejected_before_scanning() {
        let err = ListConfig::new(["/nonexistent"])
            .with_parts(["blah blah blah"])
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            r#""blah blah blah" is not a valid pre-defined part of a snippet"#
        );
    }

    #[test]
    fn entries_visited_in_name_order() {
        let root = TempDir::new().unwrap();
        for name in ["zeta", "alpha", "mid"] {
            fs::write(root.path().join(name), format!("{name}\n")).unwrap();
        }
        let mut out = Vec::new();
        let mut diags = Diagnostics::new();
        ListConfig::new([root.path()])
            .with_part(Part::Name)
            .hide_intro(true)
            .list(&mut out, &mut diags)
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "\nalpha\n\nmid\n\nzeta\n");
    }
}
