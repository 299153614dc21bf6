//! Name-keyed store of parsed snippets loaded on demand from snippet
//! directories.

use crate::error::{Result, SnippetError};
use crate::model::Snippet;
use crate::parser;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Snippets by name. Each name is loaded at most once.
#[derive(Debug, Default)]
pub struct Cache {
    snippets: BTreeMap<String, Snippet>,
}

impl Cache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the named snippet unless it is already cached.
    ///
    /// An absolute name is read directly; a relative name is looked for in
    /// each of `dirs` in turn and the first match wins. Nothing is stored
    /// if the snippet cannot be read or parsed.
    pub fn add(&mut self, dirs: &[PathBuf], name: &str) -> Result<&Snippet> {
        if self.snippets.contains_key(name) {
            trace!(name, "snippet already cached");
            return self.get(name);
        }

        let (content, path) = read_snippet_file(dirs, name)?;
        let snippet = parser::parse(&content, &path, name)?;
        debug!(name, path = %path.display(), "snippet loaded");

        Ok(&*self.snippets.entry(name.to_string()).or_insert(snippet))
    }

    /// Fetch a cached snippet. Never loads anything.
    pub fn get(&self, name: &str) -> Result<&Snippet> {
        self.snippets
            .get(name)
            .ok_or_else(|| SnippetError::NotCached(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.snippets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }

    /// Report every expected snippet that is not itself in the cache.
    pub fn check(&self) -> Vec<SnippetError> {
        let mut errs = Vec::new();
        for s in self.snippets.values() {
            for expected in s.expects() {
                if !self.snippets.contains_key(expected) {
                    errs.push(SnippetError::MissingSnippet {
                        expected: expected.clone(),
                        expected_by: s.name().to_string(),
                    });
                }
            }
        }
        errs
    }
}

/// Read a snippet file, returning its content and the path it came from.
pub fn read_snippet_file(dirs: &[PathBuf], name: &str) -> Result<(Vec<u8>, PathBuf)> {
    let path = Path::new(name);
    if path.is_absolute() {
        let content = fs::read(path).map_err(|source| SnippetError::Io {
            name: name.to_string(),
            source,
        })?;
        return Ok((content, path.to_path_buf()));
    }

    if dirs.is_empty() {
        return Err(SnippetError::NoSearchDirs);
    }

    for dir in dirs {
        let candidate = dir.join(name);
        match fs::read(&candidate) {
            Ok(content) => return Ok((content, candidate)),
            Err(e) => trace!(path = %candidate.display(), error = %e, "not here"),
        }
    }

    let name = name.to_string();
    let dirs = dirs.to_vec();
    if dirs.len() == 1 {
        Err(SnippetError::NotInDir { name, dirs })
    } else {
        Err(SnippetError::NotInAnyDir { name, dirs })
    }
}
