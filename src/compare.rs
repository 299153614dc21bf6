//! Field-by-field snippet comparison with readable difference reports.

use crate::model::Snippet;
use std::collections::BTreeMap;
use thiserror::Error;

/// Describes the first field found to differ between two snippets.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct Mismatch(String);

impl Snippet {
    /// Compare every field with `other`, reporting the first that differs.
    pub fn matches(&self, other: &Snippet) -> Result<(), Mismatch> {
        if self.name != other.name {
            return Err(Mismatch(format!(
                "the names differ: this: {:?}, other: {:?}",
                self.name, other.name
            )));
        }
        if self.path != other.path {
            return Err(Mismatch(format!(
                "the paths differ: this: {:?}, other: {:?}",
                self.path.display().to_string(),
                other.path.display().to_string()
            )));
        }
        cmp_slice("text", &self.text, &other.text)?;
        cmp_slice("docs", &self.docs, &other.docs)?;
        cmp_slice("expects", &self.expects, &other.expects)?;
        cmp_slice("imports", &self.imports, &other.imports)?;
        cmp_slice("follows", &self.follows, &other.follows)?;
        cmp_tags(&self.tags, &other.tags)
    }
}

/// Compare two tag maps: first the set of tag names, then each tag's values.
pub fn cmp_tags(
    a: &BTreeMap<String, Vec<String>>,
    b: &BTreeMap<String, Vec<String>>,
) -> Result<(), Mismatch> {
    let mut differing: Vec<String> = a
        .keys()
        .filter(|k| !b.contains_key(*k))
        .map(|k| format!("{:?} in this, not in other", k))
        .chain(
            b.keys()
                .filter(|k| !a.contains_key(*k))
                .map(|k| format!("{:?} in other, not in this", k)),
        )
        .collect();
    if !differing.is_empty() {
        differing.sort();
        return Err(Mismatch(format!(
            "the tag names differ:\n\t{}",
            differing.join("\n\t")
        )));
    }

    for (tag, vals) in a {
        cmp_slice(&format!("Tag:{}", tag), vals, &b[tag])?;
    }
    Ok(())
}

/// Compare two lists, reporting a length difference, the first differing
/// entry and how many further entries differ.
pub fn cmp_slice(name: &str, a: &[String], b: &[String]) -> Result<(), Mismatch> {
    let mut diffs = Vec::new();
    if a.len() != b.len() {
        diffs.push(format!("the lengths differ: {} != {}", a.len(), b.len()));
    }

    let mut diff_count = 0;
    for (i, (x, y)) in a.iter().zip(b).enumerate() {
        if x != y {
            if diff_count == 0 {
                diffs.push(format!("entry[{}] differs: {:?} != {:?}", i, x, y));
            }
            diff_count += 1;
        }
    }
    match diff_count {
        0 | 1 => {}
        2 => diffs.push("an additional difference was found".to_string()),
        n => diffs.push(format!("{} additional differences were found", n - 1)),
    }

    if diffs.is_empty() {
        return Ok(());
    }
    Err(Mismatch(format!("{} differs:\n\t{}", name, diffs.join("\n\t"))))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn tags(v: &[(&str, &[&str])]) -> BTreeMap<String, Vec<String>> {
        v.iter().map(|(k, vals)| (k.to_string(), strings(vals))).collect()
    }

    fn msg(r: Result<(), Mismatch>) -> String {
        r.unwrap_err().to_string()
    }

    #[test]
    fn slices_equal() {
        assert!(cmp_slice("empty", &[], &[]).is_ok());
        let v = strings(&["a", "b"]);
        assert!(cmp_slice("same", &v, &v).is_ok());
    }

    #[test]
    fn slices_length_differs() {
        let a = strings(&["Hello", "World"]);
        let b = strings(&["Hello", "World", "etc."]);
        assert_eq!(
            msg(cmp_slice("different length slices", &a, &b)),
            "different length slices differs:\n\tthe lengths differ: 2 != 3"
        );
        assert_eq!(
            msg(cmp_slice("different length slices", &b, &a)),
            "different length slices differs:\n\tthe lengths differ: 3 != 2"
        );
    }

    #[test]
    fn slices_one_difference() {
        let a = strings(&["Hello", "World"]);
        let b = strings(&["Hello", "le Monde"]);
        assert_eq!(
            msg(cmp_slice("one", &a, &b)),
            "one differs:\n\tentry[1] differs: \"World\" != \"le Monde\""
        );
    }

    #[test]
    fn slices_two_differences() {
        let a = strings(&["Hello", "World"]);
        let b = strings(&["Bonjour", "le Monde"]);
        assert_eq!(
            msg(cmp_slice("different content slices", &a, &b)),
            "different content slices differs:\n\
             \tentry[0] differs: \"Hello\" != \"Bonjour\"\n\
             \tan additional difference was found"
        );
    }

    #[test]
    fn slices_three_differences() {
        let a = strings(&["Hello", "World", "and other things"]);
        let b = strings(&["Bonjour", "le Monde", "etc"]);
        assert_eq!(
            msg(cmp_slice("different content slices", &a, &b)),
            "different content slices differs:\n\
             \tentry[0] differs: \"Hello\" != \"Bonjour\"\n\
             \t2 additional differences were found"
        );
    }

    #[test]
    fn tags_equal() {
        assert!(cmp_tags(&BTreeMap::new(), &BTreeMap::new()).is_ok());
        let t = tags(&[("A", &["Hello, World!"]), ("B", &["the", "quality"])]);
        assert!(cmp_tags(&t, &t.clone()).is_ok());
    }

    #[test]
    fn tags_names_differ() {
        let a = tags(&[("A", &["x"]), ("C", &["y"])]);
        let b = tags(&[("A", &["x"]), ("D", &["y"])]);
        assert_eq!(
            msg(cmp_tags(&a, &b)),
            "the tag names differ:\n\
             \t\"C\" in this, not in other\n\
             \t\"D\" in other, not in this"
        );
    }

    #[test]
    fn tags_values_differ() {
        let a = tags(&[("A", &["x"]), ("C", &["the", "quality", "of", "mercy"])]);
        let b = tags(&[("A", &["x"]), ("C", &["is", "not", "strained"])]);
        assert_eq!(
            msg(cmp_tags(&a, &b)),
            "Tag:C differs:\n\
             \tthe lengths differ: 4 != 3\n\
             \tentry[0] differs: \"the\" != \"is\"\n\
             \t2 additional differences were found"
        );
    }

    #[test]
    fn snippets_compare_by_field() {
        let path = std::path::Path::new("/x/a");
        let a = crate::parser::parse(b"one\n", path, "a").unwrap();
        let b = crate::parser::parse(b"two\n", path, "a").unwrap();
        assert!(a.matches(&a.clone()).is_ok());
        assert_eq!(
            a.matches(&b).unwrap_err().to_string(),
            "text differs:\n\tentry[0] differs: \"one\" != \"two\""
        );
        let c = crate::parser::parse(b"one\n", path, "c").unwrap();
        assert_eq!(
            a.matches(&c).unwrap_err().to_string(),
            "the names differ: this: \"a\", other: \"c\""
        );
    }
}
