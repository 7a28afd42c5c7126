// src/fileset.rs

//! Fileset entries
//!
//! A fileset entry describes one source directory mapped into a fileset
//! target. Entries are produced by the configuration evaluator; the
//! conversion layer treats them as opaque values and only forwards the
//! labels they reference into dependency extraction.

use std::fmt;

use crate::label::Label;

/// One entry of a fileset attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilesetEntry {
    /// Directory (or fileset) target the files come from
    src: Label,
    /// Explicit files under `src`, if restricted
    files: Vec<Label>,
    /// Destination directory inside the fileset output
    dest_dir: String,
    /// Glob patterns excluded from the entry
    excludes: Vec<String>,
}

impl FilesetEntry {
    pub fn new(src: Label, files: Vec<Label>, dest_dir: String, excludes: Vec<String>) -> Self {
        Self {
            src,
            files,
            dest_dir,
            excludes,
        }
    }

    /// The labels this entry contributes as dependency edges: the source
    /// target followed by any explicit files, in order.
    pub fn labels(&self) -> impl Iterator<Item = &Label> {
        std::iter::once(&self.src).chain(self.files.iter())
    }

    pub fn src(&self) -> &Label {
        &self.src
    }

    pub fn dest_dir(&self) -> &str {
        &self.dest_dir
    }

    pub fn excludes(&self) -> &[String] {
        &self.excludes
    }
}

impl fmt::Display for FilesetEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FilesetEntry(srcdir = {})", self.src)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_order() {
        let src = Label::parse_absolute("//data:dir").unwrap();
        let file = Label::parse_absolute("//data:dir/a.txt").unwrap();
        let entry = FilesetEntry::new(src.clone(), vec![file.clone()], String::new(), vec![]);

        let labels: Vec<_> = entry.labels().cloned().collect();
        assert_eq!(labels, vec![src, file]);
    }
}
