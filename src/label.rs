// src/label.rs

//! Labels naming build targets and source files
//!
//! A label identifies a target in the build graph using the format:
//! `//package/path:name`
//!
//! Examples:
//! - `//base/strings:strings` - the `strings` target in `base/strings`
//! - `//tools/compiler` - shorthand for `//tools/compiler:compiler`
//! - `//:root` - the `root` target in the repository root package
//!
//! # Relative labels
//!
//! Inside a package, targets may be referenced by name alone (`util` or
//! `:util`). Such strings are resolved against a base label - usually the
//! label of the declaring rule - which supplies the package.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A label identifying a build target
///
/// Format: `//package:name`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Label {
    /// Package path, `/`-separated, without the leading `//`
    package: String,
    /// Target name within the package
    name: String,
}

impl Label {
    /// Parse an absolute label of the form `//package:name`
    ///
    /// `//package` is accepted as shorthand for `//package:last-segment`.
    pub fn parse_absolute(s: &str) -> Result<Self, LabelError> {
        let rest = s
            .strip_prefix("//")
            .ok_or_else(|| LabelError::MissingSlashes(s.to_string()))?;

        let (package, name) = match rest.find(':') {
            Some(pos) => (&rest[..pos], &rest[pos + 1..]),
            // Shorthand: target name defaults to the last package segment
            None => match rest.rsplit('/').next() {
                Some(last) if !last.is_empty() => (rest, last),
                _ => (rest, rest),
            },
        };

        validate_package(package, s)?;
        if name.is_empty() {
            return Err(LabelError::EmptyName(s.to_string()));
        }
        validate_name(name, s)?;

        Ok(Self {
            package: package.to_string(),
            name: name.to_string(),
        })
    }

    /// Resolve a label string relative to this label's package
    ///
    /// Absolute strings (`//pkg:name`) are parsed as-is. Anything else is
    /// treated as a target name in this label's package; a leading `:` is
    /// permitted and ignored.
    pub fn resolve_relative(&self, s: &str) -> Result<Self, LabelError> {
        if s.starts_with("//") {
            return Self::parse_absolute(s);
        }

        let name = s.strip_prefix(':').unwrap_or(s);
        if name.is_empty() {
            return Err(LabelError::EmptyName(s.to_string()));
        }
        validate_name(name, s)?;

        Ok(Self {
            package: self.package.clone(),
            name: name.to_string(),
        })
    }

    /// Package path of this label, without the leading `//`
    pub fn package(&self) -> &str {
        &self.package
    }

    /// Target name of this label
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check if this label is in the same package as another
    pub fn same_package(&self, other: &Label) -> bool {
        self.package == other.package
    }
}

fn validate_package(package: &str, whole: &str) -> Result<(), LabelError> {
    // The root package is the empty string
    if package.is_empty() {
        return Ok(());
    }

    let valid_chars = |c: char| c.is_alphanumeric() || matches!(c, '.' | '-' | '_');

    for segment in package.split('/') {
        if segment.is_empty() || !segment.chars().all(valid_chars) {
            return Err(LabelError::InvalidPackage(whole.to_string()));
        }
    }
    Ok(())
}

fn validate_name(name: &str, whole: &str) -> Result<(), LabelError> {
    let valid_chars = |c: char| c.is_alphanumeric() || matches!(c, '.' | '-' | '_' | '+' | '/');

    if name.starts_with('/') || name.ends_with('/') || !name.chars().all(valid_chars) {
        return Err(LabelError::InvalidName(whole.to_string()));
    }
    Ok(())
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "//{}:{}", self.package, self.name)
    }
}

impl FromStr for Label {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Label::parse_absolute(s)
    }
}

/// Errors that can occur when parsing or resolving a label
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelError {
    /// Absolute label does not start with `//`
    MissingSlashes(String),
    /// Empty target name
    EmptyName(String),
    /// Invalid characters or empty segment in the package path
    InvalidPackage(String),
    /// Invalid characters in the target name
    InvalidName(String),
}

impl fmt::Display for LabelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelError::MissingSlashes(s) => {
                write!(f, "label '{}' must start with '//'", s)
            }
            LabelError::EmptyName(s) => write!(f, "empty target name in label '{}'", s),
            LabelError::InvalidPackage(s) => write!(f, "invalid package in label '{}'", s),
            LabelError::InvalidName(s) => write!(f, "invalid target name in label '{}'", s),
        }
    }
}

impl std::error::Error for LabelError {}
