// src/raw.rs

//! Untyped values from the configuration evaluator
//!
//! Every attribute value crosses into the typed rule model as a
//! [`RawValue`]. The shape mirrors what the configuration language can
//! produce: scalars, insertion-ordered sequences and mappings, and the
//! distinguished `select()` form for configuration-dependent values.
//! Mapping order is significant and preserved throughout conversion.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::attr::TriState;
use crate::fileset::FilesetEntry;
use crate::label::Label;

/// An untyped value produced by evaluating a rule attribute expression
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Null,
    Bool(bool),
    Int(i64),
    String(String),
    /// Labels are not first-class in the configuration language, but the
    /// evaluator hands back already-resolved labels for computed defaults
    Label(Label),
    TriState(TriState),
    FilesetEntry(FilesetEntry),
    List(RawList),
    /// Insertion-ordered mapping, kept as a pair sequence
    Dict(Vec<(RawValue, RawValue)>),
    /// The conditional form produced by a `select()` expression; only
    /// `selectable_convert` accepts it
    Select(Vec<(RawValue, RawValue)>),
}

/// An untyped sequence, optionally annotated with the glob criteria that
/// produced it
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawList {
    pub elements: Vec<RawValue>,
    pub provenance: Option<GlobProvenance>,
}

/// Opaque record of the filesystem globs a sequence was derived from
///
/// Carried through conversion unchanged; incremental rebuild invalidation
/// downstream keys off it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobProvenance {
    pub criteria: Vec<String>,
}

impl RawValue {
    /// Build a plain list value without provenance
    pub fn list(elements: Vec<RawValue>) -> Self {
        Self::List(RawList {
            elements,
            provenance: None,
        })
    }

    /// Build a list value carrying glob provenance
    pub fn glob_list(elements: Vec<RawValue>, provenance: GlobProvenance) -> Self {
        Self::List(RawList {
            elements,
            provenance: Some(provenance),
        })
    }

    /// Short name of this value's kind, used in conversion errors
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "none",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::String(_) => "string",
            Self::Label(_) => "label",
            Self::TriState(_) => "tristate",
            Self::FilesetEntry(_) => "fileset entry",
            Self::List(_) => "list",
            Self::Dict(_) => "dict",
            Self::Select(_) => "select",
        }
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "None"),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(n) => write!(f, "{}", n),
            // Top-level strings render bare; error messages supply quotes
            Self::String(s) => write!(f, "{}", s),
            Self::Label(l) => write!(f, "{}", l),
            Self::TriState(t) => write!(f, "{}", t),
            Self::FilesetEntry(entry) => write!(f, "{}", entry),
            Self::List(list) => {
                write!(f, "[")?;
                for (i, elem) in list.elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write_nested(f, elem)?;
                }
                write!(f, "]")
            }
            Self::Dict(entries) => write_mapping(f, entries, "", ""),
            Self::Select(entries) => write_mapping(f, entries, "select(", ")"),
        }
    }
}

// Strings are quoted when nested inside a container
fn write_nested(f: &mut fmt::Formatter<'_>, value: &RawValue) -> fmt::Result {
    match value {
        RawValue::String(s) => write!(f, "\"{}\"", s),
        other => write!(f, "{}", other),
    }
}

fn write_mapping(
    f: &mut fmt::Formatter<'_>,
    entries: &[(RawValue, RawValue)],
    open: &str,
    close: &str,
) -> fmt::Result {
    write!(f, "{}{{", open)?;
    for (i, (key, value)) in entries.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write_nested(f, key)?;
        write!(f, ": ")?;
        write_nested(f, value)?;
    }
    write!(f, "}}{}", close)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(RawValue::Null.kind(), "none");
        assert_eq!(RawValue::from(3).kind(), "int");
        assert_eq!(RawValue::from("x").kind(), "string");
        assert_eq!(RawValue::list(vec![]).kind(), "list");
        assert_eq!(RawValue::Dict(vec![]).kind(), "dict");
        assert_eq!(RawValue::Select(vec![]).kind(), "select");
    }

    #[test]
    fn test_display_scalars() {
        assert_eq!(RawValue::from(true).to_string(), "true");
        assert_eq!(RawValue::from(42).to_string(), "42");
        assert_eq!(RawValue::from("hello").to_string(), "hello");
    }

    #[test]
    fn test_display_containers() {
        let list = RawValue::list(vec![RawValue::from("a"), RawValue::from(1)]);
        assert_eq!(list.to_string(), "[\"a\", 1]");

        let dict = RawValue::Dict(vec![(RawValue::from("k"), RawValue::from("v"))]);
        assert_eq!(dict.to_string(), "{\"k\": \"v\"}");

        let select = RawValue::Select(vec![(RawValue::from("//c:a"), RawValue::from(1))]);
        assert_eq!(select.to_string(), "select({\"//c:a\": 1})");
    }
}
