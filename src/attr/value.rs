// src/attr/value.rs

//! Typed attribute values
//!
//! [`AttrValue`] is the output of a successful conversion; its runtime
//! shape always matches the [`AttrType`](super::AttrType) that produced
//! it. The accessors are trusted reinterpretation: they do not
//! re-validate, they just hand back the shape a caller already knows it
//! holds.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::fileset::FilesetEntry;
use crate::label::Label;
use crate::license::{Distribution, License};
use crate::raw::{GlobProvenance, RawValue};

/// Three-valued attribute state for cases where user intent matters
///
/// Prefer booleans with defaults where possible; the main use of a
/// tristate is an attribute whose unset state must stay observable so it
/// can interact with a configuration flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TriState {
    #[default]
    Auto,
    No,
    Yes,
}

impl fmt::Display for TriState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriState::Auto => write!(f, "auto"),
            TriState::No => write!(f, "no"),
            TriState::Yes => write!(f, "yes"),
        }
    }
}

/// A typed attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Int(i64),
    Bool(bool),
    TriState(TriState),
    /// Canonicalized through the global interning table
    String(Arc<str>),
    Label(Label),
    License(License),
    Distributions(IndexSet<Distribution>),
    FilesetEntry(FilesetEntry),
    List(ListValue),
    Pair(Box<AttrValue>, Box<AttrValue>),
    /// Untyped passthrough for attributes whose element type is not
    /// statically known to this layer
    Object(RawValue),
}

/// An ordered sequence of typed values, with optional glob provenance
/// threaded through from the raw input
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListValue {
    pub elements: Vec<AttrValue>,
    pub provenance: Option<GlobProvenance>,
}

impl ListValue {
    pub fn new(elements: Vec<AttrValue>) -> Self {
        Self {
            elements,
            provenance: None,
        }
    }
}

impl AttrValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_tristate(&self) -> Option<TriState> {
        match self {
            Self::TriState(t) => Some(*t),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_label(&self) -> Option<&Label> {
        match self {
            Self::Label(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_license(&self) -> Option<&License> {
        match self {
            Self::License(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_distributions(&self) -> Option<&IndexSet<Distribution>> {
        match self {
            Self::Distributions(set) => Some(set),
            _ => None,
        }
    }

    pub fn as_fileset_entry(&self) -> Option<&FilesetEntry> {
        match self {
            Self::FilesetEntry(entry) => Some(entry),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ListValue> {
        match self {
            Self::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_pair(&self) -> Option<(&AttrValue, &AttrValue)> {
        match self {
            Self::Pair(first, second) => Some((first, second)),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&RawValue> {
        match self {
            Self::Object(raw) => Some(raw),
            _ => None,
        }
    }

    /// True only for the untyped passthrough of an absent value; list
    /// conversion drops such elements (see the legacy tolerance there)
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Object(RawValue::Null))
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{}", n),
            Self::Bool(b) => write!(f, "{}", b),
            Self::TriState(t) => write!(f, "{}", t),
            Self::String(s) => write!(f, "{}", s),
            Self::Label(l) => write!(f, "{}", l),
            Self::License(l) => write!(f, "{}", l),
            Self::Distributions(set) => {
                let names: Vec<String> = set.iter().map(|d| d.to_string()).collect();
                write!(f, "{}", names.join(","))
            }
            Self::FilesetEntry(entry) => write!(f, "{}", entry),
            Self::List(list) => {
                write!(f, "[")?;
                for (i, elem) in list.elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", elem)?;
                }
                write!(f, "]")
            }
            Self::Pair(first, second) => write!(f, "({}, {})", first, second),
            Self::Object(raw) => write!(f, "{}", raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tristate_default() {
        assert_eq!(TriState::default(), TriState::Auto);
    }

    #[test]
    fn test_accessors_match_shape() {
        assert_eq!(AttrValue::Int(7).as_int(), Some(7));
        assert_eq!(AttrValue::Int(7).as_bool(), None);
        assert_eq!(AttrValue::Bool(true).as_bool(), Some(true));

        let label = Label::parse_absolute("//a:b").unwrap();
        assert_eq!(AttrValue::Label(label.clone()).as_label(), Some(&label));
    }

    #[test]
    fn test_is_null() {
        assert!(AttrValue::Object(RawValue::Null).is_null());
        assert!(!AttrValue::Object(RawValue::Int(0)).is_null());
        assert!(!AttrValue::Int(0).is_null());
    }

    #[test]
    fn test_display_list() {
        let list = AttrValue::List(ListValue::new(vec![
            AttrValue::Int(1),
            AttrValue::Int(2),
        ]));
        assert_eq!(list.to_string(), "[1, 2]");
    }
}
