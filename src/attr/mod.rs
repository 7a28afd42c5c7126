// src/attr/mod.rs

//! Attribute types and conversion
//!
//! Every rule attribute has an [`AttrType`], and the type is primarily
//! used for its [`convert`](AttrType::convert) method: a checked cast from
//! the untyped [`RawValue`] the configuration evaluator produced to a
//! typed [`AttrValue`] the rule model can rely on.
//!
//! The variant set is closed. Each behavior - conversion, default value,
//! label extraction, tag conversion, rendering - is an exhaustive match
//! over the enum, so adding a variant forces every table to be extended
//! explicitly. Label extraction in particular must never fall through to
//! a shared default: which variants contribute dependency edges is exactly
//! the contract the build graph is built on.

mod selector;
mod value;

pub use selector::{Selectable, Selector, DEFAULT_CONDITION_KEY};
pub use value::{AttrValue, ListValue, TriState};

use std::fmt;

use indexmap::IndexSet;
use thiserror::Error;
use tracing::warn;

use crate::intern::intern;
use crate::label::Label;
use crate::license::{self, License};
use crate::raw::{RawList, RawValue};

/// A conversion failure, carrying enough to attribute the problem to the
/// offending attribute value in a user-facing message
///
/// Failures are synchronous return values; this layer never retries and
/// never silently substitutes a default. The caller (package loading)
/// attributes the failure to a source location.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    /// The raw value's kind does not match the expected type
    #[error("expected value of type '{expected}' for {what}, but got '{rendered}' ({kind})")]
    TypeMismatch {
        expected: String,
        what: String,
        rendered: String,
        kind: &'static str,
    },

    /// Variant-specific failure: bad boolean/tristate integer, pair arity,
    /// non-string dictionary key, wrapped label-syntax or license-parse
    /// failure, output outside its package, missing default condition
    #[error("{0}")]
    Invalid(String),

    /// Contract violation: relative label resolution was required but the
    /// caller supplied no base label
    #[error("no base label to resolve '{text}' against, converting {what}")]
    MissingContext { text: String, what: String },

    /// The variant does not participate in tag conversion
    #[error("attribute {attr} does not support tag conversion")]
    TagsUnsupported { attr: String },

    /// Tag conversion was asked for an absent value
    #[error("illegal tag conversion from null value on attribute {attr}")]
    TagsFromNull { attr: String },
}

/// The closed set of attribute types
///
/// Scalar variants are unit arms; composite variants are parameterized by
/// their element types. Equality is structural, so two independently
/// constructed `list(string)` types are the same type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttrType {
    /// Integer, no implicit coercion
    Int,
    /// Boolean, also accepting integer 0 or 1
    Bool,
    /// Tristate, also accepting booleans and integers -1, 0, 1
    TriState,
    /// String, canonicalized through the interning table
    String,
    /// A label forming a dependency edge
    Label,
    /// A label that deliberately does not form a dependency edge; used by
    /// rules that inspect a target without depending on it, where a real
    /// edge would close an illegal cycle
    NodepLabel,
    /// An output file label, constrained to the declaring rule's package
    Output,
    /// A license declaration
    License,
    /// A set of distribution declarations
    Distributions,
    /// An opaque fileset entry
    FilesetEntry,
    /// Untyped passthrough
    Object,
    /// A list whose elements stay untyped
    ObjectList,
    /// A homogeneous list
    List(Box<AttrType>),
    /// An exactly-two-element sequence
    Pair(Box<AttrType>, Box<AttrType>),
    /// An ordered string-keyed dictionary, converted to a list of
    /// (key, value) pairs - never a native map, so entry order and
    /// duplicate keys survive conversion
    Dict(Box<AttrType>),
}

impl AttrType {
    pub fn list(elem: AttrType) -> Self {
        Self::List(Box::new(elem))
    }

    pub fn pair(first: AttrType, second: AttrType) -> Self {
        Self::Pair(Box::new(first), Box::new(second))
    }

    /// General ordered string-keyed dictionary over `value` values
    pub fn dict(value: AttrType) -> Self {
        Self::Dict(Box::new(value))
    }

    pub fn string_list() -> Self {
        Self::list(Self::String)
    }

    pub fn int_list() -> Self {
        Self::list(Self::Int)
    }

    pub fn label_list() -> Self {
        Self::list(Self::Label)
    }

    pub fn nodep_label_list() -> Self {
        Self::list(Self::NodepLabel)
    }

    pub fn output_list() -> Self {
        Self::list(Self::Output)
    }

    pub fn fileset_entry_list() -> Self {
        Self::list(Self::FilesetEntry)
    }

    pub fn string_dict() -> Self {
        Self::dict(Self::String)
    }

    pub fn string_list_dict() -> Self {
        Self::dict(Self::string_list())
    }

    pub fn label_list_dict() -> Self {
        Self::dict(Self::label_list())
    }

    /// Convert an untyped value to this type
    ///
    /// `what` describes the syntactic construct being converted (e.g.
    /// "attribute 'srcs' of rule //base:util") and is woven into any
    /// failure. `base` is the declaring rule's label; it must be present
    /// whenever relative label resolution can occur.
    ///
    /// A `select()` expression is not directly convertible; see
    /// [`selectable_convert`](Self::selectable_convert).
    pub fn convert(
        &self,
        x: &RawValue,
        what: &str,
        base: Option<&Label>,
    ) -> Result<AttrValue, ConversionError> {
        match self {
            Self::Int => match x {
                RawValue::Int(n) => Ok(AttrValue::Int(*n)),
                _ => Err(self.mismatch(x, what)),
            },

            Self::Bool => match x {
                RawValue::Bool(b) => Ok(AttrValue::Bool(*b)),
                RawValue::Int(0) => Ok(AttrValue::Bool(false)),
                RawValue::Int(1) => Ok(AttrValue::Bool(true)),
                RawValue::Int(_) => Err(ConversionError::Invalid(
                    "boolean is not one of [0, 1]".to_string(),
                )),
                // Anything else is rejected by the integer rule
                _ => Err(Self::Int.mismatch(x, what)),
            },

            Self::TriState => match x {
                RawValue::TriState(t) => Ok(AttrValue::TriState(*t)),
                RawValue::Bool(true) => Ok(AttrValue::TriState(TriState::Yes)),
                RawValue::Bool(false) => Ok(AttrValue::TriState(TriState::No)),
                RawValue::Int(-1) => Ok(AttrValue::TriState(TriState::Auto)),
                RawValue::Int(0) => Ok(AttrValue::TriState(TriState::No)),
                RawValue::Int(1) => Ok(AttrValue::TriState(TriState::Yes)),
                RawValue::Int(_) => Err(ConversionError::Invalid(
                    "tristate is not one of [-1, 0, 1]".to_string(),
                )),
                _ => Err(Self::Int.mismatch(x, what)),
            },

            Self::String => match x {
                RawValue::String(s) => Ok(AttrValue::String(intern(s))),
                _ => Err(self.mismatch(x, what)),
            },

            Self::Label | Self::NodepLabel => match x {
                RawValue::Label(label) => Ok(AttrValue::Label(label.clone())),
                RawValue::String(s) => {
                    let base = base.ok_or_else(|| ConversionError::MissingContext {
                        text: s.clone(),
                        what: what.to_string(),
                    })?;
                    let label = base.resolve_relative(s).map_err(|err| {
                        ConversionError::Invalid(format!(
                            "invalid label '{}' in {}: {}",
                            s, what, err
                        ))
                    })?;
                    Ok(AttrValue::Label(label))
                }
                _ => Err(self.mismatch(x, what)),
            },

            Self::Output => {
                let RawValue::String(s) = x else {
                    return Err(self.mismatch(x, what));
                };
                let base = base.ok_or_else(|| ConversionError::MissingContext {
                    text: s.clone(),
                    what: what.to_string(),
                })?;
                let label = base.resolve_relative(s).map_err(|err| {
                    ConversionError::Invalid(format!(
                        "illegal output file name '{}' in rule {}: {}",
                        s, base, err
                    ))
                })?;
                // Outputs always live in the package declaring them
                if !label.same_package(base) {
                    return Err(ConversionError::Invalid(format!(
                        "label '{}' is not in the current package",
                        s
                    )));
                }
                Ok(AttrValue::Label(label))
            }

            Self::License => {
                let strings = Self::convert_string_vec(x, what, base)?;
                let license = license::parse_license(&strings)
                    .map_err(|err| ConversionError::Invalid(err.to_string()))?;
                Ok(AttrValue::License(license))
            }

            Self::Distributions => {
                let strings = Self::convert_string_vec(x, what, base)?;
                let distributions = license::parse_distributions(&strings)
                    .map_err(|err| ConversionError::Invalid(err.to_string()))?;
                Ok(AttrValue::Distributions(distributions))
            }

            Self::FilesetEntry => match x {
                RawValue::FilesetEntry(entry) => Ok(AttrValue::FilesetEntry(entry.clone())),
                _ => Err(self.mismatch(x, what)),
            },

            Self::Object => Ok(AttrValue::Object(x.clone())),

            Self::ObjectList => match x {
                RawValue::List(raw) => Ok(AttrValue::List(ListValue {
                    elements: raw
                        .elements
                        .iter()
                        .map(|elem| AttrValue::Object(elem.clone()))
                        .collect(),
                    provenance: raw.provenance.clone(),
                })),
                _ => Err(self.mismatch(x, what)),
            },

            Self::List(elem_type) => {
                let RawValue::List(raw) = x else {
                    return Err(self.mismatch(x, what));
                };
                self.convert_list(elem_type, raw, what, base)
            }

            Self::Pair(first_type, second_type) => {
                let RawValue::List(raw) = x else {
                    return Err(self.mismatch(x, what));
                };
                if raw.elements.len() != 2 {
                    return Err(ConversionError::Invalid(
                        "dictionary element is not a pair".to_string(),
                    ));
                }
                let first =
                    first_type.convert(&raw.elements[0], &format!("element 0 of {}", what), base)?;
                let second =
                    second_type.convert(&raw.elements[1], &format!("element 1 of {}", what), base)?;
                Ok(AttrValue::Pair(Box::new(first), Box::new(second)))
            }

            Self::Dict(value_type) => {
                let RawValue::Dict(entries) = x else {
                    return Err(self.mismatch(x, what));
                };
                let mut pairs = Vec::with_capacity(entries.len());
                for (key, value) in entries {
                    let RawValue::String(k) = key else {
                        return Err(ConversionError::Invalid(format!(
                            "key ({}) in dictionary for {} is not a string but a {}",
                            key,
                            what,
                            key.kind()
                        )));
                    };
                    let converted = value_type.convert(value, what, base)?;
                    pairs.push(AttrValue::Pair(
                        Box::new(AttrValue::String(intern(k))),
                        Box::new(converted),
                    ));
                }
                Ok(AttrValue::List(ListValue::new(pairs)))
            }
        }
    }

    /// Like [`convert`](Self::convert), but a `select()` expression yields
    /// a [`Selector`] over this type instead of failing. The caller gets
    /// either a plain value or a selector and must branch; the two are
    /// never collapsed here.
    pub fn selectable_convert(
        &self,
        x: &RawValue,
        what: &str,
        base: Option<&Label>,
    ) -> Result<Selectable, ConversionError> {
        if let RawValue::Select(entries) = x {
            let selector = Selector::new(entries, what, base, self.clone())?;
            return Ok(Selectable::Selector(selector));
        }
        Ok(Selectable::Value(self.convert(x, what, base)?))
    }

    fn convert_list(
        &self,
        elem_type: &AttrType,
        raw: &RawList,
        what: &str,
        base: Option<&Label>,
    ) -> Result<AttrValue, ConversionError> {
        let mut elements = Vec::with_capacity(raw.elements.len());
        for (index, elem) in raw.elements.iter().enumerate() {
            let converted =
                elem_type.convert(elem, &format!("element {} of {}", index, what), base)?;
            if converted.is_null() {
                // Shouldn't happen but it does, rarely: tolerate a null
                // element result by dropping it instead of failing the
                // whole list. Do not extend this to other variants.
                warn!(
                    "converting a list with a null element: element {} of {}",
                    index, what
                );
                continue;
            }
            elements.push(converted);
        }
        Ok(AttrValue::List(ListValue {
            elements,
            provenance: raw.provenance.clone(),
        }))
    }

    // License and distribution declarations arrive as string lists
    fn convert_string_vec(
        x: &RawValue,
        what: &str,
        base: Option<&Label>,
    ) -> Result<Vec<String>, ConversionError> {
        let converted = Self::string_list().convert(x, what, base)?;
        let AttrValue::List(list) = converted else {
            unreachable!("string list conversion yields a list value");
        };
        Ok(list
            .elements
            .iter()
            .filter_map(AttrValue::as_str)
            .map(str::to_string)
            .collect())
    }

    /// The default value for attributes of this type, or `None` for types
    /// where the absence of a default is itself meaningful
    pub fn default_value(&self) -> Option<AttrValue> {
        match self {
            Self::Int => Some(AttrValue::Int(0)),
            Self::Bool => Some(AttrValue::Bool(false)),
            Self::TriState => Some(AttrValue::TriState(TriState::Auto)),
            Self::String => Some(AttrValue::String(intern(""))),
            Self::License => Some(AttrValue::License(License::no_license())),
            Self::Distributions => Some(AttrValue::Distributions(IndexSet::new())),
            Self::List(_) | Self::ObjectList | Self::Dict(_) => {
                Some(AttrValue::List(ListValue::default()))
            }
            Self::Label
            | Self::NodepLabel
            | Self::Output
            | Self::FilesetEntry
            | Self::Object
            | Self::Pair(_, _) => None,
        }
    }

    /// The labels a value of this type contributes as dependency edges,
    /// in encounter order, deduplicated
    ///
    /// Every variant's policy is spelled out here; none is inherited.
    pub fn extract_labels(&self, value: &AttrValue) -> IndexSet<Label> {
        let mut labels = IndexSet::new();
        self.collect_labels(value, &mut labels);
        labels
    }

    fn collect_labels(&self, value: &AttrValue, out: &mut IndexSet<Label>) {
        match self {
            // Scalars without label content
            Self::Int
            | Self::Bool
            | Self::TriState
            | Self::String
            | Self::License
            | Self::Distributions => {}

            // Untyped values never contribute edges
            Self::Object | Self::ObjectList => {}

            // A nodep label is a label that contributes no edge; that is
            // its entire reason to exist as a separate variant
            Self::NodepLabel => {}

            Self::Label | Self::Output => {
                if let AttrValue::Label(label) = value {
                    out.insert(label.clone());
                }
            }

            Self::FilesetEntry => {
                if let AttrValue::FilesetEntry(entry) = value {
                    out.extend(entry.labels().cloned());
                }
            }

            Self::List(elem_type) => {
                if let AttrValue::List(list) = value {
                    for elem in &list.elements {
                        elem_type.collect_labels(elem, out);
                    }
                }
            }

            Self::Pair(first_type, second_type) => {
                if let AttrValue::Pair(first, second) = value {
                    first_type.collect_labels(first, out);
                    second_type.collect_labels(second, out);
                }
            }

            Self::Dict(value_type) => {
                if let AttrValue::List(list) = value {
                    for entry in &list.elements {
                        if let AttrValue::Pair(_, entry_value) = entry {
                            value_type.collect_labels(entry_value, out);
                        }
                    }
                }
            }
        }
    }

    /// Convert a value of this type to a flat tag set for attribute-driven
    /// filtering. Only booleans, strings and lists participate; every
    /// other variant fails loudly and the caller treats the attribute as
    /// not taggable.
    pub fn to_tag_set(
        &self,
        value: Option<&AttrValue>,
        name: &str,
    ) -> Result<IndexSet<String>, ConversionError> {
        match self {
            Self::Bool => {
                let value = Self::tag_value(value, name)?;
                if let AttrValue::Bool(b) = value {
                    let tag = if *b {
                        name.to_string()
                    } else {
                        format!("no{}", name)
                    };
                    Ok(IndexSet::from([tag]))
                } else {
                    Err(self.tags_unsupported(name))
                }
            }

            Self::String => {
                let value = Self::tag_value(value, name)?;
                if let AttrValue::String(s) = value {
                    Ok(IndexSet::from([s.to_string()]))
                } else {
                    Err(self.tags_unsupported(name))
                }
            }

            Self::List(_) | Self::ObjectList => {
                let value = Self::tag_value(value, name)?;
                if let AttrValue::List(list) = value {
                    Ok(list.elements.iter().map(|elem| elem.to_string()).collect())
                } else {
                    Err(self.tags_unsupported(name))
                }
            }

            _ => Err(self.tags_unsupported(name)),
        }
    }

    fn tag_value<'a>(
        value: Option<&'a AttrValue>,
        name: &str,
    ) -> Result<&'a AttrValue, ConversionError> {
        value.ok_or_else(|| ConversionError::TagsFromNull {
            attr: name.to_string(),
        })
    }

    fn tags_unsupported(&self, name: &str) -> ConversionError {
        ConversionError::TagsUnsupported {
            attr: name.to_string(),
        }
    }

    /// Whether attributes of this type participate in dependency-edge
    /// accounting; lets callers skip extraction entirely for types that
    /// never produce edges
    pub fn is_label_type(&self) -> bool {
        match self {
            Self::Label | Self::NodepLabel => true,
            Self::List(elem) => {
                matches!(**elem, Self::Label | Self::NodepLabel | Self::FilesetEntry)
            }
            Self::Dict(value) => matches!(&**value, Self::List(elem) if **elem == Self::Label),
            _ => false,
        }
    }

    /// For list-shaped types, the element type of the converted sequence;
    /// `None` otherwise. A dictionary's element is the (key, value) pair.
    pub fn list_element_type(&self) -> Option<AttrType> {
        match self {
            Self::List(elem) => Some((**elem).clone()),
            Self::ObjectList => Some(Self::Object),
            Self::Dict(value) => Some(Self::Pair(Box::new(Self::String), value.clone())),
            _ => None,
        }
    }

    fn mismatch(&self, x: &RawValue, what: &str) -> ConversionError {
        ConversionError::TypeMismatch {
            expected: self.to_string(),
            what: what.to_string(),
            rendered: x.to_string(),
            kind: x.kind(),
        }
    }
}

impl fmt::Display for AttrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int => write!(f, "int"),
            Self::Bool => write!(f, "bool"),
            Self::TriState => write!(f, "tristate"),
            Self::String => write!(f, "string"),
            // A nodep label renders like any label; the distinction is
            // about edges, not about what the user wrote
            Self::Label | Self::NodepLabel => write!(f, "label"),
            Self::Output => write!(f, "output"),
            Self::License => write!(f, "license"),
            Self::Distributions => write!(f, "distributions"),
            Self::FilesetEntry => write!(f, "fileset entry"),
            Self::Object => write!(f, "object"),
            Self::ObjectList => write!(f, "list(object)"),
            Self::List(elem) => write!(f, "list({})", elem),
            Self::Pair(first, second) => write!(f, "pair({},{})", first, second),
            Self::Dict(value) => write!(f, "dict(string, {})", value),
        }
    }
}
