// src/attr/selector.rs

//! Configurable attribute values
//!
//! A `select()` expression defers an attribute's value to
//! configuration-resolution time: it maps condition labels to candidate
//! values of the attribute's declared type. This module validates and
//! types the expression at declaration time; picking the matching arm for
//! an active configuration happens outside this crate.

use std::sync::LazyLock;

use crate::label::Label;
use crate::raw::RawValue;

use super::value::AttrValue;
use super::{AttrType, ConversionError};

/// Condition key whose value applies when no other condition matches
pub const DEFAULT_CONDITION_KEY: &str = "//conditions:default";

static DEFAULT_CONDITION: LazyLock<Label> = LazyLock::new(|| {
    Label::parse_absolute(DEFAULT_CONDITION_KEY).expect("default condition key is a valid label")
});

/// The result of a selectable conversion: either a plain typed value or a
/// deferred conditional one. This layer never collapses the two; callers
/// branch.
#[derive(Debug, Clone, PartialEq)]
pub enum Selectable {
    Value(AttrValue),
    Selector(Selector),
}

/// A validated, typed `select()` expression
///
/// Immutable once constructed. Holds the underlying non-selector type and
/// the insertion-ordered condition -> value mapping, which is guaranteed
/// to contain the default condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    original_type: AttrType,
    entries: Vec<(Label, AttrValue)>,
    default_index: usize,
}

impl Selector {
    /// Validate and type a raw condition -> value mapping
    ///
    /// Each key is converted through the label rule (conditions are
    /// label-shaped and resolve relative to `base` like any label); each
    /// value through `original_type`. Fails if the default condition is
    /// missing. Duplicate conditions keep the last value at the first
    /// occurrence's position.
    pub fn new(
        raw_entries: &[(RawValue, RawValue)],
        what: &str,
        base: Option<&Label>,
        original_type: AttrType,
    ) -> Result<Self, ConversionError> {
        let mut entries: Vec<(Label, AttrValue)> = Vec::with_capacity(raw_entries.len());
        for (raw_key, raw_value) in raw_entries {
            let converted_key = AttrType::Label.convert(raw_key, what, base)?;
            let AttrValue::Label(key) = converted_key else {
                unreachable!("label conversion yields a label value");
            };
            let value = original_type.convert(raw_value, what, base)?;

            if let Some(slot) = entries.iter_mut().find(|(existing, _)| *existing == key) {
                slot.1 = value;
            } else {
                entries.push((key, value));
            }
        }

        let default_index = entries
            .iter()
            .position(|(key, _)| *key == *DEFAULT_CONDITION)
            .ok_or_else(|| {
                ConversionError::Invalid(format!("no default condition specified for {}", what))
            })?;

        Ok(Self {
            original_type,
            entries,
            default_index,
        })
    }

    /// The condition -> value entries, in declaration order
    pub fn entries(&self) -> &[(Label, AttrValue)] {
        &self.entries
    }

    /// The value used when no condition matches
    pub fn default_value(&self) -> &AttrValue {
        &self.entries[self.default_index].1
    }

    /// The attribute's type as if it were not a selector expression
    pub fn original_type(&self) -> &AttrType {
        &self.original_type
    }

    /// True for condition keys that are reserved selector keywords and do
    /// not denote real build targets. Dependency extraction and
    /// condition validation special-case these.
    pub fn is_reserved(label: &Label) -> bool {
        *label == *DEFAULT_CONDITION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Label {
        Label::parse_absolute("//pkg:rule").unwrap()
    }

    fn select_entries(pairs: &[(&str, &str)]) -> Vec<(RawValue, RawValue)> {
        pairs
            .iter()
            .map(|(k, v)| (RawValue::from(*k), RawValue::from(*v)))
            .collect()
    }

    #[test]
    fn test_construct_with_default() {
        let entries = select_entries(&[
            (DEFAULT_CONDITION_KEY, "X"),
            ("//cond:a", "Y"),
        ]);
        let selector =
            Selector::new(&entries, "attribute 'srcs'", Some(&base()), AttrType::String).unwrap();

        assert_eq!(selector.default_value().as_str(), Some("X"));
        assert_eq!(selector.entries().len(), 2);
        assert_eq!(*selector.original_type(), AttrType::String);
    }

    #[test]
    fn test_entries_preserve_order() {
        let entries = select_entries(&[
            ("//cond:a", "first"),
            ("//cond:b", "second"),
            (DEFAULT_CONDITION_KEY, "fallback"),
        ]);
        let selector =
            Selector::new(&entries, "attribute 'opts'", Some(&base()), AttrType::String).unwrap();

        let keys: Vec<String> = selector
            .entries()
            .iter()
            .map(|(k, _)| k.to_string())
            .collect();
        assert_eq!(keys, vec!["//cond:a", "//cond:b", DEFAULT_CONDITION_KEY]);
    }

    #[test]
    fn test_missing_default_fails() {
        let entries = select_entries(&[("//cond:a", "Y")]);
        let err = Selector::new(&entries, "attribute 'opts'", Some(&base()), AttrType::String)
            .unwrap_err();
        assert!(err.to_string().contains("no default condition"));
    }

    #[test]
    fn test_duplicate_condition_last_wins() {
        let entries = select_entries(&[
            ("//cond:a", "first"),
            (DEFAULT_CONDITION_KEY, "fallback"),
            ("//cond:a", "second"),
        ]);
        let selector =
            Selector::new(&entries, "attribute 'opts'", Some(&base()), AttrType::String).unwrap();

        assert_eq!(selector.entries().len(), 2);
        let (key, value) = &selector.entries()[0];
        assert_eq!(key.to_string(), "//cond:a");
        assert_eq!(value.as_str(), Some("second"));
    }

    #[test]
    fn test_value_conversion_failure_propagates() {
        let entries = vec![
            (RawValue::from(DEFAULT_CONDITION_KEY), RawValue::from(5)),
        ];
        assert!(
            Selector::new(&entries, "attribute 'opts'", Some(&base()), AttrType::String).is_err()
        );
    }

    #[test]
    fn test_reserved_condition() {
        let default = Label::parse_absolute(DEFAULT_CONDITION_KEY).unwrap();
        let real = Label::parse_absolute("//cond:a").unwrap();

        assert!(Selector::is_reserved(&default));
        assert!(!Selector::is_reserved(&real));
    }
}
