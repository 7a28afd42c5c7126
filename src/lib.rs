// src/lib.rs

//! Mason attribute types
//!
//! The attribute type and conversion layer of the Mason build tool's rule
//! model. Rule attribute values arrive untyped from the configuration
//! evaluator; this crate validates and coerces them into the typed model
//! the dependency graph, build analysis and test-tag filtering rely on.
//!
//! # Architecture
//!
//! - Closed type table: every attribute type is an [`AttrType`] variant,
//!   and conversion, defaults, label extraction, tag conversion and
//!   rendering are exhaustive matches over it
//! - Conversion is a pure function: no shared mutable state beyond the
//!   append-only string interning table, so package-loading workers
//!   convert concurrently without locks
//! - Configurable values: a `select()` expression converts to a
//!   [`Selector`] that defers resolution to configuration time while the
//!   arms are validated up front
//! - Dependency edges: [`AttrType::extract_labels`] is the single source
//!   of truth for which attribute values create build-graph edges

pub mod attr;
mod error;
pub mod fileset;
pub mod intern;
pub mod label;
pub mod license;
pub mod raw;

pub use attr::{
    AttrType, AttrValue, ConversionError, ListValue, Selectable, Selector, TriState,
    DEFAULT_CONDITION_KEY,
};
pub use error::{Error, Result};
pub use fileset::FilesetEntry;
pub use label::{Label, LabelError};
pub use license::{
    parse_distributions, parse_license, Distribution, License, LicenseKind, LicenseParseError,
};
pub use raw::{GlobProvenance, RawList, RawValue};
