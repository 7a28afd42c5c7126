// src/license.rs

//! License and distribution declarations
//!
//! Licenses and distributions are declared on rules as plain string lists
//! in the configuration language; parsing them at conversion time catches
//! bad declarations as early as bad labels. A license declaration is a list
//! of license kinds plus optional `exception=//label` entries naming
//! targets exempted from the license requirements.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use thiserror::Error;

use crate::label::Label;

/// The kinds of license a rule may declare, roughly by restrictiveness
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
pub enum LicenseKind {
    ByExceptionOnly,
    Restricted,
    Reciprocal,
    Notice,
    Permissive,
    Unencumbered,
    /// Sentinel: no license declared
    None,
}

/// Where a rule's outputs may be distributed
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
pub enum Distribution {
    Internal,
    Web,
    Client,
    Embedded,
}

/// A parsed license declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct License {
    kinds: IndexSet<LicenseKind>,
    exceptions: Vec<Label>,
}

impl License {
    /// The sentinel value for rules that declare no license
    pub fn no_license() -> Self {
        let mut kinds = IndexSet::new();
        kinds.insert(LicenseKind::None);
        Self {
            kinds,
            exceptions: Vec::new(),
        }
    }

    /// True unless this is the "no license declared" sentinel
    pub fn is_specified(&self) -> bool {
        !(self.exceptions.is_empty()
            && self.kinds.len() == 1
            && self.kinds.contains(&LicenseKind::None))
    }

    /// Declared license kinds, in declaration order
    pub fn kinds(&self) -> &IndexSet<LicenseKind> {
        &self.kinds
    }

    /// Targets exempted from the license requirements
    pub fn exceptions(&self) -> &[Label] {
        &self.exceptions
    }
}

impl fmt::Display for License {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kinds: Vec<String> = self.kinds.iter().map(|k| k.to_string()).collect();
        write!(f, "{}", kinds.join(","))
    }
}

/// Parse a license declaration from its string-list form
///
/// Tokens are either license kinds (`"notice"`, `"restricted"`) or
/// exceptions of the form `exception=//pkg:target` (absolute labels only).
/// An empty list yields the no-license sentinel.
pub fn parse_license(tokens: &[String]) -> Result<License, LicenseParseError> {
    if tokens.is_empty() {
        return Ok(License::no_license());
    }

    let mut kinds = IndexSet::new();
    let mut exceptions = Vec::new();
    for token in tokens {
        if let Some(target) = token.strip_prefix("exception=") {
            let label = Label::parse_absolute(target).map_err(|err| {
                LicenseParseError::InvalidException {
                    target: target.to_string(),
                    reason: err.to_string(),
                }
            })?;
            exceptions.push(label);
        } else {
            let kind = LicenseKind::from_str(token)
                .map_err(|_| LicenseParseError::UnknownKind(token.clone()))?;
            kinds.insert(kind);
        }
    }

    Ok(License { kinds, exceptions })
}

/// Parse a distribution declaration from its string-list form
pub fn parse_distributions(
    tokens: &[String],
) -> Result<IndexSet<Distribution>, LicenseParseError> {
    let mut distributions = IndexSet::new();
    for token in tokens {
        let distribution = Distribution::from_str(token)
            .map_err(|_| LicenseParseError::UnknownDistribution(token.clone()))?;
        distributions.insert(distribution);
    }
    Ok(distributions)
}

/// Errors from parsing license or distribution declarations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LicenseParseError {
    #[error("invalid license type '{0}'")]
    UnknownKind(String),

    #[error("invalid distribution type '{0}'")]
    UnknownDistribution(String),

    #[error("invalid license exception '{target}': {reason}")]
    InvalidException { target: String, reason: String },
}
