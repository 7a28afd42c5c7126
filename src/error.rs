// src/error.rs

//! Crate-level error type
//!
//! Modules define their own error enums; this wraps them for callers that
//! funnel everything through one `Result`.

use thiserror::Error;

use crate::attr::ConversionError;
use crate::label::LabelError;
use crate::license::LicenseParseError;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error(transparent)]
    Label(#[from] LabelError),

    #[error(transparent)]
    License(#[from] LicenseParseError),
}

pub type Result<T> = std::result::Result<T, Error>;
