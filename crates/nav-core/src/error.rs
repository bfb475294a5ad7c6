//! Framework error type.
//!
//! Sub-crates define their own error enums and convert `NavError` into them
//! via `From` impls.

use thiserror::Error;

use crate::GeoPoint;

/// The top-level error type for `nav-core` and a common base for sub-crates.
#[derive(Debug, Error, PartialEq)]
pub enum NavError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("coordinate {0} is outside the valid latitude/longitude range")]
    InvalidCoordinate(GeoPoint),
}

/// Shorthand result type for all `nav-*` crates.
pub type NavResult<T> = Result<T, NavError>;
