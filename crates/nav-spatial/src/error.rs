//! Spatial-subsystem error type.

use thiserror::Error;

use nav_core::NavError;

/// Errors produced by `nav-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("route parse error: {0}")]
    Parse(String),

    #[error("expected {expected} segment travel times, got {got}")]
    TravelTimeCount { expected: usize, got: usize },

    #[error("segment {index} has invalid expected travel time {secs}")]
    TravelTime { index: usize, secs: f64 },

    #[error(transparent)]
    Coordinate(#[from] NavError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
