//! Trace output failures.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// What went wrong while recording a location trace.
///
/// Variants name the stage that failed so a caller reading
/// [`TraceObserver::take_error`](crate::TraceObserver::take_error) after the
/// run can tell a bad output path from a sink that filled up mid-route.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("cannot create trace file {}: {source}", path.display())]
    Create { path: PathBuf, source: io::Error },

    #[error("trace header not written: {0}")]
    Header(#[source] csv::Error),

    /// `row` counts from 1, header excluded.
    #[error("trace row {row} not written: {source}")]
    Row { row: u64, source: csv::Error },

    #[error("trace sink did not flush: {0}")]
    Flush(#[source] io::Error),

    /// Raised by custom [`TraceWriter`](crate::TraceWriter) backends.
    #[error("trace sink: {0}")]
    Sink(#[from] io::Error),
}

pub type OutputResult<T> = Result<T, OutputError>;
