//! The `TraceWriter` trait implemented by trace backends.

use crate::{OutputResult, TraceRow};

/// Sink for emitted locations.
///
/// Errors are reported to the caller; [`TraceObserver`][crate::TraceObserver]
/// stores the first one for retrieval after the run.
pub trait TraceWriter: Send {
    /// Append one row.
    fn write_row(&mut self, row: &TraceRow) -> OutputResult<()>;

    /// Flush buffered rows.  Safe to call more than once; writing may
    /// continue afterwards.
    fn finish(&mut self) -> OutputResult<()>;
}
