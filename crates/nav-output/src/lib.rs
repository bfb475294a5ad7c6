//! `nav-output`: location-trace output for the rust_navsim route simulator.
//!
//! | Type              | Role                                                  |
//! |-------------------|-------------------------------------------------------|
//! | [`TraceWriter`]   | Backend trait: one row per emitted sample             |
//! | [`CsvTraceWriter`]| CSV backend                                           |
//! | [`TraceObserver`] | `nav_sim::LocationObserver` that feeds a `TraceWriter`|
//!
//! # Usage
//!
//! ```rust,ignore
//! use nav_output::{CsvTraceWriter, TraceObserver};
//!
//! let trace = TraceObserver::new(CsvTraceWriter::create(Path::new("trace.csv"))?);
//! let manager = ManagerBuilder::new(config).observer(trace.clone()).build()?;
//! // … drive the route …
//! manager.shutdown().await?;
//! if let Some(e) = trace.take_error() { eprintln!("trace error: {e}"); }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(test)]
mod tests;

pub use csv::CsvTraceWriter;
pub use error::{OutputError, OutputResult};
pub use observer::TraceObserver;
pub use row::TraceRow;
pub use writer::TraceWriter;
