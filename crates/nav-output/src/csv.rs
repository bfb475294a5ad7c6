//! CSV trace backend.
//!
//! Columns: `timestamp_ms, lat, lon, course_deg, speed_mps,
//! horizontal_accuracy_m`.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::Writer;

use crate::writer::TraceWriter;
use crate::{OutputError, OutputResult, TraceRow};

const HEADER: [&str; 6] = [
    "timestamp_ms",
    "lat",
    "lon",
    "course_deg",
    "speed_mps",
    "horizontal_accuracy_m",
];

/// Writes one CSV row per emitted location.
pub struct CsvTraceWriter<W: Write = File> {
    out:  Writer<W>,
    rows: u64,
}

impl CsvTraceWriter<File> {
    /// Create (or truncate) `path` and write the header row.
    pub fn create(path: &Path) -> OutputResult<Self> {
        let file = File::create(path)
            .map_err(|source| OutputError::Create { path: path.to_path_buf(), source })?;
        Self::new(file)
    }
}

impl<W: Write> CsvTraceWriter<W> {
    /// Wrap any byte sink and write the header row.
    pub fn new(inner: W) -> OutputResult<Self> {
        let mut out = Writer::from_writer(inner);
        out.write_record(HEADER).map_err(OutputError::Header)?;
        Ok(Self { out, rows: 0 })
    }

    /// Rows written so far (header excluded).
    #[inline]
    pub fn rows(&self) -> u64 {
        self.rows
    }

    /// Flush and return the underlying sink.
    pub fn into_inner(self) -> OutputResult<W> {
        self.out
            .into_inner()
            .map_err(|e| OutputError::Flush(e.into_error()))
    }
}

impl<W: Write + Send> TraceWriter for CsvTraceWriter<W> {
    fn write_row(&mut self, row: &TraceRow) -> OutputResult<()> {
        let row_number = self.rows + 1;
        self.out.write_record(&[
            row.timestamp_ms.to_string(),
            format!("{:.7}", row.lat),
            format!("{:.7}", row.lon),
            format!("{:.2}", row.course_deg),
            format!("{:.3}", row.speed_mps),
            row.horizontal_accuracy_m.to_string(),
        ])
        .map_err(|source| OutputError::Row { row: row_number, source })?;
        self.rows += 1;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.out.flush().map_err(OutputError::Flush)
    }
}
