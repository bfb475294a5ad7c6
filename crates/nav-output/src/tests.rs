//! Unit tests for nav-output.

#[cfg(test)]
mod helpers {
    use nav_core::{GeoPoint, LocationSample, Timestamp};

    pub fn sample(ms: u64, lat: f64, speed: f64) -> LocationSample {
        LocationSample {
            coordinate:            GeoPoint::new(lat, 2.5),
            course_deg:            12.5,
            speed_mps:             speed,
            horizontal_accuracy_m: 5.0,
            timestamp:             Timestamp(ms),
        }
    }
}

// ── CSV writer ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use super::helpers::sample;
    use crate::csv::CsvTraceWriter;
    use crate::row::TraceRow;
    use crate::writer::TraceWriter;
    use crate::OutputError;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn csv_header_written_on_create() {
        let dir = tmp();
        let path = dir.path().join("trace.csv");
        let mut w = CsvTraceWriter::create(&path).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(
            headers,
            ["timestamp_ms", "lat", "lon", "course_deg", "speed_mps", "horizontal_accuracy_m"]
        );
        assert_eq!(rdr.records().count(), 0);
    }

    #[test]
    fn csv_rows_round_trip() {
        let dir = tmp();
        let path = dir.path().join("trace.csv");
        let mut w = CsvTraceWriter::create(&path).unwrap();
        w.write_row(&TraceRow::from(&sample(1_000, 0.5, 6.0))).unwrap();
        w.write_row(&TraceRow::from(&sample(2_000, 0.6, 0.0))).unwrap();
        assert_eq!(w.rows(), 2);
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "1000");
        assert_eq!(&rows[0][1], "0.5000000");
        assert_eq!(&rows[0][2], "2.5000000");
        assert_eq!(&rows[0][3], "12.50");
        assert_eq!(&rows[0][4], "6.000");
        assert_eq!(&rows[0][5], "5");
        assert_eq!(&rows[1][4], "0.000");
    }

    #[test]
    fn in_memory_sink() {
        let mut w = CsvTraceWriter::new(Vec::new()).unwrap();
        w.write_row(&TraceRow::from(&sample(7, 1.0, 3.0))).unwrap();
        let bytes = w.into_inner().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.lines().nth(1).unwrap().starts_with("7,1.0000000,"));
    }

    #[test]
    fn finish_is_repeatable() {
        let mut w = CsvTraceWriter::new(Vec::new()).unwrap();
        w.finish().unwrap();
        w.write_row(&TraceRow::from(&sample(1, 0.0, 0.0))).unwrap();
        w.finish().unwrap();
        assert_eq!(w.rows(), 1);
    }

    /// A sink whose every write fails, like a full disk.
    struct Broken;

    impl std::io::Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("disk full"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn create_error_names_the_path() {
        let dir = tmp();
        let path = dir.path().join("missing").join("trace.csv");
        let err = CsvTraceWriter::create(&path).err().unwrap();
        assert!(matches!(&err, OutputError::Create { path: p, .. } if *p == path));
        assert!(err.to_string().contains("trace.csv"));
    }

    #[test]
    fn broken_sink_reports_flush_and_row() {
        let mut w = CsvTraceWriter::new(Broken).unwrap();
        w.write_row(&TraceRow::from(&sample(1, 0.0, 0.0))).unwrap();
        assert!(matches!(w.finish(), Err(OutputError::Flush(_))));

        // Rows stay buffered until the csv buffer fills.
        let mut w = CsvTraceWriter::new(Broken).unwrap();
        let err = (0..10_000)
            .find_map(|i| w.write_row(&TraceRow::from(&sample(i, 0.0, 0.0))).err())
            .unwrap();
        match err {
            OutputError::Row { row, .. } => assert_eq!(row, w.rows() + 1),
            other => panic!("unexpected {other}"),
        }
        assert!(matches!(w.into_inner(), Err(OutputError::Flush(_))));
    }
}

// ── Observer bridge ───────────────────────────────────────────────────────────

#[cfg(test)]
mod observer_tests {
    use std::io;

    use nav_sim::LocationObserver;

    use super::helpers::sample;
    use crate::{CsvTraceWriter, OutputError, OutputResult, TraceObserver, TraceRow, TraceWriter};

    /// Fails every write with a numbered error.
    struct Failing {
        calls: u32,
    }

    impl TraceWriter for Failing {
        fn write_row(&mut self, _row: &TraceRow) -> OutputResult<()> {
            self.calls += 1;
            Err(io::Error::other(format!("write {}", self.calls)).into())
        }

        fn finish(&mut self) -> OutputResult<()> {
            Ok(())
        }
    }

    #[test]
    fn writes_every_location() {
        let trace = TraceObserver::new(CsvTraceWriter::new(Vec::new()).unwrap());
        let mut registered = trace.clone();
        for i in 0..4 {
            registered.on_location(&sample(i * 1_000, 0.1 * i as f64, 6.0));
        }
        registered.on_stop();
        drop(registered);

        assert!(trace.take_error().is_none());
        let writer = trace.into_writer().ok().unwrap();
        assert_eq!(writer.rows(), 4);
    }

    #[test]
    fn keeps_only_first_error() {
        let mut trace = TraceObserver::new(Failing { calls: 0 });
        trace.on_location(&sample(1, 0.0, 1.0));
        trace.on_location(&sample(2, 0.0, 1.0));
        trace.on_location(&sample(3, 0.0, 1.0));

        let err = trace.take_error().unwrap();
        assert!(matches!(&err, OutputError::Sink(e) if e.to_string() == "write 1"));
        assert!(trace.take_error().is_none());
        assert_eq!(trace.into_writer().ok().unwrap().calls, 3);
    }

    #[test]
    fn counts_arrivals() {
        let mut trace = TraceObserver::new(CsvTraceWriter::new(Vec::new()).unwrap());
        let s = sample(5, 0.0, 0.0);
        trace.on_location(&s);
        trace.on_arrival(&s);
        assert_eq!(trace.arrivals(), 1);
    }

    #[test]
    fn into_writer_refused_while_shared() {
        let trace = TraceObserver::new(CsvTraceWriter::new(Vec::new()).unwrap());
        let _other = trace.clone();
        assert!(trace.into_writer().is_err());
    }
}

// ── Driven by a live manager ──────────────────────────────────────────────────

#[cfg(test)]
mod live {
    use std::time::Duration;

    use nav_core::{GeoPoint, SimulationConfig, SteppingClock, Timestamp};
    use nav_sim::ManagerBuilder;
    use nav_spatial::{Polyline, RouteGeometry};

    use crate::{CsvTraceWriter, TraceObserver};

    #[tokio::test(start_paused = true)]
    async fn trace_of_full_route() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.csv");
        let trace = TraceObserver::new(CsvTraceWriter::create(&path).unwrap());

        let manager = ManagerBuilder::new(SimulationConfig::default())
            .observer(trace.clone())
            .clock(SteppingClock::new(Timestamp(0), 1_000))
            .build()
            .unwrap();
        let route = RouteGeometry::new(Polyline::new(vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.001, 0.0),
        ]));
        manager.set_route(route, None).unwrap();
        manager.start_updating().unwrap();
        tokio::time::sleep(Duration::from_millis(10_500)).await;
        manager.shutdown().await.unwrap();
        drop(manager);

        assert!(trace.take_error().is_none());
        assert_eq!(trace.arrivals(), 1);

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 11);
        assert_eq!(&rows[0][0], "0");
        assert_eq!(&rows[10][1], "0.0010000");
        assert_eq!(&rows[10][4], "0.000");
    }
}
