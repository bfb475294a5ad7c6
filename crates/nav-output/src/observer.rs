//! `TraceObserver<W>`: bridges `LocationObserver` to a `TraceWriter`.

use std::sync::{Arc, Mutex, MutexGuard};

use nav_core::LocationSample;
use nav_sim::LocationObserver;
use tracing::warn;

use crate::writer::TraceWriter;
use crate::{OutputError, OutputResult, TraceRow};

struct TraceState<W> {
    writer:     W,
    arrivals:   u32,
    last_error: Option<OutputError>,
}

/// A [`LocationObserver`] that writes every emitted location to any
/// [`TraceWriter`] backend.
///
/// The manager takes ownership of its observers, so this type is a shared
/// handle: register one clone and keep another to inspect the outcome.
/// Errors from the writer are stored because observer callbacks have no
/// return value; only the first one is kept.  Check with
/// [`take_error`][Self::take_error] after shutting the manager down.
pub struct TraceObserver<W: TraceWriter> {
    state: Arc<Mutex<TraceState<W>>>,
}

impl<W: TraceWriter> Clone for TraceObserver<W> {
    fn clone(&self) -> Self {
        Self { state: Arc::clone(&self.state) }
    }
}

impl<W: TraceWriter> TraceObserver<W> {
    pub fn new(writer: W) -> Self {
        Self {
            state: Arc::new(Mutex::new(TraceState {
                writer,
                arrivals:   0,
                last_error: None,
            })),
        }
    }

    /// Take the stored write error, if any.
    pub fn take_error(&self) -> Option<OutputError> {
        self.lock().last_error.take()
    }

    /// Number of arrivals seen so far.
    pub fn arrivals(&self) -> u32 {
        self.lock().arrivals
    }

    /// Unwrap the inner writer.  Returns `Err(self)` while other clones are
    /// still alive (e.g. the manager has not shut down yet).
    pub fn into_writer(self) -> Result<W, Self> {
        match Arc::try_unwrap(self.state) {
            Ok(state) => Ok(state
                .into_inner()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .writer),
            Err(state) => Err(Self { state }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, TraceState<W>> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, op: impl FnOnce(&mut W) -> OutputResult<()>) {
        let mut state = self.lock();
        if let Err(e) = op(&mut state.writer) {
            if state.last_error.is_none() {
                warn!(error = %e, "trace write failed; further errors suppressed");
                state.last_error = Some(e);
            }
        }
    }
}

impl<W: TraceWriter + 'static> LocationObserver for TraceObserver<W> {
    fn on_location(&mut self, sample: &LocationSample) {
        let row = TraceRow::from(sample);
        self.record(|w| w.write_row(&row));
    }

    fn on_arrival(&mut self, _sample: &LocationSample) {
        self.lock().arrivals += 1;
    }

    fn on_stop(&mut self) {
        self.record(|w| w.finish());
    }
}
