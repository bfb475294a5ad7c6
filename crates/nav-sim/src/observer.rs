//! Location observer trait for delivering simulated fixes.

use nav_core::LocationSample;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Callbacks invoked on the delivery context by
/// [`SimulatedLocationManager`][crate::SimulatedLocationManager].
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  Calls for one manager are never
/// concurrent and arrive in emission order.
///
/// # Example: console logger
///
/// ```rust,ignore
/// struct Printer;
///
/// impl LocationObserver for Printer {
///     fn on_location(&mut self, s: &LocationSample) {
///         println!("{} {} {:.1} m/s", s.timestamp, s.coordinate, s.speed_mps);
///     }
/// }
/// ```
pub trait LocationObserver: Send {
    /// Called once per emitted sample.
    fn on_location(&mut self, _sample: &LocationSample) {}

    /// Called right after `on_location` for the first terminal sample of a
    /// route.  Once per route; a reroute re-enables it.
    fn on_arrival(&mut self, _sample: &LocationSample) {}

    /// Updates were stopped, cleaned up or the manager shut down.
    fn on_stop(&mut self) {}
}

/// A [`LocationObserver`] that does nothing.
pub struct NoopObserver;

impl LocationObserver for NoopObserver {}

/// What a [`ChannelObserver`] forwards.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum LocationEvent {
    Location(LocationSample),
    Arrival(LocationSample),
    Stopped,
}

/// Forwards every callback into an unbounded channel.
///
/// Useful when the consumer wants to `await` locations instead of being
/// called back.  A dropped receiver is ignored.
pub struct ChannelObserver {
    tx: UnboundedSender<LocationEvent>,
}

impl ChannelObserver {
    pub fn new() -> (Self, UnboundedReceiver<LocationEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl LocationObserver for ChannelObserver {
    fn on_location(&mut self, sample: &LocationSample) {
        let _ = self.tx.send(LocationEvent::Location(*sample));
    }

    fn on_arrival(&mut self, sample: &LocationSample) {
        let _ = self.tx.send(LocationEvent::Arrival(*sample));
    }

    fn on_stop(&mut self) {
        let _ = self.tx.send(LocationEvent::Stopped);
    }
}
