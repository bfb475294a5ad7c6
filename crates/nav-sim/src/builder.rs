//! Fluent builder for constructing a [`SimulatedLocationManager`].

use tokio::runtime::Handle;

use nav_core::{Clock, MonotonicClock, SimulationConfig};
use nav_mobility::RouteSimulator;

use crate::{LocationObserver, SimError, SimResult, SimulatedLocationManager};

/// Fluent builder for [`SimulatedLocationManager`].
///
/// # Optional inputs (have defaults)
///
/// | Method                  | Default                              |
/// |-------------------------|--------------------------------------|
/// | `.observer(o)`          | No observers                         |
/// | `.clock(c)`             | `MonotonicClock::new()`              |
/// | `.serial_handle(h)`     | `Handle::try_current()`              |
/// | `.delivery_handle(h)`   | Same runtime as the serial context   |
///
/// # Example
///
/// ```rust,ignore
/// let manager = ManagerBuilder::new(config)
///     .observer(TraceObserver::new(CsvTraceWriter::create(path)?))
///     .delivery_handle(ui_runtime.handle().clone())
///     .build()?;
/// ```
pub struct ManagerBuilder {
    config:    SimulationConfig,
    observers: Vec<Box<dyn LocationObserver>>,
    clock:     Option<Box<dyn Clock>>,
    serial:    Option<Handle>,
    delivery:  Option<Handle>,
}

impl ManagerBuilder {
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
            clock:     None,
            serial:    None,
            delivery:  None,
        }
    }

    /// Add an observer.  Observers are called in the order they were added.
    pub fn observer<O: LocationObserver + 'static>(mut self, observer: O) -> Self {
        self.observers.push(Box::new(observer));
        self
    }

    /// Timestamp source for emitted samples.
    pub fn clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    /// Runtime that hosts the simulator and its timer.
    pub fn serial_handle(mut self, handle: Handle) -> Self {
        self.serial = Some(handle);
        self
    }

    /// Runtime on which observers are called.
    pub fn delivery_handle(mut self, handle: Handle) -> Self {
        self.delivery = Some(handle);
        self
    }

    /// Validate the configuration and spawn the manager.
    ///
    /// # Errors
    ///
    /// - [`SimError::Config`] if the configuration is invalid.
    /// - [`SimError::NoRuntime`] if no serial handle was given and the
    ///   caller is not inside a tokio runtime.
    pub fn build(self) -> SimResult<SimulatedLocationManager> {
        self.config.validate()?;
        let serial = match self.serial {
            Some(handle) => handle,
            None => Handle::try_current().map_err(|_| SimError::NoRuntime)?,
        };
        let delivery = self.delivery.unwrap_or_else(|| serial.clone());
        let clock = self.clock.unwrap_or_else(|| Box::new(MonotonicClock::new()));
        let simulator = RouteSimulator::new(self.config)?;

        Ok(SimulatedLocationManager::spawn(simulator, clock, self.observers, serial, delivery))
    }
}
