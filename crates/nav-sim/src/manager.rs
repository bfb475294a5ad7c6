//! `SimulatedLocationManager`: owns a `RouteSimulator` on its own serial
//! task and drives it from a `TickTimer`.

use std::ops::ControlFlow;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use nav_core::{Clock, GeoPoint, LocationSample, SimulationConfig, checked_wall_tick_interval};
use nav_mobility::{ProgressOutcome, RouteSimulator, SimulationPhase, SimulationSnapshot};
use nav_spatial::RouteGeometry;

use crate::{LocationObserver, ManagerBuilder, SimError, SimResult, TickTimer};

enum Command {
    Tick { epoch: u64 },
    SetRoute { route: RouteGeometry, start: Option<GeoPoint> },
    Progress { distance_m: f64, route: Option<RouteGeometry>, location: Option<GeoPoint> },
    SetSpeedMultiplier(f64),
    Start,
    Stop,
    CleanUp,
    Snapshot(oneshot::Sender<SimulationSnapshot>),
    Shutdown(oneshot::Sender<()>),
}

/// One message per emitted sample crosses to the delivery context.
enum Delivery {
    Location { sample: LocationSample, arrived: bool },
    Stop,
}

/// Handle to a running simulation.
///
/// Every method only enqueues a message for the serial context and returns
/// immediately; nothing here blocks on simulator work.  Messages are applied
/// in the order they were sent, interleaved with timer ticks.
///
/// Dropping the last handle shuts the simulation down the same way
/// [`shutdown`](Self::shutdown) does, without waiting for it.
///
/// # Example
///
/// ```rust,ignore
/// let (observer, mut events) = ChannelObserver::new();
/// let manager = SimulatedLocationManager::builder(SimulationConfig::default())
///     .observer(observer)
///     .build()?;
/// manager.set_route(route, None)?;
/// manager.start_updating()?;
/// while let Some(event) = events.recv().await { /* … */ }
/// ```
pub struct SimulatedLocationManager {
    commands:           UnboundedSender<Command>,
    tick_interval_secs: f64,
}

impl SimulatedLocationManager {
    pub fn builder(config: SimulationConfig) -> ManagerBuilder {
        ManagerBuilder::new(config)
    }

    pub(crate) fn spawn(
        simulator: RouteSimulator,
        clock:     Box<dyn Clock>,
        observers: Vec<Box<dyn LocationObserver>>,
        serial:    Handle,
        delivery:  Handle,
    ) -> Self {
        let (commands, inbox) = mpsc::unbounded_channel();
        let (outbox, deliveries) = mpsc::unbounded_channel();

        // The timer only holds a weak sender so dropping every manager handle
        // still closes the command channel.
        let ticks = commands.downgrade();
        let tick_interval_secs = simulator.config().tick_interval_secs;
        let period = simulator.config().wall_tick_interval();
        let accuracy = simulator.config().tick_accuracy();
        let timer = TickTimer::new(Duration::ZERO, period, accuracy, serial.clone(), move |epoch| {
            if let Some(tx) = ticks.upgrade() {
                let _ = tx.send(Command::Tick { epoch });
            }
        });

        debug!(
            period_ms = period.as_millis() as u64,
            observers = observers.len(),
            "location manager started"
        );

        let engine = Engine {
            simulator,
            timer,
            clock,
            outbox,
            delivery_task: delivery.spawn(deliver(observers, deliveries)),
            arrived: false,
        };
        serial.spawn(engine.run(inbox));

        Self { commands, tick_interval_secs }
    }

    /// Replace the route and start over from its beginning (or from the
    /// projection of `start`).  Does not arm the timer.
    pub fn set_route(&self, route: RouteGeometry, start: Option<GeoPoint>) -> SimResult<()> {
        self.send(Command::SetRoute { route, start })
    }

    /// Arm the tick timer.  The first location follows immediately.
    pub fn start_updating(&self) -> SimResult<()> {
        self.send(Command::Start)
    }

    /// Disarm the tick timer, keeping all simulation state.
    pub fn stop_updating(&self) -> SimResult<()> {
        self.send(Command::Stop)
    }

    /// Forward a navigation progress update.  A route different from the
    /// current one reroutes; anything else is advisory.  Degenerate reroutes
    /// are logged and ignored.
    pub fn progress_updated(
        &self,
        distance_traveled_m: f64,
        route:               Option<RouteGeometry>,
        location:            Option<GeoPoint>,
    ) -> SimResult<()> {
        self.send(Command::Progress { distance_m: distance_traveled_m, route, location })
    }

    /// Change the wall-clock speed-up at runtime.  Resets the tick timer.
    ///
    /// # Errors
    ///
    /// [`SimError::Config`] for a non-finite or non-positive multiplier, or
    /// one so small the tick period would exceed
    /// [`MAX_WALL_TICK_INTERVAL`][nav_core::MAX_WALL_TICK_INTERVAL]; nothing
    /// is sent in that case.
    pub fn set_speed_multiplier(&self, multiplier: f64) -> SimResult<()> {
        checked_wall_tick_interval(self.tick_interval_secs, multiplier)?;
        self.send(Command::SetSpeedMultiplier(multiplier))
    }

    /// Stop updating and forget the route.
    pub fn clean_up(&self) -> SimResult<()> {
        self.send(Command::CleanUp)
    }

    /// Current simulator state.  Answered after every message sent before
    /// it has been applied.
    pub async fn snapshot(&self) -> SimResult<SimulationSnapshot> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Snapshot(tx))?;
        rx.await.map_err(|_| SimError::Closed)
    }

    /// Cancel the timer, notify observers and wait until every queued
    /// delivery has been made.  Later calls on any handle fail with
    /// [`SimError::Closed`].
    pub async fn shutdown(&self) -> SimResult<()> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Shutdown(tx))?;
        rx.await.map_err(|_| SimError::Closed)
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }

    fn send(&self, command: Command) -> SimResult<()> {
        self.commands.send(command).map_err(|_| SimError::Closed)
    }
}

// ── Serial context ────────────────────────────────────────────────────────────

struct Engine {
    simulator:     RouteSimulator,
    timer:         TickTimer,
    clock:         Box<dyn Clock>,
    outbox:        UnboundedSender<Delivery>,
    delivery_task: JoinHandle<()>,
    /// Arrival already delivered for the current route.
    arrived:       bool,
}

impl Engine {
    async fn run(mut self, mut inbox: UnboundedReceiver<Command>) {
        let mut done = None;
        while let Some(command) = inbox.recv().await {
            if let ControlFlow::Break(reply) = self.handle(command) {
                done = Some(reply);
                break;
            }
        }
        inbox.close();
        self.timer.cancel();
        self.deliver(Delivery::Stop);

        let Engine { outbox, delivery_task, .. } = self;
        drop(outbox);
        if let Err(e) = delivery_task.await {
            warn!(error = %e, "delivery task failed");
        }
        debug!("location manager stopped");

        if let Some(reply) = done {
            let _ = reply.send(());
        }
    }

    fn handle(&mut self, command: Command) -> ControlFlow<oneshot::Sender<()>> {
        match command {
            Command::Tick { epoch } => self.tick(epoch),
            Command::SetRoute { route, start } => {
                self.simulator.initialize(route, start);
                self.arrived = false;
            }
            Command::Progress { distance_m, route, location } => {
                match self.simulator.on_progress_updated(distance_m, route, location) {
                    Ok(ProgressOutcome::Rerouted) => self.arrived = false,
                    Ok(ProgressOutcome::Advisory) => {}
                    Err(e) => warn!(error = %e, "progress update rejected"),
                }
            }
            Command::SetSpeedMultiplier(multiplier) => {
                match self.simulator.set_speed_multiplier(multiplier) {
                    Ok(()) => {
                        let period = self.simulator.config().wall_tick_interval();
                        debug!(multiplier, period_ms = period.as_millis() as u64, "speed multiplier changed");
                        self.timer.set_repetition_interval(period);
                    }
                    Err(e) => warn!(error = %e, "speed multiplier rejected"),
                }
            }
            Command::Start => self.timer.arm(),
            Command::Stop => self.stop(),
            Command::CleanUp => {
                self.stop();
                self.simulator.clean_up();
                self.arrived = false;
            }
            Command::Snapshot(reply) => {
                let _ = reply.send(self.simulator.snapshot());
            }
            Command::Shutdown(reply) => return ControlFlow::Break(reply),
        }
        ControlFlow::Continue(())
    }

    fn tick(&mut self, epoch: u64) {
        // Ticks queued before a disarm belong to an older epoch.
        if !self.timer.is_armed() || epoch != self.timer.epoch() {
            trace!(epoch, current = self.timer.epoch(), "stale tick dropped");
            return;
        }
        let Some(sample) = self.simulator.tick(self.clock.as_mut()) else {
            return;
        };

        let arrived = !self.arrived && self.simulator.phase() == SimulationPhase::Completed;
        if arrived {
            self.arrived = true;
            debug!(at = %sample.coordinate, timestamp = %sample.timestamp, "arrived");
        }
        self.deliver(Delivery::Location { sample, arrived });
    }

    fn stop(&mut self) {
        if self.timer.is_armed() {
            self.timer.disarm();
            self.deliver(Delivery::Stop);
        }
    }

    fn deliver(&self, delivery: Delivery) {
        if self.outbox.send(delivery).is_err() {
            warn!("delivery context is gone; notification dropped");
        }
    }
}

// ── Delivery context ──────────────────────────────────────────────────────────

async fn deliver(mut observers: Vec<Box<dyn LocationObserver>>, mut deliveries: UnboundedReceiver<Delivery>) {
    while let Some(delivery) = deliveries.recv().await {
        match delivery {
            Delivery::Location { sample, arrived } => {
                for observer in observers.iter_mut() {
                    observer.on_location(&sample);
                    if arrived {
                        observer.on_arrival(&sample);
                    }
                }
            }
            Delivery::Stop => {
                for observer in observers.iter_mut() {
                    observer.on_stop();
                }
            }
        }
    }
}
