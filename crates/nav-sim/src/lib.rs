//! `nav-sim`: runs a [`RouteSimulator`][nav_mobility::RouteSimulator] in
//! real time.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                       |
//! |--------------|----------------------------------------------------------------|
//! | [`timer`]    | `TickTimer`: cancelable periodic timer with arm/disarm/reset  |
//! | [`observer`] | `LocationObserver` trait, `NoopObserver`, `ChannelObserver`    |
//! | [`manager`]  | `SimulatedLocationManager`: the serial-context actor          |
//! | [`builder`]  | `ManagerBuilder`                                               |
//! | [`error`]    | `SimError`, `SimResult<T>`                                     |
//!
//! # Threading model
//!
//! All simulator state lives on one tokio task (the *serial context*).  The
//! timer, route changes, progress updates and queries all reach it as
//! messages on a single channel, so they are applied strictly in order and a
//! reroute is always visible to the next tick.  Each emitted location is
//! handed to a second task (the *delivery context*, on a runtime the caller
//! chooses) with exactly one message, and observers run there.

pub mod builder;
pub mod error;
pub mod manager;
pub mod observer;
pub mod timer;


pub use builder::ManagerBuilder;
pub use error::{SimError, SimResult};
pub use manager::SimulatedLocationManager;
pub use observer::{ChannelObserver, LocationEvent, LocationObserver, NoopObserver};
pub use timer::TickTimer;
