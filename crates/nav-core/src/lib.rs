//! `nav-core`: foundational types for the `rust_navsim` route simulator.
//!
//! This crate is a dependency of every other `nav-*` crate.  It intentionally
//! has no `nav-*` dependencies and minimal external ones (only `thiserror`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module         | Contents                                                  |
//! |----------------|-----------------------------------------------------------|
//! | [`geo`]        | `GeoPoint`, `RadianPoint`, bearing / distance / destination, planar segment intersection |
//! | [`time`]       | `Timestamp`, `Clock`, `MonotonicClock`, `SteppingClock`   |
//! | [`config`]     | `SimulationConfig`                                        |
//! | [`location`]   | `LocationSample`: one simulated fix                      |
//! | [`error`]      | `NavError`, `NavResult`                                   |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod location;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{MAX_WALL_TICK_INTERVAL, SimulationConfig, checked_wall_tick_interval, validate_speed_multiplier};
pub use error::{NavError, NavResult};
pub use geo::{EARTH_RADIUS_M, GeoPoint, RadianPoint, angular_difference, segment_intersection, wrap_degrees};
pub use location::LocationSample;
pub use time::{Clock, MonotonicClock, SteppingClock, Timestamp};
