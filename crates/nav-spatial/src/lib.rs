//! `nav-spatial`: route geometry and the polyline projection engine.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                         |
//! |--------------|------------------------------------------------------------------|
//! | [`polyline`] | `Polyline`, `ProjectionResult`: closest point, advance, slice   |
//! | [`annotate`] | `AnnotatedVertex`, `annotate`: per-vertex heading + turn penalty |
//! | [`route`]    | `RouteGeometry`: shape plus optional expected segment times     |
//! | [`index`]    | `VertexIndex`: R-tree nearest-vertex lookup                     |
//! | [`loader`]   | `load_route_csv`, `load_route_reader`                            |
//! | [`error`]    | `SpatialError`, `SpatialResult<T>`                               |
//!
//! Geometry queries are total: degenerate input yields `None` or an empty
//! polyline, never an error.  Only the loader and the travel-time table
//! validation return `SpatialError`.

pub mod annotate;
pub mod error;
pub mod index;
pub mod loader;
pub mod polyline;
pub mod route;

#[cfg(test)]
mod tests;

pub use annotate::{AnnotatedVertex, TurnPenaltyBand, annotate};
pub use error::{SpatialError, SpatialResult};
pub use index::VertexIndex;
pub use loader::{load_route_csv, load_route_reader};
pub use polyline::{PERPENDICULAR_CAST_M, Polyline, ProjectionResult};
pub use route::RouteGeometry;
