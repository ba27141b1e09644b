//! Probabilistic roadmap generation.
//!
//! A generation pass runs four stages over one borrowed grid:
//!
//! ```text
//! OccupancyGrid ─► Sampler ─► Connector ─► Repairer ─► Roadmap
//! ```
//!
//! - [`Sampler`] draws free-space waypoints at least D apart
//! - [`Connector`] links each waypoint to up to K neighbors within R
//! - [`Repairer`] joins leftover components under a growing radius
//! - [`Roadmap`] holds the result read-only
//!
//! [`RoadmapBuilder`] wires the stages together and polls a
//! [`GenerationBudget`] between units of work.

mod budget;
mod builder;
mod connector;
mod graph;
mod repair;
mod sampler;
mod store;

pub use budget::GenerationBudget;
pub use builder::RoadmapBuilder;
pub use connector::{ConnectOutcome, Connector};
pub use graph::{Edge, EdgeKind, Waypoint, WaypointGraph, WaypointId};
pub use repair::{RepairOutcome, RepairState, Repairer};
pub use sampler::{SampleOutcome, Sampler};
pub use store::{ConnectivityStatus, EdgeRecord, GenerationStats, Roadmap, WaypointRecord};
