// crates/sweepdb-core/src/model/mod.rs
pub mod entity;
pub mod geometry;

pub use entity::{DateList, RoadMeta, ScheduleEntity, ScheduleKey};
pub use geometry::{Bounds, GeographicPoint, Geometry, Polygon, Polyline, Ring, RingRole};
