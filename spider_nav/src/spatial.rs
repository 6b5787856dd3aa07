// Spatial query service seam.
//
// The builder never looks at world geometry directly. Everything it knows
// about the scene comes through `SpatialQuery`: blocking line traces (with
// hit point, outward surface normal and the hit object's identity) and
// sphere overlap tests. Any engine or collision library can sit behind this
// trait; `scene.rs` provides an in-process implementation over axis-aligned
// boxes that the tests, benches and CLI use.
//
// Queries are blocking and side-effect free. A builder phase issues one query,
// inspects the result, and only then issues the next.

use crate::types::{ObjectId, Vec3};

/// Which responses a query collects. Probe sampling uses `WorldStatic`,
/// visibility checks between nodes use `Visibility`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueryChannel {
    WorldStatic,
    Visibility,
}

/// A blocking hit reported by `SpatialQuery::line_trace`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TraceHit {
    /// World-space impact point.
    pub point: Vec3,
    /// Outward surface normal at the impact point (unit length).
    pub normal: Vec3,
    /// The object that was hit.
    pub object: ObjectId,
    /// Distance from the trace start to `point`.
    pub distance: f32,
}

pub trait SpatialQuery {
    /// First blocking hit on the segment `start -> end`, or `None` when the
    /// segment is clear. Objects in `ignore` are transparent.
    fn line_trace(
        &self,
        start: Vec3,
        end: Vec3,
        channel: QueryChannel,
        ignore: &[ObjectId],
    ) -> Option<TraceHit>;

    /// Distinct objects overlapping the sphere, in ascending id order.
    fn sphere_overlap(
        &self,
        center: Vec3,
        radius: f32,
        channel: QueryChannel,
        ignore: &[ObjectId],
    ) -> Vec<ObjectId>;
}

/// Whether the straight segment between two points is free of blocking
/// geometry on the visibility channel.
pub fn can_see(query: &dyn SpatialQuery, from: Vec3, to: Vec3, ignore: &[ObjectId]) -> bool {
    query
        .line_trace(from, to, QueryChannel::Visibility, ignore)
        .is_none()
}
