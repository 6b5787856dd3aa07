// Surface point extractor.
//
// Every probe fires one ray of `trace_distance()` along each of the six axial
// directions. A blocking hit on an eligible object (allow/deny lists) becomes
// a candidate surface point, pushed `bounce_distance` off the surface along
// the hit normal so nodes float just above the geometry. Candidates closer
// than `min_separation()` to an already accepted candidate are dropped.
//
// The separation test is a linear scan over the accepted set. Extraction runs
// offline and the accepted set is bounded by the scene's surface area over
// the separation distance, so the quadratic cost is acceptable.
//
// See also: `tracer.rs` for the probe lattice, `builder.rs` which turns the
// accepted candidates into surface nodes in the same order.
//
// **Critical constraint: determinism.** Candidates are accepted in probe order
// then axial-direction order, so the same probes and scene always yield the
// same candidate list.

use crate::config::BuildConfig;
use crate::geometry::is_too_close;
use crate::spatial::{QueryChannel, SpatialQuery};
use crate::tracer::Probe;
use crate::types::{AXIAL_DIRECTIONS, ObjectId, Vec3};
use tracing::debug;

/// A deduplicated point just above a surface, with the surface's normal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceCandidate {
    pub location: Vec3,
    pub normal: Vec3,
    /// The object whose surface produced the candidate.
    pub object: ObjectId,
}

/// Trace the six axial rays from every probe and collect the accepted
/// surface candidates.
pub fn extract_surface_points(
    probes: &[Probe],
    config: &BuildConfig,
    query: &dyn SpatialQuery,
) -> Vec<SurfaceCandidate> {
    let trace_distance = config.trace_distance();
    let min_separation = config.min_separation();

    let mut accepted: Vec<SurfaceCandidate> = Vec::new();
    // Locations mirrored separately so the separation scan stays contiguous.
    let mut locations: Vec<Vec3> = Vec::new();
    let mut hits = 0usize;
    let mut filtered = 0usize;
    let mut too_close = 0usize;

    for probe in probes {
        for dir in AXIAL_DIRECTIONS {
            let end = probe.location + dir * trace_distance;
            let Some(hit) = query.line_trace(
                probe.location,
                end,
                QueryChannel::WorldStatic,
                &config.ignored_objects,
            ) else {
                continue;
            };
            hits += 1;

            if !config.accepts_surface(hit.object) {
                filtered += 1;
                continue;
            }

            let location = hit.point + hit.normal * config.bounce_distance;
            if is_too_close(&locations, location, min_separation) {
                too_close += 1;
                continue;
            }

            locations.push(location);
            accepted.push(SurfaceCandidate {
                location,
                normal: hit.normal,
                object: hit.object,
            });
        }
    }

    debug!(
        probes = probes.len(),
        hits,
        filtered,
        too_close,
        accepted = accepted.len(),
        "extracted surface points"
    );
    accepted
}
