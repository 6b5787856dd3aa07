// Tracer sampler: the probe lattice that discovers surfaces.
//
// `sample_probes()` seeds probes at `volume.min() + k * step` along each axis
// for every `k` that keeps the probe strictly below `volume.max()`, so a
// volume of full extent `2E` gets `ceil(2E / step)` probes per axis (exactly
// `2E / step` when the step divides the extent). Probe positions are computed
// from the integer index rather than accumulated, so float drift cannot add
// or drop a row. A probe whose placement sphere overlaps geometry is skipped.
//
// `remove_enclosed_probes()` is the optional guard against interior dead
// space: a probe whose six long axial rays are all blocked by one and the same
// object is sitting inside that object and is discarded. The test only sees
// axis-aligned enclosure and is a best-effort optimization.
//
// See also: `extract.rs` which fires the surface rays from the surviving probes.

use crate::config::BuildConfig;
use crate::spatial::{QueryChannel, SpatialQuery};
use crate::types::{AXIAL_DIRECTIONS, Aabb, ObjectId, Vec3};
use tracing::{debug, info};

/// A transient lattice point used to discover surfaces.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Probe {
    pub location: Vec3,
}

/// Lattice coordinates along one axis, from `min` (inclusive) to `max`
/// (exclusive).
fn axis_positions(min: f32, max: f32, step: f32) -> Vec<f32> {
    let mut positions = Vec::new();
    let mut k: u32 = 0;
    loop {
        let p = min + k as f32 * step;
        if p >= max {
            break;
        }
        positions.push(p);
        k += 1;
    }
    positions
}

/// Seed the probe lattice over `volume`, skipping probes that overlap
/// geometry on the world-static channel.
pub fn sample_probes(volume: &Aabb, config: &BuildConfig, query: &dyn SpatialQuery) -> Vec<Probe> {
    let (min, max) = (volume.min(), volume.max());
    let xs = axis_positions(min.x, max.x, config.grid_step);
    let ys = axis_positions(min.y, max.y, config.grid_step);
    let zs = axis_positions(min.z, max.z, config.grid_step);

    let mut probes = Vec::with_capacity(xs.len() * ys.len() * zs.len());
    let mut blocked = 0usize;
    for &x in &xs {
        for &y in &ys {
            for &z in &zs {
                let location = Vec3::new(x, y, z);
                let overlaps = query.sphere_overlap(
                    location,
                    config.probe_radius,
                    QueryChannel::WorldStatic,
                    &config.ignored_objects,
                );
                if overlaps.is_empty() {
                    probes.push(Probe { location });
                } else {
                    blocked += 1;
                }
            }
        }
    }

    debug!(
        lattice = xs.len() * ys.len() * zs.len(),
        placed = probes.len(),
        blocked,
        "sampled probe lattice"
    );
    probes
}

/// The single object blocking all six axial rays from `location`, if any.
fn enclosing_object(
    location: Vec3,
    config: &BuildConfig,
    query: &dyn SpatialQuery,
) -> Option<ObjectId> {
    let mut enclosing: Option<ObjectId> = None;
    for dir in AXIAL_DIRECTIONS {
        let end = location + dir * config.enclosed_check_distance;
        let hit = query.line_trace(
            location,
            end,
            QueryChannel::WorldStatic,
            &config.ignored_objects,
        )?;
        match enclosing {
            None => enclosing = Some(hit.object),
            Some(first) if first != hit.object => return None,
            Some(_) => {}
        }
    }
    enclosing
}

/// Drop probes enclosed on all six axial sides by one object.
pub fn remove_enclosed_probes(
    probes: Vec<Probe>,
    config: &BuildConfig,
    query: &dyn SpatialQuery,
) -> Vec<Probe> {
    let before = probes.len();
    let kept: Vec<Probe> = probes
        .into_iter()
        .filter(|p| enclosing_object(p.location, config, query).is_none())
        .collect();
    info!(removed = before - kept.len(), "removed enclosed probes");
    kept
}
