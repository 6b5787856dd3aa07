// In-process spatial query service over axis-aligned boxes.
//
// A `BoxScene` is a list of `SceneObject`s, each a compound of one or more
// axis-aligned boxes sharing one `ObjectId` (a hollow room made of six wall
// slabs is a single object). Line traces use the slab method per box and
// report the nearest entry point, with the outward normal of the face that
// was crossed. A trace that starts inside a box reports a hit at its start
// with the normal opposing the ray, which is what the enclosed-probe check
// expects from solid geometry.
//
// Each object chooses which query channels it responds to, so scenes can
// hold geometry that blocks sight lines but not probe rays (or the reverse).
//
// `SceneFile` bundles a scene with the build volume for the CLI.
//
// See also: `spatial.rs` for the trait this implements, `tracer.rs` and
// `extract.rs` for the probe-side queries, `adjacency.rs` for visibility.

use crate::error::Result;
use crate::spatial::{QueryChannel, SpatialQuery, TraceHit};
use crate::types::{Aabb, ObjectId, Vec3};
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_true() -> bool {
    true
}

/// One world object: a union of boxes with a shared identity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub id: ObjectId,
    pub boxes: Vec<Aabb>,
    /// Responds to `QueryChannel::WorldStatic`.
    #[serde(default = "default_true")]
    pub blocks_static: bool,
    /// Responds to `QueryChannel::Visibility`.
    #[serde(default = "default_true")]
    pub blocks_visibility: bool,
}

impl SceneObject {
    /// A solid single-box object blocking every channel.
    pub fn solid(id: ObjectId, aabb: Aabb) -> Self {
        Self {
            id,
            boxes: vec![aabb],
            blocks_static: true,
            blocks_visibility: true,
        }
    }

    fn responds_to(&self, channel: QueryChannel) -> bool {
        match channel {
            QueryChannel::WorldStatic => self.blocks_static,
            QueryChannel::Visibility => self.blocks_visibility,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoxScene {
    pub objects: Vec<SceneObject>,
}

impl BoxScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, object: SceneObject) {
        self.objects.push(object);
    }

    /// Add a single solid box and return its object id.
    pub fn add_box(&mut self, id: ObjectId, aabb: Aabb) -> ObjectId {
        self.objects.push(SceneObject::solid(id, aabb));
        id
    }

    fn candidates<'a>(
        &'a self,
        channel: QueryChannel,
        ignore: &'a [ObjectId],
    ) -> impl Iterator<Item = &'a SceneObject> + 'a {
        self.objects
            .iter()
            .filter(move |o| o.responds_to(channel) && !ignore.contains(&o.id))
    }
}

/// Slab-test entry of the segment `start + t * dir, t in [0, 1]` into `aabb`.
/// Returns the entry parameter and the outward normal of the entry face.
fn segment_box_entry(start: Vec3, dir: Vec3, aabb: &Aabb) -> Option<(f32, Vec3)> {
    let (min, max) = (aabb.min(), aabb.max());
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    let mut normal = Vec3::ZERO;

    for axis in 0..3 {
        let s = start.axis(axis);
        let d = dir.axis(axis);
        let (lo, hi) = (min.axis(axis), max.axis(axis));
        if d == 0.0 {
            if s < lo || s > hi {
                return None;
            }
            continue;
        }
        let t_lo = (lo - s) / d;
        let t_hi = (hi - s) / d;
        // Entering through the low face means the outward normal points to -axis.
        let (near, far, sign) = if t_lo < t_hi {
            (t_lo, t_hi, -1.0)
        } else {
            (t_hi, t_lo, 1.0)
        };
        if near > t_enter {
            t_enter = near;
            normal = axis_unit(axis, sign);
        }
        t_exit = t_exit.min(far);
    }

    if t_enter > t_exit || t_exit < 0.0 || t_enter > 1.0 {
        return None;
    }
    if t_enter < 0.0 {
        // Started inside the box.
        return Some((0.0, -dir.normalized()));
    }
    Some((t_enter, normal))
}

fn axis_unit(axis: usize, sign: f32) -> Vec3 {
    match axis {
        0 => Vec3::new(sign, 0.0, 0.0),
        1 => Vec3::new(0.0, sign, 0.0),
        _ => Vec3::new(0.0, 0.0, sign),
    }
}

impl SpatialQuery for BoxScene {
    fn line_trace(
        &self,
        start: Vec3,
        end: Vec3,
        channel: QueryChannel,
        ignore: &[ObjectId],
    ) -> Option<TraceHit> {
        let dir = end - start;
        let length = dir.length();
        let mut best: Option<(f32, Vec3, ObjectId)> = None;

        for object in self.candidates(channel, ignore) {
            for aabb in &object.boxes {
                if let Some((t, normal)) = segment_box_entry(start, dir, aabb) {
                    if best.is_none_or(|(bt, _, _)| t < bt) {
                        best = Some((t, normal, object.id));
                    }
                }
            }
        }

        best.map(|(t, normal, object)| TraceHit {
            point: start + dir * t,
            normal,
            object,
            distance: t * length,
        })
    }

    fn sphere_overlap(
        &self,
        center: Vec3,
        radius: f32,
        channel: QueryChannel,
        ignore: &[ObjectId],
    ) -> Vec<ObjectId> {
        let r_sq = radius * radius;
        let mut hits: Vec<ObjectId> = self
            .candidates(channel, ignore)
            .filter(|o| o.boxes.iter().any(|b| b.distance_squared_to(center) < r_sq))
            .map(|o| o.id)
            .collect();
        hits.sort();
        hits.dedup();
        hits
    }
}

/// A scene plus the volume to build over, as stored on disk.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneFile {
    pub volume: Aabb,
    #[serde(flatten)]
    pub scene: BoxScene,
}

impl SceneFile {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
