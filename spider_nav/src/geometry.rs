// Geometry primitives used by the builder.
//
// `closest_approach()` finds the nearest points between two infinite 3D lines,
// each given by two points. It follows the classic Bourke formulation built
// from `d(m, n, o, p) = (v_m - v_n) . (v_o - v_p)` over the four defining
// points, solving the 2x2 system for the two line parameters.
// `is_too_close()` is the linear minimum-separation test used to deduplicate
// surface candidates.
//
// See also: `edge.rs` for the edge synthesizer that interprets the line
// parameters, `extract.rs` for candidate deduplication.

use crate::types::Vec3;

/// Denominators below this are treated as parallel / degenerate lines.
const DEGENERATE_EPSILON: f32 = 1e-6;

/// Result of a closest-approach query between line A (`a0 -> a1`) and
/// line B (`b0 -> b1`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineApproach {
    /// Closest point on line A.
    pub point_a: Vec3,
    /// Closest point on line B.
    pub point_b: Vec3,
    /// Parameter along A: `point_a = a0 + mu_a * (a1 - a0)`.
    pub mu_a: f32,
    /// Parameter along B: `point_b = b0 + mu_b * (b1 - b0)`.
    pub mu_b: f32,
}

impl LineApproach {
    /// Perpendicular gap between the two lines at closest approach.
    pub fn gap(&self) -> f32 {
        self.point_a.distance(self.point_b)
    }
}

/// `(m - n) . (o - p)`.
fn d(m: Vec3, n: Vec3, o: Vec3, p: Vec3) -> f32 {
    (m - n).dot(o - p)
}

/// Closest points between the infinite lines through `a0, a1` and `b0, b1`.
///
/// Returns `None` when the lines are parallel or either defining segment has
/// zero length; there is no unique closest pair in those cases.
pub fn closest_approach(a0: Vec3, a1: Vec3, b0: Vec3, b1: Vec3) -> Option<LineApproach> {
    let d_b = d(b1, b0, b1, b0);
    let d_a = d(a1, a0, a1, a0);
    if d_a < DEGENERATE_EPSILON || d_b < DEGENERATE_EPSILON {
        return None;
    }

    let d_ab = d(b1, b0, a1, a0);
    let denom = d_a * d_b - d_ab * d_ab;
    // Relative test: the denominator scales with the squared segment lengths.
    if denom.abs() <= DEGENERATE_EPSILON * d_a * d_b {
        return None;
    }

    let d_0_b = d(a0, b0, b1, b0);
    let d_0_a = d(a0, b0, a1, a0);
    let mu_a = (d_0_b * d_ab - d_0_a * d_b) / denom;
    let mu_b = (d_0_b + mu_a * d_ab) / d_b;

    Some(LineApproach {
        point_a: a0 + (a1 - a0) * mu_a,
        point_b: b0 + (b1 - b0) * mu_b,
        mu_a,
        mu_b,
    })
}

/// Whether any point in `accepted` lies strictly closer than `min_distance`
/// to `candidate`. Linear scan.
pub fn is_too_close(accepted: &[Vec3], candidate: Vec3, min_distance: f32) -> bool {
    let min_sq = min_distance * min_distance;
    accepted
        .iter()
        .any(|p| p.distance_squared(candidate) < min_sq)
}
