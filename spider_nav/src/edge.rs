// Edge synthesizer: bridge node pairs that meet at a geometric edge.
//
// Two nearby nodes without line of sight usually sit on two faces that meet
// at a convex or concave edge. For such a pair (N, M) the synthesizer casts a
// short axial segment from each node, `edge_trace_distance()` long, over every
// combination of non-parallel axial directions, and finds where the two
// (generally skew) lines pass closest. A combination is accepted when the gap
// between the lines is below `edge_max_deviation()` and the meeting point lies
// ahead of M (`mu_b > 0`). The meeting point on N's line must then be visible
// from both N and M. The first combination that passes, in `AXIAL_DIRECTIONS`
// order, places an edge node there linked to both.
//
// A pair is tried with N as the lower id first and, if nothing is accepted,
// with the roles swapped. A node already within `min_separation()` of a new
// meeting point (a surface node, or an edge node placed for an earlier pair)
// is reused instead of stacking a second node on the same spot, but only when
// both N and M can see it; a nearby node hidden behind the corner gets a fresh
// edge node beside it instead. All links go through `NavGraph::add_edge()` and
// are deduplicated.
//
// This is the dominant cost of a build: up to 24 line pairs and two
// visibility traces per accepted pair, for every possible-edge pair.
//
// See also: `adjacency.rs` which produces the possible-edge pairs,
// `geometry.rs` for `closest_approach()`.

use crate::adjacency::{NodeIndex, PossibleEdge};
use crate::config::BuildConfig;
use crate::geometry::closest_approach;
use crate::nav::NavGraph;
use crate::spatial::{SpatialQuery, can_see};
use crate::types::{AXIAL_DIRECTIONS, NavNodeId, NodeOrigin, Vec3, axial_axis};
use tracing::debug;

/// Outcome of the edge synthesis pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EdgeSynthesis {
    /// Pairs linked through an edge node, new or reused.
    pub bridged_pairs: usize,
    /// New edge nodes placed.
    pub edge_nodes: usize,
    /// Pairs bridged through a visible node that was already there.
    pub reused_nodes: usize,
}

/// The meeting point of the first accepted direction combination for the
/// ordered pair `(n, m)`, if any.
fn find_edge_point(
    graph: &NavGraph,
    n: NavNodeId,
    m: NavNodeId,
    config: &BuildConfig,
    query: &dyn SpatialQuery,
) -> Option<Vec3> {
    let length = config.edge_trace_distance();
    let max_gap = config.edge_max_deviation();
    let n_loc = graph.node(n).location;
    let m_loc = graph.node(m).location;

    for dir1 in AXIAL_DIRECTIONS {
        for dir2 in AXIAL_DIRECTIONS {
            if axial_axis(dir1) == axial_axis(dir2) {
                continue;
            }
            let Some(approach) =
                closest_approach(n_loc, n_loc + dir1 * length, m_loc, m_loc + dir2 * length)
            else {
                continue;
            };
            if approach.gap() >= max_gap || approach.mu_b <= 0.0 {
                continue;
            }
            let point = approach.point_a;
            if can_see(query, n_loc, point, &config.ignored_objects)
                && can_see(query, m_loc, point, &config.ignored_objects)
            {
                return Some(point);
            }
        }
    }
    None
}

/// Place edge nodes for the given possible-edge pairs.
pub fn synthesize_edges(
    graph: &mut NavGraph,
    pairs: &[PossibleEdge],
    config: &BuildConfig,
    query: &dyn SpatialQuery,
) -> EdgeSynthesis {
    let reuse_distance = config.min_separation();
    let reuse_distance_sq = reuse_distance * reuse_distance;
    // Surface nodes are fixed for the whole pass; edge nodes are tracked as
    // they are placed.
    let surface_index = NodeIndex::new(graph);
    let mut placed: Vec<NavNodeId> = Vec::new();
    let mut result = EdgeSynthesis::default();

    for pair in pairs {
        if graph.are_neighbors(pair.a, pair.b) {
            continue;
        }
        let Some(point) = find_edge_point(graph, pair.a, pair.b, config, query)
            .or_else(|| find_edge_point(graph, pair.b, pair.a, config, query))
        else {
            continue;
        };

        let nearby: Vec<NavNodeId> = surface_index
            .within(point, reuse_distance)
            .into_iter()
            .chain(placed.iter().copied())
            .filter(|&id| graph.node(id).location.distance_squared(point) < reuse_distance_sq)
            .collect();
        // The meeting point sits on one of the pair itself; linking would
        // connect the occluded pair directly.
        if nearby.contains(&pair.a) || nearby.contains(&pair.b) {
            continue;
        }

        let a_loc = graph.node(pair.a).location;
        let b_loc = graph.node(pair.b).location;
        let reusable = nearby.into_iter().find(|&id| {
            let loc = graph.node(id).location;
            can_see(query, a_loc, loc, &config.ignored_objects)
                && can_see(query, b_loc, loc, &config.ignored_objects)
        });
        let edge_node = match reusable {
            Some(id) => {
                result.reused_nodes += 1;
                id
            }
            None => {
                let normal = (graph.node(pair.a).normal + graph.node(pair.b).normal).normalized();
                let id = graph.add_node(point, normal, NodeOrigin::Edge);
                placed.push(id);
                result.edge_nodes += 1;
                id
            }
        };
        graph.add_edge(edge_node, pair.a);
        graph.add_edge(edge_node, pair.b);
        result.bridged_pairs += 1;
    }

    debug!(
        pairs = pairs.len(),
        bridged = result.bridged_pairs,
        edge_nodes = result.edge_nodes,
        reused = result.reused_nodes,
        "synthesized edge nodes"
    );
    result
}
