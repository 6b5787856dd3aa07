// Navigation graph for surface-walking agents.
//
// The nav graph is an arena of `NavNode`s: a world-space location, the
// surface normal an agent should align to there, an origin tag, and an
// undirected neighbor set stored as node indices. Edges carry no data of
// their own; their traversal cost is the Euclidean distance between the two
// endpoints, computed on demand by the pathfinder.
//
// All storage uses `Vec` indexed by `NavNodeId` for O(1) lookup and
// deterministic iteration order. Neighbor sets are small inline vectors kept
// duplicate-free: `add_edge()` is symmetric and idempotent, so "A lists B"
// always implies "B lists A".
//
// See also: `builder.rs` which fills a graph phase by phase, `prune.rs` which
// compacts it, `persist.rs` for the saved form, `pathfinding.rs` for A*.
//
// **Critical constraint: determinism.** Node ids are sequential integers
// assigned in insertion order; the builder inserts in a fixed order.

use crate::types::{NavNodeId, NodeOrigin, Vec3};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Neighbor set of a node. Most surface nodes have up to eight neighbors on a
/// flat patch of grid, so that many stay inline.
pub type NeighborSet = SmallVec<[NavNodeId; 8]>;

/// A node in the navigation graph: a point an agent can cling to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NavNode {
    pub id: NavNodeId,
    pub location: Vec3,
    /// Unit normal of the surface the node sits on.
    pub normal: Vec3,
    pub origin: NodeOrigin,
    pub neighbors: NeighborSet,
}

impl NavNode {
    pub fn degree(&self) -> usize {
        self.neighbors.len()
    }
}

/// The navigation graph container.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NavGraph {
    pub nodes: Vec<NavNode>,
}

impl NavGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node with no neighbors. Returns its ID.
    pub fn add_node(&mut self, location: Vec3, normal: Vec3, origin: NodeOrigin) -> NavNodeId {
        let id = NavNodeId(self.nodes.len() as u32);
        self.nodes.push(NavNode {
            id,
            location,
            normal,
            origin,
            neighbors: NeighborSet::new(),
        });
        id
    }

    /// Connect two nodes in both directions. Self-loops and repeated edges
    /// are ignored. Returns `true` if a new edge was created.
    pub fn add_edge(&mut self, a: NavNodeId, b: NavNodeId) -> bool {
        if a == b || self.are_neighbors(a, b) {
            return false;
        }
        self.nodes[a.index()].neighbors.push(b);
        self.nodes[b.index()].neighbors.push(a);
        true
    }

    pub fn are_neighbors(&self, a: NavNodeId, b: NavNodeId) -> bool {
        self.nodes[a.index()].neighbors.contains(&b)
    }

    /// Neighbor ids of a node.
    pub fn neighbors(&self, node: NavNodeId) -> &[NavNodeId] {
        &self.nodes[node.index()].neighbors
    }

    /// Get a node by ID.
    pub fn node(&self, id: NavNodeId) -> &NavNode {
        &self.nodes[id.index()]
    }

    /// Look up a node by an id that may not belong to this graph.
    pub fn get(&self, id: NavNodeId) -> Option<&NavNode> {
        self.nodes.get(id.index())
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(NavNode::degree).sum::<usize>() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Traversal cost of the edge between two nodes.
    pub fn edge_cost(&self, a: NavNodeId, b: NavNodeId) -> f32 {
        self.node(a).location.distance(self.node(b).location)
    }

    /// Find the node closest to `point` by Euclidean distance. Ties go to the
    /// lowest id. Returns `None` if the graph is empty.
    pub fn find_nearest_node(&self, point: Vec3) -> Option<NavNodeId> {
        let mut best: Option<(f32, NavNodeId)> = None;
        for node in &self.nodes {
            let d = node.location.distance_squared(point);
            if best.is_none_or(|(bd, _)| d < bd) {
                best = Some((d, node.id));
            }
        }
        best.map(|(_, id)| id)
    }

    /// Count nodes by origin: `(surface, edge)`.
    pub fn origin_counts(&self) -> (usize, usize) {
        let edge = self
            .nodes
            .iter()
            .filter(|n| n.origin == NodeOrigin::Edge)
            .count();
        (self.nodes.len() - edge, edge)
    }
}
