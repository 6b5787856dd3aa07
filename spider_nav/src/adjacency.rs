// Adjacency builder: direct neighbors and possible-edge pairs.
//
// For every node, all other nodes within `connection_radius()` are examined
// in ascending id order. A pair with a clear visibility segment between them
// becomes a direct neighbor (symmetric, deduplicated edge). A pair that is
// close but occluded is a possible-edge pair: the two nodes most likely sit on
// faces meeting at a corner, and a straight edge would cut through it. Those
// pairs are handed to the edge synthesizer and never connected directly.
//
// The neighborhood search goes through an R-tree over node locations instead
// of asking the spatial query service for overlaps, since nodes are not
// scene objects.
//
// See also: `edge.rs` which consumes the possible-edge pairs, `spatial.rs`
// for `can_see()`.
//
// **Critical constraint: determinism.** Neighbor candidates are sorted by id
// before they are classified, so the R-tree's internal order never leaks into
// the graph.

use crate::config::BuildConfig;
use crate::nav::NavGraph;
use crate::spatial::{SpatialQuery, can_see};
use crate::types::{NavNodeId, Vec3};
use rstar::RTree;
use rstar::primitives::GeomWithData;
use rustc_hash::FxHashSet;
use tracing::debug;

type IndexedNode = GeomWithData<[f32; 3], NavNodeId>;

/// R-tree over node locations for radius queries.
pub struct NodeIndex {
    tree: RTree<IndexedNode>,
}

impl NodeIndex {
    pub fn new(graph: &NavGraph) -> Self {
        let entries: Vec<IndexedNode> = graph
            .nodes
            .iter()
            .map(|n| GeomWithData::new(n.location.to_array(), n.id))
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Ids of all indexed nodes within `radius` of `point`, ascending.
    pub fn within(&self, point: Vec3, radius: f32) -> Vec<NavNodeId> {
        let mut ids: Vec<NavNodeId> = self
            .tree
            .locate_within_distance(point.to_array(), radius * radius)
            .map(|entry| entry.data)
            .collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

/// Two nearby nodes without line of sight. `a < b`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PossibleEdge {
    pub a: NavNodeId,
    pub b: NavNodeId,
}

impl PossibleEdge {
    pub fn new(x: NavNodeId, y: NavNodeId) -> Self {
        if x < y {
            Self { a: x, b: y }
        } else {
            Self { a: y, b: x }
        }
    }
}

/// Outcome of the adjacency pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Adjacency {
    /// Number of direct edges created.
    pub direct_edges: usize,
    /// Occluded pairs in discovery order, each unordered pair once.
    pub possible_edges: Vec<PossibleEdge>,
}

/// Connect every mutually visible pair of nodes within the connection radius
/// and collect the occluded pairs for edge synthesis.
pub fn connect_neighbors(
    graph: &mut NavGraph,
    config: &BuildConfig,
    query: &dyn SpatialQuery,
) -> Adjacency {
    let index = NodeIndex::new(graph);
    let radius = config.connection_radius();

    let mut adjacency = Adjacency::default();
    let mut seen_possible: FxHashSet<PossibleEdge> = FxHashSet::default();
    let mut traces = 0usize;

    for i in 0..graph.node_count() {
        let n = NavNodeId(i as u32);
        let from = graph.node(n).location;
        for m in index.within(from, radius) {
            if m == n || graph.are_neighbors(n, m) {
                continue;
            }
            let pair = PossibleEdge::new(n, m);
            if seen_possible.contains(&pair) {
                continue;
            }

            traces += 1;
            let to = graph.node(m).location;
            if can_see(query, from, to, &config.ignored_objects) {
                graph.add_edge(n, m);
                adjacency.direct_edges += 1;
            } else {
                seen_possible.insert(pair);
                adjacency.possible_edges.push(pair);
            }
        }
    }

    debug!(
        nodes = graph.node_count(),
        traces,
        direct = adjacency.direct_edges,
        possible = adjacency.possible_edges.len(),
        "built adjacency"
    );
    adjacency
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::BoxScene;
    use crate::types::{Aabb, NodeOrigin, ObjectId};

    fn config() -> BuildConfig {
        BuildConfig {
            auto_save: false,
            ..BuildConfig::default()
        }
    }

    fn up() -> Vec3 {
        Vec3::new(0.0, 1.0, 0.0)
    }

    #[test]
    fn index_radius_query_is_sorted() {
        let mut graph = NavGraph::new();
        graph.add_node(Vec3::new(100.0, 0.0, 0.0), up(), NodeOrigin::Surface);
        graph.add_node(Vec3::new(0.0, 0.0, 0.0), up(), NodeOrigin::Surface);
        graph.add_node(Vec3::new(300.0, 0.0, 0.0), up(), NodeOrigin::Surface);
        let index = NodeIndex::new(&graph);
        assert_eq!(index.len(), 3);
        assert_eq!(
            index.within(Vec3::new(50.0, 0.0, 0.0), 60.0),
            vec![NavNodeId(0), NavNodeId(1)]
        );
        assert!(index.within(Vec3::new(200.0, 50.0, 0.0), 10.0).is_empty());
    }

    #[test]
    fn visible_nodes_in_range_become_direct_neighbors() {
        let scene = BoxScene::new();
        let mut graph = NavGraph::new();
        let a = graph.add_node(Vec3::new(0.0, 0.0, 0.0), up(), NodeOrigin::Surface);
        let b = graph.add_node(Vec3::new(100.0, 0.0, 0.0), up(), NodeOrigin::Surface);
        let c = graph.add_node(Vec3::new(100.0, 0.0, 100.0), up(), NodeOrigin::Surface);
        // Beyond the 150 connection radius from everything.
        let d = graph.add_node(Vec3::new(400.0, 0.0, 0.0), up(), NodeOrigin::Surface);

        let adjacency = connect_neighbors(&mut graph, &config(), &scene);
        assert_eq!(adjacency.direct_edges, 3);
        assert!(adjacency.possible_edges.is_empty());
        assert!(graph.are_neighbors(a, b) && graph.are_neighbors(b, a));
        assert!(graph.are_neighbors(b, c) && graph.are_neighbors(c, b));
        assert!(graph.are_neighbors(a, c) && graph.are_neighbors(c, a));
        assert_eq!(graph.node(d).degree(), 0);
    }

    #[test]
    fn occluded_pair_is_recorded_once() {
        let mut scene = BoxScene::new();
        scene.add_box(ObjectId(1), Aabb::new(Vec3::ZERO, Vec3::new(50.0, 50.0, 50.0)));
        let mut graph = NavGraph::new();
        let top = graph.add_node(Vec3::new(0.0, 53.0, 0.0), up(), NodeOrigin::Surface);
        let side = graph.add_node(
            Vec3::new(53.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            NodeOrigin::Surface,
        );

        let adjacency = connect_neighbors(&mut graph, &config(), &scene);
        assert_eq!(adjacency.direct_edges, 0);
        assert_eq!(adjacency.possible_edges, vec![PossibleEdge::new(side, top)]);
        assert_eq!(adjacency.possible_edges[0].a, top);
        assert!(!graph.are_neighbors(top, side));
    }

    #[test]
    fn ignored_objects_do_not_occlude() {
        let mut scene = BoxScene::new();
        scene.add_box(ObjectId(1), Aabb::new(Vec3::ZERO, Vec3::new(50.0, 50.0, 50.0)));
        let mut graph = NavGraph::new();
        let top = graph.add_node(Vec3::new(0.0, 53.0, 0.0), up(), NodeOrigin::Surface);
        let side = graph.add_node(Vec3::new(53.0, 0.0, 0.0), up(), NodeOrigin::Surface);
        let config = BuildConfig {
            ignored_objects: vec![ObjectId(1)],
            ..config()
        };

        let adjacency = connect_neighbors(&mut graph, &config, &scene);
        assert_eq!(adjacency.direct_edges, 1);
        assert!(graph.are_neighbors(top, side));
    }

    #[test]
    fn empty_graph_has_no_adjacency() {
        let mut graph = NavGraph::new();
        let adjacency = connect_neighbors(&mut graph, &config(), &BoxScene::new());
        assert_eq!(adjacency, Adjacency::default());
        assert!(NodeIndex::new(&graph).is_empty());
    }
}
