// Graph pruner: drop dead ends and renumber.
//
// A node with at most one neighbor cannot be passed through by any path and
// is almost always sampling noise (an isolated cranny, a lone hit on a thin
// prop). `prune_graph()` removes every such node, then re-checks the nodes
// that lost a neighbor, until no node with degree <= 1 remains. References to
// removed nodes are stripped from the survivors, and the survivors are
// renumbered contiguously in their original order.
//
// See also: `builder.rs` which prunes as the last build phase, `nav.rs` for
// the graph being compacted.

use crate::nav::{NavGraph, NavNode, NeighborSet};
use crate::types::NavNodeId;
use tracing::debug;

/// Remove every node that ends up with fewer than two neighbors. Returns the
/// number of nodes removed.
pub fn prune_graph(graph: &mut NavGraph) -> usize {
    let n = graph.node_count();
    let mut degree: Vec<usize> = graph.nodes.iter().map(NavNode::degree).collect();
    let mut alive = vec![true; n];
    let mut pending: Vec<NavNodeId> = graph
        .nodes
        .iter()
        .filter(|node| node.degree() <= 1)
        .map(|node| node.id)
        .collect();

    let mut removed = 0usize;
    while let Some(id) = pending.pop() {
        let i = id.index();
        if !alive[i] {
            continue;
        }
        alive[i] = false;
        removed += 1;
        for &neighbor in graph.neighbors(id) {
            let ni = neighbor.index();
            if alive[ni] {
                degree[ni] -= 1;
                if degree[ni] <= 1 {
                    pending.push(neighbor);
                }
            }
        }
    }

    if removed == 0 {
        return 0;
    }

    // Old index -> new id for the survivors.
    let mut remap: Vec<Option<NavNodeId>> = vec![None; n];
    let mut next = 0u32;
    for (i, &keep) in alive.iter().enumerate() {
        if keep {
            remap[i] = Some(NavNodeId(next));
            next += 1;
        }
    }

    let old_nodes = std::mem::take(&mut graph.nodes);
    graph.nodes = old_nodes
        .into_iter()
        .filter_map(|node| {
            let id = remap[node.id.index()]?;
            let neighbors: NeighborSet = node
                .neighbors
                .iter()
                .filter_map(|nb| remap[nb.index()])
                .collect();
            Some(NavNode {
                id,
                neighbors,
                ..node
            })
        })
        .collect();

    debug!(removed, remaining = graph.node_count(), "pruned graph");
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NodeOrigin, Vec3};

    fn line_graph(count: usize) -> NavGraph {
        let mut graph = NavGraph::new();
        for i in 0..count {
            graph.add_node(
                Vec3::new(i as f32 * 10.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
                NodeOrigin::Surface,
            );
        }
        graph
    }

    #[test]
    fn degree_one_node_is_removed() {
        // Triangle 0-1-2 plus a leaf 3 hanging off node 2.
        let mut graph = line_graph(4);
        graph.add_edge(NavNodeId(0), NavNodeId(1));
        graph.add_edge(NavNodeId(1), NavNodeId(2));
        graph.add_edge(NavNodeId(2), NavNodeId(0));
        graph.add_edge(NavNodeId(2), NavNodeId(3));

        assert_eq!(prune_graph(&mut graph), 1);
        assert_eq!(graph.node_count(), 3);
        assert!(graph.nodes.iter().all(|n| n.degree() == 2));
        assert!(
            graph
                .nodes
                .iter()
                .all(|n| n.location != Vec3::new(30.0, 0.0, 0.0))
        );
    }

    #[test]
    fn isolated_nodes_are_removed() {
        let mut graph = line_graph(2);
        assert_eq!(prune_graph(&mut graph), 2);
        assert!(graph.is_empty());
    }

    #[test]
    fn pruning_repeats_until_stable() {
        // Triangle 0-1-2 with a two-node tail 2-3-4. Removing 4 leaves 3 with
        // a single neighbor, so it goes too.
        let mut graph = line_graph(5);
        graph.add_edge(NavNodeId(0), NavNodeId(1));
        graph.add_edge(NavNodeId(1), NavNodeId(2));
        graph.add_edge(NavNodeId(2), NavNodeId(0));
        graph.add_edge(NavNodeId(2), NavNodeId(3));
        graph.add_edge(NavNodeId(3), NavNodeId(4));

        assert_eq!(prune_graph(&mut graph), 2);
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn survivors_are_renumbered_in_order() {
        // Leaf 0 hangs off a square 1-2-3-4.
        let mut graph = line_graph(5);
        graph.add_edge(NavNodeId(0), NavNodeId(1));
        graph.add_edge(NavNodeId(1), NavNodeId(2));
        graph.add_edge(NavNodeId(2), NavNodeId(3));
        graph.add_edge(NavNodeId(3), NavNodeId(4));
        graph.add_edge(NavNodeId(4), NavNodeId(1));

        assert_eq!(prune_graph(&mut graph), 1);
        for (i, node) in graph.nodes.iter().enumerate() {
            assert_eq!(node.id, NavNodeId(i as u32));
            assert_eq!(node.location, Vec3::new((i + 1) as f32 * 10.0, 0.0, 0.0));
            for &nb in &node.neighbors {
                assert!(nb.index() < graph.node_count());
                assert!(graph.are_neighbors(nb, node.id));
            }
        }
        assert_eq!(graph.neighbors(NavNodeId(0)), &[NavNodeId(1), NavNodeId(3)]);
    }

    #[test]
    fn well_connected_graph_is_untouched() {
        let mut graph = line_graph(3);
        graph.add_edge(NavNodeId(0), NavNodeId(1));
        graph.add_edge(NavNodeId(1), NavNodeId(2));
        graph.add_edge(NavNodeId(2), NavNodeId(0));
        let before = graph.clone();
        assert_eq!(prune_graph(&mut graph), 0);
        assert_eq!(graph, before);
    }
}
