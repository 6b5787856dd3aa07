// A* pathfinding over the navigation graph.
//
// Implements A* with a `BinaryHeap` open set (min-heap via reversed ordering,
// ties broken by node id). Per-query bookkeeping lives in a `Vec<SearchNode>`
// indexed by `NavNodeId`, allocated fresh for every query, so nothing carries
// over between searches and one graph can serve any number of queries.
// Improved nodes are re-inserted rather than decreased in place; stale heap
// entries are skipped when popped.
//
// Edge cost and heuristic are both the Euclidean distance between node
// locations. The heuristic therefore never overestimates, and a completed
// search returns a shortest path.
//
// When the open set runs dry without reaching the goal, the search does not
// fail: it returns the path to the closed node (other than the start) with
// the lowest recorded F, flagged incomplete. A start with no reachable
// neighbors yields an empty, incomplete result.
//
// See also: `nav.rs` for the `NavGraph` being searched, `navigator.rs` which
// maps world points to nodes and wraps the result for callers.
//
// **Critical constraint: determinism.** A* is a pure function of graph
// state and start/goal nodes, with `total_cmp` for ordering.

use crate::nav::NavGraph;
use crate::types::NavNodeId;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Outcome of an A* query.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathSearch {
    /// Node ids from start to the path's end (inclusive).
    pub nodes: Vec<NavNodeId>,
    /// Sum of edge costs along `nodes`.
    pub total_cost: f32,
    /// `true` when `nodes` ends at the goal; `false` for a best-effort path.
    pub found_complete: bool,
}

/// A* bookkeeping for one node during one query.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SearchNode {
    /// Cost of the cheapest known path from the start.
    pub g: f32,
    /// Heuristic distance to the goal.
    pub h: f32,
    /// `g + h`.
    pub f: f32,
    pub opened: bool,
    pub closed: bool,
    pub parent: Option<NavNodeId>,
}

/// Entry in the A* open set (min-heap via reversed ordering).
struct OpenEntry {
    node: NavNodeId,
    f_score: f32,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.f_score.total_cmp(&other.f_score) == Ordering::Equal && self.node == other.node
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap: smallest f_score is "greatest".
        other
            .f_score
            .total_cmp(&self.f_score)
            .then_with(|| other.node.0.cmp(&self.node.0))
    }
}

/// Find the shortest path from `start` to `goal`, or the best partial path
/// when the goal is unreachable.
///
/// Ids that do not belong to `graph` produce an empty, incomplete result.
pub fn astar(graph: &NavGraph, start: NavNodeId, goal: NavNodeId) -> PathSearch {
    if graph.get(start).is_none() || graph.get(goal).is_none() {
        return PathSearch::default();
    }
    if start == goal {
        return PathSearch {
            nodes: vec![start],
            total_cost: 0.0,
            found_complete: true,
        };
    }

    let goal_location = graph.node(goal).location;
    let heuristic = |id: NavNodeId| graph.node(id).location.distance(goal_location);

    let mut search = vec![SearchNode::default(); graph.node_count()];
    let h_start = heuristic(start);
    search[start.index()] = SearchNode {
        g: 0.0,
        h: h_start,
        f: h_start,
        opened: true,
        ..SearchNode::default()
    };

    let mut open = BinaryHeap::new();
    open.push(OpenEntry {
        node: start,
        f_score: h_start,
    });

    while let Some(current) = open.pop() {
        let current_id = current.node;
        let ci = current_id.index();

        if search[ci].closed {
            continue;
        }
        search[ci].closed = true;

        if current_id == goal {
            return PathSearch {
                nodes: reconstruct_path(&search, goal),
                total_cost: search[ci].g,
                found_complete: true,
            };
        }

        let current_g = search[ci].g;
        for &neighbor in graph.neighbors(current_id) {
            let ni = neighbor.index();
            if search[ni].closed {
                continue;
            }

            let tentative_g = current_g + graph.edge_cost(current_id, neighbor);
            if !search[ni].opened || tentative_g < search[ni].g {
                let h = heuristic(neighbor);
                search[ni] = SearchNode {
                    g: tentative_g,
                    h,
                    f: tentative_g + h,
                    opened: true,
                    closed: false,
                    parent: Some(current_id),
                };
                open.push(OpenEntry {
                    node: neighbor,
                    f_score: tentative_g + h,
                });
            }
        }
    }

    // Exhausted: fall back to the closed node with the lowest F.
    let mut best: Option<(f32, NavNodeId)> = None;
    for (i, node) in search.iter().enumerate() {
        if !node.closed || i == start.index() {
            continue;
        }
        if best.is_none_or(|(bf, _)| node.f < bf) {
            best = Some((node.f, NavNodeId(i as u32)));
        }
    }

    match best {
        Some((_, end)) => PathSearch {
            nodes: reconstruct_path(&search, end),
            total_cost: search[end.index()].g,
            found_complete: false,
        },
        None => PathSearch::default(),
    }
}

/// Follow parent links back from `end` and return the path in start-to-end
/// order.
fn reconstruct_path(search: &[SearchNode], end: NavNodeId) -> Vec<NavNodeId> {
    let mut path = vec![end];
    let mut current = end;
    while let Some(parent) = search[current.index()].parent {
        path.push(parent);
        current = parent;
    }
    path.reverse();
    path
}
