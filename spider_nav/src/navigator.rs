// Runtime navigator: a loaded grid plus the queries agents make against it.
//
// `Navigator` owns one immutable `NavGraph` and answers closest-node,
// shortest-path and next-step queries in world coordinates. World points are
// snapped to their nearest node (linear scan, first node wins ties) before
// A* runs. Every query takes `&self` and allocates its own search state, so a
// shared navigator can serve concurrent readers; replacing the graph needs
// `&mut self` and happens wholesale.
//
// A missing start or end node (nothing loaded) is not an error: the query
// returns an empty path and logs a warning. An unreachable target returns the
// best partial path with `found_complete == false`.
//
// See also: `pathfinding.rs` for the A* search, `persist.rs` for the saved
// grid `load_grid()` reads.

use crate::error::Result;
use crate::nav::NavGraph;
use crate::pathfinding::astar;
use crate::persist::SavedGrid;
use crate::types::{NavNodeId, Vec3};
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

/// A path query answer in world terms.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PathResult {
    pub nodes: Vec<NavNodeId>,
    /// Location of each node in `nodes`.
    pub locations: Vec<Vec3>,
    /// Surface normal of each node in `nodes`.
    pub normals: Vec<Vec3>,
    pub total_cost: f32,
    /// `false` when the target was unreachable and `nodes` is a best-effort
    /// partial path. Callers must check this.
    pub found_complete: bool,
}

impl PathResult {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[derive(Clone, Debug, Default)]
pub struct Navigator {
    graph: NavGraph,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_graph(graph: NavGraph) -> Self {
        Self { graph }
    }

    /// Replace the current graph with one read from a saved grid file.
    /// Returns the number of nodes loaded. On error the current graph is kept.
    pub fn load_grid(&mut self, path: &Path) -> Result<usize> {
        let saved = SavedGrid::load_from_path(path)?;
        self.graph = saved.to_graph();
        info!(
            path = %path.display(),
            nodes = self.graph.node_count(),
            edges = self.graph.edge_count(),
            "loaded grid"
        );
        Ok(self.graph.node_count())
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn graph(&self) -> &NavGraph {
        &self.graph
    }

    /// The node nearest to `point`, or `None` when nothing is loaded.
    pub fn closest_node(&self, point: Vec3) -> Option<NavNodeId> {
        self.graph.find_nearest_node(point)
    }

    pub fn closest_node_location(&self, point: Vec3) -> Option<Vec3> {
        self.closest_node(point).map(|id| self.graph.node(id).location)
    }

    pub fn closest_node_normal(&self, point: Vec3) -> Option<Vec3> {
        self.closest_node(point).map(|id| self.graph.node(id).normal)
    }

    /// Shortest path between the nodes nearest to `start` and `end`.
    pub fn find_path(&self, start: Vec3, end: Vec3) -> PathResult {
        let (Some(from), Some(to)) = (self.closest_node(start), self.closest_node(end)) else {
            warn!(%start, %end, "path query on an empty grid");
            return PathResult::default();
        };

        let search = astar(&self.graph, from, to);
        if !search.found_complete {
            warn!(
                from = %from,
                to = %to,
                partial_len = search.nodes.len(),
                "no complete path; returning best partial path"
            );
        }

        let locations = search
            .nodes
            .iter()
            .map(|&id| self.graph.node(id).location)
            .collect();
        let normals = search
            .nodes
            .iter()
            .map(|&id| self.graph.node(id).normal)
            .collect();
        PathResult {
            nodes: search.nodes,
            locations,
            normals,
            total_cost: search.total_cost,
            found_complete: search.found_complete,
        }
    }

    /// Location and normal of the next node to walk to from `current` toward
    /// `target`. `None` when the path has fewer than two nodes.
    pub fn find_next_location_and_normal(
        &self,
        current: Vec3,
        target: Vec3,
    ) -> Option<(Vec3, Vec3)> {
        let path = self.find_path(current, target);
        if path.nodes.len() < 2 {
            return None;
        }
        Some((path.locations[1], path.normals[1]))
    }
}
