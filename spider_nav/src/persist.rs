// Saved grid schema.
//
// A built grid is stored as three maps keyed by the saving build's node ids:
// `locations`, `normals` and `adjacency`. Ids are only labels; the loader
// assigns fresh contiguous runtime ids in ascending saved-id order and
// translates every adjacency reference through that table. The loader is
// tolerant: a missing normal falls back to +Z, adjacency entries for unknown
// nodes are skipped, and neighbor references to unknown ids are dropped with
// a warning instead of failing the load. Links are re-added through
// `NavGraph::add_edge()`, so one-sided or duplicated saved links come back
// symmetric and deduplicated.
//
// `edge_nodes` is optional and only restores the diagnostic origin tag.
//
// JSON is the on-disk encoding (pretty-printed); the schema is plain serde
// and also survives binary encodings.
//
// See also: `builder.rs` which saves after a build, `navigator.rs` which
// loads for queries.

use crate::error::Result;
use crate::nav::NavGraph;
use crate::types::{NavNodeId, NodeOrigin, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::{debug, warn};

/// Normal assumed for a saved node that has none.
pub const DEFAULT_NORMAL: Vec3 = Vec3::new(0.0, 0.0, 1.0);

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SavedGrid {
    pub locations: BTreeMap<u32, Vec3>,
    #[serde(default)]
    pub normals: BTreeMap<u32, Vec3>,
    #[serde(default)]
    pub adjacency: BTreeMap<u32, Vec<u32>>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub edge_nodes: BTreeSet<u32>,
}

impl SavedGrid {
    /// Snapshot a graph, using its node ids as saved ids.
    pub fn from_graph(graph: &NavGraph) -> Self {
        let mut saved = SavedGrid::default();
        for node in &graph.nodes {
            let id = node.id.0;
            saved.locations.insert(id, node.location);
            saved.normals.insert(id, node.normal);
            saved
                .adjacency
                .insert(id, node.neighbors.iter().map(|n| n.0).collect());
            if node.origin == NodeOrigin::Edge {
                saved.edge_nodes.insert(id);
            }
        }
        saved
    }

    /// Rebuild a graph, remapping saved ids to contiguous runtime ids.
    pub fn to_graph(&self) -> NavGraph {
        let mut graph = NavGraph::new();
        let mut remap: BTreeMap<u32, NavNodeId> = BTreeMap::new();
        for (&saved_id, &location) in &self.locations {
            let normal = self
                .normals
                .get(&saved_id)
                .copied()
                .unwrap_or(DEFAULT_NORMAL);
            let origin = if self.edge_nodes.contains(&saved_id) {
                NodeOrigin::Edge
            } else {
                NodeOrigin::Surface
            };
            remap.insert(saved_id, graph.add_node(location, normal, origin));
        }

        let mut dangling = 0usize;
        for (saved_id, neighbors) in &self.adjacency {
            let Some(&id) = remap.get(saved_id) else {
                dangling += neighbors.len();
                continue;
            };
            for saved_neighbor in neighbors {
                match remap.get(saved_neighbor) {
                    Some(&neighbor) => {
                        graph.add_edge(id, neighbor);
                    }
                    None => dangling += 1,
                }
            }
        }

        if dangling > 0 {
            warn!(dangling, "dropped dangling neighbor references from saved grid");
        }
        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "restored saved grid"
        );
        graph
    }

    pub fn node_count(&self) -> usize {
        self.locations.len()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write the grid as pretty JSON, replacing any existing file.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
