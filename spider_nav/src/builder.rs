// Grid builder: runs the build phases end to end.
//
// `GridBuilder::build_grid()` turns a volume and a spatial query service into
// a pruned navigation graph:
//
//   probes  -> [enclosed-probe removal] -> surface candidates -> surface nodes
//           -> direct neighbors + possible-edge pairs -> edge nodes -> prune
//
// Each phase is a free function in its own module that takes the previous
// phase's output and returns the next; the builder only sequences them and
// keeps what callers may inspect afterwards (the graph, a `BuildReport`, and
// optionally the probe lattice). A new build replaces the previous graph
// wholesale. With `auto_save` set, the graph is written to `save_path` as the
// final step.
//
// See also: `config.rs` for the knobs, `tracer.rs`, `extract.rs`,
// `adjacency.rs`, `edge.rs` and `prune.rs` for the phases, `persist.rs` for
// the saved form.
//
// **Critical constraint: determinism.** Every phase iterates in a fixed order,
// so the same scene and config always produce the same graph, node ids
// included.

use crate::adjacency::connect_neighbors;
use crate::config::BuildConfig;
use crate::edge::synthesize_edges;
use crate::error::{NavError, Result};
use crate::extract::extract_surface_points;
use crate::nav::NavGraph;
use crate::persist::SavedGrid;
use crate::prune::prune_graph;
use crate::spatial::SpatialQuery;
use crate::tracer::{Probe, remove_enclosed_probes, sample_probes};
use crate::types::{Aabb, NodeOrigin};
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Per-phase counts from the last build.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    /// Probes placed in free space.
    pub probes: usize,
    /// Probes discarded as enclosed.
    pub enclosed_probes: usize,
    /// Accepted surface candidates, one surface node each.
    pub surface_nodes: usize,
    pub direct_edges: usize,
    pub possible_edge_pairs: usize,
    pub edge_nodes: usize,
    pub pruned_nodes: usize,
    /// Nodes in the final graph.
    pub nodes: usize,
    /// Undirected edges in the final graph.
    pub edges: usize,
}

pub struct GridBuilder {
    config: BuildConfig,
    graph: NavGraph,
    probes: Vec<Probe>,
    report: BuildReport,
}

impl GridBuilder {
    /// Create a builder. Fails if the config cannot drive a build.
    pub fn new(config: BuildConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            graph: NavGraph::new(),
            probes: Vec::new(),
            report: BuildReport::default(),
        })
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// The graph produced by the last build (empty before any build).
    pub fn graph(&self) -> &NavGraph {
        &self.graph
    }

    pub fn into_graph(self) -> NavGraph {
        self.graph
    }

    /// The probe lattice of the last build. Empty unless `auto_remove_probes`
    /// is off.
    pub fn probes(&self) -> &[Probe] {
        &self.probes
    }

    pub fn report(&self) -> &BuildReport {
        &self.report
    }

    /// Build a grid over `volume` and return the final node count.
    pub fn build_grid(&mut self, volume: &Aabb, query: &dyn SpatialQuery) -> Result<usize> {
        if !(volume.center.is_finite() && volume.half_extent.is_finite()) {
            return Err(NavError::Config(format!(
                "build volume must be finite, got center {} half extent {}",
                volume.center, volume.half_extent
            )));
        }
        let config = &self.config;
        let mut report = BuildReport::default();

        let mut probes = sample_probes(volume, config, query);
        report.probes = probes.len();
        info!(
            probes = probes.len(),
            step = config.grid_step,
            "placed probe lattice"
        );

        if config.remove_enclosed_probes {
            let before = probes.len();
            probes = remove_enclosed_probes(probes, config, query);
            report.enclosed_probes = before - probes.len();
        }

        let candidates = extract_surface_points(&probes, config, query);
        let mut graph = NavGraph::new();
        for candidate in &candidates {
            graph.add_node(candidate.location, candidate.normal, NodeOrigin::Surface);
        }
        report.surface_nodes = graph.node_count();
        info!(surface_nodes = report.surface_nodes, "extracted surface nodes");

        let adjacency = connect_neighbors(&mut graph, config, query);
        report.direct_edges = adjacency.direct_edges;
        report.possible_edge_pairs = adjacency.possible_edges.len();
        info!(
            direct_edges = report.direct_edges,
            possible_edge_pairs = report.possible_edge_pairs,
            "connected neighbors"
        );

        let synthesis = synthesize_edges(&mut graph, &adjacency.possible_edges, config, query);
        report.edge_nodes = synthesis.edge_nodes;
        info!(
            edge_nodes = synthesis.edge_nodes,
            bridged_pairs = synthesis.bridged_pairs,
            "synthesized edge nodes"
        );

        report.pruned_nodes = prune_graph(&mut graph);
        report.nodes = graph.node_count();
        report.edges = graph.edge_count();
        info!(
            pruned = report.pruned_nodes,
            nodes = report.nodes,
            edges = report.edges,
            "grid built"
        );

        self.probes = if config.auto_remove_probes {
            Vec::new()
        } else {
            probes
        };
        self.graph = graph;
        self.report = report;

        if self.config.auto_save {
            self.save_grid()?;
        }
        Ok(self.report.nodes)
    }

    /// Save the current graph to the configured `save_path`.
    pub fn save_grid(&self) -> Result<()> {
        self.save_grid_to(&self.config.save_path)
    }

    pub fn save_grid_to(&self, path: &Path) -> Result<()> {
        SavedGrid::from_graph(&self.graph).save_to_path(path)?;
        info!(path = %path.display(), nodes = self.graph.node_count(), "saved grid");
        Ok(())
    }
}
