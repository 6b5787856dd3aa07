// Data-driven build configuration.
//
// Every tunable parameter of a grid build lives in `BuildConfig`, loadable
// from JSON. Most distances are expressed as unitless multipliers of
// `grid_step`, so one scene can be rebuilt coarser or finer by changing a
// single number. The derived distances (`trace_distance()`,
// `min_separation()`, ...) are the only place those multiplications happen.
//
// The struct is `#[serde(default)]`: a config file only needs the fields it
// wants to override.
//
// See also: `builder.rs` which owns a validated `BuildConfig`, `tracer.rs`,
// `extract.rs`, `adjacency.rs` and `edge.rs` which read the derived values.

use crate::error::{NavError, Result};
use crate::types::ObjectId;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Distance between neighboring probes in world units.
    pub grid_step: f32,
    /// How far a surface node is pushed off its surface along the normal.
    pub bounce_distance: f32,
    /// Probe ray length, as a multiple of `grid_step`.
    pub trace_distance_modifier: f32,
    /// Minimum distance between two surface nodes, as a multiple of `grid_step`.
    pub close_points_filter_modifier: f32,
    /// Neighbor search radius around each node, as a multiple of `grid_step`.
    pub connection_sphere_radius_modifier: f32,
    /// Length of the axial segments used to find geometric edges, as a
    /// multiple of `grid_step`.
    pub edge_trace_distance_modifier: f32,
    /// Maximum gap between two edge segments at their closest approach, as a
    /// multiple of `grid_step`.
    pub edge_deviation_modifier: f32,

    /// When set, only hits on objects in `allow_list` produce nodes.
    pub use_allow_list: bool,
    pub allow_list: Vec<ObjectId>,
    /// When set, hits on objects in `deny_list` never produce nodes.
    pub use_deny_list: bool,
    pub deny_list: Vec<ObjectId>,
    /// Objects every builder query passes straight through.
    pub ignored_objects: Vec<ObjectId>,

    /// Radius of the placement check that skips probes inside geometry.
    /// Must be positive so no probe sits on a face.
    pub probe_radius: f32,
    /// Drop the probe lattice once extraction is done. When false the
    /// builder keeps it for inspection.
    pub auto_remove_probes: bool,
    /// Discard probes whose six axial rays all hit the same object.
    pub remove_enclosed_probes: bool,
    /// Ray length used by the enclosed-probe check.
    pub enclosed_check_distance: f32,

    /// Save the grid to `save_path` as the last build step.
    pub auto_save: bool,
    pub save_path: PathBuf,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            grid_step: 100.0,
            bounce_distance: 3.0,
            trace_distance_modifier: 1.5,
            close_points_filter_modifier: 0.1,
            connection_sphere_radius_modifier: 1.5,
            edge_trace_distance_modifier: 1.9,
            edge_deviation_modifier: 0.15,
            use_allow_list: false,
            allow_list: Vec::new(),
            use_deny_list: false,
            deny_list: Vec::new(),
            ignored_objects: Vec::new(),
            probe_radius: 10.0,
            auto_remove_probes: true,
            remove_enclosed_probes: false,
            enclosed_check_distance: 100_000.0,
            auto_save: true,
            save_path: PathBuf::from("spider_nav_grid.json"),
        }
    }
}

impl BuildConfig {
    /// Probe ray length.
    pub fn trace_distance(&self) -> f32 {
        self.grid_step * self.trace_distance_modifier
    }

    /// Minimum distance between accepted surface candidates.
    pub fn min_separation(&self) -> f32 {
        self.grid_step * self.close_points_filter_modifier
    }

    /// Radius of the neighbor search sphere.
    pub fn connection_radius(&self) -> f32 {
        self.grid_step * self.connection_sphere_radius_modifier
    }

    /// Length of each axial segment tested for edge intersections.
    pub fn edge_trace_distance(&self) -> f32 {
        self.grid_step * self.edge_trace_distance_modifier
    }

    /// Largest accepted gap between two segments at closest approach.
    pub fn edge_max_deviation(&self) -> f32 {
        self.grid_step * self.edge_deviation_modifier
    }

    /// Whether a hit on `object` may produce a surface node.
    pub fn accepts_surface(&self, object: ObjectId) -> bool {
        if self.use_allow_list && !self.allow_list.contains(&object) {
            return false;
        }
        if self.use_deny_list && self.deny_list.contains(&object) {
            return false;
        }
        true
    }

    /// Reject configs that cannot drive a build.
    pub fn validate(&self) -> Result<()> {
        if !(self.grid_step.is_finite() && self.grid_step > 0.0) {
            return Err(NavError::Config(format!(
                "grid_step must be positive, got {}",
                self.grid_step
            )));
        }
        let positive = [
            ("trace_distance_modifier", self.trace_distance_modifier),
            (
                "connection_sphere_radius_modifier",
                self.connection_sphere_radius_modifier,
            ),
            (
                "edge_trace_distance_modifier",
                self.edge_trace_distance_modifier,
            ),
            ("enclosed_check_distance", self.enclosed_check_distance),
            ("probe_radius", self.probe_radius),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(NavError::Config(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        let non_negative = [
            ("bounce_distance", self.bounce_distance),
            (
                "close_points_filter_modifier",
                self.close_points_filter_modifier,
            ),
            ("edge_deviation_modifier", self.edge_deviation_modifier),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(NavError::Config(format!(
                    "{name} must be non-negative, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Parse and validate a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: BuildConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
