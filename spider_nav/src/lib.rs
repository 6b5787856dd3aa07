// spider_nav — navigation grids for surface-walking agents.
//
// This crate builds and queries navigation graphs over arbitrary 3D surfaces
// (floors, walls, ceilings, irregular props) for agents that can walk on any
// surface orientation. It has two halves: an offline grid builder that
// discovers surfaces by volumetric ray sampling and turns them into a pruned
// graph, and a runtime navigator that loads a saved graph and answers
// nearest-node and A* path queries. World geometry is only ever seen through
// the `SpatialQuery` trait.
//
// Module overview:
// - `types.rs`:       Vec3, Aabb, NavNodeId, ObjectId, NodeOrigin, axial directions.
// - `geometry.rs`:    Line-line closest approach and the minimum-separation test.
// - `config.rs`:      BuildConfig — every build knob, JSON-loadable, with derived distances.
// - `error.rs`:       NavError and the crate Result alias.
// - `spatial.rs`:     SpatialQuery trait (line traces, sphere overlaps) and `can_see()`.
// - `scene.rs`:       BoxScene — in-process SpatialQuery over compound boxes, plus SceneFile.
// - `tracer.rs`:      Probe lattice sampling and enclosed-probe removal.
// - `extract.rs`:     Surface point extraction from six axial rays per probe.
// - `nav.rs`:         NavGraph arena of NavNodes with symmetric, deduplicated links.
// - `adjacency.rs`:   Direct neighbors and possible-edge pairs within the connection radius.
// - `edge.rs`:        Edge node synthesis at geometric edges between occluded pairs.
// - `prune.rs`:       Dead-end removal and contiguous renumbering.
// - `builder.rs`:     GridBuilder — phase orchestration, BuildReport, auto-save.
// - `persist.rs`:     SavedGrid — the saved schema and its tolerant loader.
// - `pathfinding.rs`: A* with best-effort fallback.
// - `navigator.rs`:   Navigator — loaded graph plus world-space path queries.
//
// The companion crate `spider_nav_cli` wraps this library in a command-line
// tool. This crate never installs a tracing subscriber.
//
// **Critical constraint: determinism.** Builds and queries are pure functions
// of their inputs. Every phase iterates in a fixed order and node ids are
// assigned sequentially, so identical scenes produce identical graphs.

pub mod adjacency;
pub mod builder;
pub mod config;
pub mod edge;
pub mod error;
pub mod extract;
pub mod geometry;
pub mod nav;
pub mod navigator;
pub mod pathfinding;
pub mod persist;
pub mod prune;
pub mod scene;
pub mod spatial;
pub mod tracer;
pub mod types;

pub use builder::{BuildReport, GridBuilder};
pub use config::BuildConfig;
pub use error::{NavError, Result};
pub use nav::{NavGraph, NavNode};
pub use navigator::{Navigator, PathResult};
pub use persist::SavedGrid;
pub use scene::{BoxScene, SceneFile, SceneObject};
pub use spatial::{QueryChannel, SpatialQuery, TraceHit};
pub use types::{Aabb, NavNodeId, NodeOrigin, ObjectId, Vec3};
