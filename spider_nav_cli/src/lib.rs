// Command implementations behind the `spider-nav` binary.
//
// Each subcommand is a plain function that takes file paths and points and
// returns a serializable answer; `main.rs` only parses arguments, installs
// logging and prints the answer as JSON. Keeping the commands here lets the
// smoke tests drive them without spawning a process.
//
// See also: `main.rs` for the argument definitions, the `spider_nav` crate
// for everything these functions call.

use anyhow::{Context, Result, bail};
use serde::Serialize;
use spider_nav::{BuildConfig, BuildReport, GridBuilder, Navigator, PathResult, SceneFile, Vec3};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Parse a point written as `x,y,z`.
pub fn parse_point(text: &str) -> std::result::Result<Vec3, String> {
    let parts: Vec<&str> = text.split(',').map(str::trim).collect();
    let [x, y, z] = parts.as_slice() else {
        return Err(format!("expected x,y,z but got {text:?}"));
    };
    let coord = |s: &str| {
        s.parse::<f32>()
            .map_err(|e| format!("bad coordinate {s:?} in {text:?}: {e}"))
    };
    let point = Vec3::new(coord(*x)?, coord(*y)?, coord(*z)?);
    if !point.is_finite() {
        return Err(format!("point {text:?} is not finite"));
    }
    Ok(point)
}

#[derive(Clone, Debug, Serialize)]
pub struct BuildOutput {
    pub grid: PathBuf,
    pub report: BuildReport,
}

/// Build a grid for a scene file and write it to `out`, or to the config's
/// `save_path` when `out` is not given.
pub fn run_build(scene: &Path, config: Option<&Path>, out: Option<&Path>) -> Result<BuildOutput> {
    let scene_file = SceneFile::load(scene)
        .with_context(|| format!("failed to read scene {}", scene.display()))?;
    let mut config = match config {
        Some(path) => BuildConfig::load(path)
            .with_context(|| format!("failed to read config {}", path.display()))?,
        None => BuildConfig::default(),
    };
    let grid = out.map_or_else(|| config.save_path.clone(), Path::to_path_buf);
    // The grid is written explicitly below, to `grid`.
    config.auto_save = false;

    let mut builder = GridBuilder::new(config).context("invalid build config")?;
    builder
        .build_grid(&scene_file.volume, &scene_file.scene)
        .context("grid build failed")?;
    builder
        .save_grid_to(&grid)
        .with_context(|| format!("failed to write grid {}", grid.display()))?;

    let report = *builder.report();
    info!(
        scene = %scene.display(),
        grid = %grid.display(),
        nodes = report.nodes,
        edges = report.edges,
        "build command finished"
    );
    Ok(BuildOutput { grid, report })
}

fn load_navigator(grid: &Path) -> Result<Navigator> {
    let mut nav = Navigator::new();
    nav.load_grid(grid)
        .with_context(|| format!("failed to load grid {}", grid.display()))?;
    if nav.node_count() == 0 {
        bail!("grid {} has no nodes", grid.display());
    }
    debug!(grid = %grid.display(), nodes = nav.node_count(), "navigator ready");
    Ok(nav)
}

pub fn run_path(grid: &Path, from: Vec3, to: Vec3) -> Result<PathResult> {
    Ok(load_navigator(grid)?.find_path(from, to))
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct NextStep {
    pub location: Vec3,
    pub normal: Vec3,
}

/// The next node to walk to, or `None` when `from` and `to` snap to the
/// same node or no path leaves the start.
pub fn run_next(grid: &Path, from: Vec3, to: Vec3) -> Result<Option<NextStep>> {
    let nav = load_navigator(grid)?;
    Ok(nav
        .find_next_location_and_normal(from, to)
        .map(|(location, normal)| NextStep { location, normal }))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct GridInfo {
    pub nodes: usize,
    pub edges: usize,
    pub surface_nodes: usize,
    pub edge_nodes: usize,
}

pub fn run_info(grid: &Path) -> Result<GridInfo> {
    let nav = load_navigator(grid)?;
    let graph = nav.graph();
    let (surface_nodes, edge_nodes) = graph.origin_counts();
    Ok(GridInfo {
        nodes: graph.node_count(),
        edges: graph.edge_count(),
        surface_nodes,
        edge_nodes,
    })
}
