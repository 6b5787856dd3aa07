// End-to-end tests: build a grid over a box scene, save it, load it into a
// navigator and query paths.

use spider_nav::{
    Aabb, BoxScene, BuildConfig, GridBuilder, NavGraph, NavNodeId, Navigator, NodeOrigin,
    ObjectId, SavedGrid, Vec3,
};
use std::collections::BTreeSet;

fn config() -> BuildConfig {
    BuildConfig {
        auto_save: false,
        ..BuildConfig::default()
    }
}

/// A wide floor slab whose top face sits at y = -50.
fn floor_scene() -> BoxScene {
    let mut scene = BoxScene::new();
    scene.add_box(
        ObjectId(1),
        Aabb::new(Vec3::new(0.0, -100.0, 0.0), Vec3::new(1000.0, 50.0, 1000.0)),
    );
    scene
}

/// The floor plus a 100-unit cube resting on it at the origin.
fn floor_and_cube_scene() -> BoxScene {
    let mut scene = floor_scene();
    scene.add_box(ObjectId(2), Aabb::new(Vec3::ZERO, Vec3::new(50.0, 50.0, 50.0)));
    scene
}

fn assert_graph_invariants(graph: &NavGraph) {
    for node in &graph.nodes {
        assert!(node.degree() >= 2, "node {} has degree {}", node.id, node.degree());
        let unique: BTreeSet<NavNodeId> = node.neighbors.iter().copied().collect();
        assert_eq!(unique.len(), node.degree(), "node {} lists a duplicate", node.id);
        for &nb in &node.neighbors {
            assert_ne!(nb, node.id);
            assert!(
                graph.are_neighbors(nb, node.id),
                "{} lists {} but not the reverse",
                node.id,
                nb
            );
        }
    }
}

#[test]
fn floor_grid_supports_diagonal_path() {
    let volume = Aabb::new(Vec3::new(0.0, 50.0, 0.0), Vec3::new(300.0, 50.0, 300.0));
    let mut builder = GridBuilder::new(config()).unwrap();
    assert_eq!(builder.build_grid(&volume, &floor_scene()).unwrap(), 36);
    assert_graph_invariants(builder.graph());

    let nav = Navigator::from_graph(builder.into_graph());
    let result = nav.find_path(
        Vec3::new(-300.0, -47.0, -300.0),
        Vec3::new(200.0, -47.0, 200.0),
    );
    assert!(result.found_complete);
    assert_eq!(result.nodes.len(), 6);
    let expected = 5.0 * 100.0 * std::f32::consts::SQRT_2;
    assert!((result.total_cost - expected).abs() < 0.1);
}

#[test]
fn cube_on_floor_is_climbable_through_edge_nodes() {
    let volume = Aabb::new(Vec3::new(0.0, 125.0, 0.0), Vec3::new(300.0, 125.0, 300.0));
    let mut builder = GridBuilder::new(config()).unwrap();
    let count = builder.build_grid(&volume, &floor_and_cube_scene()).unwrap();

    let graph = builder.graph();
    assert_eq!(count, graph.node_count());
    assert_graph_invariants(graph);
    let (_, edge_nodes) = graph.origin_counts();
    assert!(edge_nodes > 0);
    assert!(builder.report().edge_nodes >= edge_nodes);

    // No node ends up inside the cube.
    let cube = Aabb::new(Vec3::ZERO, Vec3::new(50.0, 50.0, 50.0));
    assert!(graph.nodes.iter().all(|n| !cube.contains(n.location)));

    let top = Vec3::new(0.0, 53.0, 0.0);
    let nav = Navigator::from_graph(graph.clone());
    assert!(nav.closest_node_location(top).unwrap().distance(top) < 1e-3);

    let result = nav.find_path(Vec3::new(-300.0, -47.0, -300.0), top);
    assert!(result.found_complete);
    assert!(result.locations.last().unwrap().distance(top) < 1e-3);
    // The top of the cube is only reachable through an edge node.
    let before_top = result.nodes[result.nodes.len() - 2];
    assert_eq!(nav.graph().node(before_top).origin, NodeOrigin::Edge);

    let (next, normal) = nav
        .find_next_location_and_normal(Vec3::new(-300.0, -47.0, -300.0), top)
        .unwrap();
    assert_eq!(next, result.locations[1]);
    assert_eq!(normal, result.normals[1]);
}

#[test]
fn build_save_load_roundtrip() {
    let path = std::env::temp_dir().join(format!(
        "spider_nav_pipeline_test_{}.json",
        std::process::id()
    ));
    let volume = Aabb::new(Vec3::new(0.0, 125.0, 0.0), Vec3::new(300.0, 125.0, 300.0));
    let config = BuildConfig {
        auto_save: true,
        save_path: path.clone(),
        ..BuildConfig::default()
    };
    let mut builder = GridBuilder::new(config).unwrap();
    let count = builder.build_grid(&volume, &floor_and_cube_scene()).unwrap();

    let mut nav = Navigator::new();
    assert_eq!(nav.load_grid(&path).unwrap(), count);
    std::fs::remove_file(&path).unwrap();

    let built = builder.graph();
    let loaded = nav.graph();
    assert_eq!(loaded.node_count(), built.node_count());
    for (a, b) in built.nodes.iter().zip(&loaded.nodes) {
        assert_eq!(a.location, b.location);
        assert_eq!(a.normal, b.normal);
        assert_eq!(a.origin, b.origin);
        let a_set: BTreeSet<NavNodeId> = a.neighbors.iter().copied().collect();
        let b_set: BTreeSet<NavNodeId> = b.neighbors.iter().copied().collect();
        assert_eq!(a_set, b_set);
    }
}

#[test]
fn saved_grid_survives_binary_encoding() {
    let volume = Aabb::new(Vec3::new(0.0, 125.0, 0.0), Vec3::new(300.0, 125.0, 300.0));
    let mut builder = GridBuilder::new(config()).unwrap();
    builder.build_grid(&volume, &floor_and_cube_scene()).unwrap();

    let saved = SavedGrid::from_graph(builder.graph());
    let bytes = bincode::serialize(&saved).unwrap();
    let decoded: SavedGrid = bincode::deserialize(&bytes).unwrap();
    assert_eq!(decoded, saved);
    assert_eq!(decoded.to_graph(), saved.to_graph());
}

#[test]
fn builds_are_deterministic() {
    let volume = Aabb::new(Vec3::new(0.0, 125.0, 0.0), Vec3::new(300.0, 125.0, 300.0));
    let scene = floor_and_cube_scene();
    let mut first = GridBuilder::new(config()).unwrap();
    let mut second = GridBuilder::new(config()).unwrap();
    first.build_grid(&volume, &scene).unwrap();
    second.build_grid(&volume, &scene).unwrap();
    assert_eq!(first.graph(), second.graph());
    assert_eq!(first.report(), second.report());
}

#[test]
fn denied_cube_leaves_a_hole_in_the_floor() {
    let volume = Aabb::new(Vec3::new(0.0, 125.0, 0.0), Vec3::new(300.0, 125.0, 300.0));
    let config = BuildConfig {
        use_deny_list: true,
        deny_list: vec![ObjectId(2)],
        ..config()
    };
    let mut builder = GridBuilder::new(config).unwrap();
    builder.build_grid(&volume, &floor_and_cube_scene()).unwrap();

    let graph = builder.graph();
    assert!(graph.node_count() > 0);
    // Only floor nodes remain.
    assert!(graph.nodes.iter().all(|n| n.origin == NodeOrigin::Surface));
    assert!(graph.nodes.iter().all(|n| (n.location.y + 47.0).abs() < 1e-3));
}
