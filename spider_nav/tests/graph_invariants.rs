// Property-based tests for built grids.
//
// Random box clutter on a floor, built with the default config, must always
// give a graph with symmetric links, no dead ends, and properly spaced
// surface nodes. Paths found on it must follow real links.
//
// Run with: cargo test -p spider_nav -- proptest

use proptest::prelude::*;
use spider_nav::pathfinding::astar;
use spider_nav::{
    Aabb, BoxScene, BuildConfig, GridBuilder, NavGraph, NavNodeId, NodeOrigin, ObjectId, Vec3,
};
use std::collections::BTreeSet;

// =============================================================================
// Strategies
// =============================================================================

/// A box resting on the floor (top face at y = -50), somewhere inside the
/// build volume.
fn arb_crate() -> impl Strategy<Value = Aabb> {
    (-200.0..200.0f32, -200.0..200.0f32, 20.0..80.0f32, 20.0..100.0f32).prop_map(
        |(x, z, half_width, half_height)| {
            Aabb::new(
                Vec3::new(x, -50.0 + half_height, z),
                Vec3::new(half_width, half_height, half_width),
            )
        },
    )
}

fn arb_scene() -> impl Strategy<Value = BoxScene> {
    prop::collection::vec(arb_crate(), 0..=3).prop_map(|crates| {
        let mut scene = BoxScene::new();
        scene.add_box(
            ObjectId(1),
            Aabb::new(Vec3::new(0.0, -100.0, 0.0), Vec3::new(1000.0, 50.0, 1000.0)),
        );
        for (i, aabb) in crates.into_iter().enumerate() {
            scene.add_box(ObjectId(10 + i as u32), aabb);
        }
        scene
    })
}

fn build(scene: &BoxScene) -> (NavGraph, BuildConfig) {
    let config = BuildConfig {
        auto_save: false,
        ..BuildConfig::default()
    };
    let volume = Aabb::new(Vec3::new(0.0, 125.0, 0.0), Vec3::new(300.0, 125.0, 300.0));
    let mut builder = GridBuilder::new(config.clone()).unwrap();
    builder.build_grid(&volume, scene).unwrap();
    (builder.into_graph(), config)
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn proptest_links_are_symmetric_and_unique(scene in arb_scene()) {
        let (graph, _) = build(&scene);
        for node in &graph.nodes {
            let unique: BTreeSet<NavNodeId> = node.neighbors.iter().copied().collect();
            prop_assert_eq!(unique.len(), node.degree());
            prop_assert!(!unique.contains(&node.id));
            for &nb in &node.neighbors {
                prop_assert!(graph.are_neighbors(nb, node.id));
            }
        }
    }

    #[test]
    fn proptest_no_dead_ends_survive(scene in arb_scene()) {
        let (graph, _) = build(&scene);
        for node in &graph.nodes {
            prop_assert!(node.degree() >= 2, "node {} has degree {}", node.id, node.degree());
        }
        for (i, node) in graph.nodes.iter().enumerate() {
            prop_assert_eq!(node.id.index(), i);
        }
    }

    #[test]
    fn proptest_surface_nodes_keep_their_distance(scene in arb_scene()) {
        let (graph, config) = build(&scene);
        let min = config.min_separation() - 1e-3;
        let surface: Vec<Vec3> = graph
            .nodes
            .iter()
            .filter(|n| n.origin == NodeOrigin::Surface)
            .map(|n| n.location)
            .collect();
        for (i, a) in surface.iter().enumerate() {
            for b in &surface[i + 1..] {
                prop_assert!(a.distance(*b) >= min, "{} and {} are too close", a, b);
            }
        }
    }

    #[test]
    fn proptest_paths_follow_links(scene in arb_scene(), picks in prop::array::uniform2(0usize..1000)) {
        let (graph, _) = build(&scene);
        prop_assume!(!graph.is_empty());
        let start = NavNodeId((picks[0] % graph.node_count()) as u32);
        let goal = NavNodeId((picks[1] % graph.node_count()) as u32);

        let search = astar(&graph, start, goal);
        prop_assert!(!search.nodes.is_empty());
        prop_assert_eq!(search.nodes[0], start);
        let mut cost = 0.0f32;
        for w in search.nodes.windows(2) {
            prop_assert!(graph.are_neighbors(w[0], w[1]));
            cost += graph.edge_cost(w[0], w[1]);
        }
        prop_assert!((cost - search.total_cost).abs() < 1e-2);
        if search.found_complete {
            prop_assert_eq!(search.nodes.last().copied(), Some(goal));
        }
    }
}
