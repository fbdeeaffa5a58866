#![cfg(feature = "slow_tests")]

use graphwork::{
    Graph, GridGraph, bellman_ford, dfs_iterative, dfs_recursive, dijkstra, floyd_warshall,
    kernighan_lin, kruskal, prim_classical, prim_lazy,
    bisection::{CancellationToken, KernighanLinOptions},
    spectral::{SpectralOptions, spectral_layout},
    testing::large_graph,
    tracing_support::{dump_span_timings, init_tracing},
};
use rand::{SeedableRng, rngs::StdRng};

#[test]
fn shortest_paths_agree_on_large_graph() {
    init_tracing();
    let graph = large_graph(17);
    let d = dijkstra(&graph, 0).unwrap();
    let b = bellman_ford(&graph, 0).unwrap();
    let f = floyd_warshall(&graph).unwrap().from_source(0);
    assert_eq!(d.distances(), b.distances());
    assert_eq!(d.distances(), f.distances());
    dump_span_timings();
}

#[test]
fn spanning_trees_agree_on_large_graph() {
    let graph = large_graph(23);
    let lazy = prim_lazy(&graph).unwrap();
    assert_eq!(lazy.total_weight(), prim_classical(&graph).unwrap().total_weight());
    assert_eq!(lazy.total_weight(), kruskal(&graph).unwrap().total_weight());
    assert_eq!(lazy.num_vertices(), graph.num_vertices());
}

#[test]
fn dfs_variants_agree_on_large_graph() {
    let graph = large_graph(31);
    assert_eq!(dfs_recursive(&graph).unwrap(), dfs_iterative(&graph));
}

#[test]
fn bisection_improves_large_grid() {
    let grid = GridGraph::random(30, 30, 1.0, 5.0, 3.0, &mut StdRng::seed_from_u64(8));
    let bisection = kernighan_lin(
        &grid,
        0,
        &KernighanLinOptions::default(),
        &CancellationToken::new(),
    )
    .unwrap()
    .unwrap();
    assert_eq!(bisection.part_a.len(), 450);
    assert!(bisection.cut_history.windows(2).all(|w| w[1] <= w[0]));
}

#[test]
fn spectral_layout_of_lattice_stays_in_unit_square() {
    let grid = GridGraph::lattice(15, 15, 1.0);
    let layout = spectral_layout(&grid, &SpectralOptions::default()).unwrap();
    assert!(layout.x.iter().chain(&layout.y).all(|c| (0.0..=1.0).contains(c)));
}
