//! Fixtures and quickcheck generators for testing graph algorithms.  Public so
//! that integration tests and downstream crates can use them.

use quickcheck::{Arbitrary, Gen};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{AdjacencyGraph, GraphBuilder, VertexId};

/// A small random graph with non-negative integer weights.
///
/// Generated graphs may be empty, disconnected, have isolated vertices,
/// parallel edges, self-loops and gaps in their vertex ids.  Integer weights
/// keep sums exact, so algorithms can be compared with `==`.
#[derive(Clone, Debug)]
pub struct ArbGraph(pub AdjacencyGraph);

impl Arbitrary for ArbGraph {
    fn arbitrary(g: &mut Gen) -> Self {
        let num_vertices = usize::arbitrary(g) % 16;
        let num_edges = usize::arbitrary(g) % 40;
        let sparse = bool::arbitrary(g);

        let mut graph = AdjacencyGraph::new();
        let mut vertices = Vec::with_capacity(num_vertices);
        for i in 0..num_vertices {
            let id = if sparse { 2 * i + usize::arbitrary(g) % 2 } else { i };
            graph.add_vertex(id);
            vertices.push(id);
        }

        if !vertices.is_empty() {
            for _ in 0..num_edges {
                let u = *g.choose(&vertices).unwrap_or(&vertices[0]);
                let v = *g.choose(&vertices).unwrap_or(&vertices[0]);
                let weight = f64::from(u8::arbitrary(g) % 21);
                graph.add_edge(u, v, weight);
            }
        }
        ArbGraph(graph)
    }
}

/// The 4-cycle 0-1-2-3-0 with unit weights.
pub fn cycle4() -> AdjacencyGraph {
    AdjacencyGraph::from_weighted_edges([(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0), (3, 0, 1.0)])
}

/// The path `0-1-...-(n-1)` with unit weights.
pub fn path_graph(n: usize) -> AdjacencyGraph {
    let mut graph = AdjacencyGraph::with_vertices(n);
    for v in 1..n {
        graph.add_unit_edge(v - 1, v);
    }
    graph
}

/// Two unit-weight cliques on `0..k` and `k..2k`, joined by a single edge
/// `(k-1, k)` of weight `bridge`.
pub fn two_cliques(k: usize, bridge: f64) -> AdjacencyGraph {
    let mut graph = AdjacencyGraph::with_vertices(2 * k);
    for offset in [0, k] {
        for u in offset..offset + k {
            for v in u + 1..offset + k {
                graph.add_unit_edge(u, v);
            }
        }
    }
    if k > 0 {
        graph.add_edge(k - 1, k, bridge);
    }
    graph
}

/// Generates a large graph with an irregular structure:
///
/// - a dense cluster of 50 vertices (about 60% of pairs joined);
/// - a medium cluster of 80 vertices (about 30%);
/// - a sparse cluster of 150 vertices (about 8%);
/// - 20 hubs, each joined to about half of the earlier vertices;
/// - 100 scattered vertices with one to three edges each;
/// - 200 long-range edges between random vertices.
///
/// Weights are integers in `1..=100`.  The same seed always gives the same
/// graph.
pub fn large_graph(seed: u64) -> AdjacencyGraph {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut graph = AdjacencyGraph::new();
    let mut next: VertexId = 0;

    for (size, density) in [(50, 0.6), (80, 0.3), (150, 0.08)] {
        let start = next;
        next += size;
        for u in start..next {
            graph.add_vertex(u);
            for v in start..u {
                if rng.gen_bool(density) {
                    let w = weight(&mut rng);
                    graph.add_edge(v, u, w);
                }
            }
        }
    }

    for _ in 0..20 {
        let hub = next;
        next += 1;
        graph.add_vertex(hub);
        for v in 0..hub {
            if rng.gen_bool(0.5) {
                let w = weight(&mut rng);
                graph.add_edge(hub, v, w);
            }
        }
    }

    for _ in 0..100 {
        let v = next;
        next += 1;
        for _ in 0..rng.gen_range(1..=3) {
            let target = rng.gen_range(0..v);
            let w = weight(&mut rng);
            graph.add_edge(v, target, w);
        }
    }

    for _ in 0..200 {
        let u = rng.gen_range(0..next);
        let v = rng.gen_range(0..next);
        if u != v {
            let w = weight(&mut rng);
            graph.add_edge(u, v, w);
        }
    }
    graph
}

fn weight(rng: &mut StdRng) -> f64 {
    f64::from(rng.gen_range(1u8..=100))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Graph;

    #[test]
    fn test_fixtures() {
        assert_eq!(cycle4().num_edges(), 4);
        assert_eq!(path_graph(5).num_edges(), 4);
        assert_eq!(path_graph(0).num_vertices(), 0);

        let graph = two_cliques(3, 0.25);
        assert_eq!(graph.num_vertices(), 6);
        assert_eq!(graph.num_edges(), 7);
        assert_eq!(graph.weight_between(2, 3), 0.25);
    }

    #[test]
    fn test_large_graph_is_reproducible() {
        let a = large_graph(1);
        assert_eq!(a.num_vertices(), 400);
        assert!(a.num_edges() > 1000);
        assert_eq!(a.edge_set(), large_graph(1).edge_set());
    }
}
