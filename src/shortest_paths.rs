//! Single-source and all-pairs shortest paths.
//!
//! Edges with non-negative weight can be traversed in both directions.  An
//! edge with negative weight is traversed only from its stored first endpoint
//! to its second, since an undirected negative edge would otherwise be a
//! negative cycle of length two.  Only [`bellman_ford`] and [`floyd_warshall`]
//! accept negative weights.

use bitvec::vec::BitVec;

use crate::{
    Edge, Graph, GraphError, VertexId,
    heap::IndexedMinHeap,
    paths::{AllPairsPaths, SingleSourcePaths},
    tracing_support::info_span,
};

/// Directed arcs an edge contributes, following the orientation rule above.
fn arcs(edge: &Edge) -> impl Iterator<Item = (VertexId, VertexId, f64)> {
    let (a, b) = edge.ends();
    let w = edge.weight();
    let reverse = (w >= 0.0 && a != b).then_some((b, a, w));
    std::iter::once((a, b, w)).chain(reverse)
}

fn check_source<G: Graph>(graph: &G, source: VertexId) -> Result<(), GraphError> {
    if graph.is_empty() {
        return Err(GraphError::EmptyGraph);
    }
    graph.check_vertex(source)
}

/// Dijkstra's algorithm with an indexed heap.  Edge weights must be
/// non-negative; with negative weights the result is unspecified.
pub fn dijkstra<G: Graph>(graph: &G, source: VertexId) -> Result<SingleSourcePaths, GraphError> {
    let _span = info_span!("dijkstra").entered();
    check_source(graph, source)?;

    let slots = graph.slot_count();
    let mut heap = IndexedMinHeap::with_slots(slots);
    let mut predecessors = vec![None; slots];
    let mut settled: BitVec = BitVec::repeat(false, slots);

    heap.insert(source, 0.0);
    while !heap.is_empty() {
        let v = heap.extract_min()?;
        settled.set(v, true);
        let dv = heap.key(v);
        for edge in graph.incident_edges(v) {
            let w = edge.other_end(v);
            if settled[w] {
                continue;
            }
            let candidate = dv + edge.weight();
            if candidate < heap.key(w) {
                heap.decrease_key(w, candidate);
                predecessors[w] = Some(v);
            }
        }
    }
    Ok(SingleSourcePaths::new(source, heap.into_keys(), predecessors))
}

/// Bellman-Ford: exactly one relaxation pass over every edge per vertex.
/// Negative cycles are not detected.
pub fn bellman_ford<G: Graph>(graph: &G, source: VertexId) -> Result<SingleSourcePaths, GraphError> {
    let _span = info_span!("bellman_ford").entered();
    check_source(graph, source)?;

    let slots = graph.slot_count();
    let mut distances = vec![f64::INFINITY; slots];
    let mut predecessors = vec![None; slots];
    distances[source] = 0.0;

    #[cfg(feature = "tracing")]
    let mut relaxations = 0usize;
    for _ in 0..graph.num_vertices() {
        for edge in graph.all_edges() {
            for (from, to, w) in arcs(edge) {
                if distances[from].is_finite() && distances[from] + w < distances[to] {
                    distances[to] = distances[from] + w;
                    predecessors[to] = Some(from);
                    #[cfg(feature = "tracing")]
                    {
                        relaxations += 1;
                    }
                }
            }
        }
    }
    #[cfg(feature = "tracing")]
    crate::tracing_support::debug!(passes = graph.num_vertices(), relaxations, "bellman_ford done");
    Ok(SingleSourcePaths::new(source, distances, predecessors))
}

/// Floyd-Warshall over all pairs of present vertices.
pub fn floyd_warshall<G: Graph>(graph: &G) -> Result<AllPairsPaths, GraphError> {
    let _span = info_span!("floyd_warshall").entered();
    if graph.is_empty() {
        return Err(GraphError::EmptyGraph);
    }

    let slots = graph.slot_count();
    let vertices: Vec<VertexId> = graph.vertex_ids().collect();
    let mut distances = vec![vec![f64::INFINITY; slots]; slots];
    let mut predecessors = vec![vec![None; slots]; slots];

    for &v in &vertices {
        distances[v][v] = 0.0;
    }
    for edge in graph.all_edges() {
        for (from, to, w) in arcs(edge) {
            if w < distances[from][to] {
                distances[from][to] = w;
                predecessors[from][to] = Some(from);
            }
        }
    }

    for &k in &vertices {
        for &i in &vertices {
            let dik = distances[i][k];
            if !dik.is_finite() {
                continue;
            }
            for &j in &vertices {
                let candidate = dik + distances[k][j];
                if candidate < distances[i][j] {
                    distances[i][j] = candidate;
                    predecessors[i][j] = predecessors[k][j];
                }
            }
        }
    }
    Ok(AllPairsPaths::new(distances, predecessors))
}

#[cfg(test)]
mod tests {
    use quickcheck_macros::quickcheck;

    use super::*;
    use crate::{
        AdjacencyGraph, GraphBuilder,
        search::bfs,
        testing::{ArbGraph, cycle4},
    };

    fn close(a: &[f64], b: &[f64]) -> bool {
        a.len() == b.len()
            && a.iter().zip(b).all(|(x, y)| {
                x == y || (x.is_finite() && y.is_finite() && (x - y).abs() <= 1e-9 * x.abs().max(1.0))
            })
    }

    #[test]
    fn test_dijkstra_cycle4() {
        let paths = dijkstra(&cycle4(), 0).unwrap();
        assert_eq!(paths.distances(), &[0.0, 1.0, 2.0, 1.0]);
        assert_eq!(paths.path_to(2).map(|p| p.len()), Some(3));
    }

    #[test]
    fn test_dijkstra_prefers_lighter_detour() {
        let graph = AdjacencyGraph::from_weighted_edges([(0, 1, 10.0), (0, 2, 1.0), (2, 1, 2.0)]);
        let paths = dijkstra(&graph, 0).unwrap();
        assert_eq!(paths.distance(1), Some(3.0));
        assert_eq!(paths.path_to(1), Some(vec![0, 2, 1]));
    }

    #[test]
    fn test_dijkstra_sparse_ids() {
        let mut graph = AdjacencyGraph::from_weighted_edges([(10, 20, 2.0)]);
        graph.add_vertex(30);
        let paths = dijkstra(&graph, 20).unwrap();
        assert_eq!(paths.distance(10), Some(2.0));
        assert_eq!(paths.distance(30), None);
        assert_eq!(paths.distance(15), None);
    }

    #[test]
    fn test_errors() {
        let empty = AdjacencyGraph::new();
        assert_eq!(dijkstra(&empty, 0), Err(GraphError::EmptyGraph));
        assert_eq!(bellman_ford(&empty, 0), Err(GraphError::EmptyGraph));
        assert_eq!(floyd_warshall(&empty), Err(GraphError::EmptyGraph));
        assert_eq!(dijkstra(&cycle4(), 4), Err(GraphError::NoSuchVertex(4)));
        assert_eq!(bellman_ford(&cycle4(), 4), Err(GraphError::NoSuchVertex(4)));
    }

    #[test]
    fn test_bellman_ford_negative_edge() {
        let mut graph = AdjacencyGraph::new();
        graph.add_edge(0, 1, 4.0);
        graph.add_edge(0, 2, 5.0);
        graph.add_edge(2, 1, -3.0);
        graph.add_edge(1, 3, 2.0);
        let paths = bellman_ford(&graph, 0).unwrap();
        assert_eq!(paths.distances(), &[0.0, 2.0, 5.0, 4.0]);
        assert_eq!(paths.path_to(3), Some(vec![0, 2, 1, 3]));

        let all = floyd_warshall(&graph).unwrap();
        assert_eq!(all.from_source(0).distances(), paths.distances());
        // The negative edge is one-way, so 1 cannot use it to reach 2.
        assert_eq!(all.distance(1, 2), Some(9.0));
    }

    #[test]
    fn test_bellman_ford_edges_in_reverse_order() {
        // Each pass extends the settled prefix of the chain by one vertex.
        let mut graph = AdjacencyGraph::new();
        for v in (0..5).rev() {
            graph.add_edge(v, v + 1, -1.0);
        }
        let paths = bellman_ford(&graph, 0).unwrap();
        assert_eq!(paths.distances(), &[0.0, -1.0, -2.0, -3.0, -4.0, -5.0]);
        assert_eq!(paths.path_to(5), Some(vec![0, 1, 2, 3, 4, 5]));
    }

    #[test]
    fn test_floyd_warshall_unreachable() {
        let mut graph = AdjacencyGraph::from_weighted_edges([(0, 1, 1.0)]);
        graph.add_vertex(2);
        let all = floyd_warshall(&graph).unwrap();
        assert_eq!(all.distance(0, 1), Some(1.0));
        assert_eq!(all.distance(2, 2), Some(0.0));
        assert_eq!(all.distance(0, 2), None);
        assert_eq!(all.predecessor(1, 0), Some(1));
    }

    #[quickcheck]
    fn prop_single_source_algorithms_agree(graph: ArbGraph) -> bool {
        let graph = graph.0;
        let Some(source) = graph.vertex_ids().next() else {
            return true;
        };
        let d = dijkstra(&graph, source).unwrap();
        let b = bellman_ford(&graph, source).unwrap();
        let f = floyd_warshall(&graph).unwrap().from_source(source);
        close(d.distances(), b.distances()) && close(d.distances(), f.distances())
    }

    #[quickcheck]
    fn prop_bfs_matches_unit_dijkstra(graph: ArbGraph) -> bool {
        let mut unit = AdjacencyGraph::new();
        for v in graph.0.vertex_ids() {
            unit.add_vertex(v);
        }
        for e in graph.0.all_edges() {
            unit.add_unit_edge(e.a(), e.b());
        }
        let Some(source) = unit.vertex_ids().next() else {
            return true;
        };
        bfs(&unit, source).unwrap().distances() == dijkstra(&unit, source).unwrap().distances()
    }

    #[quickcheck]
    fn prop_paths_have_recorded_length(graph: ArbGraph) -> bool {
        let graph = graph.0;
        let Some(source) = graph.vertex_ids().next() else {
            return true;
        };
        let paths = dijkstra(&graph, source).unwrap();
        graph.vertex_ids().filter(|&v| paths.is_reached(v)).all(|v| {
            let path = paths.path_to(v).unwrap();
            let length: f64 = path
                .windows(2)
                .map(|pair| {
                    graph
                        .incident_edges(pair[0])
                        .filter(|e| e.joins(pair[0], pair[1]))
                        .map(Edge::weight)
                        .fold(f64::INFINITY, f64::min)
                })
                .sum();
            (length - paths.distances()[v]).abs() <= 1e-9 * length.max(1.0)
        })
    }
}
