use std::{collections::BTreeMap, sync::OnceLock};

use derivative::Derivative;

use crate::{Edge, Graph, GraphBuilder, VertexId, util::weight_range};

/// An owned weighted undirected graph stored as an edge array plus, for each
/// vertex, the indices of its incident edges.
///
/// Vertex ids may be sparse.  Each edge is stored once and its index appears in
/// the incident lists of both endpoints (once for a self-loop).  Parallel edges
/// with different weights are kept; inserting an edge equal to an existing one
/// is a no-op.
#[derive(Derivative, Clone, Default)]
#[derivative(Debug)]
pub struct AdjacencyGraph {
    edges: Vec<Edge>,
    incidence: BTreeMap<VertexId, Vec<usize>>,
    labels: BTreeMap<VertexId, String>,
    next_id: VertexId,
    #[derivative(Debug = "ignore")]
    weight_range: OnceLock<Option<(f64, f64)>>,
}

impl AdjacencyGraph {
    /// Creates a graph with vertices `0..n` and no edges.
    pub fn with_vertices(n: usize) -> Self {
        let mut graph = Self::new();
        for v in 0..n {
            graph.add_vertex(v);
        }
        graph
    }

    /// Gets all edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    fn cached_weight_range(&self) -> Option<(f64, f64)> {
        *self
            .weight_range
            .get_or_init(|| weight_range(self.edges.iter().map(Edge::weight)))
    }

    fn invalidate_cache(&mut self) {
        self.weight_range.take();
    }
}

impl Graph for AdjacencyGraph {
    fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.incidence.keys().copied()
    }

    fn has_vertex(&self, id: VertexId) -> bool {
        self.incidence.contains_key(&id)
    }

    fn num_vertices(&self) -> usize {
        self.incidence.len()
    }

    fn max_vertex_id(&self) -> Option<VertexId> {
        self.incidence.keys().next_back().copied()
    }

    fn vertex_label(&self, id: VertexId) -> Option<&str> {
        self.labels.get(&id).map(String::as_str)
    }

    fn incident_edges(&self, v: VertexId) -> impl Iterator<Item = &Edge> + '_ {
        let Some(indices) = self.incidence.get(&v) else {
            panic!("Invalid vertex: {v}");
        };
        indices.iter().map(|&i| &self.edges[i])
    }

    fn all_edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.iter()
    }

    fn num_edges(&self) -> usize {
        self.edges.len()
    }

    fn min_edge_weight(&self) -> Option<f64> {
        self.cached_weight_range().map(|(lo, _)| lo)
    }

    fn max_edge_weight(&self) -> Option<f64> {
        self.cached_weight_range().map(|(_, hi)| hi)
    }
}

impl GraphBuilder for AdjacencyGraph {
    fn new() -> Self {
        Self::default()
    }

    fn add_fresh_vertex(&mut self) -> VertexId {
        let id = self.next_id;
        self.add_vertex(id);
        id
    }

    fn add_vertex(&mut self, id: VertexId) -> bool {
        if self.incidence.contains_key(&id) {
            return false;
        }
        self.incidence.insert(id, Vec::new());
        self.next_id = self.next_id.max(id.saturating_add(1));
        true
    }

    fn insert_edge(&mut self, edge: Edge) -> bool {
        let (a, b) = edge.ends();
        self.add_vertex(a);
        self.add_vertex(b);
        if self.incident_edges(a).any(|e| *e == edge) {
            return false;
        }
        let index = self.edges.len();
        self.edges.push(edge);
        self.incidence.entry(a).or_default().push(index);
        if a != b {
            self.incidence.entry(b).or_default().push(index);
        }
        self.invalidate_cache();
        true
    }

    fn set_label(&mut self, id: VertexId, label: impl Into<String>) {
        self.add_vertex(id);
        self.labels.insert(id, label.into());
    }
}

impl FromIterator<Edge> for AdjacencyGraph {
    fn from_iter<I: IntoIterator<Item = Edge>>(iter: I) -> Self {
        let mut graph = Self::new();
        for edge in iter {
            graph.insert_edge(edge);
        }
        graph
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use quickcheck_macros::quickcheck;

    use super::*;
    use crate::testing::ArbGraph;

    #[test]
    fn test_add_vertex_is_idempotent() {
        let mut graph = AdjacencyGraph::new();
        assert!(graph.add_vertex(3));
        assert!(!graph.add_vertex(3));
        assert_eq!(graph.num_vertices(), 1);
        assert_eq!(graph.max_vertex_id(), Some(3));
        assert_eq!(graph.slot_count(), 4);
        assert_eq!(graph.add_fresh_vertex(), 4);
    }

    #[test]
    fn test_add_largest_vertex_id() {
        let mut graph = AdjacencyGraph::new();
        assert!(graph.add_vertex(usize::MAX));
        assert!(graph.add_edge(0, usize::MAX, 1.0));
        assert_eq!(graph.max_vertex_id(), Some(usize::MAX));
        assert_eq!(graph.slot_count(), usize::MAX);
        assert_eq!(graph.neighbors(0), BTreeSet::from([usize::MAX]));
    }

    #[test]
    fn test_add_edge_inserts_endpoints() {
        let mut graph = AdjacencyGraph::new();
        assert!(graph.add_edge(2, 5, 1.5));
        assert_eq!(graph.vertex_ids().collect::<Vec<_>>(), vec![2, 5]);
        assert_eq!(graph.neighbors(2), BTreeSet::from([5]));
        assert_eq!(graph.neighbors(5), BTreeSet::from([2]));
        assert!(!graph.has_vertex(3));
    }

    #[test]
    fn test_duplicate_edge_is_absorbed() {
        let mut graph = AdjacencyGraph::new();
        assert!(graph.add_edge(0, 1, 1.0));
        assert!(!graph.add_edge(1, 0, 1.0));
        assert!(graph.add_edge(0, 1, 2.0));
        assert_eq!(graph.num_edges(), 2);
        assert_eq!(graph.degree(0), 2);
        assert_eq!(graph.weight_between(0, 1), 3.0);
    }

    #[test]
    fn test_self_loop_stored_once() {
        let mut graph = AdjacencyGraph::new();
        graph.add_edge(1, 1, 4.0);
        assert_eq!(graph.degree(1), 1);
        assert_eq!(graph.num_edges(), 1);
        assert_eq!(graph.neighbors(1), BTreeSet::from([1]));
    }

    #[test]
    fn test_weight_cache_invalidated() {
        let mut graph = AdjacencyGraph::with_vertices(3);
        assert_eq!(graph.min_edge_weight(), None);
        graph.add_edge(0, 1, 2.0);
        assert_eq!(graph.min_edge_weight(), Some(2.0));
        assert_eq!(graph.max_edge_weight(), Some(2.0));
        graph.add_edge(1, 2, 0.5);
        assert_eq!(graph.min_edge_weight(), Some(0.5));
        assert_eq!(graph.max_edge_weight(), Some(2.0));
    }

    #[test]
    fn test_labels() {
        let mut graph = AdjacencyGraph::new();
        graph.add_vertex(0);
        graph.set_label(1, "B");
        assert_eq!(graph.vertex_label(0), None);
        assert_eq!(graph.vertex_label(1), Some("B"));
        assert!(graph.has_vertex(1));
    }

    #[test]
    fn test_check_vertex() {
        let graph = AdjacencyGraph::with_vertices(2);
        assert_eq!(graph.check_vertex(1), Ok(()));
        assert_eq!(
            graph.check_vertex(7),
            Err(crate::GraphError::NoSuchVertex(7))
        );
    }

    #[test]
    #[should_panic(expected = "Invalid vertex")]
    fn test_incident_edges_of_absent_vertex_panics() {
        let graph = AdjacencyGraph::with_vertices(2);
        let _ = graph.incident_edges(9).count();
    }

    #[test]
    fn test_merge_graph() {
        let mut g1 = AdjacencyGraph::from_weighted_edges([(0, 1, 1.0)]);
        let g2 = AdjacencyGraph::from_weighted_edges([(1, 0, 1.0), (1, 2, 3.0)]);
        g1.add_vertex(9);
        g1.merge_graph(&g2);
        assert_eq!(g1.num_edges(), 2);
        assert_eq!(g1.vertex_ids().collect::<Vec<_>>(), vec![0, 1, 2, 9]);
    }

    #[cfg(feature = "pathfinding")]
    #[test]
    fn test_connected_components() {
        let mut graph = AdjacencyGraph::from_weighted_edges([(0, 1, 1.0), (2, 3, 1.0)]);
        graph.add_vertex(4);
        let mut sizes: Vec<_> = graph.connected_components().iter().map(|c| c.len()).collect();
        sizes.sort();
        assert_eq!(sizes, vec![1, 2, 2]);
    }

    #[quickcheck]
    fn prop_edges_visible_from_both_ends(graph: ArbGraph) -> bool {
        let graph = graph.0;
        graph.all_edges().all(|e| {
            graph.incident_edges(e.a()).any(|f| f == e) && graph.incident_edges(e.b()).any(|f| f == e)
        })
    }

    #[quickcheck]
    fn prop_all_edges_matches_default(graph: ArbGraph) -> bool {
        let graph = graph.0;
        let from_incidence: usize = graph
            .vertex_ids()
            .map(|v| {
                graph
                    .incident_edges(v)
                    .filter(|e| e.sorted_ends().0 == v)
                    .count()
            })
            .sum();
        from_incidence == graph.num_edges()
    }
}
