//! Minimum spanning trees.
//!
//! Every algorithm here returns a graph holding all vertices of the input and
//! the edges of a minimum spanning forest: one tree per connected component.
//! Edges are copied from the input, keeping their names and orientation.

use std::{
    cmp::{Ordering, Reverse},
    collections::BinaryHeap,
};

use bitvec::vec::BitVec;

use crate::{
    AdjacencyGraph, Edge, Graph, GraphBuilder, GraphError, VertexId, heap::IndexedMinHeap,
    tracing_support::{debug, info_span},
};

/// A partition of vertices into disjoint trees, merged as edges are accepted.
///
/// Starts with one singleton tree per vertex.  Uses path compression and
/// union by rank.
#[derive(Clone, Debug)]
pub struct Forest {
    parent: Vec<usize>,
    rank: Vec<u8>,
    trees: usize,
}

impl Forest {
    /// Creates a forest of singleton trees over `slots` vertex slots, of which
    /// `trees` are counted as present.
    pub fn new(slots: usize, trees: usize) -> Self {
        Self {
            parent: (0..slots).collect(),
            rank: vec![0; slots],
            trees,
        }
    }

    /// Creates a forest with one singleton tree per vertex of `graph`.
    pub fn for_graph<G: Graph>(graph: &G) -> Self {
        Self::new(graph.slot_count(), graph.num_vertices())
    }

    /// Gets the representative of the tree containing `v`.
    pub fn tree_of(&mut self, v: VertexId) -> usize {
        let mut root = v;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut current = v;
        while self.parent[current] != root {
            let next = self.parent[current];
            self.parent[current] = root;
            current = next;
        }
        root
    }

    /// Merges the trees containing `a` and `b`.  Returns `false` if they were
    /// already the same tree.
    pub fn merge(&mut self, a: VertexId, b: VertexId) -> bool {
        let ra = self.tree_of(a);
        let rb = self.tree_of(b);
        if ra == rb {
            return false;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            Ordering::Less => self.parent[ra] = rb,
            Ordering::Greater => self.parent[rb] = ra,
            Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
        self.trees -= 1;
        true
    }

    pub fn num_trees(&self) -> usize {
        self.trees
    }
}

/// An output graph with every vertex (and label) of the input and no edges.
fn empty_spanning_graph<G: Graph>(graph: &G) -> Result<AdjacencyGraph, GraphError> {
    if graph.is_empty() {
        return Err(GraphError::EmptyGraph);
    }
    let mut tree = AdjacencyGraph::new();
    for v in graph.vertex_ids() {
        match graph.vertex_label(v) {
            Some(label) => tree.set_label(v, label),
            None => {
                tree.add_vertex(v);
            }
        }
    }
    Ok(tree)
}

/// A heap entry for lazy Prim, ordered so that `BinaryHeap` pops the lightest
/// edge first.
struct Candidate<'g> {
    edge: &'g Edge,
    to: VertexId,
}

impl Candidate<'_> {
    fn key(&self) -> (Reverse<TotalF64>, Reverse<VertexId>) {
        (Reverse(TotalF64(self.edge.weight())), Reverse(self.to))
    }
}

/// Total order on `f64` for heap keys.
#[derive(Clone, Copy)]
struct TotalF64(f64);

impl PartialEq for TotalF64 {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for TotalF64 {}

impl PartialOrd for TotalF64 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TotalF64 {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl PartialEq for Candidate<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Candidate<'_> {}

impl PartialOrd for Candidate<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

/// Adds `v` to the tree and queues its edges to vertices outside the tree.
fn push_frontier<'g, G: Graph>(
    graph: &'g G,
    v: VertexId,
    in_tree: &mut BitVec,
    heap: &mut BinaryHeap<Candidate<'g>>,
) {
    in_tree.set(v, true);
    for edge in graph.incident_edges(v) {
        let to = edge.other_end(v);
        if !in_tree[to] {
            heap.push(Candidate { edge, to });
        }
    }
}

/// Lazy Prim: keeps every edge leaving the tree in a heap and discards stale
/// entries when they are popped.  O(E log E).
pub fn prim_lazy<G: Graph>(graph: &G) -> Result<AdjacencyGraph, GraphError> {
    let _span = info_span!("prim_lazy").entered();
    let mut tree = empty_spanning_graph(graph)?;
    let mut in_tree = BitVec::repeat(false, graph.slot_count());
    let mut heap = BinaryHeap::new();

    for root in graph.vertex_ids() {
        if in_tree[root] {
            continue;
        }
        push_frontier(graph, root, &mut in_tree, &mut heap);
        while let Some(Candidate { edge, to }) = heap.pop() {
            if in_tree[to] {
                continue;
            }
            tree.insert_edge(edge.clone());
            push_frontier(graph, to, &mut in_tree, &mut heap);
        }
    }
    debug!(edges = tree.num_edges(), "prim_lazy done");
    Ok(tree)
}

/// Classical Prim: keeps the cheapest known connecting edge of each vertex
/// outside the tree in an indexed heap.  O(E log V).
pub fn prim_classical<G: Graph>(graph: &G) -> Result<AdjacencyGraph, GraphError> {
    let _span = info_span!("prim_classical").entered();
    let mut tree = empty_spanning_graph(graph)?;
    let slots = graph.slot_count();
    let mut in_tree: BitVec = BitVec::repeat(false, slots);
    let mut best_edge: Vec<Option<&Edge>> = vec![None; slots];
    let mut heap = IndexedMinHeap::with_slots(slots);

    for root in graph.vertex_ids() {
        if in_tree[root] {
            continue;
        }
        heap.insert(root, f64::NEG_INFINITY);
        while !heap.is_empty() {
            let v = heap.extract_min()?;
            in_tree.set(v, true);
            if let Some(edge) = best_edge[v] {
                tree.insert_edge(edge.clone());
            }
            for edge in graph.incident_edges(v) {
                let w = edge.other_end(v);
                if !in_tree[w] && edge.weight() < heap.key(w) {
                    heap.decrease_key(w, edge.weight());
                    best_edge[w] = Some(edge);
                }
            }
        }
    }
    debug!(edges = tree.num_edges(), "prim_classical done");
    Ok(tree)
}

/// Kruskal: accepts edges in ascending weight order when they join two
/// different trees of a [`Forest`].
pub fn kruskal<G: Graph>(graph: &G) -> Result<AdjacencyGraph, GraphError> {
    let _span = info_span!("kruskal").entered();
    let mut tree = empty_spanning_graph(graph)?;
    let mut edges: Vec<&Edge> = graph.all_edges().collect();
    edges.sort_by(|a, b| a.weight().total_cmp(&b.weight()));

    let mut forest = Forest::for_graph(graph);
    for edge in edges {
        if forest.num_trees() <= 1 {
            break;
        }
        if forest.merge(edge.a(), edge.b()) {
            tree.insert_edge(edge.clone());
        }
    }
    debug!(
        edges = tree.num_edges(),
        trees = forest.num_trees(),
        "kruskal done"
    );
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use quickcheck_macros::quickcheck;

    use super::*;
    use crate::testing::{ArbGraph, cycle4};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(1.0)
    }

    #[test]
    fn test_forest_merge() {
        let mut forest = Forest::new(4, 4);
        assert!(forest.merge(0, 1));
        assert!(forest.merge(2, 3));
        assert!(!forest.merge(1, 0));
        assert_eq!(forest.num_trees(), 2);
        assert!(forest.merge(1, 3));
        assert_eq!(forest.tree_of(0), forest.tree_of(2));
        assert_eq!(forest.num_trees(), 1);
    }

    #[test]
    fn test_cycle4_weight_three() {
        let graph = cycle4();
        for tree in [
            prim_lazy(&graph).unwrap(),
            prim_classical(&graph).unwrap(),
            kruskal(&graph).unwrap(),
        ] {
            assert_eq!(tree.num_vertices(), 4);
            assert_eq!(tree.num_edges(), 3);
            assert_eq!(tree.total_weight(), 3.0);
        }
    }

    #[test]
    fn test_picks_light_edges() {
        let graph = AdjacencyGraph::from_weighted_edges([
            (0, 1, 4.0),
            (0, 2, 1.0),
            (1, 2, 2.0),
            (1, 3, 5.0),
            (2, 3, 8.0),
        ]);
        let expected = AdjacencyGraph::from_weighted_edges([(0, 2, 1.0), (1, 2, 2.0), (1, 3, 5.0)]);
        assert_eq!(kruskal(&graph).unwrap().edge_set(), expected.edge_set());
        assert_eq!(prim_lazy(&graph).unwrap().edge_set(), expected.edge_set());
        assert_eq!(prim_classical(&graph).unwrap().edge_set(), expected.edge_set());
    }

    #[test]
    fn test_spanning_forest_for_disconnected_graph() {
        let mut graph = AdjacencyGraph::from_weighted_edges([(0, 1, 1.0), (3, 4, 2.0), (4, 5, 1.0), (3, 5, 7.0)]);
        graph.set_label(9, "alone");
        for tree in [
            prim_lazy(&graph).unwrap(),
            prim_classical(&graph).unwrap(),
            kruskal(&graph).unwrap(),
        ] {
            assert_eq!(tree.num_vertices(), 6);
            assert_eq!(tree.num_edges(), 3);
            assert_eq!(tree.total_weight(), 4.0);
            assert_eq!(tree.vertex_label(9), Some("alone"));
        }
    }

    #[test]
    fn test_empty_graph() {
        let graph = AdjacencyGraph::new();
        assert_eq!(kruskal(&graph).unwrap_err(), GraphError::EmptyGraph);
        assert_eq!(prim_lazy(&graph).unwrap_err(), GraphError::EmptyGraph);
        assert_eq!(prim_classical(&graph).unwrap_err(), GraphError::EmptyGraph);
    }

    #[quickcheck]
    fn prop_algorithms_agree(graph: ArbGraph) -> bool {
        let graph = graph.0;
        if graph.is_empty() {
            return true;
        }
        let lazy = prim_lazy(&graph).unwrap();
        let classical = prim_classical(&graph).unwrap();
        let kruskal = kruskal(&graph).unwrap();
        close(lazy.total_weight(), kruskal.total_weight())
            && close(classical.total_weight(), kruskal.total_weight())
            && lazy.num_edges() == kruskal.num_edges()
            && classical.num_edges() == kruskal.num_edges()
    }

    #[cfg(feature = "pathfinding")]
    #[quickcheck]
    fn prop_matches_pathfinding_kruskal(graph: ArbGraph) -> bool {
        let graph = graph.0;
        if graph.is_empty() {
            return true;
        }
        let edges: Vec<(VertexId, VertexId, u64)> = graph
            .all_edges()
            .map(|e| (e.a(), e.b(), e.weight() as u64))
            .collect();
        let expected: u64 = pathfinding::prelude::kruskal(&edges).map(|(_, _, w)| w).sum();
        kruskal(&graph).unwrap().total_weight() == expected as f64
    }
}
