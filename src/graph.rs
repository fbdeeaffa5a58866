//! `Graph` and `GraphBuilder` are the core traits for working with graphs in
//! this library. `Graph` provides read-only access to a weighted undirected
//! graph, while `GraphBuilder` extends `Graph` with methods for building one up
//! incrementally.
//!
//! Vertices are identified by non-negative integers which need not be
//! contiguous.  Every edge is stored once and is visible from the incident
//! lists of both of its endpoints.
//!
//! This module provides:
//!
//! - [`Graph`] trait: read-only queries over vertices, incident edges and
//!   edge weights
//! - [`GraphBuilder`] trait: idempotent vertex insertion and edge insertion
//!   that creates missing endpoints
use std::collections::{BTreeSet, HashSet};

use crate::{Edge, GraphError, VertexId, util::weight_range};

/// A trait representing a weighted, undirected graph.  Methods that return
/// vertex ids return them in ascending order; edges are returned in an
/// unspecified but stable order.
///
/// Implementations must provide [`Self::vertex_ids`], [`Self::has_vertex`] and
/// [`Self::incident_edges`]; everything else has a default implementation
/// derived from those.
pub trait Graph: Sized {
    // Vertices

    /// Gets an iterator over all vertex ids in ascending order.
    fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_;

    /// Checks whether a vertex id is present.
    fn has_vertex(&self, id: VertexId) -> bool;

    /// Gets the number of vertices in the graph.
    fn num_vertices(&self) -> usize {
        self.vertex_ids().count()
    }

    fn is_empty(&self) -> bool {
        self.num_vertices() == 0
    }

    /// Gets the largest vertex id in use, if any.
    fn max_vertex_id(&self) -> Option<VertexId> {
        self.vertex_ids().last()
    }

    /// Gets the length of a dense per-vertex array able to hold every
    /// vertex id of this graph.  Saturates at `usize::MAX`.
    fn slot_count(&self) -> usize {
        self.max_vertex_id().map_or(0, |id| id.saturating_add(1))
    }

    /// Gets the display label of a vertex.  Graphs without labels return
    /// `None`.
    fn vertex_label(&self, id: VertexId) -> Option<&str> {
        let _ = id;
        None
    }

    /// Returns `Ok` if the vertex exists and an error naming it otherwise.
    fn check_vertex(&self, id: VertexId) -> Result<(), GraphError> {
        if self.has_vertex(id) {
            Ok(())
        } else {
            Err(GraphError::NoSuchVertex(id))
        }
    }

    /// Panics if the given vertex is not in the graph.
    ///
    /// It is recommended to call this method from implementations of other
    /// methods that take vertex ids as parameters, to ensure that invalid ids
    /// are caught early.
    fn assert_valid_vertex(&self, id: VertexId) {
        if !self.has_vertex(id) {
            panic!("Invalid vertex: {id}");
        }
    }

    // Edges

    /// Gets an iterator over the edges incident to a vertex.  A self-loop
    /// appears once.  Panics if the vertex is not in the graph.
    fn incident_edges(&self, v: VertexId) -> impl Iterator<Item = &Edge> + '_;

    /// Gets the set of vertices adjacent to `v`.  This is derived from the
    /// incident edges on every call.
    fn neighbors(&self, v: VertexId) -> BTreeSet<VertexId> {
        self.incident_edges(v).map(|e| e.other_end(v)).collect()
    }

    /// Gets the number of edges incident to `v`.
    fn degree(&self, v: VertexId) -> usize {
        self.incident_edges(v).count()
    }

    /// Gets the sum of weights of the edges incident to `v`.
    fn weighted_degree(&self, v: VertexId) -> f64 {
        self.incident_edges(v).map(Edge::weight).sum()
    }

    /// Gets an iterator over every edge of the graph, each edge once.
    fn all_edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        // An edge is reported from its smaller endpoint only.
        self.vertex_ids().flat_map(move |v| {
            self.incident_edges(v)
                .filter(move |e| e.sorted_ends().0 == v)
        })
    }

    /// Gets the number of edges in the graph.
    fn num_edges(&self) -> usize {
        self.all_edges().count()
    }

    /// Gets an edge joining `u` and `v`, if there is one.  When several edges
    /// with different weights join the same pair, which one is returned is
    /// unspecified.
    fn edge_between(&self, u: VertexId, v: VertexId) -> Option<&Edge> {
        if !self.has_vertex(u) || !self.has_vertex(v) {
            return None;
        }
        self.incident_edges(u).find(|e| e.joins(u, v))
    }

    /// Gets the total weight of all edges joining `u` and `v`; zero if they
    /// are not adjacent.
    fn weight_between(&self, u: VertexId, v: VertexId) -> f64 {
        if !self.has_vertex(u) || !self.has_vertex(v) {
            return 0.0;
        }
        self.incident_edges(u)
            .filter(|e| e.joins(u, v))
            .map(Edge::weight)
            .sum()
    }

    fn has_edge(&self, u: VertexId, v: VertexId) -> bool {
        self.edge_between(u, v).is_some()
    }

    /// Gets the smallest edge weight, or `None` for a graph without edges.
    fn min_edge_weight(&self) -> Option<f64> {
        weight_range(self.all_edges().map(Edge::weight)).map(|(lo, _)| lo)
    }

    /// Gets the largest edge weight, or `None` for a graph without edges.
    fn max_edge_weight(&self) -> Option<f64> {
        weight_range(self.all_edges().map(Edge::weight)).map(|(_, hi)| hi)
    }

    /// Gets the sum of all edge weights.
    fn total_weight(&self) -> f64 {
        self.all_edges().map(Edge::weight).sum()
    }

    /// Gets the set of distinct edges, as a convenience for comparing graphs.
    fn edge_set(&self) -> HashSet<Edge> {
        self.all_edges().cloned().collect()
    }

    /// Partitions the vertices into connected components.
    #[cfg(feature = "pathfinding")]
    fn connected_components(&self) -> Vec<HashSet<VertexId>> {
        pathfinding::prelude::connected_components(&self.vertex_ids().collect::<Vec<_>>(), |v| {
            self.neighbors(*v)
        })
    }
}

/// A trait for graphs that can be built up incrementally.
///
/// None of the operations fail on data that is already present: inserting an
/// existing vertex or an edge equal to an existing one is absorbed, and the
/// returned flag tells whether anything was inserted.
pub trait GraphBuilder: Graph {
    /// Creates a new, empty graph.
    fn new() -> Self;

    /// Adds a vertex with a fresh id one past the largest id ever used, and
    /// returns the id.
    fn add_fresh_vertex(&mut self) -> VertexId;

    /// Adds a vertex with the given id.  Returns `false` if it was already
    /// present.
    fn add_vertex(&mut self, id: VertexId) -> bool;

    /// Adds an edge, inserting missing endpoints first.  Returns `false` if an
    /// equal edge was already present.
    fn insert_edge(&mut self, edge: Edge) -> bool;

    /// Sets the display label of a vertex, inserting the vertex if needed.
    fn set_label(&mut self, id: VertexId, label: impl Into<String>);

    /// Adds a weighted edge between two vertices.
    fn add_edge(&mut self, u: VertexId, v: VertexId, weight: f64) -> bool {
        self.insert_edge(Edge::new(u, v, weight))
    }

    /// Adds an edge of weight 1.0 between two vertices.
    fn add_unit_edge(&mut self, u: VertexId, v: VertexId) -> bool {
        self.add_edge(u, v, 1.0)
    }

    /// Adds every vertex and edge of another graph to this one.
    fn merge_graph<S: Graph>(&mut self, source: &S) {
        for v in source.vertex_ids() {
            self.add_vertex(v);
        }
        for e in source.all_edges() {
            self.insert_edge(e.clone());
        }
    }

    /// Builds a graph from an iterator of `(u, v, weight)` triples.
    fn from_weighted_edges(edges: impl IntoIterator<Item = (VertexId, VertexId, f64)>) -> Self {
        let mut graph = Self::new();
        for (u, v, w) in edges {
            graph.add_edge(u, v, w);
        }
        graph
    }
}
