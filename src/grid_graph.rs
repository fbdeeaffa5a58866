use rand::Rng;

use crate::{AdjacencyGraph, Edge, Graph, GraphBuilder, VertexId, tracing_support::info_span};

/// A graph whose vertices form a `columns x rows` lattice, numbered column by
/// column: the vertex at `(row, column)` is `column * rows + row`.
///
/// Edges may join any vertices; generated grids only join lattice
/// neighbours.
#[derive(Clone, Debug)]
pub struct GridGraph {
    columns: usize,
    rows: usize,
    graph: AdjacencyGraph,
}

impl GridGraph {
    /// Creates a grid with every lattice vertex and no edges.
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns,
            rows,
            graph: AdjacencyGraph::with_vertices(columns * rows),
        }
    }

    /// Wraps an existing graph, adding any missing lattice vertices.
    pub fn from_graph(columns: usize, rows: usize, mut graph: AdjacencyGraph) -> Self {
        for v in 0..columns * rows {
            graph.add_vertex(v);
        }
        Self {
            columns,
            rows,
            graph,
        }
    }

    /// Creates a grid with every lattice neighbour pair joined by an edge of
    /// the given weight.
    pub fn lattice(columns: usize, rows: usize, weight: f64) -> Self {
        let mut grid = Self::new(columns, rows);
        for (u, v) in grid.lattice_pairs() {
            grid.graph.add_edge(u, v, weight);
        }
        grid
    }

    /// Creates a grid where each lattice neighbour pair is joined with
    /// probability `avg_edges_per_vertex / 4`, by an edge with weight drawn
    /// uniformly from `[w_min, w_max)`.
    pub fn random(
        columns: usize,
        rows: usize,
        w_min: f64,
        w_max: f64,
        avg_edges_per_vertex: f64,
        rng: &mut impl Rng,
    ) -> Self {
        let _span = info_span!("grid_random", columns, rows).entered();
        let mut grid = Self::new(columns, rows);
        let dw = w_max - w_min;
        let probability = avg_edges_per_vertex / 4.0;
        for (u, v) in grid.lattice_pairs() {
            let weight = w_min + dw * rng.gen_range(0.0..1.0);
            if rng.gen_range(0.0..1.0) < probability {
                grid.graph.add_edge(u, v, weight);
            }
        }
        grid
    }

    /// Lattice neighbour pairs: first the vertical ones within each column,
    /// then the horizontal ones between columns.
    fn lattice_pairs(&self) -> Vec<(VertexId, VertexId)> {
        let mut pairs = Vec::new();
        for c in 0..self.columns {
            for r in 1..self.rows {
                let v = self.vertex_at(r, c);
                pairs.push((v - 1, v));
            }
        }
        for c in 1..self.columns {
            for r in 0..self.rows {
                let v = self.vertex_at(r, c);
                pairs.push((v - self.rows, v));
            }
        }
        pairs
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Gets the vertex at a row and column.
    pub fn vertex_at(&self, row: usize, column: usize) -> VertexId {
        column * self.rows + row
    }

    fn is_lattice_vertex(&self, v: VertexId) -> bool {
        v < self.columns * self.rows
    }

    /// Gets the row of a lattice vertex, or `None` for ids outside the
    /// lattice (every id when the grid is empty).
    pub fn row(&self, v: VertexId) -> Option<usize> {
        self.is_lattice_vertex(v).then(|| v % self.rows)
    }

    /// Gets the column of a lattice vertex, or `None` for ids outside the
    /// lattice.
    pub fn column(&self, v: VertexId) -> Option<usize> {
        self.is_lattice_vertex(v).then(|| v / self.rows)
    }

    pub fn add_edge(&mut self, u: VertexId, v: VertexId, weight: f64) -> bool {
        self.graph.add_edge(u, v, weight)
    }

    pub fn as_graph(&self) -> &AdjacencyGraph {
        &self.graph
    }

    pub fn into_graph(self) -> AdjacencyGraph {
        self.graph
    }
}

impl Graph for GridGraph {
    fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.graph.vertex_ids()
    }

    fn has_vertex(&self, id: VertexId) -> bool {
        self.graph.has_vertex(id)
    }

    fn num_vertices(&self) -> usize {
        self.graph.num_vertices()
    }

    fn max_vertex_id(&self) -> Option<VertexId> {
        self.graph.max_vertex_id()
    }

    fn vertex_label(&self, id: VertexId) -> Option<&str> {
        self.graph.vertex_label(id)
    }

    fn incident_edges(&self, v: VertexId) -> impl Iterator<Item = &Edge> + '_ {
        self.graph.incident_edges(v)
    }

    fn all_edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.graph.all_edges()
    }

    fn num_edges(&self) -> usize {
        self.graph.num_edges()
    }

    fn min_edge_weight(&self) -> Option<f64> {
        self.graph.min_edge_weight()
    }

    fn max_edge_weight(&self) -> Option<f64> {
        self.graph.max_edge_weight()
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn test_numbering() {
        let grid = GridGraph::new(3, 2);
        assert_eq!(grid.num_vertices(), 6);
        assert_eq!(grid.vertex_at(1, 2), 5);
        assert_eq!(grid.row(5), Some(1));
        assert_eq!(grid.column(5), Some(2));
        assert_eq!(grid.vertex_at(0, 1), 2);
        assert_eq!(grid.row(6), None);
    }

    #[test]
    fn test_empty_grid_has_no_coordinates() {
        for (columns, rows) in [(0, 0), (3, 0), (0, 3)] {
            let grid = GridGraph::new(columns, rows);
            assert!(grid.is_empty());
            assert_eq!(grid.row(0), None);
            assert_eq!(grid.column(7), None);
        }
        assert_eq!(GridGraph::lattice(4, 0, 1.0).num_edges(), 0);
    }

    #[test]
    fn test_lattice() {
        let grid = GridGraph::lattice(3, 2, 1.0);
        // 3 vertical pairs and 2 * 2 horizontal pairs.
        assert_eq!(grid.num_edges(), 7);
        assert!(grid.has_edge(0, 1));
        assert!(grid.has_edge(1, 3));
        assert!(!grid.has_edge(1, 2));
    }

    #[test]
    fn test_random_extremes() {
        let mut rng = StdRng::seed_from_u64(7);
        let full = GridGraph::random(4, 5, 1.0, 2.0, 4.0, &mut rng);
        assert_eq!(full.num_edges(), GridGraph::lattice(4, 5, 1.0).num_edges());
        assert!(full.min_edge_weight().unwrap() >= 1.0);
        assert!(full.max_edge_weight().unwrap() < 2.0);

        let none = GridGraph::random(4, 5, 1.0, 2.0, 0.0, &mut rng);
        assert_eq!(none.num_edges(), 0);
        assert_eq!(none.num_vertices(), 20);
    }

    #[test]
    fn test_random_is_reproducible() {
        let a = GridGraph::random(6, 6, 0.0, 10.0, 2.0, &mut StdRng::seed_from_u64(42));
        let b = GridGraph::random(6, 6, 0.0, 10.0, 2.0, &mut StdRng::seed_from_u64(42));
        assert_eq!(a.edge_set(), b.edge_set());
    }

    #[test]
    fn test_add_edge_off_lattice() {
        let mut grid = GridGraph::new(2, 2);
        assert!(grid.add_edge(0, 3, 2.0));
        assert!(!grid.add_edge(3, 0, 2.0));
        assert_eq!(grid.weight_between(0, 3), 2.0);
    }

    #[test]
    fn test_from_graph_fills_lattice() {
        let grid = GridGraph::from_graph(2, 2, AdjacencyGraph::from_weighted_edges([(0, 3, 1.0)]));
        assert_eq!(grid.vertex_ids().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
        assert_eq!(grid.into_graph().num_edges(), 1);
    }
}
