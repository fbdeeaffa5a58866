pub mod adjacency_graph;
pub mod bisection;
pub mod edge;
pub mod error;
pub mod format;
pub mod graph;
pub mod grid_graph;
pub mod heap;
pub mod mesh;
pub mod paths;
pub mod search;
pub mod shortest_paths;
pub mod spanning_tree;
pub mod sparse_matrix;
pub mod spectral;
pub mod testing;
pub mod tracing_support;

mod util;

/// Identifies a vertex.  Ids are non-negative and need not be contiguous;
/// algorithms that keep per-vertex arrays index them by id directly.
pub type VertexId = usize;

pub use adjacency_graph::AdjacencyGraph;
pub use bisection::{Bisection, CancellationToken, KernighanLinOptions, kernighan_lin};
pub use edge::Edge;
pub use error::{GraphError, ParseError};
pub use graph::{Graph, GraphBuilder};
pub use grid_graph::GridGraph;
pub use heap::IndexedMinHeap;
pub use paths::{AllPairsPaths, DepthFirstForest, SingleSourcePaths};
pub use search::{bfs, dfs_iterative, dfs_recursive};
pub use shortest_paths::{bellman_ford, dijkstra, floyd_warshall};
pub use spanning_tree::{Forest, kruskal, prim_classical, prim_lazy};
pub use sparse_matrix::{HashSparseMatrix, SparseMatrix};
