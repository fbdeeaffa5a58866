//! Graph Laplacians, power iteration and spectral layout.
//!
//! Matrices built from a graph are indexed densely: vertex ids in ascending
//! order map to rows `0..n`.  [`VertexIndex`] records that mapping.

use std::collections::BTreeMap;

use derivative::Derivative;
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    AdjacencyGraph, Graph, GraphBuilder, GraphError, VertexId,
    sparse_matrix::{HashSparseMatrix, SparseMatrix},
    spanning_tree::prim_lazy,
    tracing_support::{debug, info_span},
};

/// Default convergence threshold on the change of the normalised iterate.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Default seed of the pseudo-random start vector.
pub const DEFAULT_SEED: u64 = 123;

/// Maps vertex ids to dense matrix indices and back.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VertexIndex {
    vertices: Vec<VertexId>,
    indices: BTreeMap<VertexId, usize>,
}

impl VertexIndex {
    pub fn of_graph<G: Graph>(graph: &G) -> Self {
        let vertices: Vec<VertexId> = graph.vertex_ids().collect();
        let indices = vertices.iter().enumerate().map(|(i, &v)| (v, i)).collect();
        Self { vertices, indices }
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Gets the vertex id of a dense index.  Panics if out of range.
    pub fn vertex(&self, index: usize) -> VertexId {
        self.vertices[index]
    }

    pub fn index_of(&self, v: VertexId) -> Option<usize> {
        self.indices.get(&v).copied()
    }

    /// Vertex ids in index order.
    pub fn vertices(&self) -> &[VertexId] {
        &self.vertices
    }
}

/// The unweighted Laplacian: vertex degree on the diagonal and -1 for every
/// adjacent pair.  Self-loops are ignored.
pub fn laplacian<G: Graph>(graph: &G) -> (HashSparseMatrix, VertexIndex) {
    let index = VertexIndex::of_graph(graph);
    let mut matrix = HashSparseMatrix::new(index.len());
    for (i, &v) in index.vertices().iter().enumerate() {
        let neighbors = graph.neighbors(v);
        let mut degree = 0;
        for w in neighbors {
            if w == v {
                continue;
            }
            if let Some(j) = index.index_of(w) {
                matrix.set(i, j, -1.0);
                degree += 1;
            }
        }
        matrix.set(i, i, degree as f64);
    }
    (matrix, index)
}

/// The weighted Laplacian: the sum of incident edge weights on the diagonal
/// and minus the total weight between each adjacent pair off the diagonal.
/// Self-loops are ignored.
pub fn weighted_laplacian<G: Graph>(graph: &G) -> (HashSparseMatrix, VertexIndex) {
    let index = VertexIndex::of_graph(graph);
    let mut matrix = HashSparseMatrix::new(index.len());
    for edge in graph.all_edges() {
        if edge.is_self_loop() {
            continue;
        }
        let (Some(i), Some(j)) = (index.index_of(edge.a()), index.index_of(edge.b())) else {
            continue;
        };
        let w = edge.weight();
        matrix.add_to(i, i, w);
        matrix.add_to(j, j, w);
        matrix.add_to(i, j, -w);
        matrix.add_to(j, i, -w);
    }
    (matrix, index)
}

/// Options for [`power_iteration`] and [`power_iteration_deflated`].
#[derive(Derivative, Clone)]
#[derivative(Debug, Default)]
pub struct PowerIterationOptions {
    /// Stop once the normalised iterate moves by less than this.
    #[derivative(Default(value = "DEFAULT_TOLERANCE"))]
    pub tolerance: f64,
    /// Iteration cap; `None` means the matrix size.
    pub max_iterations: Option<usize>,
    #[derivative(Default(value = "DEFAULT_SEED"))]
    pub seed: u64,
}

fn dot(x: &[f64], y: &[f64]) -> f64 {
    x.iter().zip(y).map(|(a, b)| a * b).sum()
}

fn normalize(v: &mut [f64]) {
    let norm = dot(v, v).sqrt();
    if norm > 0.0 {
        v.iter_mut().for_each(|x| *x /= norm);
    }
}

/// Removes from `v` its components along each unit vector in `known`.
fn project_out<K: AsRef<[f64]>>(v: &mut [f64], known: &[K]) {
    for k in known {
        let k = k.as_ref();
        let coefficient = dot(v, k);
        v.iter_mut().zip(k).for_each(|(x, kx)| *x -= coefficient * kx);
    }
}

fn check_len(expected: usize, actual: usize) -> Result<(), GraphError> {
    if expected == actual {
        Ok(())
    } else {
        Err(GraphError::DimensionMismatch { expected, actual })
    }
}

/// Estimates the dominant eigenvalue of a matrix and writes the matching unit
/// eigenvector into `out`.
pub fn power_iteration<M: SparseMatrix + ?Sized>(
    matrix: &M,
    options: &PowerIterationOptions,
    out: &mut [f64],
) -> Result<f64, GraphError> {
    power_iteration_deflated::<M, Vec<f64>>(matrix, options, &[], out)
}

/// Power iteration restricted to the subspace orthogonal to `known`, which
/// must be mutually orthogonal unit vectors (typically eigenvectors already
/// found).  The result converges to the dominant eigenvector of that
/// subspace.
pub fn power_iteration_deflated<M, K>(
    matrix: &M,
    options: &PowerIterationOptions,
    known: &[K],
    out: &mut [f64],
) -> Result<f64, GraphError>
where
    M: SparseMatrix + ?Sized,
    K: AsRef<[f64]>,
{
    let n = matrix.size();
    check_len(n, out.len())?;
    for k in known {
        check_len(n, k.as_ref().len())?;
    }
    let _span = info_span!("power_iteration", n, deflated = known.len()).entered();

    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut x: Vec<f64> = (0..n).map(|_| rng.gen_range(0.0..1.0)).collect();
    project_out(&mut x, known);
    normalize(&mut x);

    let mut y = vec![0.0; n];
    let mut lambda = 0.0;
    let max_iterations = options.max_iterations.unwrap_or(n);
    let mut iterations = 0;
    while iterations < max_iterations {
        iterations += 1;
        matrix.multiply_into(&x, &mut y);
        project_out(&mut y, known);
        lambda = dot(&x, &y);
        normalize(&mut y);
        let diff: f64 = x.iter().zip(&y).map(|(a, b)| (b - a) * (b - a)).sum();
        std::mem::swap(&mut x, &mut y);
        if diff.sqrt() < options.tolerance {
            break;
        }
    }
    debug!(iterations, lambda, "power iteration finished");
    out.copy_from_slice(&x);
    Ok(lambda)
}

/// Options for [`spectral_layout`].
#[derive(Derivative, Clone)]
#[derivative(Debug, Default)]
pub struct SpectralOptions {
    #[derivative(Default(value = "DEFAULT_TOLERANCE"))]
    pub tolerance: f64,
    /// Iteration cap per eigenvector; `None` means the number of vertices.
    pub max_iterations: Option<usize>,
    #[derivative(Default(value = "DEFAULT_SEED"))]
    pub x_seed: u64,
    #[derivative(Default(value = "456"))]
    pub y_seed: u64,
}

/// Two-dimensional vertex coordinates from Laplacian eigenvectors.
#[derive(Clone, Debug)]
pub struct SpectralLayout {
    pub index: VertexIndex,
    /// Horizontal coordinates in `[0, 1]`, by dense index.
    pub x: Vec<f64>,
    /// Vertical coordinates in `[0, 1]`, by dense index.
    pub y: Vec<f64>,
    /// Laplacian eigenvalue estimates for the two coordinate vectors.
    pub eigenvalues: (f64, f64),
}

impl SpectralLayout {
    /// Gets the coordinates of a vertex.
    pub fn position(&self, v: VertexId) -> Option<(f64, f64)> {
        self.index.index_of(v).map(|i| (self.x[i], self.y[i]))
    }
}

/// Rescales values linearly into `[0, 1]`.  Constant input maps to 0.5.
fn min_max_normalize(values: &mut [f64]) {
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = hi - lo;
    for v in values.iter_mut() {
        *v = if range > 0.0 { (*v - lo) / range } else { 0.5 };
    }
}

/// Lays out the graph using the eigenvectors of the weighted Laplacian with
/// the two smallest non-trivial eigenvalues.
///
/// Power iteration finds the largest eigenvalue, so it runs on the shifted
/// matrix `cI - L` where `c` bounds the spectrum of `L`.  The constant
/// vector, whose Laplacian eigenvalue is zero, is deflated first.  The
/// layout is mirrored if needed so that the lowest-degree vertex is in the
/// left half.
pub fn spectral_layout<G: Graph>(
    graph: &G,
    options: &SpectralOptions,
) -> Result<SpectralLayout, GraphError> {
    let _span = info_span!("spectral_layout").entered();
    let leftmost = lowest_degree_vertex(graph)?;
    let (laplacian, index) = weighted_laplacian(graph);
    let n = index.len();
    let c = laplacian.gershgorin_bound();
    let shifted = laplacian.shifted_negation(c);

    let mut known = vec![vec![1.0 / (n as f64).sqrt(); n]];
    let mut x = vec![0.0; n];
    let mut y = vec![0.0; n];
    let mut power = PowerIterationOptions {
        tolerance: options.tolerance,
        max_iterations: options.max_iterations,
        seed: options.x_seed,
    };
    let mu_x = power_iteration_deflated(&shifted, &power, &known, &mut x)?;
    known.push(x.clone());
    power.seed = options.y_seed;
    let mu_y = power_iteration_deflated(&shifted, &power, &known, &mut y)?;

    min_max_normalize(&mut x);
    min_max_normalize(&mut y);
    if let Some(i) = index.index_of(leftmost) {
        if x[i] > 0.5 {
            x.iter_mut().for_each(|v| *v = 1.0 - *v);
        }
    }

    Ok(SpectralLayout {
        index,
        x,
        y,
        eigenvalues: (c - mu_x, c - mu_y),
    })
}

/// The vertex with the fewest neighbours, the smallest id winning ties.
pub fn lowest_degree_vertex<G: Graph>(graph: &G) -> Result<VertexId, GraphError> {
    graph
        .vertex_ids()
        .min_by_key(|&v| (graph.neighbors(v).len(), v))
        .ok_or(GraphError::EmptyGraph)
}

/// A spanning forest of the edges around vertices with fewer neighbours than
/// average.  On a mesh these are the boundary vertices.
pub fn boundary_tree<G: Graph>(graph: &G) -> Result<AdjacencyGraph, GraphError> {
    if graph.is_empty() {
        return Err(GraphError::EmptyGraph);
    }
    let degrees: Vec<(VertexId, usize)> = graph
        .vertex_ids()
        .map(|v| (v, graph.neighbors(v).len()))
        .collect();
    let average = degrees.iter().map(|&(_, d)| d as f64).sum::<f64>() / degrees.len() as f64;

    let mut boundary = AdjacencyGraph::new();
    for &(v, degree) in &degrees {
        if (degree as f64) < average {
            for edge in graph.incident_edges(v) {
                boundary.insert_edge(edge.clone());
            }
        }
    }
    if boundary.is_empty() {
        return Ok(boundary);
    }
    prim_lazy(&boundary)
}
