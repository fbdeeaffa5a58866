//! Balanced graph bisection with the Kernighan-Lin heuristic.
//!
//! The initial split puts the half of the vertices closest to a seed vertex
//! (by weighted distance) on side A and the rest on side B.  Each pass then
//! tentatively swaps pairs of adjacent vertices across the cut, greedily
//! choosing the pair with the largest gain, and commits the prefix of swaps
//! with the largest cumulative gain.

use std::{
    collections::BTreeSet,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use bitvec::vec::BitVec;
use derivative::Derivative;

use crate::{
    Edge, Graph, GraphError, VertexId,
    shortest_paths::dijkstra,
    tracing_support::{debug, info_span},
};

/// Default cap on the number of improvement passes.
pub const DEFAULT_MAX_PASSES: usize = 20;

/// Options for [`kernighan_lin`].
#[derive(Derivative, Clone)]
#[derivative(Debug, Default)]
pub struct KernighanLinOptions {
    /// Upper bound on the number of passes, including the final one that
    /// finds no improvement.
    #[derivative(Default(value = "DEFAULT_MAX_PASSES"))]
    pub max_passes: usize,
}

/// A flag shared between the caller and a running bisection.  Setting it
/// makes the bisection stop at its next check and return `Ok(None)`.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// The result of a bisection.
#[derive(Clone, Debug)]
pub struct Bisection {
    pub part_a: BTreeSet<VertexId>,
    pub part_b: BTreeSet<VertexId>,
    /// Edges with one endpoint on each side.
    pub cut_edges: Vec<Edge>,
    /// Edges with both endpoints in `part_a`.
    pub edges_a: Vec<Edge>,
    /// Edges with both endpoints in `part_b`.
    pub edges_b: Vec<Edge>,
    pub cut_weight: f64,
    /// Cut weight of the initial split followed by the cut weight after each
    /// pass that committed swaps.
    pub cut_history: Vec<f64>,
    /// Number of passes run.
    pub passes: usize,
}

#[derive(Clone, Copy, Debug)]
struct Swap {
    a: VertexId,
    b: VertexId,
    gain: f64,
}

/// Splits the graph into two halves of sizes `n/2` and `n - n/2`, trying to
/// minimise the total weight of the edges between them.
///
/// Returns `Ok(None)` if `cancel` is set while the bisection runs.
pub fn kernighan_lin<G: Graph>(
    graph: &G,
    seed: VertexId,
    options: &KernighanLinOptions,
    cancel: &CancellationToken,
) -> Result<Option<Bisection>, GraphError> {
    let _span = info_span!("kernighan_lin", seed).entered();
    let paths = dijkstra(graph, seed)?;

    let mut order: Vec<VertexId> = graph.vertex_ids().collect();
    let distances = paths.distances();
    order.sort_by(|&u, &v| distances[u].total_cmp(&distances[v]).then(u.cmp(&v)));
    let half = order.len() / 2;

    let slots = graph.slot_count();
    let mut in_a = BitVec::repeat(false, slots);
    for &v in &order[..half] {
        in_a.set(v, true);
    }

    let mut cut_history = vec![cut_weight(graph, &in_a)];
    let mut passes = 0;
    while passes < options.max_passes {
        if cancel.is_cancelled() {
            return Ok(None);
        }
        passes += 1;
        let Some(swaps) = tentative_swaps(graph, &in_a, cancel) else {
            return Ok(None);
        };

        let mut best_gain = 0.0;
        let mut best_len = 0;
        let mut total = 0.0;
        for (i, swap) in swaps.iter().enumerate() {
            total += swap.gain;
            if total > best_gain {
                best_gain = total;
                best_len = i + 1;
            }
        }
        debug!(pass = passes, swaps = swaps.len(), best_gain, best_len, "pass done");
        if best_len == 0 {
            break;
        }

        for swap in &swaps[..best_len] {
            in_a.set(swap.a, false);
            in_a.set(swap.b, true);
            if cancel.is_cancelled() {
                return Ok(None);
            }
        }
        cut_history.push(cut_weight(graph, &in_a));
    }

    Ok(Some(build_bisection(graph, &in_a, cut_history, passes)))
}

fn is_cut(edge: &Edge, in_a: &BitVec) -> bool {
    in_a[edge.a()] != in_a[edge.b()]
}

fn cut_weight<G: Graph>(graph: &G, in_a: &BitVec) -> f64 {
    graph
        .all_edges()
        .filter(|e| is_cut(e, in_a))
        .map(Edge::weight)
        .sum()
}

/// External minus internal incident weight of every vertex.  Self-loops never
/// cross the cut and are ignored.
fn initial_d<G: Graph>(graph: &G, in_a: &BitVec) -> Vec<f64> {
    let mut d = vec![0.0; graph.slot_count()];
    for v in graph.vertex_ids() {
        for edge in graph.incident_edges(v) {
            if edge.is_self_loop() {
                continue;
            }
            if is_cut(edge, in_a) {
                d[v] += edge.weight();
            } else {
                d[v] -= edge.weight();
            }
        }
    }
    d
}

/// Runs one pass of greedy tentative swaps.  Returns `None` if cancelled.
fn tentative_swaps<G: Graph>(
    graph: &G,
    in_a: &BitVec,
    cancel: &CancellationToken,
) -> Option<Vec<Swap>> {
    let mut d = initial_d(graph, in_a);
    let mut used = BitVec::repeat(false, graph.slot_count());
    let side_a: Vec<VertexId> = graph.vertex_ids().filter(|&v| in_a[v]).collect();
    let size_b = graph.num_vertices() - side_a.len();
    let mut swaps = Vec::new();

    while swaps.len() < side_a.len() && swaps.len() < size_b {
        let Some(swap) = best_swap(graph, &side_a, in_a, &used, &d) else {
            break;
        };
        used.set(swap.a, true);
        used.set(swap.b, true);
        d[swap.a] -= swap.gain;
        d[swap.b] -= swap.gain;

        // a moves to B and b moves to A: edges to a flip between internal and
        // external for the remaining vertices, and likewise for b.
        for (moved, moved_to_a) in [(swap.a, false), (swap.b, true)] {
            for edge in graph.incident_edges(moved) {
                let x = edge.other_end(moved);
                if x == moved || used[x] {
                    continue;
                }
                let delta = 2.0 * edge.weight();
                if in_a[x] == moved_to_a {
                    d[x] -= delta;
                } else {
                    d[x] += delta;
                }
            }
        }

        swaps.push(swap);
        if cancel.is_cancelled() {
            return None;
        }
    }
    Some(swaps)
}

/// Finds the unused pair `(a, b)`, `a` in A and `b` a neighbour of `a` in B,
/// with the largest gain `D(a) + D(b) - 2 w(a, b)`.  Ties go to the first pair
/// found in ascending id order.
fn best_swap<G: Graph>(
    graph: &G,
    side_a: &[VertexId],
    in_a: &BitVec,
    used: &BitVec,
    d: &[f64],
) -> Option<Swap> {
    let mut best: Option<Swap> = None;
    for &a in side_a {
        if used[a] {
            continue;
        }
        for b in graph.neighbors(a) {
            if in_a[b] || used[b] {
                continue;
            }
            let gain = d[a] + d[b] - 2.0 * graph.weight_between(a, b);
            if best.is_none_or(|s| gain > s.gain) {
                best = Some(Swap { a, b, gain });
            }
        }
    }
    best
}

fn build_bisection<G: Graph>(
    graph: &G,
    in_a: &BitVec,
    cut_history: Vec<f64>,
    passes: usize,
) -> Bisection {
    let (part_a, part_b): (BTreeSet<_>, BTreeSet<_>) = graph.vertex_ids().partition(|&v| in_a[v]);
    let mut cut_edges = Vec::new();
    let mut edges_a = Vec::new();
    let mut edges_b = Vec::new();
    for edge in graph.all_edges() {
        if is_cut(edge, in_a) {
            cut_edges.push(edge.clone());
        } else if in_a[edge.a()] {
            edges_a.push(edge.clone());
        } else {
            edges_b.push(edge.clone());
        }
    }
    let cut_weight = cut_edges.iter().map(Edge::weight).sum();
    Bisection {
        part_a,
        part_b,
        cut_edges,
        edges_a,
        edges_b,
        cut_weight,
        cut_history,
        passes,
    }
}
