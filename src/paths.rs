//! Result types produced by the traversal and shortest-path algorithms.
//!
//! All tables are dense and indexed by vertex id ("slots"); entries for ids
//! absent from the graph keep their unreached values.

use crate::VertexId;

/// Distances and predecessors from a single source vertex.
///
/// Unreachable vertices have an infinite distance and no predecessor.
#[derive(Clone, Debug, PartialEq)]
pub struct SingleSourcePaths {
    source: VertexId,
    distances: Vec<f64>,
    predecessors: Vec<Option<VertexId>>,
    farthest: VertexId,
    farthest_distance: f64,
    min_distance: Option<f64>,
}

impl SingleSourcePaths {
    /// Builds the result from raw tables and computes the summary fields.
    ///
    /// The farthest vertex is the reached vertex with the largest distance,
    /// the smallest id winning ties; it is the source itself when nothing
    /// else is reachable.
    pub fn new(source: VertexId, distances: Vec<f64>, predecessors: Vec<Option<VertexId>>) -> Self {
        debug_assert_eq!(distances.len(), predecessors.len());
        let mut farthest = source;
        let mut farthest_distance = distances.get(source).copied().unwrap_or(0.0);
        let mut min_distance: Option<f64> = None;
        for (v, &d) in distances.iter().enumerate() {
            if !d.is_finite() || v == source {
                continue;
            }
            if d > farthest_distance {
                farthest = v;
                farthest_distance = d;
            }
            if d >= 0.0 && min_distance.is_none_or(|m| d < m) {
                min_distance = Some(d);
            }
        }
        Self {
            source,
            distances,
            predecessors,
            farthest,
            farthest_distance,
            min_distance,
        }
    }

    pub fn source(&self) -> VertexId {
        self.source
    }

    /// Gets the distance to `v`, or `None` if `v` was not reached.
    pub fn distance(&self, v: VertexId) -> Option<f64> {
        self.distances.get(v).copied().filter(|d| d.is_finite())
    }

    /// Gets the raw distance table; unreached slots hold infinity.
    pub fn distances(&self) -> &[f64] {
        &self.distances
    }

    pub fn predecessor(&self, v: VertexId) -> Option<VertexId> {
        self.predecessors.get(v).copied().flatten()
    }

    pub fn predecessors(&self) -> &[Option<VertexId>] {
        &self.predecessors
    }

    pub fn is_reached(&self, v: VertexId) -> bool {
        self.distance(v).is_some()
    }

    /// The reached vertex farthest from the source.
    pub fn farthest(&self) -> VertexId {
        self.farthest
    }

    pub fn farthest_distance(&self) -> f64 {
        self.farthest_distance
    }

    /// The smallest non-negative distance to a reached vertex other than the
    /// source.
    pub fn min_distance(&self) -> Option<f64> {
        self.min_distance
    }

    /// Reconstructs the path from the source to `target`, both included, by
    /// following predecessors.  Returns `None` if `target` was not reached.
    pub fn path_to(&self, target: VertexId) -> Option<Vec<VertexId>> {
        if !self.is_reached(target) {
            return None;
        }
        let mut path = vec![target];
        let mut current = target;
        while current != self.source {
            current = self.predecessor(current)?;
            path.push(current);
            // A predecessor cycle can only come from a negative cycle.
            if path.len() > self.distances.len() {
                return None;
            }
        }
        path.reverse();
        Some(path)
    }
}

/// Distances and predecessors between every pair of slots.
///
/// `predecessor(s, t)` is the vertex before `t` on a shortest path from `s`.
#[derive(Clone, Debug, PartialEq)]
pub struct AllPairsPaths {
    distances: Vec<Vec<f64>>,
    predecessors: Vec<Vec<Option<VertexId>>>,
}

impl AllPairsPaths {
    pub fn new(distances: Vec<Vec<f64>>, predecessors: Vec<Vec<Option<VertexId>>>) -> Self {
        Self {
            distances,
            predecessors,
        }
    }

    pub fn slot_count(&self) -> usize {
        self.distances.len()
    }

    pub fn distance(&self, from: VertexId, to: VertexId) -> Option<f64> {
        self.distances
            .get(from)
            .and_then(|row| row.get(to))
            .copied()
            .filter(|d| d.is_finite())
    }

    pub fn predecessor(&self, from: VertexId, to: VertexId) -> Option<VertexId> {
        self.predecessors
            .get(from)
            .and_then(|row| row.get(to))
            .copied()
            .flatten()
    }

    /// Projects the table onto a single source.
    pub fn from_source(&self, source: VertexId) -> SingleSourcePaths {
        let n = self.slot_count();
        match (self.distances.get(source), self.predecessors.get(source)) {
            (Some(distances), Some(predecessors)) => {
                SingleSourcePaths::new(source, distances.clone(), predecessors.clone())
            }
            _ => SingleSourcePaths::new(source, vec![f64::INFINITY; n], vec![None; n]),
        }
    }
}

/// The forest produced by a depth-first search, with discovery and finish
/// times from a single global clock.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DepthFirstForest {
    predecessors: Vec<Option<VertexId>>,
    discovery: Vec<Option<usize>>,
    finish: Vec<Option<usize>>,
    roots: Vec<VertexId>,
}

impl DepthFirstForest {
    pub(crate) fn with_slots(slots: usize) -> Self {
        Self {
            predecessors: vec![None; slots],
            discovery: vec![None; slots],
            finish: vec![None; slots],
            roots: Vec::new(),
        }
    }

    pub(crate) fn add_root(&mut self, v: VertexId) {
        self.roots.push(v);
    }

    pub(crate) fn discover(&mut self, v: VertexId, parent: Option<VertexId>, time: usize) {
        self.predecessors[v] = parent;
        self.discovery[v] = Some(time);
    }

    pub(crate) fn finish_vertex(&mut self, v: VertexId, time: usize) {
        self.finish[v] = Some(time);
    }

    pub fn predecessor(&self, v: VertexId) -> Option<VertexId> {
        self.predecessors.get(v).copied().flatten()
    }

    pub fn discovery(&self, v: VertexId) -> Option<usize> {
        self.discovery.get(v).copied().flatten()
    }

    pub fn finish(&self, v: VertexId) -> Option<usize> {
        self.finish.get(v).copied().flatten()
    }

    /// Tree roots in the order they were visited.
    pub fn roots(&self) -> &[VertexId] {
        &self.roots
    }

    pub fn predecessors(&self) -> &[Option<VertexId>] {
        &self.predecessors
    }

    /// Vertices ordered by discovery time.
    pub fn preorder(&self) -> Vec<VertexId> {
        let mut order: Vec<_> = (0..self.discovery.len())
            .filter_map(|v| self.discovery[v].map(|t| (t, v)))
            .collect();
        order.sort_unstable();
        order.into_iter().map(|(_, v)| v).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INF: f64 = f64::INFINITY;

    fn sample() -> SingleSourcePaths {
        // 0 -> 1 -> 2, 3 unreachable.
        SingleSourcePaths::new(
            0,
            vec![0.0, 1.5, 4.0, INF],
            vec![None, Some(0), Some(1), None],
        )
    }

    #[test]
    fn test_summary_fields() {
        let paths = sample();
        assert_eq!(paths.farthest(), 2);
        assert_eq!(paths.farthest_distance(), 4.0);
        assert_eq!(paths.min_distance(), Some(1.5));
        assert_eq!(paths.distance(3), None);
        assert_eq!(paths.distance(9), None);
    }

    #[test]
    fn test_path_to() {
        let paths = sample();
        assert_eq!(paths.path_to(2), Some(vec![0, 1, 2]));
        assert_eq!(paths.path_to(0), Some(vec![0]));
        assert_eq!(paths.path_to(3), None);
    }

    #[test]
    fn test_path_to_cycle_guard() {
        let paths = SingleSourcePaths::new(0, vec![0.0, -1.0, -2.0], vec![None, Some(2), Some(1)]);
        assert_eq!(paths.path_to(1), None);
    }

    #[test]
    fn test_isolated_source() {
        let paths = SingleSourcePaths::new(1, vec![INF, 0.0], vec![None, None]);
        assert_eq!(paths.farthest(), 1);
        assert_eq!(paths.farthest_distance(), 0.0);
        assert_eq!(paths.min_distance(), None);
    }

    #[test]
    fn test_all_pairs_projection() {
        let all = AllPairsPaths::new(
            vec![vec![0.0, 2.0], vec![2.0, 0.0]],
            vec![vec![None, Some(0)], vec![Some(1), None]],
        );
        let from_one = all.from_source(1);
        assert_eq!(from_one.distance(0), Some(2.0));
        assert_eq!(from_one.path_to(0), Some(vec![1, 0]));
        assert_eq!(all.from_source(5).distance(0), None);
    }
}
