//! Breadth-first and depth-first traversal.
//!
//! Depth-first search comes in a recursive and an iterative form that produce
//! identical forests.  The recursive form refuses to go deeper than a
//! configurable limit rather than risk exhausting the native stack.

use std::collections::VecDeque;

use bitvec::vec::BitVec;

use crate::{
    Graph, GraphError, VertexId,
    paths::{DepthFirstForest, SingleSourcePaths},
    tracing_support::info_span,
};

/// Default recursion limit for [`dfs_recursive`].
pub const DEFAULT_MAX_RECURSION_DEPTH: usize = 4096;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Color {
    Unvisited,
    InProgress,
    Finished,
}

/// An iterator over the vertices reachable from a start vertex in
/// breadth-first order.
pub struct BfsIterator<'g, G: Graph> {
    graph: &'g G,
    visited: BitVec,
    queue: VecDeque<VertexId>,
}

impl<'g, G> BfsIterator<'g, G>
where
    G: Graph,
{
    /// Panics if `start` is not a vertex of the graph.
    pub fn new(graph: &'g G, start: VertexId) -> Self {
        graph.assert_valid_vertex(start);
        let mut visited = BitVec::repeat(false, graph.slot_count());
        visited.set(start, true);
        Self {
            graph,
            visited,
            queue: VecDeque::from([start]),
        }
    }
}

impl<G> Iterator for BfsIterator<'_, G>
where
    G: Graph,
{
    type Item = VertexId;

    fn next(&mut self) -> Option<Self::Item> {
        let v = self.queue.pop_front()?;
        for edge in self.graph.incident_edges(v) {
            let w = edge.other_end(v);
            if !self.visited[w] {
                self.visited.set(w, true);
                self.queue.push_back(w);
            }
        }
        Some(v)
    }
}

/// Breadth-first search from `source`, recording hop counts as distances.
pub fn bfs<G: Graph>(graph: &G, source: VertexId) -> Result<SingleSourcePaths, GraphError> {
    let _span = info_span!("bfs").entered();
    if graph.is_empty() {
        return Err(GraphError::EmptyGraph);
    }
    graph.check_vertex(source)?;

    let slots = graph.slot_count();
    let mut colors = vec![Color::Unvisited; slots];
    let mut distances = vec![f64::INFINITY; slots];
    let mut predecessors = vec![None; slots];
    let mut queue = VecDeque::new();

    colors[source] = Color::InProgress;
    distances[source] = 0.0;
    queue.push_back(source);
    while let Some(v) = queue.pop_front() {
        for edge in graph.incident_edges(v) {
            let w = edge.other_end(v);
            if colors[w] == Color::Unvisited {
                colors[w] = Color::InProgress;
                distances[w] = distances[v] + 1.0;
                predecessors[w] = Some(v);
                queue.push_back(w);
            }
        }
        colors[v] = Color::Finished;
    }
    Ok(SingleSourcePaths::new(source, distances, predecessors))
}

/// Neighbour lists in incident-edge order, shared by both depth-first
/// variants so they explore in the same order.
fn neighbor_lists<G: Graph>(graph: &G) -> Vec<Vec<VertexId>> {
    let mut lists = vec![Vec::new(); graph.slot_count()];
    for v in graph.vertex_ids() {
        lists[v] = graph.incident_edges(v).map(|e| e.other_end(v)).collect();
    }
    lists
}

/// Depth-first search over every vertex, using recursion and
/// [`DEFAULT_MAX_RECURSION_DEPTH`].
pub fn dfs_recursive<G: Graph>(graph: &G) -> Result<DepthFirstForest, GraphError> {
    dfs_recursive_with_limit(graph, DEFAULT_MAX_RECURSION_DEPTH)
}

/// Depth-first search over every vertex, using recursion.  Roots are tried in
/// ascending id order.  Fails with [`GraphError::TraversalDepthExceeded`] if a
/// tree path would need more than `max_depth` nested calls.
pub fn dfs_recursive_with_limit<G: Graph>(
    graph: &G,
    max_depth: usize,
) -> Result<DepthFirstForest, GraphError> {
    let _span = info_span!("dfs_recursive").entered();
    let mut search = RecursiveDfs {
        neighbors: neighbor_lists(graph),
        colors: vec![Color::Unvisited; graph.slot_count()],
        forest: DepthFirstForest::with_slots(graph.slot_count()),
        time: 0,
        max_depth,
    };
    for root in graph.vertex_ids() {
        if search.colors[root] == Color::Unvisited {
            search.forest.add_root(root);
            search.visit(root, None, 1)?;
        }
    }
    Ok(search.forest)
}

struct RecursiveDfs {
    neighbors: Vec<Vec<VertexId>>,
    colors: Vec<Color>,
    forest: DepthFirstForest,
    time: usize,
    max_depth: usize,
}

impl RecursiveDfs {
    fn visit(&mut self, v: VertexId, parent: Option<VertexId>, depth: usize) -> Result<(), GraphError> {
        if depth > self.max_depth {
            return Err(GraphError::TraversalDepthExceeded {
                limit: self.max_depth,
            });
        }
        self.colors[v] = Color::InProgress;
        self.forest.discover(v, parent, self.time);
        self.time += 1;
        for i in 0..self.neighbors[v].len() {
            let w = self.neighbors[v][i];
            if self.colors[w] == Color::Unvisited {
                self.visit(w, Some(v), depth + 1)?;
            }
        }
        self.colors[v] = Color::Finished;
        self.forest.finish_vertex(v, self.time);
        self.time += 1;
        Ok(())
    }
}

/// Depth-first search over every vertex with an explicit stack.  Produces the
/// same forest and times as [`dfs_recursive`] with no depth limit.
pub fn dfs_iterative<G: Graph>(graph: &G) -> DepthFirstForest {
    let _span = info_span!("dfs_iterative").entered();
    let neighbors = neighbor_lists(graph);
    let mut colors = vec![Color::Unvisited; graph.slot_count()];
    let mut forest = DepthFirstForest::with_slots(graph.slot_count());
    let mut time = 0;
    // Each frame is a vertex and the index of its next neighbour to try.
    let mut stack: Vec<(VertexId, usize)> = Vec::new();

    for root in graph.vertex_ids() {
        if colors[root] != Color::Unvisited {
            continue;
        }
        forest.add_root(root);
        colors[root] = Color::InProgress;
        forest.discover(root, None, time);
        time += 1;
        stack.push((root, 0));

        while let Some((v, cursor)) = stack.last_mut() {
            let v = *v;
            if let Some(&w) = neighbors[v].get(*cursor) {
                *cursor += 1;
                if colors[w] == Color::Unvisited {
                    colors[w] = Color::InProgress;
                    forest.discover(w, Some(v), time);
                    time += 1;
                    stack.push((w, 0));
                }
            } else {
                stack.pop();
                colors[v] = Color::Finished;
                forest.finish_vertex(v, time);
                time += 1;
            }
        }
    }
    forest
}
