use crate::{AdjacencyGraph, GraphBuilder, VertexId, tracing_support::info_span};

/// Builds the graph of a finite-element mesh from its elements, each given as
/// the list of its vertex indices in boundary order.
///
/// Consecutive vertices of an element are joined by an edge of weight 1.0, and
/// elements with three or more vertices are closed by an edge from the last
/// vertex back to the first.  A side shared by two elements becomes a single
/// edge.
pub fn graph_from_elements<E>(elements: impl IntoIterator<Item = E>) -> AdjacencyGraph
where
    E: AsRef<[VertexId]>,
{
    let _span = info_span!("graph_from_elements").entered();
    let mut graph = AdjacencyGraph::new();
    for element in elements {
        let vertices = element.as_ref();
        for &v in vertices {
            graph.add_vertex(v);
        }
        for pair in vertices.windows(2) {
            graph.add_unit_edge(pair[0], pair[1]);
        }
        if let [first, _, .., last] = vertices {
            graph.add_unit_edge(*last, *first);
        }
    }
    graph
}
