use std::io::{self, BufRead};

use super::{LineReader, parse_adjacency_line, parse_header, write_adjacency_line};
use crate::{AdjacencyGraph, Graph, GraphBuilder, ParseError, spectral::VertexIndex};

/// Reads a graph in adjacency-list format.  Vertices `0..n` are created even
/// when their lines are empty; each edge may be listed from either or both
/// of its endpoints.
///
/// Vertices are added as their lines are read, so a header announcing more
/// lines than the input holds fails with [`ParseError::MissingLine`] without
/// allocating for the announced count.
pub fn read_adjacency(reader: impl BufRead) -> Result<AdjacencyGraph, ParseError> {
    let mut lines = LineReader::new(reader);
    let (line, header) = lines.expect_line("vertex count")?;
    let [count] = parse_header(line, &header, "vertex count")?;

    let mut graph = AdjacencyGraph::new();
    for v in 0..count {
        let (line, text) = lines.expect_line("adjacency line")?;
        graph.add_vertex(v);
        for (w, weight) in parse_adjacency_line(line, &text, count)? {
            graph.add_edge(v, w, weight);
        }
    }
    Ok(graph)
}

/// Writes a graph in adjacency-list format.  Vertices are renumbered densely
/// in ascending id order, so a graph with ids `{0, 5}` is written as two
/// lines for vertices `0` and `1`.
pub fn write_adjacency<G: Graph>(graph: &G, mut output: impl io::Write) -> io::Result<()> {
    let index = VertexIndex::of_graph(graph);
    writeln!(output, "{}", index.len())?;
    for &v in index.vertices() {
        write_adjacency_line(graph, v, |w| index.index_of(w).unwrap_or(w), &mut output)?;
    }
    output.flush()
}
