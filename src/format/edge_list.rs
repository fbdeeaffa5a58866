use std::io::{self, BufRead};

use super::{LineReader, parse_number};
use crate::{AdjacencyGraph, Edge, Graph, GraphBuilder, ParseError, VertexId};

/// Parses an endpoint id.  `VertexId::MAX` is rejected since a graph holding
/// it could not report its slot count.
fn parse_vertex(line: usize, token: &str) -> Result<VertexId, ParseError> {
    let vertex: VertexId = parse_number(line, token)?;
    if vertex == VertexId::MAX {
        return Err(ParseError::VertexOutOfRange {
            line,
            vertex,
            count: VertexId::MAX,
        });
    }
    Ok(vertex)
}

/// Reads a graph from lines of the form `<name> <a> <b> <weight>`.  Blank
/// lines are skipped.  The edge keeps its orientation and name.
pub fn read_edge_list(reader: impl BufRead) -> Result<AdjacencyGraph, ParseError> {
    let mut lines = LineReader::new(reader);
    let mut graph = AdjacencyGraph::new();
    while let Some((line, text)) = lines.next_line()? {
        let fields: Vec<&str> = text.split_whitespace().collect();
        match fields.as_slice() {
            [] => continue,
            [name, a, b, weight] => {
                let edge = Edge::named(
                    parse_vertex(line, a)?,
                    parse_vertex(line, b)?,
                    parse_number(line, weight)?,
                    *name,
                );
                graph.insert_edge(edge);
            }
            _ => {
                return Err(ParseError::TokenCount {
                    line,
                    found: fields.len(),
                    expected: "name a b weight",
                });
            }
        }
    }
    Ok(graph)
}

/// Writes every edge as `<name> <a> <b> <weight>`.  Unnamed edges are called
/// `e<index>` after their position in the output.
pub fn write_edge_list<G: Graph>(graph: &G, mut output: impl io::Write) -> io::Result<()> {
    for (index, edge) in graph.all_edges().enumerate() {
        let (a, b) = edge.ends();
        match edge.name() {
            Some(name) => write!(output, "{name}")?,
            None => write!(output, "e{index}")?,
        }
        writeln!(output, " {a} {b} {}", edge.weight())?;
    }
    output.flush()
}
