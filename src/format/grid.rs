use std::io::{self, BufRead};

use super::{LineReader, parse_adjacency_line, parse_header, write_adjacency_line};
use crate::{AdjacencyGraph, GraphBuilder, GridGraph, ParseError};

/// Reads a grid graph: a `<columns> <rows>` header followed by one
/// adjacency line per lattice vertex.  The lattice is only built once every
/// line has been read.
pub fn read_grid(reader: impl BufRead) -> Result<GridGraph, ParseError> {
    let mut lines = LineReader::new(reader);
    let (line, header) = lines.expect_line("columns rows")?;
    let [columns, rows] = parse_header(line, &header, "columns rows")?;
    let count = columns.checked_mul(rows).ok_or_else(|| ParseError::Header {
        line,
        reason: format!("{columns} x {rows} grid is too large"),
    })?;

    let mut graph = AdjacencyGraph::new();
    for v in 0..count {
        let (line, text) = lines.expect_line("adjacency line")?;
        graph.add_vertex(v);
        for (w, weight) in parse_adjacency_line(line, &text, count)? {
            graph.add_edge(v, w, weight);
        }
    }
    Ok(GridGraph::from_graph(columns, rows, graph))
}

/// Writes a grid graph with a `<columns> <rows>` header and one adjacency
/// line per lattice vertex.
pub fn write_grid(grid: &GridGraph, mut output: impl io::Write) -> io::Result<()> {
    writeln!(output, "{} {}", grid.columns(), grid.rows())?;
    for v in 0..grid.columns() * grid.rows() {
        write_adjacency_line(grid, v, |w| w, &mut output)?;
    }
    output.flush()
}
