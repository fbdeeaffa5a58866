//! Plain-text graph formats.
//!
//! Three formats are supported:
//!
//! - adjacency list ([`read_adjacency`], [`write_adjacency`]): a vertex count
//!   on the first line, then one line per vertex listing `<neighbor> :<weight>`
//!   pairs;
//! - grid ([`read_grid`], [`write_grid`]): the same, with a `<columns> <rows>`
//!   header;
//! - edge list ([`read_edge_list`], [`write_edge_list`]): one
//!   `<name> <a> <b> <weight>` line per edge.
//!
//! Readers take any [`BufRead`] and fail on the first malformed line with a
//! [`ParseError`] naming it; writers take any [`io::Write`].
//!
//! [`BufRead`]: std::io::BufRead
//! [`io::Write`]: std::io::Write

use std::{
    io::{self, BufRead},
    str::FromStr,
};

use crate::{Graph, ParseError, VertexId};

mod adjacency;
mod edge_list;
mod grid;

pub use adjacency::{read_adjacency, write_adjacency};
pub use edge_list::{read_edge_list, write_edge_list};
pub use grid::{read_grid, write_grid};

/// Reads lines while tracking 1-based line numbers.
struct LineReader<R> {
    lines: io::Lines<R>,
    line: usize,
}

impl<R: BufRead> LineReader<R> {
    fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
        }
    }

    /// Gets the next line and its number, or `None` at end of input.
    fn next_line(&mut self) -> Result<Option<(usize, String)>, ParseError> {
        match self.lines.next() {
            Some(line) => {
                self.line += 1;
                Ok(Some((self.line, line?)))
            }
            None => Ok(None),
        }
    }

    /// Gets the next line, failing if the input has ended.
    fn expect_line(&mut self, expected: &'static str) -> Result<(usize, String), ParseError> {
        self.next_line()?.ok_or(ParseError::MissingLine {
            line: self.line + 1,
            expected,
        })
    }
}

/// Splits a line into tokens separated by whitespace or colons.
fn tokens(line: &str) -> Vec<&str> {
    line.split(|c: char| c.is_whitespace() || c == ':')
        .filter(|t| !t.is_empty())
        .collect()
}

fn parse_number<T: FromStr>(line: usize, token: &str) -> Result<T, ParseError> {
    token.parse().map_err(|_| ParseError::InvalidNumber {
        line,
        token: token.to_string(),
    })
}

/// Parses a header line holding exactly `N` unsigned integers.
fn parse_header<const N: usize>(
    line: usize,
    text: &str,
    expected: &'static str,
) -> Result<[usize; N], ParseError> {
    let found = tokens(text);
    if found.len() != N {
        return Err(ParseError::TokenCount {
            line,
            found: found.len(),
            expected,
        });
    }
    let mut values = [0; N];
    for (value, token) in values.iter_mut().zip(found) {
        *value = parse_number(line, token)?;
    }
    Ok(values)
}

/// Parses one adjacency line into `(neighbor, weight)` pairs.  Neighbours
/// must be below `count`.
fn parse_adjacency_line(
    line: usize,
    text: &str,
    count: usize,
) -> Result<Vec<(VertexId, f64)>, ParseError> {
    let found = tokens(text);
    if found.len() % 2 != 0 {
        return Err(ParseError::TokenCount {
            line,
            found: found.len(),
            expected: "neighbor :weight pairs",
        });
    }
    found
        .chunks(2)
        .map(|pair| {
            let vertex: VertexId = parse_number(line, pair[0])?;
            if vertex >= count {
                return Err(ParseError::VertexOutOfRange {
                    line,
                    vertex,
                    count,
                });
            }
            Ok((vertex, parse_number(line, pair[1])?))
        })
        .collect()
}

/// Writes the adjacency line of `v`: every incident edge as its far end,
/// passed through `rename`, and weight.  Absent vertices get an empty line.
fn write_adjacency_line<G: Graph>(
    graph: &G,
    v: VertexId,
    rename: impl Fn(VertexId) -> VertexId,
    output: &mut impl io::Write,
) -> io::Result<()> {
    write!(output, "\t")?;
    if graph.has_vertex(v) {
        for edge in graph.incident_edges(v) {
            write!(output, " {} :{} ", rename(edge.other_end(v)), edge.weight())?;
        }
    }
    writeln!(output)
}
