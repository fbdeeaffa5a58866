//! Example that reads a graph in one of the text formats (or generates a
//! random grid) and prints the results of the main algorithms.
//!
//! Usage:
//!   cargo run --example graph_report -- path/to/graph.txt
//!   cat path/to/edges.txt | cargo run --example graph_report -- --format edge-list
//!   cargo run --example graph_report -- --random-grid 20 20 --seed 7 --timings

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    process,
};

use clap::{Parser, ValueEnum};
use graphwork::{
    AdjacencyGraph, Graph, GridGraph, ParseError, bfs, dfs_iterative, dijkstra, kruskal,
    prim_classical, prim_lazy,
    bisection::{CancellationToken, KernighanLinOptions, kernighan_lin},
    format::{read_adjacency, read_edge_list, read_grid},
    spectral::{SpectralOptions, boundary_tree, spectral_layout},
    tracing_support::{dump_span_timings, init_tracing},
};
use rand::{SeedableRng, rngs::StdRng};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Adjacency,
    Grid,
    EdgeList,
}

/// Read a graph and print a report of traversal, shortest path, spanning
/// tree, bisection and spectral layout results.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input file path (use '-' or omit to read from stdin)
    input: Option<String>,

    /// Format of the input
    #[arg(long, value_enum, default_value_t = Format::Adjacency)]
    format: Format,

    /// Generate a random grid with this many columns and rows instead of
    /// reading input
    #[arg(long, num_args = 2, value_names = ["COLUMNS", "ROWS"])]
    random_grid: Option<Vec<usize>>,

    /// Average number of edges per vertex of a generated grid
    #[arg(long, default_value_t = 3.0)]
    edges_per_vertex: f64,

    /// Seed for grid generation
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Source vertex for searches and bisection (defaults to the smallest id)
    #[arg(long)]
    source: Option<usize>,

    /// Maximum number of Kernighan-Lin passes
    #[arg(long, default_value_t = graphwork::bisection::DEFAULT_MAX_PASSES)]
    max_passes: usize,

    /// Print the time spent in each algorithm
    #[arg(long)]
    timings: bool,
}

fn main() {
    let args = Args::parse();
    init_tracing();

    let graph = match &args.random_grid {
        Some(dims) => {
            let mut rng = StdRng::seed_from_u64(args.seed);
            GridGraph::random(dims[0], dims[1], 1.0, 10.0, args.edges_per_vertex, &mut rng)
                .into_graph()
        }
        None => read_or_exit(args.input.as_deref(), args.format),
    };

    if let Err(err) = report(&graph, &args) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
    if args.timings {
        dump_span_timings();
    }
}

fn read_or_exit(path: Option<&str>, format: Format) -> AdjacencyGraph {
    let reader: Box<dyn BufRead> = match path {
        Some("-") | None => Box::new(BufReader::new(io::stdin())),
        Some(path) => match File::open(path) {
            Ok(file) => Box::new(BufReader::new(file)),
            Err(err) => {
                eprintln!("Failed to open '{path}': {err}");
                process::exit(1);
            }
        },
    };
    let result: Result<AdjacencyGraph, ParseError> = match format {
        Format::Adjacency => read_adjacency(reader),
        Format::Grid => read_grid(reader).map(GridGraph::into_graph),
        Format::EdgeList => read_edge_list(reader),
    };
    match result {
        Ok(graph) => graph,
        Err(err) => {
            eprintln!("Invalid input: {err}");
            process::exit(1);
        }
    }
}

fn report(graph: &AdjacencyGraph, args: &Args) -> Result<(), graphwork::GraphError> {
    println!("Vertices: {}", graph.num_vertices());
    println!("Edges: {}", graph.num_edges());
    if let (Some(lo), Some(hi)) = (graph.min_edge_weight(), graph.max_edge_weight()) {
        println!("Edge weights: {lo} to {hi}");
    }
    if graph.is_empty() {
        return Ok(());
    }
    let components = dfs_iterative(graph).roots().len();
    println!("Connected components: {components}");

    let source = match args.source {
        Some(v) => v,
        None => graph.vertex_ids().next().unwrap_or_default(),
    };

    let hops = bfs(graph, source)?;
    println!(
        "\nBFS from {source}: farthest vertex {} at {} hops",
        hops.farthest(),
        hops.farthest_distance()
    );
    let paths = dijkstra(graph, source)?;
    println!(
        "Dijkstra from {source}: farthest vertex {} at distance {}",
        paths.farthest(),
        paths.farthest_distance()
    );
    if let Some(path) = paths.path_to(paths.farthest()) {
        println!("  path: {path:?}");
    }

    println!("\nMinimum spanning forest weight:");
    println!("  lazy Prim:      {}", prim_lazy(graph)?.total_weight());
    println!("  classical Prim: {}", prim_classical(graph)?.total_weight());
    println!("  Kruskal:        {}", kruskal(graph)?.total_weight());

    let options = KernighanLinOptions {
        max_passes: args.max_passes,
    };
    if let Some(bisection) = kernighan_lin(graph, source, &options, &CancellationToken::new())? {
        println!(
            "\nKernighan-Lin bisection: {} + {} vertices, cut weight {} after {} passes",
            bisection.part_a.len(),
            bisection.part_b.len(),
            bisection.cut_weight,
            bisection.passes
        );
        println!("  cut history: {:?}", bisection.cut_history);
    }

    let layout = spectral_layout(graph, &SpectralOptions::default())?;
    println!(
        "\nSpectral layout eigenvalues: {:.6}, {:.6}",
        layout.eigenvalues.0, layout.eigenvalues.1
    );
    for v in graph.vertex_ids().take(10) {
        if let Some((x, y)) = layout.position(v) {
            println!("  {v}: ({x:.3}, {y:.3})");
        }
    }

    let boundary = boundary_tree(graph)?;
    println!(
        "\nBoundary tree: {} vertices, {} edges",
        boundary.num_vertices(),
        boundary.num_edges()
    );
    Ok(())
}
