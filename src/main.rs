use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;

use wayfind::{Graph, IndexedGraph, Node, RoutePlanner};

#[derive(Debug, thiserror::Error)]
#[error("{0}: {1}")]
struct MapLoadError(PathBuf, #[source] MapError);

#[derive(Debug, thiserror::Error)]
enum MapError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("line {0}: {1}")]
    Syntax(usize, &'static str),
}

#[derive(Parser)]
struct Cli {
    /// The path to the map file
    map_file: PathBuf,

    /// X of the start position, in percent of the map extent
    start_x: f32,

    /// Y of the start position, in percent of the map extent
    start_y: f32,

    /// X of the end position, in percent of the map extent
    end_x: f32,

    /// Y of the end position, in percent of the map extent
    end_y: f32,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    colog::init();
    let cli = Cli::parse();

    let g = load_map(&cli.map_file)?;
    log::info!("loaded {} nodes from {}", g.len(), cli.map_file.display());

    let indexed = IndexedGraph::new(&g);
    let planner = RoutePlanner::new(
        &indexed,
        (cli.start_x, cli.start_y),
        (cli.end_x, cli.end_y),
    )?;
    let route = planner.plan()?;

    println!("{{");
    println!("  \"length\": {},", route.length);
    println!("  \"waypoints\": [");

    let mut waypoints = route.waypoints.iter().peekable();
    while let Some(node) = waypoints.next() {
        let suffix = if waypoints.peek().is_some() { "," } else { "" };
        println!("    [{}, {}]{}", node.x, node.y, suffix);
    }

    println!("  ]");
    println!("}}");

    Ok(())
}

fn load_map<P: AsRef<Path>>(path: P) -> Result<Graph, MapLoadError> {
    fs::read_to_string(path.as_ref())
        .map_err(MapError::from)
        .and_then(parse_map)
        .map_err(|e| MapLoadError(PathBuf::from(path.as_ref()), e))
}

/// Parses the plain-text map format, one directive per line:
///
/// ```text
/// # comment
/// node <id> <x> <y>
/// edge <from-id> <to-id>    (one-way)
/// link <a-id> <b-id>        (both ways)
/// scale <units-to-meters>
/// ```
fn parse_map(content: String) -> Result<Graph, MapError> {
    let mut g = Graph::new();

    for (idx, line) in content.lines().enumerate() {
        let lineno = idx + 1;
        let mut fields = line.split_whitespace();

        match fields.next() {
            None => continue,
            Some(directive) if directive.starts_with('#') => continue,
            Some("node") => {
                let id = parse_id(fields.next(), lineno)?;
                let x = parse_float(fields.next(), lineno)?;
                let y = parse_float(fields.next(), lineno)?;
                g.set_node(Node { id, x, y });
            }
            Some("edge") => {
                let from = parse_id(fields.next(), lineno)?;
                let to = parse_id(fields.next(), lineno)?;
                g.add_edge(from, to);
            }
            Some("link") => {
                let a = parse_id(fields.next(), lineno)?;
                let b = parse_id(fields.next(), lineno)?;
                g.link(a, b);
            }
            Some("scale") => {
                g.set_metric_scale(parse_float(fields.next(), lineno)?);
            }
            Some(_) => return Err(MapError::Syntax(lineno, "unknown directive")),
        }
    }

    Ok(g)
}

fn parse_id(field: Option<&str>, lineno: usize) -> Result<i64, MapError> {
    field
        .and_then(|v| v.parse().ok())
        .ok_or(MapError::Syntax(lineno, "expected a node id"))
}

fn parse_float(field: Option<&str>, lineno: usize) -> Result<f32, MapError> {
    field
        .and_then(|v| v.parse().ok())
        .ok_or(MapError::Syntax(lineno, "expected a number"))
}
