//! Output generation (DOT graphs).

use std::fs;
use std::time::Instant;

use tracing::info;

use evgraph_core::{GraphOptions, ResourceSet, build_graph};
use evgraph_error::Result;

/// Build and render the graph for a resource set.
pub fn generate_dot_output(resources: &ResourceSet, options: &GraphOptions) -> String {
    let build_start = Instant::now();
    let builder = build_graph(resources, options);
    let graph = builder.graph();
    info!(
        nodes = graph.node_count(),
        clusters = graph.subgraph_count(),
        edges = graph.edge_count(),
        "Graph build: {:.3}s",
        build_start.elapsed().as_secs_f64()
    );
    builder.render()
}

/// Write `dot` to `path`, or to stdout when no path is given.
pub fn write_output(path: Option<&str>, dot: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, dot).map_err(|err| {
                evgraph_error::Error::from(err)
                    .with_operation("output::write_output")
                    .with_context("path", path)
            })?;
            info!(path, "output written");
        }
        None => print!("{dot}"),
    }
    Ok(())
}
