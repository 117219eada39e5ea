//! evgraph command-line interface.
pub mod options;
pub mod output;

use tracing::info;

use evgraph_core::{GraphOptions, ResourceSet};
use evgraph_error::{Error, Result};

pub use options::GraphArgs;
pub use output::{generate_dot_output, write_output};

/// Options for running evgraph.
pub struct EvgraphOptions {
    pub manifest: String,
    pub config: Option<String>,
    pub output: Option<String>,
    pub graph: GraphArgs,
}

/// Resolve the effective graph options: config file first, then flags.
pub fn load_graph_options(opts: &EvgraphOptions) -> Result<GraphOptions> {
    let base = match &opts.config {
        Some(path) => {
            info!(path = %path, "loading config");
            GraphOptions::from_path(path)?
        }
        None => GraphOptions::default(),
    };
    Ok(opts.graph.apply(base))
}

/// Main entry point: load the manifest and render it as DOT.
pub fn run_main(opts: &EvgraphOptions) -> Result<String> {
    let options = load_graph_options(opts)?;
    let resources = ResourceSet::from_path(&opts.manifest)?;
    info!(count = resources.len(), manifest = %opts.manifest, "loaded resources");

    Ok(generate_dot_output(&resources, &options))
}

/// Process exit status for a failed run: 2 for bad input, 1 otherwise.
pub fn exit_status(err: &Error) -> u8 {
    if err.kind().is_input_error() { 2 } else { 1 }
}
