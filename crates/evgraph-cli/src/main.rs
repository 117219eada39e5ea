use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

use evgraph::{EvgraphOptions, GraphArgs, exit_status, run_main, write_output};

#[derive(Parser, Debug)]
#[command(
    name = "evgraph",
    about = "evgraph: draw an eventing topology as a DOT graph",
    version
)]
pub struct Cli {
    /// JSON manifest of resources (a List or an array of objects)
    #[arg(short = 'm', long = "manifest", value_name = "FILE")]
    manifest: String,

    /// TOML file with graph options
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<String>,

    #[command(flatten)]
    graph: GraphArgs,

    /// Output file path (writes to file instead of stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<String>,
}

pub fn run(args: Cli) -> ExitCode {
    let total_start = Instant::now();

    // Initialize tracing subscriber for logging
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }

    let opts = EvgraphOptions {
        manifest: args.manifest,
        config: args.config,
        output: args.output,
        graph: args.graph,
    };

    let result = run_main(&opts).and_then(|dot| write_output(opts.output.as_deref(), &dot));

    let total_secs = total_start.elapsed().as_secs_f64();
    match result {
        Ok(()) => {
            tracing::info!(total_secs, "complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            tracing::error!(error = %e, "execution failed");
            ExitCode::from(exit_status(&e))
        }
    }
}

pub fn main() -> ExitCode {
    let args = Cli::parse();
    run(args)
}
