//! Command-line graph options.
//!
//! Flags are layered on top of the optional TOML config file: a flag that is
//! given always wins, a flag that is absent leaves the config value alone.

use clap::Args;

use evgraph_core::{BuildOrder, GraphOptions};

#[derive(Args, Debug, Clone, Default)]
pub struct GraphArgs {
    /// Namespace shown in the graph label.
    #[arg(short = 'n', long = "namespace", value_name = "NAMESPACE")]
    pub namespace: Option<String>,

    /// Draw all edges in the default color.
    #[arg(long = "no-rainbow")]
    pub no_rainbow: bool,

    /// Add channels, brokers and sequences before the resources that point at them.
    #[arg(long = "producers-first")]
    pub producers_first: bool,
}

impl GraphArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_no_rainbow(mut self, no_rainbow: bool) -> Self {
        self.no_rainbow = no_rainbow;
        self
    }

    pub fn with_producers_first(mut self, producers_first: bool) -> Self {
        self.producers_first = producers_first;
        self
    }

    /// Apply the flags that were given to `options`.
    pub fn apply(&self, mut options: GraphOptions) -> GraphOptions {
        if let Some(namespace) = &self.namespace {
            options.namespace = namespace.clone();
        }
        if self.no_rainbow {
            options.rainbow_edges = false;
        }
        if self.producers_first {
            options.order = BuildOrder::ProducersFirst;
        }
        options
    }
}
