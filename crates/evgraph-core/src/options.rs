//! Build options, optionally loaded from a TOML file.
//!
//! ```toml
//! namespace = "demo"
//! rainbow_edges = true
//! palette = ["red", "blue"]
//! order = "producers_first"
//! ```

use std::fs;
use std::path::Path;

use evgraph_error::{Error, Result};
use serde::Deserialize;

use crate::style::DEFAULT_PALETTE;

/// Order in which a resource set is fed to the builder.
///
/// References are resolved against what has been added so far, so order
/// decides whether a consumer links to the real producer or to a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildOrder {
    /// Keep the order of the input.
    #[default]
    AsGiven,
    /// Add address owners (channels, brokers, sequences, services) before the
    /// resources that point at them. Stable within each kind.
    ProducersFirst,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GraphOptions {
    /// Namespace shown in the graph label.
    pub namespace: String,
    /// Color edges from `palette` in creation order.
    pub rainbow_edges: bool,
    pub palette: Vec<String>,
    pub order: BuildOrder,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            namespace: "default".to_string(),
            rainbow_edges: true,
            palette: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
            order: BuildOrder::AsGiven,
        }
    }
}

impl GraphOptions {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            ..Self::default()
        }
    }

    pub fn with_rainbow_edges(mut self, rainbow_edges: bool) -> Self {
        self.rainbow_edges = rainbow_edges;
        self
    }

    pub fn with_palette<I, S>(mut self, palette: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.palette = palette.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_order(mut self, order: BuildOrder) -> Self {
        self.order = order;
        self
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|err| {
            Error::config_invalid(err.message().to_string())
                .with_operation("options::from_toml_str")
                .set_source(err)
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|err| {
            Error::from(err)
                .with_operation("options::from_path")
                .with_context("path", path.display().to_string())
        })?;
        Self::from_toml_str(&text).map_err(|err| {
            err.with_operation("options::from_path")
                .with_context("path", path.display().to_string())
        })
    }

    /// Graph label, e.g. `Triggers in default`.
    pub fn graph_label(&self) -> String {
        format!("Triggers in {}", self.namespace)
    }
}
