//! Node shapes and edge colors.

use crate::key::{SERVING_GROUP, SERVING_VERSION};

/// Shape used for every node without a kind-specific one.
pub const DEFAULT_SHAPE: &str = "box";
/// Shape of serving Services.
pub const SERVICE_SHAPE: &str = "septagon";
/// Shape of the ingress node inside channel and broker clusters.
pub const INGRESS_SHAPE: &str = "oval";

/// Palette cycled through when rainbow edges are enabled.
pub const DEFAULT_PALETTE: [&str; 12] = [
    "red",
    "darkorange",
    "gold3",
    "forestgreen",
    "dodgerblue",
    "purple",
    "saddlebrown",
    "cyan4",
    "deeppink",
    "darkolivegreen",
    "navy",
    "chocolate",
];

/// Shape for a node of the given kind and apiVersion.
pub fn shape_for_kind(kind: &str, api_version: &str) -> &'static str {
    let serving = api_version
        .split_once('/')
        .is_some_and(|(group, version)| group == SERVING_GROUP && version == SERVING_VERSION);
    match kind {
        "Service" if serving => SERVICE_SHAPE,
        _ => DEFAULT_SHAPE,
    }
}

/// Color of the `index`-th colored edge, or `None` for an empty palette.
pub fn color_at(palette: &[String], index: usize) -> Option<&str> {
    if palette.is_empty() {
        return None;
    }
    Some(palette[index % palette.len()].as_str())
}
