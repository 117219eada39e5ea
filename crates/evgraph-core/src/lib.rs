//! Builds a directed graph of an eventing topology.
//!
//! Channels, brokers and sequences become clusters with an ingress node;
//! subscriptions, triggers, sources and services become nodes wired to the
//! things they deliver to. See [`builder`] for the construction rules.
//!
//! ```rust
//! use evgraph_core::{GraphOptions, ResourceSet, build_graph};
//! use evgraph_core::resource::{AddressStatus, Broker, ObjectMeta, TypeMeta};
//!
//! let set = ResourceSet::new().with(Broker {
//!     type_meta: TypeMeta::new("eventing.knative.dev/v1alpha1", "Broker"),
//!     metadata: ObjectMeta::named("default"),
//!     status: AddressStatus::with_url("http://default-broker.demo.svc.cluster.local/"),
//! });
//! let dot = build_graph(&set, &GraphOptions::new("demo")).render();
//! assert!(dot.starts_with("digraph G {"));
//! ```

pub mod builder;
pub mod key;
pub mod manifest;
pub mod options;
pub mod resource;
pub mod style;

pub use builder::GraphBuilder;
pub use evgraph_dot::DotGraph;
pub use manifest::ResourceSet;
pub use options::{BuildOrder, GraphOptions};
pub use resource::{Resource, ResourceKind};

/// Build a graph from `resources` in one pass.
pub fn build_graph(resources: &ResourceSet, options: &GraphOptions) -> GraphBuilder {
    let mut builder = GraphBuilder::new(options);
    for resource in resources.ordered(options.order) {
        tracing::trace!(kind = %resource.kind(), name = resource.name(), "add resource");
        builder.add(resource);
    }
    builder
}
