//! In-memory graph document.
//!
//! Nodes, subgraphs and edges live in flat arenas and are addressed by small
//! copyable handles. A node belongs either to the top level of the graph or to
//! exactly one subgraph.

use std::io;

use crate::dot::DotBuilder;

/// Handle to a node in a [`DotGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

/// Handle to a subgraph in a [`DotGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubgraphId(u32);

/// Handle to an edge in a [`DotGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Identifier used for this node in rendered DOT output.
    pub fn dot_id(self) -> String {
        format!("n{}", self.0)
    }
}

impl SubgraphId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl EdgeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Ordered attribute list. Setting an existing key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attrs {
    entries: Vec<(String, String)>,
}

impl Attrs {
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| k.as_str() == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    name: String,
    attrs: Attrs,
    parent: Option<SubgraphId>,
}

impl Node {
    /// The name the node was created with.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display label: the `label` attribute, or the name when none is set.
    pub fn label(&self) -> &str {
        self.attrs.get("label").unwrap_or(&self.name)
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key)
    }

    pub fn attrs(&self) -> &Attrs {
        &self.attrs
    }

    /// Subgraph the node was attached to, `None` for top-level nodes.
    pub fn parent(&self) -> Option<SubgraphId> {
        self.parent
    }
}

#[derive(Debug, Clone)]
pub struct Subgraph {
    name: String,
    attrs: Attrs,
    nodes: Vec<NodeId>,
}

impl Subgraph {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key)
    }

    /// Member nodes in attach order.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }
}

#[derive(Debug, Clone)]
pub struct Edge {
    from: NodeId,
    to: NodeId,
    attrs: Attrs,
}

impl Edge {
    pub fn from(&self) -> NodeId {
        self.from
    }

    pub fn to(&self) -> NodeId {
        self.to
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key)
    }

    pub fn attrs(&self) -> &Attrs {
        &self.attrs
    }
}

/// A directed graph document that renders to DOT.
#[derive(Debug, Clone)]
pub struct DotGraph {
    name: String,
    attrs: Attrs,
    node_defaults: Attrs,
    nodes: Vec<Node>,
    subgraphs: Vec<Subgraph>,
    edges: Vec<Edge>,
}

impl DotGraph {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Attrs::default(),
            node_defaults: Attrs::default(),
            nodes: Vec::new(),
            subgraphs: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set a graph-level attribute.
    pub fn set_attr(&mut self, key: &str, value: impl Into<String>) {
        self.attrs.set(key, value);
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key)
    }

    /// Set a default attribute applied to every node (`node [key=value]`).
    pub fn set_node_default(&mut self, key: &str, value: impl Into<String>) {
        self.node_defaults.set(key, value);
    }

    pub fn node_default(&self, key: &str) -> Option<&str> {
        self.node_defaults.get(key)
    }

    /// Create a node at the top level of the graph.
    pub fn add_node(&mut self, name: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let name = name.into();
        tracing::trace!(node = %id.dot_id(), name = %name, "add node");
        self.nodes.push(Node {
            name,
            attrs: Attrs::default(),
            parent: None,
        });
        id
    }

    /// Create an empty subgraph. Subgraphs render in creation order.
    pub fn add_subgraph(&mut self, name: impl Into<String>) -> SubgraphId {
        let id = SubgraphId(self.subgraphs.len() as u32);
        self.subgraphs.push(Subgraph {
            name: name.into(),
            attrs: Attrs::default(),
            nodes: Vec::new(),
        });
        id
    }

    /// Move a node into a subgraph, detaching it from wherever it was before.
    pub fn attach_node(&mut self, subgraph: SubgraphId, node: NodeId) {
        let previous = self.nodes[node.index()].parent.replace(subgraph);
        if let Some(previous) = previous {
            self.subgraphs[previous.index()].nodes.retain(|n| *n != node);
        }
        self.subgraphs[subgraph.index()].nodes.push(node);
    }

    pub fn add_edge(&mut self, from: NodeId, to: NodeId) -> EdgeId {
        let id = EdgeId(self.edges.len() as u32);
        tracing::trace!(from = %from.dot_id(), to = %to.dot_id(), "add edge");
        self.edges.push(Edge {
            from,
            to,
            attrs: Attrs::default(),
        });
        id
    }

    pub fn set_node_attr(&mut self, node: NodeId, key: &str, value: impl Into<String>) {
        self.nodes[node.index()].attrs.set(key, value);
    }

    pub fn set_subgraph_attr(&mut self, subgraph: SubgraphId, key: &str, value: impl Into<String>) {
        self.subgraphs[subgraph.index()].attrs.set(key, value);
    }

    pub fn set_edge_attr(&mut self, edge: EdgeId, key: &str, value: impl Into<String>) {
        self.edges[edge.index()].attrs.set(key, value);
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn subgraph(&self, id: SubgraphId) -> &Subgraph {
        &self.subgraphs[id.index()]
    }

    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.index()]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn subgraph_count(&self) -> usize {
        self.subgraphs.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId(i as u32), n))
    }

    pub fn subgraphs(&self) -> impl Iterator<Item = (SubgraphId, &Subgraph)> {
        self.subgraphs
            .iter()
            .enumerate()
            .map(|(i, s)| (SubgraphId(i as u32), s))
    }

    /// Edges in creation order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.edges
            .iter()
            .enumerate()
            .map(|(i, e)| (EdgeId(i as u32), e))
    }

    /// All nodes created with the given name, in creation order.
    pub fn nodes_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = NodeId> + 'a {
        self.nodes().filter(move |(_, n)| n.name == name).map(|(id, _)| id)
    }

    /// First node created with the given name.
    pub fn find_node(&self, name: &str) -> Option<NodeId> {
        self.nodes_named(name).next()
    }

    /// Edges leaving `node`, in creation order.
    pub fn edges_from(&self, node: NodeId) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |e| e.from == node)
    }

    /// Render the document as DOT text.
    pub fn render(&self) -> String {
        let mut builder = DotBuilder::new(&self.name);

        for (key, value) in self.attrs.iter() {
            builder.attr(key, value);
        }
        if !self.node_defaults.is_empty() {
            let defaults: Vec<(&str, &str)> = self.node_defaults.iter().collect();
            builder.node_style(&defaults);
        }
        builder.blank();

        for subgraph in &self.subgraphs {
            builder.start_cluster(&subgraph.name);
            for (key, value) in subgraph.attrs.iter() {
                builder.attr(key, value);
            }
            for &id in &subgraph.nodes {
                self.render_node(&mut builder, id);
            }
            builder.end_cluster();
        }

        for (id, node) in self.nodes() {
            if node.parent.is_none() {
                self.render_node(&mut builder, id);
            }
        }

        if !self.edges.is_empty() {
            builder.blank();
        }
        for edge in &self.edges {
            let attrs: Vec<(&str, &str)> = edge.attrs.iter().collect();
            builder.edge_with_attrs(&edge.from.dot_id(), &edge.to.dot_id(), &attrs);
        }

        builder.build()
    }

    /// Render the document as DOT text into `writer`.
    pub fn render_to<W: io::Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(self.render().as_bytes())
    }

    fn render_node(&self, builder: &mut DotBuilder, id: NodeId) {
        let node = &self.nodes[id.index()];
        let mut attrs: Vec<(&str, &str)> = vec![("label", node.label())];
        attrs.extend(node.attrs.iter().filter(|(k, _)| *k != "label"));
        builder.node_full(&id.dot_id(), &attrs);
    }
}
