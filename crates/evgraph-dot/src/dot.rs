//! DOT format utilities for graph rendering.

use std::fmt::Write;

/// Sanitize a string to be a valid DOT identifier.
/// Replaces any non-alphanumeric character with underscore.
pub fn sanitize_id(input: &str) -> String {
    input
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Escape special characters for DOT labels.
pub fn escape_label(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

/// Write indentation to output.
pub fn write_indent(output: &mut String, level: usize) {
    for _ in 0..level {
        output.push_str("  ");
    }
}

fn write_attr_list(output: &mut String, attrs: &[(&str, &str)]) {
    for (i, (key, value)) in attrs.iter().enumerate() {
        if i > 0 {
            output.push_str(", ");
        }
        let _ = write!(output, "{}=\"{}\"", key, escape_label(value));
    }
}

/// A DOT graph writer for constructing valid DOT output.
pub struct DotBuilder {
    output: String,
    indent: usize,
}

impl DotBuilder {
    /// Create a new DOT digraph with the given name.
    pub fn new(name: &str) -> Self {
        let mut output = String::with_capacity(4096);
        let _ = writeln!(output, "digraph {} {{", sanitize_id(name));
        Self { output, indent: 1 }
    }

    /// Add an attribute to the current graph or cluster.
    pub fn attr(&mut self, key: &str, value: &str) -> &mut Self {
        write_indent(&mut self.output, self.indent);
        let _ = writeln!(self.output, "{}=\"{}\";", key, escape_label(value));
        self
    }

    /// Add a node style default.
    pub fn node_style(&mut self, attrs: &[(&str, &str)]) -> &mut Self {
        write_indent(&mut self.output, self.indent);
        self.output.push_str("node [");
        write_attr_list(&mut self.output, attrs);
        self.output.push_str("];\n");
        self
    }

    /// Add a blank line for readability.
    pub fn blank(&mut self) -> &mut Self {
        self.output.push('\n');
        self
    }

    /// Add a node with full attributes.
    pub fn node_full(&mut self, id: &str, attrs: &[(&str, &str)]) -> &mut Self {
        write_indent(&mut self.output, self.indent);
        let _ = write!(self.output, "{id}[");
        write_attr_list(&mut self.output, attrs);
        self.output.push_str("];\n");
        self
    }

    /// Add an edge.
    pub fn edge(&mut self, from: &str, to: &str) -> &mut Self {
        write_indent(&mut self.output, self.indent);
        let _ = writeln!(self.output, "{from} -> {to};");
        self
    }

    /// Add an edge with attributes.
    pub fn edge_with_attrs(&mut self, from: &str, to: &str, attrs: &[(&str, &str)]) -> &mut Self {
        if attrs.is_empty() {
            return self.edge(from, to);
        }
        write_indent(&mut self.output, self.indent);
        let _ = write!(self.output, "{from} -> {to} [");
        write_attr_list(&mut self.output, attrs);
        self.output.push_str("];\n");
        self
    }

    /// Start a subgraph cluster. `name` should already carry the `cluster` prefix.
    pub fn start_cluster(&mut self, name: &str) -> &mut Self {
        write_indent(&mut self.output, self.indent);
        let _ = writeln!(self.output, "subgraph {} {{", sanitize_id(name));
        self.indent += 1;
        self
    }

    /// End the current subgraph cluster.
    pub fn end_cluster(&mut self) -> &mut Self {
        self.indent -= 1;
        write_indent(&mut self.output, self.indent);
        self.output.push_str("}\n\n");
        self
    }

    /// Finish building and return the DOT string.
    pub fn build(mut self) -> String {
        self.output.push_str("}\n");
        self.output
    }
}
