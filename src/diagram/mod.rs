// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 infrascope contributors

//! Diagram description builder
//!
//! Turns a canonical description into a node/edge graph and renders it as
//! Mermaid flowchart directives (or DOT). The directives are handed to an
//! external renderer and never interpreted here.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::model::CanonicalInfra;
use crate::tree::RawTree;

/// Label of the synthetic environment node
pub const ENVIRONMENT_LABEL: &str = "Environment Variables";

/// Label of the placeholder emitted when nothing could be rendered
pub const EMPTY_LABEL: &str = "No infrastructure recognized";

/// Top-level keys that belong to the canonical shape
const CANONICAL_KEYS: &[&str] = &["services", "databases", "environment"];

/// Node shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeShape {
    /// Plain rectangle
    Box,
    /// Storage cylinder
    Cylinder,
    /// Rounded rectangle
    Rounded,
}

/// A diagram node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramNode {
    pub id: String,
    pub label: String,
    pub shape: NodeShape,
}

impl DiagramNode {
    fn new(id: impl Into<String>, label: impl Into<String>, shape: NodeShape) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            shape,
        }
    }

    fn mermaid(&self) -> String {
        let label = mermaid_escape(&self.label);
        match self.shape {
            NodeShape::Box => format!("{}[\"{}\"]", self.id, label),
            NodeShape::Cylinder => format!("{}[(\"{}\")]", self.id, label),
            NodeShape::Rounded => format!("{}(\"{}\")", self.id, label),
        }
    }

    fn dot(&self) -> String {
        let label = self.label.replace('\\', "\\\\").replace('"', "\\\"");
        match self.shape {
            NodeShape::Box => format!("\"{}\" [label=\"{}\"];", self.id, label),
            NodeShape::Cylinder => {
                format!("\"{}\" [label=\"{}\", shape=cylinder];", self.id, label)
            }
            NodeShape::Rounded => {
                format!("\"{}\" [label=\"{}\", shape=ellipse];", self.id, label)
            }
        }
    }
}

/// Labels must stay on one directive line: quotes become entities and
/// control characters become spaces
fn mermaid_escape(label: &str) -> String {
    label
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect::<String>()
        .replace('"', "#quot;")
}

/// A built diagram
#[derive(Debug, Clone, Default)]
pub struct Diagram {
    graph: DiGraph<DiagramNode, ()>,
}

impl Diagram {
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &DiagramNode> {
        self.graph.raw_nodes().iter().map(|node| &node.weight)
    }

    /// Edges as `(from id, to id)` pairs in insertion order
    pub fn edges(&self) -> Vec<(&str, &str)> {
        self.graph
            .edge_references()
            .map(|e| {
                (
                    self.graph[e.source()].id.as_str(),
                    self.graph[e.target()].id.as_str(),
                )
            })
            .collect()
    }

    /// Mermaid directives: the header, one line per node, one per edge
    pub fn directives(&self) -> Vec<String> {
        let mut out = vec!["graph TD".to_string()];
        out.extend(self.nodes().map(DiagramNode::mermaid));
        out.extend(
            self.edges()
                .into_iter()
                .map(|(from, to)| format!("{from} --> {to}")),
        );
        out
    }

    /// Mermaid source text
    pub fn to_mermaid(&self) -> String {
        let mut directives = self.directives().into_iter();
        let mut out = directives.next().unwrap_or_default();
        out.push('\n');
        for line in directives {
            out.push_str("    ");
            out.push_str(&line);
            out.push('\n');
        }
        out
    }

    /// DOT source text
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph infrastructure {\n");
        out.push_str("    rankdir=TB;\n");
        out.push_str("    node [shape=box, style=rounded];\n\n");

        for node in self.nodes() {
            out.push_str(&format!("    {}\n", node.dot()));
        }
        for (from, to) in self.edges() {
            out.push_str(&format!("    \"{}\" -> \"{}\";\n", from, to));
        }

        out.push_str("}\n");
        out
    }

    fn add(&mut self, node: DiagramNode) -> NodeIndex {
        self.graph.add_node(node)
    }

    fn connect(&mut self, from: NodeIndex, to: NodeIndex) {
        self.graph.add_edge(from, to, ());
    }
}

/// Builder for infrastructure diagrams
pub struct DiagramBuilder;

impl DiagramBuilder {
    /// Build a diagram from canonical data. `raw` is only consulted when no
    /// canonical section exists at all.
    pub fn build(canonical: &CanonicalInfra, raw: Option<&RawTree>) -> Diagram {
        let mut diagram = Diagram::default();

        let services: Vec<NodeIndex> = canonical
            .services()
            .iter()
            .enumerate()
            .map(|(idx, service)| {
                let detail = if !service.service_type.is_empty() {
                    service.service_type.as_str()
                } else {
                    service.runtime.as_deref().unwrap_or("service")
                };
                diagram.add(DiagramNode::new(
                    format!("S{idx}"),
                    format!("{} ({})", service.name, detail),
                    NodeShape::Box,
                ))
            })
            .collect();

        let databases: Vec<NodeIndex> = canonical
            .databases()
            .iter()
            .enumerate()
            .map(|(idx, db)| {
                diagram.add(DiagramNode::new(
                    format!("D{idx}"),
                    format!("{}: {}", db.db_type, db.name),
                    NodeShape::Cylinder,
                ))
            })
            .collect();

        let environment = (canonical.environment_len() > 0).then(|| {
            diagram.add(DiagramNode::new("ENV", ENVIRONMENT_LABEL, NodeShape::Rounded))
        });

        if let Some(&first) = services.first() {
            for &db in &databases {
                diagram.connect(first, db);
            }
            if let Some(env) = environment {
                diagram.connect(first, env);
            }
        }

        if canonical.is_empty() {
            Self::add_raw_keys(&mut diagram, raw);
        }

        if diagram.node_count() == 0 {
            diagram.add(DiagramNode::new("EMPTY", EMPTY_LABEL, NodeShape::Box));
        }

        diagram
    }

    /// One node per top-level key, chained in source order
    fn add_raw_keys(diagram: &mut Diagram, raw: Option<&RawTree>) {
        let Some(root) = raw.and_then(RawTree::as_mapping) else {
            return;
        };

        let mut previous: Option<NodeIndex> = None;
        for (idx, (key, value)) in root
            .iter()
            .filter(|(key, _)| !CANONICAL_KEYS.contains(key))
            .enumerate()
        {
            let node = diagram.add(DiagramNode::new(
                format!("K{idx}"),
                format!("{}: {}", key, value.shape_label()),
                NodeShape::Box,
            ));
            if let Some(prev) = previous {
                diagram.connect(prev, node);
            }
            previous = Some(node);
        }
    }
}
