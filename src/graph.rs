//! Directed graph model and DOT source generation.
//!
//! Each chunk of the outline becomes one [`Digraph`]. Layout is left to
//! Graphviz; this module only decides which nodes and edges exist and how
//! they are labelled.
//!
//! ## Node Identity
//!
//! A node's id is the `_`-joined path of labels from the chunk root, so the
//! same label under different parents stays distinct:
//!
//! ```text
//! Animals            → "Animals"
//!     Dog            → "Animals_Dog"
//!         Puppy      → "Animals_Dog_Puppy"
//! ```
//!
//! List payloads produce one node per element, `"{path}_item_{i}"`, labelled
//! with the element's value.

use crate::config::GraphConfig;
use crate::types::{Node, Outline};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Graphviz `rankdir`: the direction edges flow in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RankDir {
    #[default]
    Lr,
    Rl,
    Tb,
    Bt,
}

impl RankDir {
    pub fn as_str(self) -> &'static str {
        match self {
            RankDir::Lr => "LR",
            RankDir::Rl => "RL",
            RankDir::Tb => "TB",
            RankDir::Bt => "BT",
        }
    }
}

/// Graph-wide and per-node attributes written into every diagram.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphStyle {
    pub rankdir: RankDir,
    pub node_shape: String,
    pub font_color: String,
}

impl GraphStyle {
    pub fn from_config(config: &GraphConfig) -> Self {
        Self {
            rankdir: config.rankdir,
            node_shape: config.node_shape.clone(),
            font_color: config.font_color.clone(),
        }
    }
}

impl Default for GraphStyle {
    fn default() -> Self {
        Self::from_config(&GraphConfig::default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
}

/// A directed graph ready to be written as DOT source.
#[derive(Debug, Clone, PartialEq)]
pub struct Digraph {
    pub name: String,
    pub style: GraphStyle,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl Digraph {
    pub fn new(name: &str, style: GraphStyle) -> Self {
        Self {
            name: name.to_string(),
            style,
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Build the graph for an outline (usually one chunk of it).
    ///
    /// Top-level labels become roots with no incoming edge.
    pub fn from_outline(name: &str, outline: &Outline, style: &GraphStyle) -> Self {
        let mut graph = Self::new(name, style.clone());
        graph.add_mapping(outline, None);
        graph
    }

    fn add_mapping(&mut self, outline: &Outline, parent: Option<&str>) {
        for (key, node) in outline {
            let path = match parent {
                Some(parent) => format!("{parent}_{key}"),
                None => key.clone(),
            };
            self.add_node(&path, key);
            if let Some(parent) = parent {
                self.add_edge(parent, &path);
            }
            self.add_payload(node, &path);
        }
    }

    fn add_payload(&mut self, node: &Node, path: &str) {
        match node {
            Node::Branch(children) => self.add_mapping(children, Some(path)),
            Node::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    let id = format!("{path}_item_{i}");
                    let label = match item {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    self.add_node(&id, &label);
                    self.add_edge(path, &id);
                }
            }
        }
    }

    pub fn add_node(&mut self, id: &str, label: &str) {
        self.nodes.push(GraphNode {
            id: id.to_string(),
            label: label.to_string(),
        });
    }

    pub fn add_edge(&mut self, from: &str, to: &str) {
        self.edges.push(GraphEdge {
            from: from.to_string(),
            to: to.to_string(),
        });
    }

    /// Write the graph as Graphviz DOT source.
    pub fn to_dot(&self) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail.
        let _ = writeln!(out, "digraph {} {{", quote(&self.name));
        let _ = writeln!(
            out,
            "\tnode [fontcolor={} shape={}]",
            quote(&self.style.font_color),
            quote(&self.style.node_shape)
        );
        let _ = writeln!(out, "\trankdir={}", self.style.rankdir.as_str());
        for node in &self.nodes {
            let _ = writeln!(out, "\t{} [label={}]", quote(&node.id), quote(&node.label));
        }
        for edge in &self.edges {
            let _ = writeln!(out, "\t{} -> {}", quote(&edge.from), quote(&edge.to));
        }
        out.push_str("}\n");
        out
    }
}

/// Double-quote a DOT identifier, escaping quotes, backslashes and newlines.
fn quote(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('"');
    for c in s.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}
