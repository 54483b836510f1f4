//! Shared types used across all pipeline stages.
//!
//! The outline tree is serialized to `structure.json` by the parse stage and
//! read back by the render stage, so these types must round-trip through JSON
//! unchanged.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A mapping from label to subtree, in document order.
///
/// Re-inserting an existing label keeps its original position and replaces the
/// subtree, so a repeated sibling label ends up holding the last occurrence.
pub type Outline = IndexMap<String, Node>;

/// The payload attached to a label in the outline tree.
///
/// Serialized untagged: a branch is a JSON object, a list is a JSON array.
/// The parser only ever produces empty lists (the leaf marker). Non-empty
/// lists come from hand-written structure files and are drawn as item nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Branch(Outline),
    List(Vec<serde_json::Value>),
}

impl Node {
    /// The leaf marker: an empty list.
    pub fn leaf() -> Self {
        Node::List(Vec::new())
    }

    /// True for the leaf marker only; a non-empty list is not a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::List(items) if items.is_empty())
    }

    /// Child mapping of a branch, `None` for lists.
    pub fn children(&self) -> Option<&Outline> {
        match self {
            Node::Branch(children) => Some(children),
            Node::List(_) => None,
        }
    }
}

impl Default for Node {
    fn default() -> Self {
        Node::leaf()
    }
}

/// Summary counts over an outline tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineStats {
    /// Number of labelled nodes at every depth.
    pub nodes: usize,
    /// Number of labelled nodes carrying the leaf marker.
    pub leaves: usize,
    /// Deepest level reached; a single top-level label has depth 1.
    pub max_depth: usize,
}

/// One group of consecutive top-level entries, drawn as a single diagram.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    /// 1-based position of the chunk.
    pub number: usize,
    pub entries: Outline,
}

impl Chunk {
    /// Top-level labels in this chunk, in order.
    pub fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }
}
