//! CLI output formatting for all pipeline stages.
//!
//! # Information-First Display
//!
//! Output shows the outline's content, not the files it lands in. Every label
//! is printed with its positional index among its siblings, and paths appear
//! as secondary context lines.
//!
//! # Output Format
//!
//! ## Parse / Check
//!
//! ```text
//! Outline
//! 001 Animals (2)
//!     001 Dog
//!     002 Cat
//! 002 Plants
//!
//! 4 nodes, 3 leaves, depth 2
//!     Structure: output/structure.json
//! ```
//!
//! ## Render
//!
//! ```text
//! Rendering 2 chunks
//! 001 Animals, Plants → output/graph_chunk_1.png
//! 002 Fungi → output/graph_chunk_2.png
//! ```
//!
//! ## Build
//!
//! ```text
//! Processing complete
//!     JSON structure: output/structure.json
//!     Document: output/concept_map.html
//!     Graphs: output/graph_chunk_1.png, output/graph_chunk_2.png
//!     Metadata: output/process_metadata.json
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::metadata::{METADATA_FILE, Metadata};
use crate::render::{RenderEvent, RenderedChunk};
use crate::types::{Node, Outline, OutlineStats};
use std::path::Path;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Format an entry header: positional index + label, with child count for
/// branches.
///
/// ```text
/// 001 Animals (2)
/// 002 Plants
/// ```
fn entry_header(index: usize, label: &str, children: Option<usize>) -> String {
    match children {
        Some(n) => format!("{} {} ({})", format_index(index), label, n),
        None => format!("{} {}", format_index(index), label),
    }
}

/// `n` followed by the singular or plural form of a noun.
fn count(n: usize, singular: &str, plural: &str) -> String {
    if n == 1 {
        format!("{n} {singular}")
    } else {
        format!("{n} {plural}")
    }
}

fn stats_line(stats: &OutlineStats) -> String {
    format!(
        "{}, {}, depth {}",
        count(stats.nodes, "node", "nodes"),
        count(stats.leaves, "leaf", "leaves"),
        stats.max_depth
    )
}

// ============================================================================
// Tree walker
// ============================================================================

/// Format an outline as an indented, index-numbered tree.
pub fn format_tree(outline: &Outline) -> Vec<String> {
    let mut lines = Vec::new();
    walk_tree(outline, 0, &mut lines);
    lines
}

fn walk_tree(outline: &Outline, depth: usize, lines: &mut Vec<String>) {
    for (i, (label, node)) in outline.iter().enumerate() {
        match node {
            Node::Branch(children) => {
                lines.push(format!(
                    "{}{}",
                    indent(depth),
                    entry_header(i + 1, label, Some(children.len()))
                ));
                walk_tree(children, depth + 1, lines);
            }
            Node::List(items) => {
                lines.push(format!("{}{}", indent(depth), entry_header(i + 1, label, None)));
                for item in items {
                    let text = match item {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    lines.push(format!("{}- {}", indent(depth + 1), text));
                }
            }
        }
    }
}

// ============================================================================
// Stage 1: Parse output
// ============================================================================

/// Format parse stage output: the tree, its stats, and where it was saved.
pub fn format_parse_output(
    outline: &Outline,
    stats: &OutlineStats,
    structure_path: Option<&Path>,
) -> Vec<String> {
    let mut lines = vec!["Outline".to_string()];
    if outline.is_empty() {
        lines.push(format!("{}(empty)", indent(1)));
    }
    lines.extend(format_tree(outline));

    lines.push(String::new());
    lines.push(stats_line(stats));
    if let Some(path) = structure_path {
        lines.push(format!("{}Structure: {}", indent(1), path.display()));
    }
    lines
}

/// Print parse stage output to stdout.
pub fn print_parse_output(outline: &Outline, stats: &OutlineStats, structure_path: Option<&Path>) {
    for line in format_parse_output(outline, stats, structure_path) {
        println!("{}", line);
    }
}

// ============================================================================
// Stage 2: Render output
// ============================================================================

fn chunk_line(chunk: &RenderedChunk) -> String {
    format!(
        "{} {} → {}",
        format_index(chunk.chunk_number),
        chunk.keys.join(", "),
        chunk.file_path
    )
}

/// Format a single render progress event as display lines.
pub fn format_render_event(event: &RenderEvent) -> Vec<String> {
    match event {
        RenderEvent::Started { total_chunks } => {
            vec![format!("Rendering {}", count(*total_chunks, "chunk", "chunks"))]
        }
        RenderEvent::ChunkRendered(chunk) => vec![chunk_line(chunk)],
    }
}

// ============================================================================
// Build output
// ============================================================================

/// Format the summary printed after a full build.
pub fn format_build_output(metadata: &Metadata, output_dir: &Path) -> Vec<String> {
    let mut lines = vec!["Processing complete".to_string()];
    lines.push(format!("{}JSON structure: {}", indent(1), metadata.json_structure));
    if let Some(document) = &metadata.document_path {
        lines.push(format!("{}Document: {}", indent(1), document));
    }
    if metadata.graph_files.is_empty() {
        lines.push(format!("{}Graphs: (none)", indent(1)));
    } else {
        lines.push(format!(
            "{}Graphs: {}",
            indent(1),
            metadata.graph_files.join(", ")
        ));
    }
    lines.push(format!(
        "{}Metadata: {}",
        indent(1),
        output_dir.join(METADATA_FILE).display()
    ));
    lines
}

/// Print build summary to stdout.
pub fn print_build_output(metadata: &Metadata, output_dir: &Path) {
    for line in format_build_output(metadata, output_dir) {
        println!("{}", line);
    }
}
