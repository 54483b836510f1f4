//! Indented outline parsing.
//!
//! Stage 1 of the pipeline. Turns a plain-text outline, where nesting is
//! expressed with leading whitespace, into an [`Outline`] tree.
//!
//! ## Input Format
//!
//! ```text
//! Animals:
//!     Dog
//!     Cat
//! Plants
//! ```
//!
//! parses to
//!
//! ```json
//! { "Animals": { "Dog": [], "Cat": [] }, "Plants": [] }
//! ```
//!
//! ## Rules
//!
//! - Indentation is counted in units of four whitespace characters. Partial
//!   units round down, so one to three leading spaces are level 0.
//! - Every `:` in a line is removed, not just a trailing one.
//! - Blank lines are dropped before anything else looks at the input. A line
//!   of only colons is not blank: it stays in place as whitespace, adds no
//!   label, and still counts as the "next line" for the leaf rule below.
//! - Lines end at `\n`, `\r\n` or a lone `\r`.
//! - A line is a leaf when the *next* line is not indented deeper than it.
//!   This is a one-line lookahead, not a search for deeper descendants.
//! - Any indent deeper than the parent is absorbed into the parent's child
//!   subtree, so skipping levels is accepted without complaint.
//! - A label repeated among siblings keeps its first position and takes the
//!   subtree of its last occurrence.
//!
//! Nothing is ever rejected: every line with a label becomes a node.

use crate::types::{Node, Outline, OutlineStats};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum OutlineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Whitespace characters that make up one indent level.
pub const INDENT_WIDTH: usize = 4;

/// File the parsed tree is saved to in the output directory.
pub const STRUCTURE_FILE: &str = "structure.json";

/// Read an outline file to completion and parse it.
pub fn read_outline(path: &Path) -> Result<Outline, OutlineError> {
    let content = fs::read_to_string(path)?;
    let outline = parse(split_lines(&content));
    debug!(
        path = %path.display(),
        top_level = outline.len(),
        "parsed outline"
    );
    Ok(outline)
}

/// Split text on `\n`, `\r\n` and lone `\r` line endings.
pub fn split_lines(content: &str) -> Vec<&str> {
    content
        .split('\n')
        .flat_map(|line| line.strip_suffix('\r').unwrap_or(line).split('\r'))
        .collect()
}

/// Parse outline lines into a tree.
///
/// Returns the root's children. Empty input gives an empty mapping.
pub fn parse<I, S>(lines: I) -> Outline
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let lines: Vec<String> = lines
        .into_iter()
        .filter_map(|line| clean_line(line.as_ref()))
        .collect();
    let (outline, _) = process_lines(&lines, 0, 0);
    outline
}

/// `None` for blank lines, otherwise the line without its terminator and
/// with every colon removed.
fn clean_line(raw: &str) -> Option<String> {
    if raw.trim().is_empty() {
        return None;
    }
    Some(raw.trim_end_matches(['\n', '\r']).replace(':', ""))
}

/// Indent level of a line: leading whitespace characters divided by four.
pub fn indent_level(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count() / INDENT_WIDTH
}

/// Whether the line at `idx` is a leaf: it is the last line, or the line
/// right after it is not indented deeper.
fn is_leaf_node(lines: &[String], idx: usize) -> bool {
    match lines.get(idx + 1) {
        None => true,
        Some(next) => indent_level(next) <= indent_level(&lines[idx]),
    }
}

/// Build the mapping for one level, starting at `start_idx`.
///
/// Consumes lines while their indent is at least `min_indent` and returns the
/// mapping together with the index of the first line it did not consume.
fn process_lines(lines: &[String], start_idx: usize, min_indent: usize) -> (Outline, usize) {
    let mut result = Outline::new();
    let mut idx = start_idx;

    while idx < lines.len() {
        let line = &lines[idx];
        // Colon-only lines: no label, but still seen by the lookahead.
        if line.trim().is_empty() {
            idx += 1;
            continue;
        }
        let indent = indent_level(line);
        if indent < min_indent {
            break;
        }

        let key = line.trim().to_string();
        if is_leaf_node(lines, idx) {
            result.insert(key, Node::leaf());
            idx += 1;
        } else {
            let (children, next_idx) = process_lines(lines, idx + 1, indent + 1);
            result.insert(key, Node::Branch(children));
            idx = next_idx;
        }
    }

    (result, idx)
}

/// Serialize an outline as pretty-printed JSON, keys in document order.
pub fn to_json(outline: &Outline) -> Result<String, OutlineError> {
    Ok(serde_json::to_string_pretty(outline)?)
}

/// Load an outline previously written by [`to_json`].
pub fn from_json(json: &str) -> Result<Outline, OutlineError> {
    Ok(serde_json::from_str(json)?)
}

/// Save the tree as `structure.json` in `output_dir` and return its path.
pub fn write_structure(outline: &Outline, output_dir: &Path) -> Result<PathBuf, OutlineError> {
    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(STRUCTURE_FILE);
    fs::write(&path, to_json(outline)?)?;
    debug!(path = %path.display(), "wrote structure");
    Ok(path)
}

/// Load a tree saved by [`write_structure`].
pub fn read_structure(path: &Path) -> Result<Outline, OutlineError> {
    let content = fs::read_to_string(path)?;
    from_json(&content)
}

/// Regenerate indented outline lines from a tree, four spaces per level.
///
/// List items are values, not labels, so they produce no lines.
pub fn to_lines(outline: &Outline) -> Vec<String> {
    let mut lines = Vec::new();
    push_lines(outline, 0, &mut lines);
    lines
}

fn push_lines(outline: &Outline, depth: usize, lines: &mut Vec<String>) {
    for (key, node) in outline {
        lines.push(format!("{}{}", " ".repeat(depth * INDENT_WIDTH), key));
        if let Node::Branch(children) = node {
            push_lines(children, depth + 1, lines);
        }
    }
}

/// Count nodes, leaves and depth of a tree.
pub fn stats(outline: &Outline) -> OutlineStats {
    let mut stats = OutlineStats::default();
    collect_stats(outline, 1, &mut stats);
    stats
}

fn collect_stats(outline: &Outline, depth: usize, stats: &mut OutlineStats) {
    for node in outline.values() {
        stats.nodes += 1;
        stats.max_depth = stats.max_depth.max(depth);
        match node {
            Node::Branch(children) => collect_stats(children, depth + 1, stats),
            Node::List(_) if node.is_leaf() => stats.leaves += 1,
            Node::List(_) => {}
        }
    }
}
