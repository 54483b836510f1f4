//! # Concept Map
//!
//! Turns an indentation-structured outline (a textbook table of contents, a
//! set of study notes) into concept map diagrams. Indentation is the only
//! data model: four spaces nest a line under the one above it.
//!
//! # Architecture: Three-Stage Pipeline
//!
//! ```text
//! 1. Parse     outline.txt  →  structure.json          (text → ordered tree)
//! 2. Render    structure    →  graph_chunk_{n}.{ext}   (tree → Graphviz diagrams)
//! 3. Document  diagrams     →  concept_map.html        (diagrams + run info)
//!                              process_metadata.json
//! ```
//!
//! Each stage leaves an inspectable artifact behind, so `render` can be re-run
//! from a hand-edited `structure.json` without touching the outline.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`outline`] | Stage 1: indentation parser, JSON structure file, stats |
//! | [`chunk`] | Splits top-level entries into fixed-size groups |
//! | [`graph`] | Builds a DOT digraph from an outline chunk |
//! | [`rendering`] | `GraphBackend` trait: Graphviz process or raw DOT source |
//! | [`render`] | Stage 2: renders every chunk in parallel with rayon |
//! | [`document`] | Stage 3: HTML summary document using Maud |
//! | [`metadata`] | `process_metadata.json` describing a run |
//! | [`pipeline`] | Runs all stages in order |
//! | [`config`] | `concept-map.toml` loading, merging, and validation |
//! | [`types`] | Shared tree types (`Outline`, `Node`, `Chunk`) |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Order Is Data
//!
//! Outline order is the author's order. [`types::Outline`] is an
//! [`indexmap::IndexMap`], and `serde_json` is built with `preserve_order`, so
//! siblings keep their first-seen position through parsing, JSON, chunking and
//! rendering. A repeated label keeps its original slot and takes the last
//! subtree seen.
//!
//! ## Graphviz as a Process
//!
//! Layout is delegated to the `dot` binary through [`rendering::GraphvizBackend`].
//! The graph itself is plain DOT text produced by [`graph::Digraph`], which
//! keeps it testable without Graphviz installed and lets `--format dot` skip
//! the external tool entirely.

pub mod chunk;
pub mod config;
pub mod document;
pub mod graph;
pub mod metadata;
pub mod outline;
pub mod output;
pub mod pipeline;
pub mod render;
pub mod rendering;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
