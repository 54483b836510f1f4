//! Run metadata: what was read, what was produced, and when.
//!
//! Written last as `process_metadata.json` so a run can be inspected (or a
//! document rebuilt) without re-parsing the outline:
//!
//! ```json
//! {
//!   "timestamp": "2026-10-17T09:30:12.004512",
//!   "input_file": "notes/outline.txt",
//!   "json_structure": "output/structure.json",
//!   "total_keys": 7,
//!   "chunk_size": 4,
//!   "stats": { "nodes": 31, "leaves": 19, "max_depth": 4 },
//!   "format": "png",
//!   "chunks": [
//!     { "chunk_number": 1, "keys": ["Cells", "..."], "file_path": "output/graph_chunk_1.png" }
//!   ],
//!   "graph_files": ["output/graph_chunk_1.png", "output/graph_chunk_2.png"],
//!   "document_path": "output/concept_map.html"
//! }
//! ```

use crate::render::RenderedChunk;
use crate::rendering::OutputFormat;
use crate::types::OutlineStats;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File the run metadata is saved to in the output directory.
pub const METADATA_FILE: &str = "process_metadata.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Local time the run started, ISO-8601 with microseconds.
    pub timestamp: String,
    pub input_file: String,
    pub json_structure: String,
    /// Number of top-level entries in the outline.
    pub total_keys: usize,
    pub chunk_size: usize,
    pub stats: OutlineStats,
    pub format: OutputFormat,
    pub chunks: Vec<RenderedChunk>,
    pub graph_files: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_path: Option<String>,
}

impl Metadata {
    /// Record the rendered chunks; `graph_files` follows chunk order.
    pub fn with_chunks(mut self, chunks: Vec<RenderedChunk>) -> Self {
        self.graph_files = chunks.iter().map(|c| c.file_path.clone()).collect();
        self.chunks = chunks;
        self
    }
}

/// Current local time in the format stored in [`Metadata::timestamp`].
pub fn timestamp_now() -> String {
    chrono::Local::now()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}

/// Save metadata as `process_metadata.json` in `output_dir`.
pub fn write_metadata(metadata: &Metadata, output_dir: &Path) -> std::io::Result<PathBuf> {
    let path = output_dir.join(METADATA_FILE);
    let json = serde_json::to_string_pretty(metadata)?;
    fs::write(&path, json)?;
    Ok(path)
}

/// Load metadata saved by [`write_metadata`].
pub fn read_metadata(path: &Path) -> std::io::Result<Metadata> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
