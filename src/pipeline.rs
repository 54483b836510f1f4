//! The full build: every stage in order.
//!
//! ```text
//! 1. Parse     outline.txt      →  structure.json
//! 2. Render    structure        →  graph_chunk_{n}.{ext}
//! 3. Document  chunks+metadata  →  concept_map.html
//!    Metadata                   →  process_metadata.json
//! ```
//!
//! Any failure aborts the build with the underlying error. Files written by
//! earlier stages are left in place.

use crate::config::ProjectConfig;
use crate::document::{self, DocumentError};
use crate::metadata::{self, Metadata};
use crate::outline::{self, OutlineError};
use crate::render::{self, RenderError, RenderEvent, RenderOptions};
use crate::rendering::GraphBackend;
use std::path::Path;
use std::sync::mpsc::Sender;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Outline error: {0}")]
    Outline(#[from] OutlineError),
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),
}

/// Run all stages for `input`, writing every artifact into `output_dir`.
pub fn build(
    backend: &impl GraphBackend,
    input: &Path,
    output_dir: &Path,
    config: &ProjectConfig,
    events: Option<Sender<RenderEvent>>,
) -> Result<Metadata, BuildError> {
    let timestamp = metadata::timestamp_now();

    let tree = outline::read_outline(input)?;
    let structure_path = outline::write_structure(&tree, output_dir)?;
    info!(top_level = tree.len(), path = %structure_path.display(), "stage 1 complete");

    let options = RenderOptions::from_config(config);
    let chunks = render::render_chunks(backend, &tree, &options, output_dir, events)?;

    let mut run = Metadata {
        timestamp,
        input_file: input.display().to_string(),
        json_structure: structure_path.display().to_string(),
        total_keys: tree.len(),
        chunk_size: options.chunk_size.get(),
        stats: outline::stats(&tree),
        format: options.format,
        chunks: Vec::new(),
        graph_files: Vec::new(),
        document_path: None,
    }
    .with_chunks(chunks);

    let document_path = document::write_document(&run, &config.document, output_dir)?;
    run.document_path = Some(document_path.display().to_string());

    let metadata_path = metadata::write_metadata(&run, output_dir)?;
    info!(path = %metadata_path.display(), "build complete");
    Ok(run)
}
