//! Chunk diagram rendering.
//!
//! Stage 2 of the pipeline. Splits the parsed outline into chunks and renders
//! each chunk as one diagram through a [`GraphBackend`].
//!
//! ## Output Structure
//!
//! ```text
//! output/
//! ├── structure.json          # From stage 1
//! ├── graph_chunk_1.png       # First `chunks.size` top-level entries
//! ├── graph_chunk_2.png
//! └── ...
//! ```
//!
//! ## Parallel Rendering
//!
//! Chunks are independent, so they are rendered in parallel using
//! [rayon](https://docs.rs/rayon). Results are returned in chunk order
//! regardless of completion order.

use crate::chunk::chunk_outline;
use crate::config::ProjectConfig;
use crate::graph::{Digraph, GraphStyle};
use crate::outline::{self, OutlineError};
use crate::rendering::{BackendError, GraphBackend, OutputFormat};
use crate::types::{Chunk, Outline};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::mpsc::Sender;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Structure error: {0}")]
    Outline(#[from] OutlineError),
    #[error("Chunk {chunk}: {source}")]
    Backend {
        chunk: usize,
        #[source]
        source: BackendError,
    },
}

/// Settings for one render run.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub chunk_size: NonZeroUsize,
    pub format: OutputFormat,
    pub style: GraphStyle,
}

impl RenderOptions {
    pub fn from_config(config: &ProjectConfig) -> Self {
        Self {
            chunk_size: config.chunks.size,
            format: config.graph.format,
            style: GraphStyle::from_config(&config.graph),
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::from_config(&ProjectConfig::default())
    }
}

/// A diagram written for one chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedChunk {
    /// 1-based chunk position.
    pub chunk_number: usize,
    /// Top-level labels drawn in this diagram.
    pub keys: Vec<String>,
    /// Path of the rendered file.
    pub file_path: String,
}

/// Progress reported while rendering.
#[derive(Debug, Clone)]
pub enum RenderEvent {
    Started { total_chunks: usize },
    ChunkRendered(RenderedChunk),
}

/// File name for a chunk diagram: `graph_chunk_{n}.{ext}`.
pub fn chunk_file_name(number: usize, format: OutputFormat) -> String {
    format!("graph_chunk_{}.{}", number, format.extension())
}

/// Render every chunk of `outline` into `output_dir`.
pub fn render_chunks(
    backend: &impl GraphBackend,
    outline: &Outline,
    options: &RenderOptions,
    output_dir: &Path,
    events: Option<Sender<RenderEvent>>,
) -> Result<Vec<RenderedChunk>, RenderError> {
    std::fs::create_dir_all(output_dir)?;

    let chunks = chunk_outline(outline, options.chunk_size);
    info!(
        chunks = chunks.len(),
        chunk_size = options.chunk_size.get(),
        format = %options.format,
        backend = backend.name(),
        "rendering chunks"
    );
    if let Some(tx) = &events {
        let _ = tx.send(RenderEvent::Started {
            total_chunks: chunks.len(),
        });
    }

    let mut rendered = chunks
        .par_iter()
        .map_with(events, |events, chunk| {
            let result = render_chunk(backend, chunk, options, output_dir)?;
            if let Some(tx) = events {
                let _ = tx.send(RenderEvent::ChunkRendered(result.clone()));
            }
            Ok::<_, RenderError>(result)
        })
        .collect::<Result<Vec<_>, RenderError>>()?;

    rendered.sort_by_key(|c| c.chunk_number);
    Ok(rendered)
}

fn render_chunk(
    backend: &impl GraphBackend,
    chunk: &Chunk,
    options: &RenderOptions,
    output_dir: &Path,
) -> Result<RenderedChunk, RenderError> {
    let name = format!("chunk_{}", chunk.number);
    let graph = Digraph::from_outline(&name, &chunk.entries, &options.style);
    let output = output_dir.join(chunk_file_name(chunk.number, options.format));

    debug!(
        chunk = chunk.number,
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        "rendering chunk"
    );
    backend
        .render(&graph.to_dot(), options.format, &output)
        .map_err(|source| RenderError::Backend {
            chunk: chunk.number,
            source,
        })?;

    Ok(RenderedChunk {
        chunk_number: chunk.number,
        keys: chunk.keys(),
        file_path: output.display().to_string(),
    })
}

/// Render chunks from a `structure.json` written by the parse stage.
pub fn render_from_structure(
    backend: &impl GraphBackend,
    structure_path: &Path,
    options: &RenderOptions,
    output_dir: &Path,
    events: Option<Sender<RenderEvent>>,
) -> Result<Vec<RenderedChunk>, RenderError> {
    let outline = outline::read_structure(structure_path)?;
    render_chunks(backend, &outline, options, output_dir, events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::parse;
    use crate::rendering::DotSourceBackend;
    use crate::rendering::backend::tests::MockBackend;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    fn options(size: usize, format: OutputFormat) -> RenderOptions {
        RenderOptions {
            chunk_size: NonZeroUsize::new(size).unwrap(),
            format,
            style: GraphStyle::default(),
        }
    }

    #[test]
    fn chunk_file_names() {
        assert_eq!(chunk_file_name(1, OutputFormat::Png), "graph_chunk_1.png");
        assert_eq!(chunk_file_name(12, OutputFormat::Dot), "graph_chunk_12.dot");
    }

    #[test]
    fn renders_one_file_per_chunk_in_order() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::new();
        let outline = parse(fixture_lines());

        let rendered = render_chunks(
            &backend,
            &outline,
            &options(4, OutputFormat::Png),
            tmp.path(),
            None,
        )
        .unwrap();

        let numbers: Vec<usize> = rendered.iter().map(|c| c.chunk_number).collect();
        assert_eq!(numbers, [1, 2]);
        assert_eq!(
            rendered[0].keys,
            ["Cells", "Genetics", "Evolution", "Ecology"]
        );
        assert_eq!(rendered[1].keys, ["Physiology", "Botany", "Microbiology"]);
        assert!(rendered[0].file_path.ends_with("graph_chunk_1.png"));

        let renders = backend.get_renders();
        assert_eq!(renders.len(), 2);
        assert!(renders.iter().all(|r| r.format == OutputFormat::Png));
        assert!(renders[0].dot_source.contains("\"Cells_Structure_Membrane\""));
    }

    #[test]
    fn empty_outline_renders_nothing() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::new();
        let rendered = render_chunks(
            &backend,
            &Outline::new(),
            &RenderOptions::default(),
            tmp.path(),
            None,
        )
        .unwrap();
        assert!(rendered.is_empty());
        assert!(backend.get_renders().is_empty());
    }

    #[test]
    fn backend_failure_names_chunk() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::failing_on("graph_chunk_2");
        let result = render_chunks(
            &backend,
            &flat_outline(6),
            &options(3, OutputFormat::Svg),
            tmp.path(),
            None,
        );
        match result {
            Err(RenderError::Backend { chunk, .. }) => assert_eq!(chunk, 2),
            other => panic!("expected backend error, got {other:?}"),
        }
    }

    #[test]
    fn sends_progress_events() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::new();
        let (tx, rx) = std::sync::mpsc::channel();

        render_chunks(
            &backend,
            &flat_outline(5),
            &options(2, OutputFormat::Png),
            tmp.path(),
            Some(tx),
        )
        .unwrap();

        let events: Vec<RenderEvent> = rx.iter().collect();
        assert!(matches!(
            events[0],
            RenderEvent::Started { total_chunks: 3 }
        ));
        let mut rendered: Vec<usize> = events
            .iter()
            .filter_map(|e| match e {
                RenderEvent::ChunkRendered(c) => Some(c.chunk_number),
                RenderEvent::Started { .. } => None,
            })
            .collect();
        rendered.sort();
        assert_eq!(rendered, [1, 2, 3]);
    }

    #[test]
    fn dot_source_backend_writes_dot_files() {
        let tmp = TempDir::new().unwrap();
        let rendered = render_chunks(
            &DotSourceBackend::new(),
            &parse(["Animals", "    Dog", "Plants"]),
            &options(1, OutputFormat::Dot),
            tmp.path(),
            None,
        )
        .unwrap();
        assert_eq!(rendered.len(), 2);
        let first = std::fs::read_to_string(&rendered[0].file_path).unwrap();
        assert!(first.starts_with("digraph \"chunk_1\" {"));
        assert!(first.contains("\"Animals\" -> \"Animals_Dog\""));
        assert!(!first.contains("Plants"));
    }

    #[test]
    fn render_from_structure_reads_json() {
        let tmp = TempDir::new().unwrap();
        let outline = parse(["A", "    B", "C"]);
        let structure = outline::write_structure(&outline, tmp.path()).unwrap();
        let backend = MockBackend::new();

        let rendered = render_from_structure(
            &backend,
            &structure,
            &options(4, OutputFormat::Png),
            tmp.path(),
            None,
        )
        .unwrap();
        assert_eq!(rendered.len(), 1);
        assert_eq!(rendered[0].keys, ["A", "C"]);
    }

    #[test]
    fn render_from_missing_structure_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = render_from_structure(
            &MockBackend::new(),
            &tmp.path().join("structure.json"),
            &RenderOptions::default(),
            tmp.path(),
            None,
        );
        assert!(matches!(result, Err(RenderError::Outline(OutlineError::Io(_)))));
    }
}
