//! Summary document generation.
//!
//! Stage 3 of the pipeline. Compiles the chunk diagrams and run metadata into
//! a single self-contained HTML page, `concept_map.html`, laid out for
//! printing: one chunk per page, diagrams scaled to fit.
//!
//! ## Layout
//!
//! ```text
//! Text Book Concept Map            ← [document] title
//! Process Information
//!   Input File | notes/outline.txt
//!   Total Keys | 7
//!   Chunk Size | 4
//!   Generation Time | 2026-10-17T09:30:12.004512
//! Generated Concept Maps
//! Chunk 1
//!   Keys: Cells, Genetics, Evolution, Ecology
//!   <diagram>
//! ── page break ──
//! Chunk 2
//!   ...
//! ```
//!
//! Diagrams are referenced by file name, so the document must stay next to
//! the chunk files. DOT output is inlined as source text instead.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Labels come straight from the outline and are escaped automatically.

use crate::config::DocumentConfig;
use crate::metadata::Metadata;
use crate::render::RenderedChunk;
use crate::rendering::OutputFormat;
use maud::{DOCTYPE, Markup, html};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// File the summary document is saved to in the output directory.
pub const DOCUMENT_FILE: &str = "concept_map.html";

const CSS: &str = r#"
body { font-family: Helvetica, Arial, sans-serif; margin: 1in; color: #111; }
h1 { font-size: 24pt; margin-bottom: 30pt; }
h2 { font-size: 16pt; margin-bottom: 12pt; }
table.process-info { border-collapse: collapse; margin-bottom: 30pt; }
table.process-info th, table.process-info td {
    border: 1px solid black; padding: 6pt 8pt 12pt; text-align: left;
    font-size: 12pt; color: red;
}
table.process-info th { background: lightgrey; width: 2in; }
table.process-info td { width: 4in; }
section.chunk { break-after: page; page-break-after: always; }
section.chunk p.keys { margin-bottom: 10pt; }
figure.diagram { margin: 0; }
figure.diagram img, figure.diagram object { max-width: 6in; max-height: 8in; }
figure.diagram pre { font-size: 9pt; white-space: pre-wrap; }
p.missing { font-style: italic; }
"#;

/// How one chunk's diagram appears in the document.
#[derive(Debug, Clone, PartialEq)]
pub enum Figure {
    /// Browser-displayable image, referenced by relative path.
    Image { src: String },
    /// PDF diagram, embedded with an `<object>`.
    Pdf { src: String },
    /// DOT source inlined as text.
    Source(String),
    /// The diagram file does not exist.
    Missing,
}

/// Work out how each chunk's diagram should be shown, reading DOT sources.
pub fn load_figures(metadata: &Metadata) -> Vec<Figure> {
    metadata
        .chunks
        .iter()
        .map(|chunk| load_figure(chunk, metadata.format))
        .collect()
}

fn load_figure(chunk: &RenderedChunk, format: OutputFormat) -> Figure {
    let path = Path::new(&chunk.file_path);
    if !path.exists() {
        warn!(path = %path.display(), "graph image not found");
        return Figure::Missing;
    }
    let src = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| chunk.file_path.clone());
    match format {
        OutputFormat::Dot => match fs::read_to_string(path) {
            Ok(source) => Figure::Source(source),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot read DOT source");
                Figure::Missing
            }
        },
        format if format.is_image() => Figure::Image { src },
        _ => Figure::Pdf { src },
    }
}

/// Build the summary document.
///
/// `figures` pairs with `metadata.chunks` by position.
pub fn render_document(
    metadata: &Metadata,
    config: &DocumentConfig,
    figures: &[Figure],
) -> Markup {
    let content = html! {
        h1 { (config.title) }

        h2 { "Process Information" }
        table.process-info {
            tr { th { "Input File" } td { (metadata.input_file) } }
            tr { th { "Total Keys" } td { (metadata.total_keys) } }
            tr { th { "Chunk Size" } td { (metadata.chunk_size) } }
            tr { th { "Generation Time" } td { (metadata.timestamp) } }
        }

        h2 { "Generated Concept Maps" }
        @for (chunk, shown) in metadata.chunks.iter().zip(figures) {
            section.chunk {
                h2 { "Chunk " (chunk.chunk_number) }
                p.keys { "Keys: " (chunk.keys.join(", ")) }
                (render_figure(chunk, shown))
            }
        }
    };

    base_document(&config.title, content)
}

fn render_figure(chunk: &RenderedChunk, shown: &Figure) -> Markup {
    let alt = format!("Concept map for chunk {}", chunk.chunk_number);
    html! {
        @match shown {
            Figure::Image { src } => figure.diagram { img src=(src) alt=(alt); },
            Figure::Pdf { src } => figure.diagram {
                object data=(src) type="application/pdf" {
                    a href=(src) { (alt) }
                }
            },
            Figure::Source(source) => figure.diagram { pre { code { (source) } } },
            Figure::Missing => p.missing { "Graph image not found" },
        }
    }
}

/// Renders the base HTML document structure
fn base_document(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (CSS) }
            }
            body {
                (content)
            }
        }
    }
}

/// Write `concept_map.html` into `output_dir` and return its path.
pub fn write_document(
    metadata: &Metadata,
    config: &DocumentConfig,
    output_dir: &Path,
) -> Result<PathBuf, DocumentError> {
    fs::create_dir_all(output_dir)?;
    let figures = load_figures(metadata);
    let markup = render_document(metadata, config, &figures);
    let path = output_dir.join(DOCUMENT_FILE);
    fs::write(&path, markup.into_string())?;
    Ok(path)
}
