//! Graph rendering backend trait and shared types.
//!
//! The [`GraphBackend`] trait turns DOT source into an output file. Two
//! implementations exist:
//!
//! | Backend | Formats | Needs |
//! |---|---|---|
//! | [`GraphvizBackend`](super::graphviz::GraphvizBackend) | all | `dot` on PATH |
//! | [`DotSourceBackend`](super::dot_source::DotSourceBackend) | `dot` only | nothing |

use super::format::OutputFormat;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Graphviz command not found: {0} (install Graphviz or use --format dot)")]
    CommandNotFound(String),
    #[error("Rendering failed: {0}")]
    RenderFailed(String),
    #[error("Backend {backend} cannot produce {format} output")]
    UnsupportedFormat {
        backend: &'static str,
        format: OutputFormat,
    },
}

/// Trait for graph rendering backends.
///
/// Backends must be `Sync`: chunks are rendered in parallel with rayon.
pub trait GraphBackend: Sync {
    /// Short name used in log and error messages.
    fn name(&self) -> &'static str;

    /// Render `dot_source` to `output` in the given format.
    fn render(
        &self,
        dot_source: &str,
        format: OutputFormat,
        output: &Path,
    ) -> Result<(), BackendError>;
}
