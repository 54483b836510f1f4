//! Backend that writes DOT source without invoking Graphviz.
//!
//! Useful on machines without Graphviz installed and in tests: the output can
//! be rendered later with `dot -Tpng graph_chunk_1.dot -o graph_chunk_1.png`.

use super::backend::{BackendError, GraphBackend};
use super::format::OutputFormat;
use std::path::Path;

#[derive(Debug, Clone, Copy, Default)]
pub struct DotSourceBackend;

impl DotSourceBackend {
    pub fn new() -> Self {
        Self
    }
}

impl GraphBackend for DotSourceBackend {
    fn name(&self) -> &'static str {
        "dot-source"
    }

    fn render(
        &self,
        dot_source: &str,
        format: OutputFormat,
        output: &Path,
    ) -> Result<(), BackendError> {
        if format != OutputFormat::Dot {
            return Err(BackendError::UnsupportedFormat {
                backend: self.name(),
                format,
            });
        }
        std::fs::write(output, dot_source)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn writes_source_verbatim() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("g.dot");
        DotSourceBackend::new()
            .render("digraph \"g\" {\n}\n", OutputFormat::Dot, &out)
            .unwrap();
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "digraph \"g\" {\n}\n");
    }

    #[test]
    fn rejects_image_formats() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("g.png");
        let result = DotSourceBackend::new().render("digraph {}", OutputFormat::Png, &out);
        assert!(matches!(
            result,
            Err(BackendError::UnsupportedFormat {
                format: OutputFormat::Png,
                ..
            })
        ));
        assert!(!out.exists());
    }
}
