//! Graphviz backend: pipes DOT source through the `dot` executable.
//!
//! ```text
//! dot -T<format> -o <output>   (DOT source on stdin)
//! ```
//!
//! Layout happens entirely inside Graphviz. For [`OutputFormat::Dot`] the
//! source is written directly and no process is spawned.

use super::backend::{BackendError, GraphBackend};
use super::format::OutputFormat;
use std::io::{ErrorKind, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct GraphvizBackend {
    command: String,
}

impl GraphvizBackend {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }
}

impl Default for GraphvizBackend {
    fn default() -> Self {
        Self::new("dot")
    }
}

impl GraphBackend for GraphvizBackend {
    fn name(&self) -> &'static str {
        "graphviz"
    }

    fn render(
        &self,
        dot_source: &str,
        format: OutputFormat,
        output: &Path,
    ) -> Result<(), BackendError> {
        if format == OutputFormat::Dot {
            std::fs::write(output, dot_source)?;
            return Ok(());
        }

        debug!(command = %self.command, %format, output = %output.display(), "spawning graphviz");
        let mut child = Command::new(&self.command)
            .arg(format!("-T{}", format.extension()))
            .arg("-o")
            .arg(output)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => BackendError::CommandNotFound(self.command.clone()),
                _ => BackendError::Io(e),
            })?;

        // stdin is fed from its own thread while stdout/stderr drain here.
        let stdin = child.stdin.take();
        let (result, written) = std::thread::scope(|scope| {
            let writer = scope.spawn(move || match stdin {
                Some(mut stdin) => stdin.write_all(dot_source.as_bytes()),
                None => Ok(()),
            });
            let result = child.wait_with_output();
            (result, writer.join())
        });

        let result = result?;
        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(BackendError::RenderFailed(format!(
                "{} exited with {}: {}",
                self.command,
                result.status,
                stderr.trim()
            )));
        }
        match written {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(BackendError::Io(e)),
            Err(_) => Err(BackendError::RenderFailed(format!(
                "writing DOT source to {} panicked",
                self.command
            ))),
        }
    }
}
