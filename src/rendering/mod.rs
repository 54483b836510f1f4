//! Diagram rendering: DOT source to files.
//!
//! The module is split into:
//! - **Format**: [`OutputFormat`], the file types a diagram can be written as
//! - **Backend**: [`GraphBackend`] trait
//! - **Graphviz**: [`GraphvizBackend`], shells out to `dot`
//! - **DOT source**: [`DotSourceBackend`], writes the graph source only

pub mod backend;
pub mod dot_source;
pub mod format;
pub mod graphviz;

pub use backend::{BackendError, GraphBackend};
pub use dot_source::DotSourceBackend;
pub use format::OutputFormat;
pub use graphviz::GraphvizBackend;
