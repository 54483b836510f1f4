//! Shared test utilities for the concept-map test suite.
//!
//! Provides fixture loading, outline builders, and tree-shape assertions that
//! work with parse-stage data structures (`Outline`, `Node`).
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let outline = parse(["Animals", "    Dog", "    Cat", "Plants"]);
//! assert_shape(&outline, &[
//!     ("Animals", &["Dog", "Cat"]),
//!     ("Plants", &[]),
//! ]);
//! assert_eq!(child_keys(&parse(fixture_lines()), "Cells"), ["Structure", "Division"]);
//! ```

use std::path::{Path, PathBuf};

use crate::types::{Node, Outline};

// =========================================================================
// Fixture setup
// =========================================================================

const FIXTURE: &str = include_str!("../fixtures/biology.txt");

/// Lines of `fixtures/biology.txt`.
pub fn fixture_lines() -> Vec<&'static str> {
    FIXTURE.lines().collect()
}

/// Write an outline file into `dir` and return its path.
pub fn write_outline(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("outline.txt");
    std::fs::write(&path, content).unwrap();
    path
}

/// Build an outline of `n` top-level leaves named `key1..=keyN`.
pub fn flat_outline(n: usize) -> Outline {
    (1..=n)
        .map(|i| (format!("key{i}"), Node::leaf()))
        .collect()
}

// =========================================================================
// Lookups and assertions
// =========================================================================

/// Top-level labels in order.
pub fn keys(outline: &Outline) -> Vec<String> {
    outline.keys().cloned().collect()
}

/// Child labels under a top-level entry. Panics if the entry is missing.
pub fn child_keys<'a>(outline: &'a Outline, parent: &str) -> Vec<&'a str> {
    let node = outline.get(parent).unwrap_or_else(|| {
        let available = keys(outline);
        panic!("entry '{parent}' not found. Available: {available:?}")
    });
    match node {
        Node::Branch(children) => children.keys().map(String::as_str).collect(),
        Node::List(_) => Vec::new(),
    }
}

/// Assert that the top two levels of an outline match an expected shape.
///
/// Each entry is `(label, children)`. Use `&[]` for leaves.
pub fn assert_shape(outline: &Outline, expected: &[(&str, &[&str])]) {
    let expected_keys: Vec<&str> = expected.iter().map(|(k, _)| *k).collect();
    assert_eq!(keys(outline), expected_keys, "top-level labels mismatch");

    for (label, children) in expected {
        assert_eq!(
            child_keys(outline, label),
            children.to_vec(),
            "children of '{label}' mismatch"
        );
    }
}
