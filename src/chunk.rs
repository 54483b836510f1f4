//! Splitting an outline into diagram-sized chunks.
//!
//! Large outlines make unreadable diagrams, so the top-level entries are
//! grouped into consecutive chunks of a fixed size and each chunk is drawn
//! separately. The last chunk holds whatever is left over.
//!
//! ```text
//! 7 entries, size 4  →  [1 2 3 4] [5 6 7]
//! ```

use crate::types::{Chunk, Outline};
use std::num::NonZeroUsize;

/// Partition the top-level entries of `outline` into chunks of `size`.
///
/// Order is preserved within and across chunks. An empty outline yields no
/// chunks.
pub fn chunk_outline(outline: &Outline, size: NonZeroUsize) -> Vec<Chunk> {
    let entries: Vec<_> = outline.iter().collect();
    entries
        .chunks(size.get())
        .enumerate()
        .map(|(i, group)| Chunk {
            number: i + 1,
            entries: group
                .iter()
                .map(|&(key, node)| (key.clone(), node.clone()))
                .collect(),
        })
        .collect()
}
