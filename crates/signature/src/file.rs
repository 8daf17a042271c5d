//! crates/signature/src/file.rs
//!
//! Aggregated signature container.

use crate::block::SignatureBlock;
use crate::layout::SignatureLayout;

/// Layout plus the ordered block records of one signature stream.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FileSignature {
    layout: SignatureLayout,
    blocks: Vec<SignatureBlock>,
}

impl FileSignature {
    /// Creates an empty signature for `layout`.
    #[must_use]
    pub const fn new(layout: SignatureLayout) -> Self {
        Self {
            layout,
            blocks: Vec::new(),
        }
    }

    /// Appends the next block record and returns its index.
    pub fn push(&mut self, weak: u32, strong: Vec<u8>) -> u64 {
        let index = self.blocks.len() as u64;
        self.blocks
            .push(SignatureBlock::from_raw_parts(index, weak, strong));
        index
    }

    /// Returns the layout the signature was generated with.
    #[inline]
    #[must_use]
    pub const fn layout(&self) -> SignatureLayout {
        self.layout
    }

    /// Returns the block records in stream order.
    #[inline]
    #[must_use]
    pub fn blocks(&self) -> &[SignatureBlock] {
        &self.blocks
    }

    /// Returns the block with the given index.
    #[inline]
    #[must_use]
    pub fn block(&self, index: usize) -> &SignatureBlock {
        &self.blocks[index]
    }

    /// Returns the number of blocks.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Reports whether the signature describes an empty file.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
