//! crates/signature/src/block.rs
//!
//! Individual signature block representation.

/// Describes a single block within a signature stream.
///
/// The stream does not record the length of the final block, so a block only
/// knows its index, its weak checksum and the truncated strong digest.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SignatureBlock {
    index: u64,
    weak: u32,
    strong: Vec<u8>,
}

impl SignatureBlock {
    /// Creates a block descriptor from its components.
    #[must_use]
    pub const fn from_raw_parts(index: u64, weak: u32, strong: Vec<u8>) -> Self {
        Self {
            index,
            weak,
            strong,
        }
    }

    /// Returns the zero-based index of the block within the signature.
    #[inline]
    #[must_use]
    pub const fn index(&self) -> u64 {
        self.index
    }

    /// Returns the packed rolling checksum of the block.
    #[inline]
    #[must_use]
    pub const fn weak(&self) -> u32 {
        self.weak
    }

    /// Returns the truncated strong checksum bytes for the block.
    #[inline]
    #[must_use]
    pub fn strong(&self) -> &[u8] {
        &self.strong
    }

    /// Consumes the block and returns its strong digest.
    #[must_use]
    pub fn into_strong(self) -> Vec<u8> {
        self.strong
    }
}
