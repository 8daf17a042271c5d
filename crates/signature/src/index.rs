//! crates/signature/src/index.rs
//!
//! Hash table over a loaded signature, keyed by weak checksum.

use rustc_hash::FxHashMap;
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::block::SignatureBlock;
use crate::file::FileSignature;
use crate::layout::SignatureLayout;

/// Widest strong digest any [`SignatureAlgorithm`](crate::SignatureAlgorithm) produces.
const MAX_STRONG_LEN: usize = 16;

/// Lookup structure used while scanning a new file for blocks of the base.
///
/// Weak checksum hits are confirmed against the truncated strong digest,
/// which is computed at most once per probed window.
#[derive(Clone, Debug)]
pub struct SignatureIndex {
    signature: FileSignature,
    table: FxHashMap<u32, Vec<usize>>,
}

impl SignatureIndex {
    /// Builds the weak checksum table for `signature`.
    #[cfg_attr(feature = "tracing", instrument(skip(signature), fields(blocks = signature.len()), name = "build_hash_table"))]
    #[must_use]
    pub fn build(signature: FileSignature) -> Self {
        let mut table: FxHashMap<u32, Vec<usize>> = FxHashMap::default();
        table.reserve(signature.len());
        for (position, block) in signature.blocks().iter().enumerate() {
            table.entry(block.weak()).or_default().push(position);
        }
        Self { signature, table }
    }

    /// Returns the layout of the underlying signature.
    #[inline]
    #[must_use]
    pub const fn layout(&self) -> SignatureLayout {
        self.signature.layout()
    }

    /// Returns the block length in bytes.
    #[inline]
    #[must_use]
    pub const fn block_len(&self) -> usize {
        self.signature.layout().block_len()
    }

    /// Returns the number of indexed blocks.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.signature.len()
    }

    /// Reports whether the index has no blocks.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.signature.is_empty()
    }

    /// Returns the signature the index was built from.
    #[must_use]
    pub const fn signature(&self) -> &FileSignature {
        &self.signature
    }

    /// Returns the byte offset of `block` within the base file.
    #[inline]
    #[must_use]
    pub fn offset_of(&self, block: &SignatureBlock) -> u64 {
        block.index() * u64::from(self.layout().block_length().get())
    }

    /// Finds a block whose weak checksum is `weak` and whose strong digest
    /// matches `window`.
    #[must_use]
    pub fn find(&self, weak: u32, window: &[u8]) -> Option<&SignatureBlock> {
        let candidates = self.table.get(&weak)?;
        let layout = self.layout();
        let mut strong = [0u8; MAX_STRONG_LEN];
        let strong = &mut strong[..layout.strong_len()];
        layout.algorithm().compute_into(window, strong);

        candidates
            .iter()
            .map(|&position| self.signature.block(position))
            .find(|block| block.strong() == &strong[..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::SignatureAlgorithm;
    use checksums::RollingDigest;
    use core::num::{NonZeroU8, NonZeroU32};

    fn signature_of(data: &[u8], block_len: u32) -> FileSignature {
        let layout = SignatureLayout::from_raw_parts(
            SignatureAlgorithm::Md5,
            NonZeroU32::new(block_len).unwrap(),
            NonZeroU8::new(8).unwrap(),
        );
        let mut signature = FileSignature::new(layout);
        for chunk in data.chunks(block_len as usize) {
            signature.push(
                RollingDigest::from_bytes(chunk).value(),
                SignatureAlgorithm::Md5.compute_truncated(chunk, 8),
            );
        }
        signature
    }

    #[test]
    fn finds_every_block() {
        let data: Vec<u8> = (0..4096u32).map(|i| (i * 7 % 251) as u8).collect();
        let index = SignatureIndex::build(signature_of(&data, 512));

        for (position, chunk) in data.chunks(512).enumerate() {
            let weak = RollingDigest::from_bytes(chunk).value();
            let block = index.find(weak, chunk).expect("block present");
            assert_eq!(block.index(), position as u64);
            assert_eq!(index.offset_of(block), position as u64 * 512);
        }
    }

    #[test]
    fn weak_hit_with_strong_mismatch_is_rejected() {
        let index = SignatureIndex::build(signature_of(b"abcdefgh", 4));
        let weak = RollingDigest::from_bytes(b"abcd").value();
        assert!(index.find(weak, b"abce").is_none());
    }

    #[test]
    fn duplicate_blocks_resolve_to_first() {
        let index = SignatureIndex::build(signature_of(b"abcdabcd", 4));
        let weak = RollingDigest::from_bytes(b"abcd").value();
        assert_eq!(index.find(weak, b"abcd").map(SignatureBlock::index), Some(0));
    }

    #[test]
    fn empty_signature_never_matches() {
        let index = SignatureIndex::build(signature_of(b"", 4));
        assert!(index.is_empty());
        assert!(index.find(0, b"").is_none());
    }
}
