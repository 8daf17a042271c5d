//! Signature stream encoding.
//!
//! ```text
//! header : magic u32 | block_len u32 | strong_len u32      (big-endian)
//! record : weak u32  | strong[strong_len]                   (one per block)
//! ```
//!
//! The final record may describe a block shorter than `block_len`; its
//! length is implied by the size of the summarised file, which the stream
//! does not carry.

use core::num::{NonZeroU8, NonZeroU32};

use thiserror::Error;

use crate::algorithm::SignatureAlgorithm;
use crate::block::SignatureBlock;
use crate::layout::SignatureLayout;

/// Encoded size of the stream header.
pub const HEADER_LEN: usize = 12;
/// Encoded size of the weak checksum field of a record.
pub const WEAK_LEN: usize = 4;

/// Errors raised when a signature header is malformed.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum FormatError {
    /// The stream does not start with a known signature magic.
    #[error("bad magic number {0:#010x} at start of signature stream")]
    BadMagic(u32),
    /// The header declares a zero block length.
    #[error("signature header declares a zero block length")]
    ZeroBlockLength,
    /// The header declares a strong checksum width the algorithm cannot provide.
    #[error("signature header declares strong_len={len}, expected 1..={max}")]
    StrongLength {
        /// Declared width.
        len: u32,
        /// Digest width of the declared algorithm.
        max: usize,
    },
}

/// Encodes the header for `layout`.
#[must_use]
pub fn encode_header(layout: SignatureLayout) -> [u8; HEADER_LEN] {
    let mut header = [0u8; HEADER_LEN];
    header[..4].copy_from_slice(&layout.algorithm().magic().to_be_bytes());
    header[4..8].copy_from_slice(&layout.block_length().get().to_be_bytes());
    header[8..].copy_from_slice(&u32::from(layout.strong_length().get()).to_be_bytes());
    header
}

/// Decodes and validates a header.
pub fn decode_header(header: &[u8; HEADER_LEN]) -> Result<SignatureLayout, FormatError> {
    let magic = read_u32(&header[..4]);
    let algorithm = SignatureAlgorithm::from_magic(magic).ok_or(FormatError::BadMagic(magic))?;
    let block_length = NonZeroU32::new(read_u32(&header[4..8])).ok_or(FormatError::ZeroBlockLength)?;

    let declared = read_u32(&header[8..]);
    let max = algorithm.digest_len();
    let strong_length = u8::try_from(declared)
        .ok()
        .filter(|len| usize::from(*len) <= max)
        .and_then(NonZeroU8::new)
        .ok_or(FormatError::StrongLength { len: declared, max })?;

    Ok(SignatureLayout::from_raw_parts(
        algorithm,
        block_length,
        strong_length,
    ))
}

/// Returns the encoded size of one block record.
#[must_use]
pub const fn record_len(layout: SignatureLayout) -> usize {
    WEAK_LEN + layout.strong_len()
}

/// Appends the record for one block of `data` to `out`.
pub fn encode_record(layout: SignatureLayout, weak: u32, data: &[u8], out: &mut Vec<u8>) {
    out.extend_from_slice(&weak.to_be_bytes());
    let start = out.len();
    out.resize(start + layout.strong_len(), 0);
    layout.algorithm().compute_into(data, &mut out[start..]);
}

/// Decodes one record; `record` must be exactly [`record_len`] bytes.
#[must_use]
pub fn decode_record(index: u64, record: &[u8]) -> SignatureBlock {
    let weak = read_u32(&record[..WEAK_LEN]);
    SignatureBlock::from_raw_parts(index, weak, record[WEAK_LEN..].to_vec())
}

fn read_u32(bytes: &[u8]) -> u32 {
    let mut word = [0u8; 4];
    word.copy_from_slice(&bytes[..4]);
    u32::from_be_bytes(word)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::SignatureOptions;

    #[test]
    fn header_round_trips() {
        let layout = SignatureLayout::recommend(
            SignatureOptions::new()
                .file_size(Some(1 << 20))
                .algorithm(SignatureAlgorithm::Md4),
        )
        .expect("layout");
        assert_eq!(decode_header(&encode_header(layout)), Ok(layout));
    }

    #[test]
    fn header_is_big_endian() {
        let layout = SignatureLayout::from_raw_parts(
            SignatureAlgorithm::Md4,
            NonZeroU32::new(2048).unwrap(),
            NonZeroU8::new(8).unwrap(),
        );
        assert_eq!(
            encode_header(layout),
            [0x72, 0x73, 0x01, 0x36, 0, 0, 0x08, 0, 0, 0, 0, 8]
        );
    }

    #[test]
    fn unknown_magic_is_rejected() {
        let header = [0x72, 0x73, 0x02, 0x36, 0, 0, 0x08, 0, 0, 0, 0, 8];
        assert_eq!(decode_header(&header), Err(FormatError::BadMagic(0x7273_0236)));
    }

    #[test]
    fn zero_block_length_is_rejected() {
        let header = [0x72, 0x73, 0x01, 0x38, 0, 0, 0, 0, 0, 0, 0, 8];
        assert_eq!(decode_header(&header), Err(FormatError::ZeroBlockLength));
    }

    #[test]
    fn oversized_strong_length_is_rejected() {
        let header = [0x72, 0x73, 0x01, 0x38, 0, 0, 0x08, 0, 0, 0, 0, 17];
        assert_eq!(
            decode_header(&header),
            Err(FormatError::StrongLength { len: 17, max: 16 })
        );
        let header = [0x72, 0x73, 0x01, 0x38, 0, 0, 0x08, 0, 0, 0, 0, 0];
        assert_eq!(
            decode_header(&header),
            Err(FormatError::StrongLength { len: 0, max: 16 })
        );
    }

    #[test]
    fn record_round_trips() {
        let layout = SignatureLayout::from_raw_parts(
            SignatureAlgorithm::Md5,
            NonZeroU32::new(4).unwrap(),
            NonZeroU8::new(6).unwrap(),
        );
        let mut encoded = Vec::new();
        encode_record(layout, 0xdead_beef, b"abcd", &mut encoded);
        assert_eq!(encoded.len(), record_len(layout));

        let block = decode_record(3, &encoded);
        assert_eq!(block.index(), 3);
        assert_eq!(block.weak(), 0xdead_beef);
        assert_eq!(
            block.strong(),
            SignatureAlgorithm::Md5.compute_truncated(b"abcd", 6).as_slice()
        );
    }
}
