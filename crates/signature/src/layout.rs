//! crates/signature/src/layout.rs
//!
//! Block sizing heuristic: choose a block length and strong checksum width
//! from the (possibly unknown) size of the file being summarised.

use core::num::{NonZeroU8, NonZeroU32};

use thiserror::Error;

use crate::algorithm::SignatureAlgorithm;

/// Block length used when the file size is unknown.
pub const DEFAULT_BLOCK_LENGTH: u32 = 2048;
/// Strong checksum width used as the safety floor when the file size is unknown.
pub const DEFAULT_MIN_STRONG_LENGTH: u8 = 12;
/// Block length used for files up to `SMALL_FILE_BLOCK_LENGTH²` bytes.
const SMALL_FILE_BLOCK_LENGTH: u32 = 256;
/// Block lengths derived from the file size are rounded down to this multiple.
const BLOCK_LENGTH_GRANULARITY: u64 = 128;

/// Errors raised when the sizing heuristic rejects its inputs.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum LayoutError {
    /// The requested strong checksum is wider than the algorithm's digest.
    #[error("invalid strong_len={requested} for {algorithm:?} (maximum {max})")]
    StrongLengthTooLarge {
        /// Requested width in bytes.
        requested: usize,
        /// Digest width of the algorithm.
        max: usize,
        /// Algorithm the request was made for.
        algorithm: SignatureAlgorithm,
    },
}

/// How wide the strong checksum stored per block should be.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum StrongLength {
    /// Store the full digest.
    #[default]
    Full,
    /// Store the smallest width considered safe for the file size.
    Minimum,
    /// Store exactly this many bytes.
    Exact(NonZeroU8),
}

impl StrongLength {
    /// Interprets a numeric override where `0` means "use the full digest".
    pub fn from_override(value: usize) -> Result<Self, usize> {
        if value == 0 {
            return Ok(Self::Full);
        }
        u8::try_from(value)
            .ok()
            .and_then(NonZeroU8::new)
            .map(Self::Exact)
            .ok_or(value)
    }
}

/// Inputs to the sizing heuristic.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SignatureOptions {
    file_size: Option<u64>,
    block_length: Option<NonZeroU32>,
    strong_length: StrongLength,
    algorithm: SignatureAlgorithm,
}

impl SignatureOptions {
    /// Creates options with every parameter left to the heuristic.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            file_size: None,
            block_length: None,
            strong_length: StrongLength::Full,
            algorithm: SignatureAlgorithm::Md5,
        }
    }

    /// Sets the size of the file the signature will describe, if known.
    #[must_use]
    pub const fn file_size(mut self, size: Option<u64>) -> Self {
        self.file_size = size;
        self
    }

    /// Forces a block length instead of deriving one from the file size.
    #[must_use]
    pub const fn block_length(mut self, length: Option<NonZeroU32>) -> Self {
        self.block_length = length;
        self
    }

    /// Selects the strong checksum width.
    #[must_use]
    pub const fn strong_length(mut self, length: StrongLength) -> Self {
        self.strong_length = length;
        self
    }

    /// Selects the strong checksum algorithm.
    #[must_use]
    pub const fn algorithm(mut self, algorithm: SignatureAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Returns the configured file size.
    #[must_use]
    pub const fn size(&self) -> Option<u64> {
        self.file_size
    }
}

/// Block length and strong checksum width of a signature stream.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SignatureLayout {
    algorithm: SignatureAlgorithm,
    block_length: NonZeroU32,
    strong_length: NonZeroU8,
}

impl SignatureLayout {
    /// Creates a layout from explicit parameters.
    #[must_use]
    pub const fn from_raw_parts(
        algorithm: SignatureAlgorithm,
        block_length: NonZeroU32,
        strong_length: NonZeroU8,
    ) -> Self {
        Self {
            algorithm,
            block_length,
            strong_length,
        }
    }

    /// Runs the sizing heuristic.
    ///
    /// Block length is the override if given, otherwise [`DEFAULT_BLOCK_LENGTH`]
    /// for unknown sizes, 256 for files of at most 64 KiB, and the square root
    /// of the size rounded down to a multiple of 128 beyond that. A strong
    /// width narrower than the safety floor is accepted, only wider than the
    /// digest is rejected.
    pub fn recommend(options: SignatureOptions) -> Result<Self, LayoutError> {
        let algorithm = options.algorithm;
        let block_length = options
            .block_length
            .unwrap_or_else(|| recommended_block_length(options.file_size));
        let max = algorithm.digest_len();
        let minimum = minimum_strong_length(options.file_size, block_length);

        let strong = match options.strong_length {
            StrongLength::Full => max,
            StrongLength::Minimum => usize::from(minimum.get()).min(max),
            StrongLength::Exact(requested) => {
                let requested = usize::from(requested.get());
                if requested > max {
                    return Err(LayoutError::StrongLengthTooLarge {
                        requested,
                        max,
                        algorithm,
                    });
                }
                #[cfg(feature = "tracing")]
                if options.file_size.is_some() && requested < usize::from(minimum.get()) {
                    tracing::warn!(
                        strong_len = requested,
                        minimum = minimum.get(),
                        block_len = block_length.get(),
                        "strong checksum narrower than recommended minimum"
                    );
                }
                requested
            }
        };

        let strong_length = u8::try_from(strong)
            .ok()
            .and_then(NonZeroU8::new)
            .ok_or(LayoutError::StrongLengthTooLarge {
                requested: strong,
                max,
                algorithm,
            })?;

        Ok(Self {
            algorithm,
            block_length,
            strong_length,
        })
    }

    /// Returns the strong checksum algorithm.
    #[inline]
    #[must_use]
    pub const fn algorithm(self) -> SignatureAlgorithm {
        self.algorithm
    }

    /// Returns the block length in bytes.
    #[inline]
    #[must_use]
    pub const fn block_length(self) -> NonZeroU32 {
        self.block_length
    }

    /// Returns the number of strong checksum bytes stored per block.
    #[inline]
    #[must_use]
    pub const fn strong_length(self) -> NonZeroU8 {
        self.strong_length
    }

    /// Returns the block length as a `usize`.
    #[inline]
    #[must_use]
    pub const fn block_len(self) -> usize {
        self.block_length.get() as usize
    }

    /// Returns the strong checksum width as a `usize`.
    #[inline]
    #[must_use]
    pub const fn strong_len(self) -> usize {
        self.strong_length.get() as usize
    }
}

fn recommended_block_length(file_size: Option<u64>) -> NonZeroU32 {
    let length = match file_size {
        None => DEFAULT_BLOCK_LENGTH,
        Some(size) if size <= u64::from(SMALL_FILE_BLOCK_LENGTH).pow(2) => SMALL_FILE_BLOCK_LENGTH,
        Some(size) => {
            let rounded = size.isqrt() & !(BLOCK_LENGTH_GRANULARITY - 1);
            u32::try_from(rounded).unwrap_or(u32::MAX & !(BLOCK_LENGTH_GRANULARITY as u32 - 1))
        }
    };
    NonZeroU32::new(length).unwrap_or(NonZeroU32::MIN)
}

/// Smallest strong width that keeps false block matches improbable: roughly
/// the bits needed to address every byte of the file plus every block.
fn minimum_strong_length(file_size: Option<u64>, block_length: NonZeroU32) -> NonZeroU8 {
    let bytes = match file_size {
        None => DEFAULT_MIN_STRONG_LENGTH,
        Some(size) => {
            let byte_bits = size.saturating_add(1 << 24).ilog2();
            let block_bits = (size / u64::from(block_length.get()) + 1).ilog2();
            2 + ((byte_bits + block_bits + 7) / 8) as u8
        }
    };
    NonZeroU8::new(bytes).unwrap_or(NonZeroU8::MIN)
}
