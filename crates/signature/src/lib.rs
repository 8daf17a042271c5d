#![deny(unsafe_code)]
#![deny(missing_docs)]

//! Block signatures: how a base file is summarised so a newer file can be
//! expressed as copies from it plus literal bytes.
//!
//! - [`SignatureAlgorithm`] names the strong digest and the stream magic.
//! - [`SignatureLayout`] fixes block length and strong checksum width;
//!   [`SignatureOptions`] drives the sizing heuristic that chooses them.
//! - [`format`] encodes and decodes the signature stream header and records.
//! - [`FileSignature`] holds loaded blocks; [`SignatureIndex`] is the hash
//!   table built from it for delta matching.

mod algorithm;
mod block;
mod file;
pub mod format;
mod index;
mod layout;

pub use algorithm::SignatureAlgorithm;
pub use block::SignatureBlock;
pub use file::FileSignature;
pub use format::FormatError;
pub use index::SignatureIndex;
pub use layout::{
    DEFAULT_BLOCK_LENGTH, DEFAULT_MIN_STRONG_LENGTH, LayoutError, SignatureLayout,
    SignatureOptions, StrongLength,
};
