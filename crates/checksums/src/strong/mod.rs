//! Strong digests used to confirm weak checksum matches.
//!
//! Both digests produce 16 bytes; signatures may store a truncated prefix
//! whose width is chosen by the signature layout.

mod md4;
mod md5;

pub use md4::Md4;
pub use md5::Md5;

/// Streaming digest with a fixed output width.
pub trait StrongDigest: Sized {
    /// Digest output type.
    type Digest: AsRef<[u8]> + Copy;

    /// Width of the full digest in bytes.
    const DIGEST_LEN: usize;

    /// Creates a hasher with an empty state.
    fn new() -> Self;

    /// Feeds additional bytes into the digest state.
    fn update(&mut self, data: &[u8]);

    /// Finalises the digest.
    fn finalize(self) -> Self::Digest;

    /// Computes the digest of `data` in one shot.
    fn digest(data: &[u8]) -> Self::Digest {
        let mut hasher = Self::new();
        hasher.update(data);
        hasher.finalize()
    }
}
