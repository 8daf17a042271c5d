//! crates/signature/src/algorithm.rs
//!
//! Strong checksum algorithm definitions and their stream magic numbers.

use checksums::strong::{Md4, Md5, StrongDigest};

/// Strong checksum strategies supported by signature streams.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum SignatureAlgorithm {
    /// MD4, kept for reading older signature streams.
    Md4,
    /// MD5, the default for newly generated signatures.
    #[default]
    Md5,
}

impl SignatureAlgorithm {
    /// Magic number that opens an MD4 signature stream.
    pub const MD4_MAGIC: u32 = 0x7273_0136;
    /// Magic number that opens an MD5 signature stream.
    pub const MD5_MAGIC: u32 = 0x7273_0138;

    /// Returns the magic number written at the start of the signature stream.
    #[must_use]
    pub const fn magic(self) -> u32 {
        match self {
            Self::Md4 => Self::MD4_MAGIC,
            Self::Md5 => Self::MD5_MAGIC,
        }
    }

    /// Identifies the algorithm from a stream magic number.
    #[must_use]
    pub const fn from_magic(magic: u32) -> Option<Self> {
        match magic {
            Self::MD4_MAGIC => Some(Self::Md4),
            Self::MD5_MAGIC => Some(Self::Md5),
            _ => None,
        }
    }

    /// Returns the full digest width produced by the algorithm in bytes.
    #[inline]
    #[must_use]
    pub const fn digest_len(self) -> usize {
        match self {
            Self::Md4 => Md4::DIGEST_LEN,
            Self::Md5 => Md5::DIGEST_LEN,
        }
    }

    /// Computes the strong digest of `data` and copies its first `out.len()`
    /// bytes into `out`.
    ///
    /// `out` must not be longer than [`digest_len`](Self::digest_len).
    pub fn compute_into(self, data: &[u8], out: &mut [u8]) {
        let digest = match self {
            Self::Md4 => Md4::digest(data),
            Self::Md5 => Md5::digest(data),
        };
        out.copy_from_slice(&digest[..out.len()]);
    }

    /// Computes a strong digest truncated to `len` bytes.
    #[must_use]
    pub fn compute_truncated(self, data: &[u8], len: usize) -> Vec<u8> {
        let mut result = vec![0u8; len.min(self.digest_len())];
        self.compute_into(data, &mut result);
        result
    }

    /// Parses a user-facing algorithm name (`md4` or `md5`).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("md4") {
            Some(Self::Md4)
        } else if name.eq_ignore_ascii_case("md5") {
            Some(Self::Md5)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magic_round_trips() {
        for algorithm in [SignatureAlgorithm::Md4, SignatureAlgorithm::Md5] {
            assert_eq!(
                SignatureAlgorithm::from_magic(algorithm.magic()),
                Some(algorithm)
            );
        }
        assert_eq!(SignatureAlgorithm::from_magic(0x7273_0236), None);
    }

    #[test]
    fn compute_truncated_shorter_than_full() {
        let truncated = SignatureAlgorithm::Md4.compute_truncated(b"test data", 8);
        assert_eq!(truncated.len(), 8);
        assert_eq!(truncated, Md4::digest(b"test data")[..8]);
    }

    #[test]
    fn compute_truncated_longer_than_full_returns_full_digest() {
        let truncated = SignatureAlgorithm::Md5.compute_truncated(b"test data", 32);
        assert_eq!(truncated.len(), 16);
    }

    #[test]
    fn from_name_is_case_insensitive() {
        assert_eq!(
            SignatureAlgorithm::from_name("MD4"),
            Some(SignatureAlgorithm::Md4)
        );
        assert_eq!(
            SignatureAlgorithm::from_name("md5"),
            Some(SignatureAlgorithm::Md5)
        );
        assert_eq!(SignatureAlgorithm::from_name("sha1"), None);
    }

    #[test]
    fn default_is_md5() {
        assert_eq!(SignatureAlgorithm::default(), SignatureAlgorithm::Md5);
    }
}
