/// Snapshot of a [`RollingChecksum`](super::RollingChecksum) state.
///
/// Signature records only carry the packed 32-bit [`value`](Self::value); the
/// window length is tracked alongside so callers can tell a short trailing
/// block apart from a full one.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct RollingDigest {
    sum1: u16,
    sum2: u16,
    len: usize,
}

impl RollingDigest {
    /// Number of bytes a digest occupies in a signature record.
    pub const ENCODED_LEN: usize = 4;

    /// Creates a digest from its components.
    #[must_use]
    pub const fn new(sum1: u16, sum2: u16, len: usize) -> Self {
        Self { sum1, sum2, len }
    }

    /// Computes the digest of `data` in one pass.
    #[must_use]
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut checksum = super::RollingChecksum::new();
        checksum.update(data);
        checksum.digest()
    }

    /// Unpacks a digest from its 32-bit value and the window length it covered.
    #[must_use]
    pub const fn from_value(value: u32, len: usize) -> Self {
        Self {
            sum1: (value & 0xffff) as u16,
            sum2: (value >> 16) as u16,
            len,
        }
    }

    /// Returns the byte-sum component.
    #[inline]
    #[must_use]
    pub const fn sum1(self) -> u16 {
        self.sum1
    }

    /// Returns the weighted-sum component.
    #[inline]
    #[must_use]
    pub const fn sum2(self) -> u16 {
        self.sum2
    }

    /// Returns the number of bytes covered by the digest.
    #[inline]
    #[must_use]
    pub const fn len(self) -> usize {
        self.len
    }

    /// Reports whether the digest covers no bytes.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.len == 0
    }

    /// Returns the packed `(sum2 << 16) | sum1` value stored in signature records.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u32 {
        ((self.sum2 as u32) << 16) | self.sum1 as u32
    }

    /// Encodes the packed value in big-endian order.
    #[must_use]
    pub const fn to_be_bytes(self) -> [u8; Self::ENCODED_LEN] {
        self.value().to_be_bytes()
    }
}
