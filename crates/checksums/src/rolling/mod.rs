//! Rolling checksum used to find candidate blocks during delta computation.
//!
//! The checksum is an Adler-32 style pair of 16-bit sums: `s1` is the plain
//! byte sum and `s2` the sum of the running `s1` values. Both can be updated
//! in O(1) when the window slides by one byte, which is what makes scanning
//! a new file against a signature affordable.
//!
//! # Example
//!
//! ```rust
//! use checksums::RollingChecksum;
//!
//! let mut rolling = RollingChecksum::new();
//! rolling.update(b"hello");
//!
//! // Slide window: remove 'h', add '!'
//! rolling.roll(b'h', b'!').unwrap();
//!
//! let mut fresh = RollingChecksum::new();
//! fresh.update(b"ello!");
//! assert_eq!(rolling.value(), fresh.value());
//! ```

mod checksum;
mod digest;
mod error;

pub use checksum::RollingChecksum;
pub use digest::RollingDigest;
pub use error::RollingError;
