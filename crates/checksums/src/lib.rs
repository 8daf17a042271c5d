#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! Checksum primitives shared by signature generation and delta matching.
//!
//! - [`RollingChecksum`] is the weak, O(1)-slidable checksum used to find
//!   candidate blocks while scanning a new file.
//! - [`strong`] hosts the strong digests ([`strong::Md4`], [`strong::Md5`])
//!   that confirm a candidate before a copy command is emitted.

mod rolling;
pub mod strong;

pub use rolling::{RollingChecksum, RollingDigest, RollingError};
