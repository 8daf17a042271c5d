#![deny(unsafe_code)]
#![deny(missing_docs)]

//! Incremental signature, delta and patch jobs.
//!
//! A [`Job`] is an exclusively owned state machine for one of four
//! operations:
//!
//! - [`begin_signature`] summarises a basis stream as a signature stream;
//! - [`begin_load_signature`] parses a signature stream into a
//!   [`Signature`], which is finalised with
//!   [`Signature::build_hash_table`];
//! - [`begin_create_delta`] expresses a new stream as copies from the basis
//!   plus literal bytes;
//! - [`begin_patch`] rebuilds the new stream from the delta, reading basis
//!   bytes through a [`BasisSource`].
//!
//! Every job is driven the same way, by [`Job::step`]:
//!
//! ```
//! use engine::{begin_load_signature, begin_signature};
//!
//! let (mut job, _layout) = begin_signature(Some(11), None)?;
//! let mut output = Vec::new();
//! let mut signature_stream = Vec::new();
//! for chunk in [&b"hello "[..], &b"world"[..], &[][..]] {
//!     let step = job.step(chunk, &mut output)?;
//!     signature_stream.extend_from_slice(&output[..step.produced]);
//! }
//!
//! let (mut loader, mut signature) = begin_load_signature();
//! loader.step(&signature_stream, &mut output)?;
//! assert!(loader.step(&[], &mut output)?.done);
//! signature.build_hash_table()?;
//! # Ok::<(), engine::JobError>(())
//! ```
//!
//! [`StreamingJob`] keeps the output buffer and leftover input between
//! calls, and the [`whole`] module drives jobs over [`std::io`] streams.

mod buffers;
pub mod command;
mod config;
mod error;
mod job;
mod jobs;
mod loaded_signature;
mod source;
mod streaming;
mod tube;
pub mod whole;

pub use command::CommandStats;
pub use config::{IO_BUFFER_SIZE, JobConfig};
pub use error::{EngineCode, JobError, JobResult, StateError};
pub use job::{
    Job, JobKind, Step, begin_create_delta, begin_load_signature, begin_patch, begin_signature,
    begin_signature_with,
};
pub use loaded_signature::Signature;
pub use signature::{SignatureAlgorithm, SignatureLayout, SignatureOptions, StrongLength};
pub use source::{BasisSource, SeekSource};
pub use streaming::StreamingJob;
