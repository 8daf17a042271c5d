#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` holds the diagnostics plumbing shared by the rdelta crates.
//! Library crates emit events through the per-subsystem macros exported here
//! so every event carries one of the [`targets`], and the command-line front
//! end maps its `-v` count to a [`Verbosity`] before installing a subscriber
//! with [`init_tracing`].
//!
//! # Design
//!
//! [`Verbosity`] is always available so argument parsing does not depend on
//! the `tracing` feature. The macros and the subscriber setup are compiled
//! only with that feature; callers gate their invocations on their own
//! `tracing` feature, which forwards to this crate's.
//!
//! # Examples
//!
//! ```
//! use logging::Verbosity;
//!
//! assert_eq!(Verbosity::from_count(0), Verbosity::Warn);
//! assert_eq!(Verbosity::from_count(2).directive(), "rdelta=debug");
//! assert_eq!(Verbosity::from_count(9), Verbosity::Trace);
//! ```

pub mod targets;
mod verbosity;

#[cfg(feature = "tracing")]
mod subscriber;
#[cfg(feature = "tracing")]
mod tracing_macros;

pub use verbosity::{ParseVerbosityError, Verbosity};

#[cfg(feature = "tracing")]
pub use subscriber::{LOG_ENV, init_tracing, init_tracing_with_writer};
