#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `cli` implements the `rdelta` command-line front end. Three subcommands
//! wrap the whole-stream drivers from [`engine::whole`]:
//!
//! - `rdelta signature [BASIS [SIGNATURE]]`
//! - `rdelta delta SIGNATURE [NEWFILE [DELTA]]`
//! - `rdelta patch BASIS [DELTA [NEWFILE]]`
//!
//! Omitted operands and `-` stand for standard input or output. The patch
//! basis must be a regular file since copies read it at arbitrary offsets.
//!
//! # Design
//!
//! [`run`] accepts the argument list together with handles for standard
//! output and error so the whole front end can be exercised in-process.
//! Arguments are parsed with a [`clap`] builder into an invocation which is
//! then executed; every failure is reported as a single `rdelta: ...` line
//! on the error handle.
//!
//! # Exit codes
//!
//! | code | meaning |
//! |------|---------|
//! | 0 | success, including `--help` and `--version` |
//! | 1 | invalid arguments or options |
//! | 2 | I/O failure or an engine failure other than a corrupt stream |
//! | 3 | a signature or delta stream is malformed or truncated |
//!
//! # Examples
//!
//! ```
//! let mut stdout = Vec::new();
//! let mut stderr = Vec::new();
//! let status = cli::run(["rdelta", "--version"], &mut stdout, &mut stderr);
//!
//! assert_eq!(status, 0);
//! assert!(String::from_utf8(stdout).unwrap().starts_with("rdelta "));
//! ```

mod frontend;

pub use frontend::{
    EXIT_CORRUPT, EXIT_IO, EXIT_OK, EXIT_USAGE, exit_code_from, run, stats_format,
};
