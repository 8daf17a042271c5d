//! crates/cli/src/frontend/error.rs
//!
//! Failures surfaced by an invocation and their exit codes.

use std::io;

use engine::{JobError, StateError};
use thiserror::Error;

use super::arguments::Operand;
use super::{EXIT_CORRUPT, EXIT_IO, EXIT_USAGE};

#[derive(Debug, Error)]
pub(crate) enum CliError {
    #[error("cannot open '{operand}': {source}")]
    Open {
        operand: Operand,
        #[source]
        source: io::Error,
    },

    #[error("refusing to overwrite existing file '{0}' (use --force)")]
    Exists(Operand),

    #[error("cannot move output into place at '{operand}': {source}")]
    Commit {
        operand: Operand,
        #[source]
        source: io::Error,
    },

    #[error("{action} failed: {source}")]
    Job {
        action: &'static str,
        #[source]
        source: JobError,
    },

    #[error("failed to write statistics: {0}")]
    Stats(#[source] io::Error),
}

impl CliError {
    pub(crate) const fn job(action: &'static str, source: JobError) -> Self {
        Self::Job { action, source }
    }

    pub(crate) fn exit_code(&self) -> i32 {
        match self {
            Self::Job {
                source: JobError::Configuration(_),
                ..
            } => EXIT_USAGE,
            Self::Job {
                source: JobError::State(StateError::TrailingInput { .. }),
                ..
            } => EXIT_CORRUPT,
            Self::Job { source, .. } if source.is_corrupt_stream() => EXIT_CORRUPT,
            Self::Open { .. }
            | Self::Exists(_)
            | Self::Commit { .. }
            | Self::Job { .. }
            | Self::Stats(_) => EXIT_IO,
        }
    }
}
