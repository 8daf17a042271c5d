//! Error types shared by every job variant.

use std::fmt;
use std::io;

use signature::LayoutError;
use thiserror::Error;

/// Result type for job operations.
pub type JobResult<T> = Result<T, JobError>;

/// Result codes reported by the diff engine.
///
/// `Done`, `Blocked` and `Running` are progress states and never appear
/// inside a [`JobError`]; the remaining codes classify engine failures.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum EngineCode {
    /// The job completed.
    Done,
    /// The job needs more input.
    Blocked,
    /// The job needs more output space.
    Running,
    /// Reading or writing failed.
    IoError,
    /// Command line syntax was invalid.
    SyntaxError,
    /// Memory could not be obtained.
    MemError,
    /// The input stream ended in the middle of a structure.
    InputEnded,
    /// The stream does not start with the expected magic number.
    BadMagic,
    /// The stream uses a feature that is not implemented.
    Unimplemented,
    /// The stream is malformed.
    Corrupt,
    /// The engine reached an inconsistent state.
    InternalError,
    /// A parameter passed to the engine was out of range.
    ParamError,
}

impl EngineCode {
    /// Returns the diagnostic text for the code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Done => "OK",
            Self::Blocked => "blocked waiting for input or output buffers",
            Self::Running => "still running",
            Self::IoError => "IO error",
            Self::SyntaxError => "bad command line syntax",
            Self::MemError => "out of memory",
            Self::InputEnded => "unexpected end of input",
            Self::BadMagic => "bad magic number at start of stream",
            Self::Unimplemented => "unimplemented case",
            Self::Corrupt => "stream corrupt",
            Self::InternalError => "library internal error",
            Self::ParamError => "bad value passed in to library",
        }
    }
}

impl fmt::Display for EngineCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operations invoked in an order the job lifecycle does not allow.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum StateError {
    /// A delta was requested from a signature whose hash table is not built.
    #[error("must build the signature hash table before creating a delta")]
    HashTableNotBuilt,
    /// The hash table of a signature was built a second time.
    #[error("signature hash table has already been built")]
    HashTableAlreadyBuilt,
    /// Input arrived for a job that already finished.
    #[error("job already finished; {bytes} bytes of trailing input")]
    TrailingInput {
        /// Number of bytes that could not be consumed.
        bytes: usize,
    },
    /// The job was stepped again after it failed.
    #[error("job cannot continue after a failed step")]
    Failed,
}

/// Failure of a job step or of job construction.
#[derive(Debug, Error)]
pub enum JobError {
    /// Signature parameters could not be satisfied.
    #[error("invalid signature parameters: {0}")]
    Configuration(#[from] LayoutError),
    /// Lifecycle misuse.
    #[error(transparent)]
    State(#[from] StateError),
    /// The engine rejected the stream or reached an inconsistent state.
    #[error("{code}: {message}")]
    Engine {
        /// Classification of the failure.
        code: EngineCode,
        /// Diagnostic detail.
        message: String,
    },
    /// A basis source or a driven stream failed.
    #[error("I/O failure: {0}")]
    Io(#[source] io::Error),
    /// A basis source reported more bytes than it was asked for.
    #[error("basis source returned {returned} bytes for a {requested}-byte request")]
    Protocol {
        /// Size of the request.
        requested: usize,
        /// Reported byte count.
        returned: usize,
    },
}

impl JobError {
    pub(crate) fn engine(code: EngineCode, message: impl Into<String>) -> Self {
        Self::Engine {
            code,
            message: message.into(),
        }
    }

    pub(crate) fn internal(message: impl Into<String>) -> Self {
        Self::engine(EngineCode::InternalError, message)
    }

    /// Returns the engine code for [`JobError::Engine`] failures.
    #[must_use]
    pub const fn code(&self) -> Option<EngineCode> {
        match self {
            Self::Engine { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Reports whether the failure was caused by malformed input data.
    #[must_use]
    pub const fn is_corrupt_stream(&self) -> bool {
        matches!(
            self.code(),
            Some(EngineCode::InputEnded | EngineCode::BadMagic | EngineCode::Corrupt)
        )
    }
}

impl From<io::Error> for JobError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_error_display_includes_code_text() {
        let err = JobError::engine(EngineCode::Corrupt, "unknown delta command byte 0x99");
        assert_eq!(
            err.to_string(),
            "stream corrupt: unknown delta command byte 0x99"
        );
        assert_eq!(err.code(), Some(EngineCode::Corrupt));
        assert!(err.is_corrupt_stream());
    }

    #[test]
    fn internal_errors_are_not_stream_corruption() {
        let err = JobError::internal("no progress");
        assert_eq!(err.code(), Some(EngineCode::InternalError));
        assert!(!err.is_corrupt_stream());
    }

    #[test]
    fn state_errors_display_transparently() {
        let err = JobError::from(StateError::HashTableNotBuilt);
        assert_eq!(
            err.to_string(),
            "must build the signature hash table before creating a delta"
        );
        assert_eq!(err.code(), None);
    }

    #[test]
    fn protocol_error_names_both_sizes() {
        let err = JobError::Protocol {
            requested: 10,
            returned: 12,
        };
        assert_eq!(
            err.to_string(),
            "basis source returned 12 bytes for a 10-byte request"
        );
    }
}
