//! crates/logging/src/verbosity.rs
//! Mapping from `-v` repetitions to a maximum event level.

use std::fmt;
use std::str::FromStr;

use crate::targets::ROOT;

/// Most detailed level of events that is recorded.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Verbosity {
    /// Nothing is recorded.
    Off,
    /// Errors only.
    Error,
    /// Warnings and errors. The level used without `-v`.
    #[default]
    Warn,
    /// Per-job summaries (`-v`).
    Info,
    /// Job lifecycle and stream statistics (`-vv`).
    Debug,
    /// Buffer growth and everything else (`-vvv` and beyond).
    Trace,
}

impl Verbosity {
    /// Maps the number of `-v` flags to a level, saturating at [`Self::Trace`].
    #[must_use]
    pub const fn from_count(count: u8) -> Self {
        match count {
            0 => Self::Warn,
            1 => Self::Info,
            2 => Self::Debug,
            _ => Self::Trace,
        }
    }

    /// Lower-case level name as accepted by filter directives.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }

    /// Filter directive that applies this level to every rdelta target.
    ///
    /// Events from other crates stay at the default filter level.
    #[must_use]
    pub fn directive(self) -> String {
        format!("{ROOT}={}", self.as_str())
    }

    /// Returns `true` when events at `other` are recorded under `self`.
    #[must_use]
    pub fn includes(self, other: Self) -> bool {
        other != Self::Off && other <= self
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a level name is not recognised.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseVerbosityError(String);

impl fmt::Display for ParseVerbosityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown log level '{}'", self.0)
    }
}

impl std::error::Error for ParseVerbosityError {}

impl FromStr for Verbosity {
    type Err = ParseVerbosityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "off" => Ok(Self::Off),
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(ParseVerbosityError(s.to_owned())),
        }
    }
}
