//! crates/logging/src/tracing_macros.rs
//! Convenience macros for rdelta-specific tracing.
//!
//! These wrap the standard tracing macros with the subsystem targets listed
//! in [`targets`](crate::targets). Callers must depend on `tracing`
//! themselves since the expansion names `::tracing` directly.

/// Emit a job lifecycle event.
///
/// # Example
/// ```ignore
/// debug_job!(kind = %kind, "job done");
/// ```
#[macro_export]
macro_rules! debug_job {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: "rdelta::job", $($arg)*);
    };
}

/// Emit a fine-grained job event such as output buffer growth.
///
/// # Example
/// ```ignore
/// trace_job!(from = 16, to = 65536, "growing output buffer");
/// ```
#[macro_export]
macro_rules! trace_job {
    ($($arg:tt)*) => {
        ::tracing::trace!(target: "rdelta::job", $($arg)*);
    };
}

/// Emit a signature generation or loading event.
///
/// # Example
/// ```ignore
/// debug_signature!(blocks = count, "signature loaded");
/// ```
#[macro_export]
macro_rules! debug_signature {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: "rdelta::signature", $($arg)*);
    };
}

/// Emit a delta computation event.
///
/// # Example
/// ```ignore
/// debug_delta!(copy_bytes = n, "delta complete");
/// ```
#[macro_export]
macro_rules! debug_delta {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: "rdelta::delta", $($arg)*);
    };
}

/// Emit a patch application event.
///
/// # Example
/// ```ignore
/// debug_patch!(literal_bytes = n, "patch complete");
/// ```
#[macro_export]
macro_rules! debug_patch {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: "rdelta::patch", $($arg)*);
    };
}

/// Emit a per-command summary from the command-line front end.
///
/// # Example
/// ```ignore
/// info_cli!(bytes_in = n, "signature written");
/// ```
#[macro_export]
macro_rules! info_cli {
    ($($arg:tt)*) => {
        ::tracing::info!(target: "rdelta::cli", $($arg)*);
    };
}
