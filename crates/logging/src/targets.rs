//! crates/logging/src/targets.rs
//! Event targets, one per subsystem.
//!
//! All targets share the [`ROOT`] prefix so a single `rdelta=<level>`
//! directive selects every event the workspace emits.

/// Prefix shared by every target.
pub const ROOT: &str = "rdelta";

/// Job lifecycle: completion, failure and output buffer growth.
pub const JOB: &str = "rdelta::job";

/// Signature generation and loading.
pub const SIGNATURE: &str = "rdelta::signature";

/// Delta computation.
pub const DELTA: &str = "rdelta::delta";

/// Patch application.
pub const PATCH: &str = "rdelta::patch";

/// Command-line front end.
pub const CLI: &str = "rdelta::cli";

/// Every subsystem target.
pub const ALL: [&str; 5] = [JOB, SIGNATURE, DELTA, PATCH, CLI];
