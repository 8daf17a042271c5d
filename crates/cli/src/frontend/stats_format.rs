//! Statistics printed by `--stats` once a subcommand finishes.
//!
//! # Example
//!
//! ```
//! use cli::stats_format::StatsFormatter;
//! use engine::CommandStats;
//! use engine::whole::Stats;
//!
//! let stats = Stats {
//!     bytes_in: 1_017,
//!     bytes_out: 53,
//!     commands: Some(CommandStats {
//!         literal_commands: 3,
//!         literal_bytes: 27,
//!         copy_commands: 2,
//!         copy_bytes: 990,
//!     }),
//! };
//!
//! assert_eq!(
//!     StatsFormatter::new("delta", stats).format(),
//!     "rdelta: delta statistics: literal[3 cmds, 27 bytes] copy[2 cmds, 990 bytes] in[1017 bytes] out[53 bytes]\n",
//! );
//! ```

use std::fmt::Write;

use engine::whole::Stats;

/// Renders the statistics of one driven job as a single line.
#[derive(Clone, Copy, Debug)]
pub struct StatsFormatter<'a> {
    action: &'a str,
    stats: Stats,
}

impl<'a> StatsFormatter<'a> {
    /// Creates a formatter for the job named `action`.
    #[must_use]
    pub const fn new(action: &'a str, stats: Stats) -> Self {
        Self { action, stats }
    }

    /// Returns the newline-terminated statistics line.
    #[must_use]
    pub fn format(&self) -> String {
        let mut out = String::with_capacity(128);
        let _ = write!(out, "rdelta: {} statistics:", self.action);
        if let Some(commands) = self.stats.commands {
            let _ = write!(
                out,
                " literal[{} cmds, {} bytes] copy[{} cmds, {} bytes]",
                commands.literal_commands,
                commands.literal_bytes,
                commands.copy_commands,
                commands.copy_bytes
            );
        }
        let _ = writeln!(
            out,
            " in[{} bytes] out[{} bytes]",
            self.stats.bytes_in, self.stats.bytes_out
        );
        out
    }
}
