//! crates/cli/src/frontend/mod.rs
//!
//! Entry point shared by the binary and the tests.

mod arguments;
mod command_builder;
mod destination;
mod error;
mod execution;
pub mod stats_format;


use std::ffi::OsString;
use std::io::Write;

use clap::error::ErrorKind;

use self::arguments::parse_args;
use self::command_builder::PROGRAM_NAME;
use self::execution::execute;

/// Exit status of a successful run.
pub const EXIT_OK: i32 = 0;
/// Exit status for invalid arguments or signature parameters.
pub const EXIT_USAGE: i32 = 1;
/// Exit status for I/O failures.
pub const EXIT_IO: i32 = 2;
/// Exit status for malformed or truncated input streams.
pub const EXIT_CORRUPT: i32 = 3;

/// Maximum exit code representable by a Unix process.
const MAX_EXIT_CODE: i32 = u8::MAX as i32;

/// Parses `arguments`, runs the selected subcommand and returns the exit
/// status.
///
/// `stdout` receives output directed at `-` as well as help and version
/// text. Diagnostics go to `stderr`. The function never panics on bad input.
pub fn run<I, S, Out, Err>(arguments: I, stdout: &mut Out, stderr: &mut Err) -> i32
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
    Out: Write,
    Err: Write,
{
    let mut args: Vec<OsString> = arguments.into_iter().map(Into::into).collect();
    if args.is_empty() {
        args.push(OsString::from(PROGRAM_NAME));
    }

    let parsed = match parse_args(args) {
        Ok(parsed) => parsed,
        Err(error) => return report_parse_error(&error, stdout, stderr),
    };

    #[cfg(feature = "tracing")]
    logging::init_tracing(parsed.verbosity);

    match execute(parsed, stdout, stderr) {
        Ok(()) => {
            let _ = stdout.flush();
            EXIT_OK
        }
        Err(error) => {
            let _ = stdout.flush();
            let _ = writeln!(stderr, "{PROGRAM_NAME}: {error}");
            error.exit_code()
        }
    }
}

fn report_parse_error<Out: Write, Err: Write>(
    error: &clap::Error,
    stdout: &mut Out,
    stderr: &mut Err,
) -> i32 {
    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = write!(stdout, "{}", error.render());
            EXIT_OK
        }
        _ => {
            let _ = write!(stderr, "{}", error.render());
            EXIT_USAGE
        }
    }
}

/// Converts a numeric exit code into an [`std::process::ExitCode`].
#[must_use]
pub fn exit_code_from(status: i32) -> std::process::ExitCode {
    let clamped = status.clamp(0, MAX_EXIT_CODE);
    std::process::ExitCode::from(clamped as u8)
}
