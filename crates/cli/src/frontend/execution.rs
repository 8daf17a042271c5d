//! crates/cli/src/frontend/execution.rs
//!
//! Runs a parsed invocation against files and standard streams.

use std::fs::File;
use std::io::{self, Read, Write};

use engine::{SeekSource, whole};

use super::arguments::{Action, Operand, ParsedArgs};
use super::destination::Destination;
use super::error::CliError;
use super::stats_format::StatsFormatter;

/// Runs the job selected by `parsed`.
///
/// Results go to the output operand, which may be `stdout`; a file operand
/// is only created or replaced when the job succeeds. Statistics, if
/// requested, go to `stderr`.
pub(crate) fn execute<Out, Err>(
    parsed: ParsedArgs,
    stdout: &mut Out,
    stderr: &mut Err,
) -> Result<(), CliError>
where
    Out: Write,
    Err: Write,
{
    let ParsedArgs {
        action,
        config,
        stats: show_stats,
        force,
        ..
    } = parsed;
    let name = action.name();

    let stats = match action {
        Action::Signature {
            basis,
            signature,
            options,
        } => {
            let (input, size) = open_input(&basis)?;
            let mut output = Destination::open(&signature, force, stdout)?;
            #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
            let (layout, stats) =
                whole::signature(input, &mut output, options.file_size(size), config)
                    .map_err(|err| CliError::job(name, err))?;
            output.commit()?;
            #[cfg(feature = "tracing")]
            logging::info_cli!(
                block_len = layout.block_len(),
                strong_len = layout.strong_len(),
                algorithm = ?layout.algorithm(),
                "signature layout"
            );
            stats
        }
        Action::Delta {
            signature,
            new,
            delta,
        } => {
            let (input, _) = open_input(&signature)?;
            let loaded =
                whole::load_signature(input, config).map_err(|err| CliError::job(name, err))?;
            #[cfg(feature = "tracing")]
            logging::info_cli!(blocks = loaded.block_count(), "signature loaded");

            let (input, _) = open_input(&new)?;
            let mut output = Destination::open(&delta, force, stdout)?;
            let stats = whole::delta(&loaded, input, &mut output, config)
                .map_err(|err| CliError::job(name, err))?;
            output.commit()?;
            stats
        }
        Action::Patch { basis, delta, new } => {
            let basis_file = File::open(&basis).map_err(|source| CliError::Open {
                operand: Operand::Path(basis),
                source,
            })?;
            let (input, _) = open_input(&delta)?;
            let mut output = Destination::open(&new, force, stdout)?;
            let stats = whole::patch(SeekSource::new(basis_file), input, &mut output, config)
                .map_err(|err| CliError::job(name, err))?;
            output.commit()?;
            stats
        }
    };

    #[cfg(feature = "tracing")]
    logging::info_cli!(
        action = name,
        bytes_in = stats.bytes_in,
        bytes_out = stats.bytes_out,
        "finished"
    );

    if show_stats {
        stderr
            .write_all(StatsFormatter::new(name, stats).format().as_bytes())
            .map_err(CliError::Stats)?;
    }
    Ok(())
}

/// Opens an input operand, also returning its size when it is a regular file.
fn open_input(operand: &Operand) -> Result<(Box<dyn Read>, Option<u64>), CliError> {
    match operand {
        Operand::Stdio => Ok((Box::new(io::stdin().lock()), None)),
        Operand::Path(path) => {
            let file = File::open(path).map_err(|source| CliError::Open {
                operand: operand.clone(),
                source,
            })?;
            let size = file
                .metadata()
                .ok()
                .filter(std::fs::Metadata::is_file)
                .map(|metadata| metadata.len());
            Ok((Box::new(file), size))
        }
    }
}
