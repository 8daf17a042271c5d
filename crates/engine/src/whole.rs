//! crates/engine/src/whole.rs
//!
//! Drivers that run a job over whole streams.
//!
//! Each driver reads its input in `io_buffer_size` chunks, steps the job
//! until it is done and writes everything it produces.

use std::io::{self, Read, Write};

use signature::{SignatureLayout, SignatureOptions};
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::command::CommandStats;
use crate::config::JobConfig;
use crate::error::{JobError, JobResult};
use crate::job::{Job, begin_create_delta, begin_load_signature, begin_patch, begin_signature_with};
use crate::loaded_signature::Signature;
use crate::source::BasisSource;
use crate::streaming::StreamingJob;

/// Byte counts for one driven job.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Stats {
    /// Bytes read from the input stream.
    pub bytes_in: u64,
    /// Bytes written to the output stream.
    pub bytes_out: u64,
    /// Commands emitted (delta) or applied (patch).
    pub commands: Option<CommandStats>,
}

/// Writes the signature of `basis` to `out`.
#[cfg_attr(feature = "tracing", instrument(skip_all, name = "signature"))]
pub fn signature<R: Read, W: Write>(
    basis: R,
    out: W,
    options: SignatureOptions,
    config: JobConfig,
) -> JobResult<(SignatureLayout, Stats)> {
    let (job, layout) = begin_signature_with(options)?;
    let stats = drive(job.with_config(config), basis, out)?;
    Ok((layout, stats))
}

/// Loads a signature stream and builds its hash table.
#[cfg_attr(feature = "tracing", instrument(skip_all, name = "load_signature"))]
pub fn load_signature<R: Read>(input: R, config: JobConfig) -> JobResult<Signature> {
    let (job, mut signature) = begin_load_signature();
    drive(job.with_config(config), input, io::sink())?;
    signature.build_hash_table()?;
    Ok(signature)
}

/// Writes the delta of `new` against `signature` to `out`.
#[cfg_attr(feature = "tracing", instrument(skip_all, name = "delta"))]
pub fn delta<R: Read, W: Write>(
    signature: &Signature,
    new: R,
    out: W,
    config: JobConfig,
) -> JobResult<Stats> {
    let job = begin_create_delta(signature)?;
    drive(job.with_config(config), new, out)
}

/// Applies the delta read from `delta` to `basis` and writes the result to
/// `out`.
#[cfg_attr(feature = "tracing", instrument(skip_all, name = "patch"))]
pub fn patch<S, R, W>(basis: S, delta: R, out: W, config: JobConfig) -> JobResult<Stats>
where
    S: BasisSource + Send,
    R: Read,
    W: Write,
{
    drive(begin_patch(basis).with_config(config), delta, out)
}

/// Runs `job` over the whole of `input`.
///
/// Input remaining after the job is done is read and rejected, so a patch
/// with trailing garbage fails rather than silently succeeding.
pub fn drive<R: Read, W: Write>(job: Job<'_>, mut input: R, mut out: W) -> JobResult<Stats> {
    let mut buffer = vec![0u8; job.config().io_buffer_size()];
    let mut streaming = StreamingJob::new(job);
    let mut stats = Stats::default();

    loop {
        let n = read_some(&mut input, &mut buffer)?;
        stats.bytes_in += n as u64;
        let produced = streaming.feed(&buffer[..n])?;
        out.write_all(produced).map_err(JobError::Io)?;
        stats.bytes_out += produced.len() as u64;
        if n == 0 {
            break;
        }
    }
    out.flush().map_err(JobError::Io)?;

    if !streaming.is_done() {
        return Err(JobError::internal("job did not finish at end of input"));
    }
    stats.commands = streaming.job().command_stats();
    Ok(stats)
}

fn read_some<R: Read>(input: &mut R, buffer: &mut [u8]) -> JobResult<usize> {
    loop {
        match input.read(buffer) {
            Ok(n) => return Ok(n),
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            Err(err) => return Err(JobError::Io(err)),
        }
    }
}
