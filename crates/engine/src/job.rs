//! crates/engine/src/job.rs
//!
//! Job handles and the streaming step protocol.
//!
//! A [`Job`] is advanced by repeated calls to [`Job::step`], each handing
//! over one chunk of input and an output buffer. An empty input chunk marks
//! the end of the stream. When the output buffer fills before the engine
//! has finished with the chunk, the buffer is grown in place and the step
//! continues, so a single call always consumes as much input as the job
//! can accept.

use core::fmt;

use signature::{
    LayoutError, SignatureAlgorithm, SignatureLayout, SignatureOptions, StrongLength,
};
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::buffers::Buffers;
use crate::command::CommandStats;
use crate::config::JobConfig;
use crate::error::{JobError, JobResult, StateError};
use crate::jobs::{
    ApplyPatch, ComputeDelta, GenerateSignature, LoadSignature, Machine, Status,
};
use crate::loaded_signature::Signature;
use crate::source::BasisSource;

/// Which operation a job performs.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum JobKind {
    /// Emits the signature of a basis stream.
    Signature,
    /// Parses a signature stream into a [`Signature`].
    LoadSignature,
    /// Emits the delta of a new stream against a [`Signature`].
    Delta,
    /// Rebuilds the new stream from a basis and a delta stream.
    Patch,
}

impl JobKind {
    /// Returns a short lowercase name for diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Signature => "signature",
            Self::LoadSignature => "load-signature",
            Self::Delta => "delta",
            Self::Patch => "patch",
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one [`Job::step`] call.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Step {
    /// The job has produced its entire output.
    pub done: bool,
    /// Number of trailing input bytes the job did not consume.
    pub unused_input: usize,
    /// Number of bytes written to the front of the output buffer.
    pub produced: usize,
}

enum Variant<'a> {
    Signature(Machine<GenerateSignature>),
    LoadSignature(Machine<LoadSignature>),
    Delta(Machine<ComputeDelta<'a>>),
    Patch(Machine<ApplyPatch<'a>>),
}

impl Variant<'_> {
    fn iterate(&mut self, buffers: &mut Buffers<'_>) -> JobResult<Status> {
        match self {
            Self::Signature(machine) => machine.iterate(buffers),
            Self::LoadSignature(machine) => machine.iterate(buffers),
            Self::Delta(machine) => machine.iterate(buffers),
            Self::Patch(machine) => machine.iterate(buffers),
        }
    }

    const fn kind(&self) -> JobKind {
        match self {
            Self::Signature(_) => JobKind::Signature,
            Self::LoadSignature(_) => JobKind::LoadSignature,
            Self::Delta(_) => JobKind::Delta,
            Self::Patch(_) => JobKind::Patch,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Lifecycle {
    Active,
    Done,
    Failed,
}

/// An exclusively owned signature, delta or patch job.
///
/// Dropping the job releases its engine state; a job that failed cannot be
/// stepped again.
pub struct Job<'a> {
    variant: Variant<'a>,
    lifecycle: Lifecycle,
    config: JobConfig,
}

impl<'a> Job<'a> {
    fn new(variant: Variant<'a>) -> Self {
        Self {
            variant,
            lifecycle: Lifecycle::Active,
            config: JobConfig::default(),
        }
    }

    /// Replaces the buffer configuration.
    #[must_use]
    pub const fn with_config(mut self, config: JobConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the buffer configuration.
    #[must_use]
    pub const fn config(&self) -> JobConfig {
        self.config
    }

    /// Returns the operation the job performs.
    #[must_use]
    pub const fn kind(&self) -> JobKind {
        self.variant.kind()
    }

    /// Reports whether the job has produced all of its output.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.lifecycle == Lifecycle::Done
    }

    /// Returns command counts for delta and patch jobs.
    #[must_use]
    pub fn command_stats(&self) -> Option<CommandStats> {
        match &self.variant {
            Variant::Delta(machine) => Some(machine.stage().stats()),
            Variant::Patch(machine) => Some(machine.stage().stats()),
            Variant::Signature(_) | Variant::LoadSignature(_) => None,
        }
    }

    /// Feeds `input` to the job and writes its output to the front of
    /// `output`.
    ///
    /// An empty `input` signals the end of the stream. `output.len()` is the
    /// space available; when it is exhausted while the job still has work
    /// to do, `output` grows to `max(io_buffer_size, 2 * len)` and the step
    /// resumes where it stopped. Bytes past [`Step::produced`] are
    /// unspecified.
    ///
    /// Stepping a finished job with empty input returns a finished step
    /// without doing any work; stepping it with data fails with
    /// [`StateError::TrailingInput`]. After any failure the job only
    /// returns [`StateError::Failed`].
    pub fn step(&mut self, input: &[u8], output: &mut Vec<u8>) -> JobResult<Step> {
        match self.lifecycle {
            Lifecycle::Active => {}
            Lifecycle::Done if input.is_empty() => {
                return Ok(Step {
                    done: true,
                    unused_input: 0,
                    produced: 0,
                });
            }
            Lifecycle::Done => {
                return Err(StateError::TrailingInput { bytes: input.len() }.into());
            }
            Lifecycle::Failed => return Err(StateError::Failed.into()),
        }

        match self.drive(input, output) {
            Ok(step) => {
                if step.done {
                    self.lifecycle = Lifecycle::Done;
                    #[cfg(feature = "tracing")]
                    logging::debug_job!(kind = %self.kind(), "job done");
                }
                Ok(step)
            }
            Err(err) => {
                self.lifecycle = Lifecycle::Failed;
                #[cfg(feature = "tracing")]
                logging::debug_job!(kind = %self.kind(), error = %err, "job failed");
                Err(err)
            }
        }
    }

    fn drive(&mut self, input: &[u8], output: &mut Vec<u8>) -> JobResult<Step> {
        let eof = input.is_empty();
        let mut consumed = 0;
        let mut produced = 0;

        loop {
            let mut buffers = Buffers::new(&input[consumed..], eof, &mut output[produced..]);
            let avail_in = buffers.avail_in();
            let avail_out = buffers.avail_out();
            let status = self.variant.iterate(&mut buffers)?;
            let used = buffers.consumed();
            let written = buffers.written();
            consumed += used;
            produced += written;

            match status {
                Status::Done | Status::Blocked => {
                    if used == 0 && written == 0 && avail_in > 0 && avail_out > 0 {
                        return Err(JobError::internal(format!(
                            "{} job made no progress with {avail_in} bytes of input and \
                             {avail_out} bytes of output space",
                            self.kind()
                        )));
                    }
                    return Ok(Step {
                        done: status == Status::Done,
                        unused_input: input.len() - consumed,
                        produced,
                    });
                }
                Status::Running => {
                    if produced < output.len() {
                        return Err(JobError::internal(format!(
                            "{} job stopped with {} bytes of output space left",
                            self.kind(),
                            output.len() - produced
                        )));
                    }
                    let grown = self.config.grown_len(output.len());
                    #[cfg(feature = "tracing")]
                    logging::trace_job!(
                        kind = %self.kind(),
                        from = output.len(),
                        to = grown,
                        "growing output buffer"
                    );
                    output.resize(grown, 0);
                }
            }
        }
    }
}

impl fmt::Debug for Job<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job")
            .field("kind", &self.kind())
            .field("lifecycle", &self.lifecycle)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Starts a signature job.
///
/// `file_size` is the size of the basis when known. `strong_len` of `None`
/// or `Some(0)` selects the full digest width. Returns the job and the
/// layout it will write.
pub fn begin_signature(
    file_size: Option<u64>,
    strong_len: Option<usize>,
) -> JobResult<(Job<'static>, SignatureLayout)> {
    let strong_length = match strong_len {
        None => StrongLength::Full,
        Some(requested) => StrongLength::from_override(requested).map_err(|requested| {
            let algorithm = SignatureAlgorithm::default();
            LayoutError::StrongLengthTooLarge {
                requested,
                max: algorithm.digest_len(),
                algorithm,
            }
        })?,
    };
    begin_signature_with(
        SignatureOptions::new()
            .file_size(file_size)
            .strong_length(strong_length),
    )
}

/// Starts a signature job with full control over the layout.
#[cfg_attr(feature = "tracing", instrument(skip_all, name = "begin_signature"))]
pub fn begin_signature_with(
    options: SignatureOptions,
) -> JobResult<(Job<'static>, SignatureLayout)> {
    let layout = SignatureLayout::recommend(options)?;
    #[cfg(feature = "tracing")]
    logging::debug_signature!(
        algorithm = ?layout.algorithm(),
        block_len = layout.block_len(),
        strong_len = layout.strong_len(),
        "signature layout selected"
    );
    let job = Job::new(Variant::Signature(Machine::new(GenerateSignature::new(
        layout,
    ))));
    Ok((job, layout))
}

/// Starts a job that loads a signature stream into the returned
/// [`Signature`].
#[must_use]
pub fn begin_load_signature() -> (Job<'static>, Signature) {
    let (signature, slot) = Signature::new();
    let job = Job::new(Variant::LoadSignature(Machine::new(LoadSignature::new(
        slot,
    ))));
    (job, signature)
}

/// Starts a delta job against a signature whose hash table is built.
pub fn begin_create_delta(signature: &Signature) -> JobResult<Job<'_>> {
    let index = signature.index()?;
    Ok(Job::new(Variant::Delta(Machine::new(ComputeDelta::new(
        index,
    )))))
}

/// Starts a patch job that copies basis bytes from `source`.
pub fn begin_patch<'a, S>(source: S) -> Job<'a>
where
    S: BasisSource + Send + 'a,
{
    Job::new(Variant::Patch(Machine::new(ApplyPatch::new(Box::new(
        source,
    )))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineCode;
    use core::num::NonZeroUsize;

    fn run(job: &mut Job<'_>, input: &[u8], chunk: usize) -> Vec<u8> {
        let mut out = Vec::new();
        let mut buf = vec![0u8; 1];
        for piece in input.chunks(chunk) {
            let step = job.step(piece, &mut buf).unwrap();
            assert_eq!(step.unused_input, 0);
            out.extend_from_slice(&buf[..step.produced]);
        }
        let step = job.step(b"", &mut buf).unwrap();
        assert!(step.done);
        out.extend_from_slice(&buf[..step.produced]);
        out
    }

    #[test]
    fn full_cycle_reconstructs_new_data() {
        let basis: Vec<u8> = (0..5000u32).map(|i| (i % 251) as u8).collect();
        let mut new = basis.clone();
        new[2500..2510].copy_from_slice(b"0123456789");

        let (mut job, layout) = begin_signature(Some(basis.len() as u64), None).unwrap();
        assert_eq!(layout.block_len(), 256);
        let sig = run(&mut job, &basis, 700);

        let (mut loader, mut signature) = begin_load_signature();
        run(&mut loader, &sig, 33);
        signature.build_hash_table().unwrap();

        let mut delta_job = begin_create_delta(&signature).unwrap();
        let delta = run(&mut delta_job, &new, 1024);
        let stats = delta_job.command_stats().unwrap();
        assert!(stats.copy_bytes > 0);
        assert!(stats.literal_bytes < new.len() as u64);

        let mut patch = begin_patch(basis.as_slice());
        assert_eq!(run(&mut patch, &delta, 100), new);
    }

    #[test]
    fn output_grows_to_io_buffer_size() {
        let (mut job, _) = begin_signature(Some(1 << 20), None).unwrap();
        let mut output = Vec::new();
        let step = job.step(&[7u8; 4096], &mut output).unwrap();
        assert!(!step.done);
        assert_eq!(output.len(), crate::IO_BUFFER_SIZE);
        assert!(step.produced > 0);
    }

    #[test]
    fn custom_io_buffer_size_bounds_growth() {
        let config = JobConfig::new().with_io_buffer_size(NonZeroUsize::new(8).unwrap());
        let (job, _) = begin_signature(None, None).unwrap();
        let mut job = job.with_config(config);
        let mut output = Vec::new();
        let step = job.step(b"", &mut output).unwrap();
        assert!(step.done);
        assert_eq!(step.produced, 12);
        assert_eq!(output.len(), 16);
    }

    #[test]
    fn finished_job_accepts_only_empty_input() {
        let (mut job, _) = begin_signature(None, None).unwrap();
        let mut output = Vec::new();
        assert!(job.step(b"", &mut output).unwrap().done);
        assert_eq!(
            job.step(b"", &mut output).unwrap(),
            Step {
                done: true,
                unused_input: 0,
                produced: 0
            }
        );
        assert!(matches!(
            job.step(b"x", &mut output),
            Err(JobError::State(StateError::TrailingInput { bytes: 1 }))
        ));
    }

    #[test]
    fn failed_job_is_poisoned() {
        let mut job = begin_patch(Vec::<u8>::new());
        let mut output = vec![0u8; 16];
        let err = job.step(b"junkjunk", &mut output).unwrap_err();
        assert_eq!(err.code(), Some(EngineCode::BadMagic));
        assert!(matches!(
            job.step(b"", &mut output),
            Err(JobError::State(StateError::Failed))
        ));
    }

    #[test]
    fn delta_requires_built_signature() {
        let (_loader, signature) = begin_load_signature();
        assert!(matches!(
            begin_create_delta(&signature),
            Err(JobError::State(StateError::HashTableNotBuilt))
        ));
    }

    #[test]
    fn oversized_strong_length_is_configuration_error() {
        assert!(matches!(
            begin_signature(None, Some(17)),
            Err(JobError::Configuration(_))
        ));
        assert!(matches!(
            begin_signature(None, Some(4096)),
            Err(JobError::Configuration(_))
        ));
    }

    #[test]
    fn zero_strong_length_selects_full_digest() {
        let (_, layout) = begin_signature(None, Some(0)).unwrap();
        assert_eq!(layout.strong_len(), 16);
        assert_eq!(layout.block_len(), 2048);
    }

    #[test]
    fn jobs_are_send() {
        fn assert_send<T: Send>() {}
        assert_send::<Job<'static>>();
        assert_send::<Signature>();
    }
}
