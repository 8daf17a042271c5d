//! A job paired with its own output buffer.

use crate::error::{JobResult, StateError};
use crate::job::Job;

/// Drives a [`Job`] one input chunk at a time and hands back the bytes each
/// chunk produced.
///
/// Input the job leaves unconsumed is carried over and presented again in
/// front of the next chunk. Input arriving after the job finished is an
/// error.
#[derive(Debug)]
pub struct StreamingJob<'a> {
    job: Job<'a>,
    output: Vec<u8>,
    ready: Vec<u8>,
    carry: Vec<u8>,
}

impl<'a> StreamingJob<'a> {
    /// Wraps `job` with an output buffer of the job's I/O buffer size.
    #[must_use]
    pub fn new(job: Job<'a>) -> Self {
        let capacity = job.config().io_buffer_size();
        Self::with_output_capacity(job, capacity)
    }

    /// Wraps `job` with an output buffer of `capacity` bytes.
    #[must_use]
    pub fn with_output_capacity(job: Job<'a>, capacity: usize) -> Self {
        Self {
            job,
            output: vec![0; capacity],
            ready: Vec::new(),
            carry: Vec::new(),
        }
    }

    /// Feeds one chunk and returns the output it produced.
    ///
    /// An empty chunk ends the stream; see [`finish`](Self::finish).
    pub fn feed(&mut self, input: &[u8]) -> JobResult<&[u8]> {
        self.ready.clear();
        if self.job.is_done() {
            if input.is_empty() {
                return Ok(&self.ready);
            }
            return Err(StateError::TrailingInput { bytes: input.len() }.into());
        }

        if input.is_empty() {
            if !self.carry.is_empty() {
                let carried = std::mem::take(&mut self.carry);
                self.run(&carried)?;
            }
            if !self.job.is_done() {
                self.run(&[])?;
            }
        } else if self.carry.is_empty() {
            self.run(input)?;
        } else {
            let mut joined = std::mem::take(&mut self.carry);
            joined.extend_from_slice(input);
            self.run(&joined)?;
        }
        Ok(&self.ready)
    }

    /// Signals the end of input and returns the remaining output.
    pub fn finish(&mut self) -> JobResult<&[u8]> {
        self.feed(&[])
    }

    /// Reports whether the job has produced all of its output.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.job.is_done()
    }

    /// Returns the wrapped job.
    #[must_use]
    pub const fn job(&self) -> &Job<'a> {
        &self.job
    }

    /// Unwraps the job.
    #[must_use]
    pub fn into_job(self) -> Job<'a> {
        self.job
    }

    fn run(&mut self, input: &[u8]) -> JobResult<()> {
        let step = self.job.step(input, &mut self.output)?;
        self.ready.extend_from_slice(&self.output[..step.produced]);
        let unused = &input[input.len() - step.unused_input..];
        if unused.is_empty() {
            return Ok(());
        }
        if step.done {
            return Err(StateError::TrailingInput {
                bytes: unused.len(),
            }
            .into());
        }
        self.carry.extend_from_slice(unused);
        Ok(())
    }
}
