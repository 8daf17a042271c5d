//! State machines behind each job variant.
//!
//! Every machine advances in small steps against a [`Buffers`] pair. Bytes
//! a step emits go to the [`Tube`] first and are drained into the caller's
//! output before the machine is advanced again, so a step never has to
//! care how much output space is left.

mod delta;
mod generate;
mod load;
mod patch;

pub(crate) use delta::ComputeDelta;
pub(crate) use generate::GenerateSignature;
pub(crate) use load::LoadSignature;
pub(crate) use patch::ApplyPatch;

use crate::buffers::Buffers;
use crate::error::{EngineCode, JobError, JobResult};
use crate::tube::Tube;

/// Outcome of one state machine step.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Advance {
    /// Progress was made; step again.
    Continue,
    /// More input is required.
    NeedInput,
    /// The step writes straight to the output and none is left.
    OutputFull,
    /// The stream is complete once the tube drains.
    Finished,
}

/// Result of running a machine until it cannot continue.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Status {
    Done,
    Blocked,
    Running,
}

pub(crate) trait Stage {
    fn advance(&mut self, buffers: &mut Buffers<'_>, tube: &mut Tube) -> JobResult<Advance>;
}

/// Collects input until `scoop` holds `want` bytes.
fn fill(scoop: &mut Vec<u8>, buffers: &mut Buffers<'_>, want: usize) -> bool {
    let missing = want.saturating_sub(scoop.len());
    scoop.extend_from_slice(buffers.take_input(missing));
    scoop.len() == want
}

/// A stage plus its pending output.
#[derive(Debug)]
pub(crate) struct Machine<S> {
    stage: S,
    tube: Tube,
    finished: bool,
}

impl<S: Stage> Machine<S> {
    pub(crate) fn new(stage: S) -> Self {
        Self {
            stage,
            tube: Tube::default(),
            finished: false,
        }
    }

    pub(crate) const fn stage(&self) -> &S {
        &self.stage
    }

    /// Runs the machine until it completes, starves for input, or fills
    /// the output.
    pub(crate) fn iterate(&mut self, buffers: &mut Buffers<'_>) -> JobResult<Status> {
        loop {
            self.tube.drain_into(buffers);
            if !self.tube.is_empty() {
                return Ok(Status::Running);
            }
            if self.finished {
                return Ok(Status::Done);
            }
            match self.stage.advance(buffers, &mut self.tube)? {
                Advance::Continue => {}
                Advance::NeedInput if buffers.input_ended() => {
                    return Err(JobError::engine(
                        EngineCode::InputEnded,
                        "job needs more input after end of stream",
                    ));
                }
                Advance::NeedInput => return Ok(Status::Blocked),
                Advance::OutputFull => return Ok(Status::Running),
                Advance::Finished => self.finished = true,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Emits `count` copies of a byte, one per step, then finishes at end
    /// of input.
    struct Repeat {
        count: usize,
    }

    impl Stage for Repeat {
        fn advance(&mut self, buffers: &mut Buffers<'_>, tube: &mut Tube) -> JobResult<Advance> {
            if self.count > 0 {
                self.count -= 1;
                tube.put(b"xy");
                return Ok(Advance::Continue);
            }
            buffers.take_input(usize::MAX);
            if buffers.input_ended() {
                Ok(Advance::Finished)
            } else {
                Ok(Advance::NeedInput)
            }
        }
    }

    #[test]
    fn reports_running_when_tube_cannot_drain() {
        let mut machine = Machine::new(Repeat { count: 3 });
        let mut out = [0u8; 3];
        let mut buffers = Buffers::new(b"", true, &mut out);
        assert_eq!(machine.iterate(&mut buffers).unwrap(), Status::Running);
        assert_eq!(buffers.written(), 3);

        let mut out = [0u8; 8];
        let mut buffers = Buffers::new(b"", true, &mut out);
        assert_eq!(machine.iterate(&mut buffers).unwrap(), Status::Done);
        assert_eq!(buffers.written(), 3);
    }

    #[test]
    fn blocks_without_end_of_input() {
        let mut machine = Machine::new(Repeat { count: 0 });
        let mut out = [0u8; 8];
        let mut buffers = Buffers::new(b"abc", false, &mut out);
        assert_eq!(machine.iterate(&mut buffers).unwrap(), Status::Blocked);
        assert_eq!(buffers.consumed(), 3);
    }

    struct Starved;

    impl Stage for Starved {
        fn advance(&mut self, _: &mut Buffers<'_>, _: &mut Tube) -> JobResult<Advance> {
            Ok(Advance::NeedInput)
        }
    }

    #[test]
    fn needing_input_after_end_of_stream_fails() {
        let mut machine = Machine::new(Starved);
        let mut out = [0u8; 8];
        let mut buffers = Buffers::new(b"", true, &mut out);
        let err = machine.iterate(&mut buffers).unwrap_err();
        assert_eq!(err.code(), Some(EngineCode::InputEnded));
    }
}
