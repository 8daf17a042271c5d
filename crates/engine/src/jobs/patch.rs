//! Applies a delta stream, pulling copied ranges from a [`BasisSource`].

use super::{Advance, Stage, fill};
use crate::buffers::Buffers;
use crate::command::{Command, CommandStats, DELTA_MAGIC, Opcode};
use crate::error::{EngineCode, JobError, JobResult};
use crate::source::BasisSource;
use crate::tube::Tube;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Phase {
    Magic,
    Opcode,
    Params(Opcode),
    Literal { remaining: u64 },
    Copy { offset: u64, remaining: u64 },
}

pub(crate) struct ApplyPatch<'a> {
    source: Box<dyn BasisSource + Send + 'a>,
    phase: Phase,
    scoop: Vec<u8>,
    stats: CommandStats,
}

impl<'a> ApplyPatch<'a> {
    pub(crate) fn new(source: Box<dyn BasisSource + Send + 'a>) -> Self {
        Self {
            source,
            phase: Phase::Magic,
            scoop: Vec::with_capacity(16),
            stats: CommandStats::default(),
        }
    }

    pub(crate) const fn stats(&self) -> CommandStats {
        self.stats
    }

    fn begin(&mut self, command: Command) -> JobResult<Advance> {
        if let Command::Copy { offset, len } = command {
            if offset.checked_add(len).is_none() {
                return Err(JobError::engine(
                    EngineCode::Corrupt,
                    format!("copy of {len} bytes at offset {offset} overflows the basis range"),
                ));
            }
        }
        self.stats.record(command);
        match command {
            Command::End => {
                #[cfg(feature = "tracing")]
                logging::debug_patch!(
                    literal_bytes = self.stats.literal_bytes,
                    copy_bytes = self.stats.copy_bytes,
                    "patch complete"
                );
                return Ok(Advance::Finished);
            }
            Command::Literal(len) => self.phase = Phase::Literal { remaining: len },
            Command::Copy { offset, len } => {
                self.phase = Phase::Copy {
                    offset,
                    remaining: len,
                };
            }
        }
        Ok(Advance::Continue)
    }

    fn copy(
        &mut self,
        buffers: &mut Buffers<'_>,
        offset: u64,
        remaining: u64,
    ) -> JobResult<Advance> {
        if remaining == 0 {
            self.phase = Phase::Opcode;
            return Ok(Advance::Continue);
        }
        if buffers.avail_out() == 0 {
            return Ok(Advance::OutputFull);
        }

        let requested = usize::try_from(remaining).map_or(buffers.avail_out(), |remaining| {
            remaining.min(buffers.avail_out())
        });
        let window = buffers.output_window(requested);
        let returned = self.source.read_at(offset, window).map_err(JobError::Io)?;
        if returned > requested {
            return Err(JobError::Protocol {
                requested,
                returned,
            });
        }
        if returned == 0 {
            return Err(JobError::engine(
                EngineCode::InputEnded,
                format!("basis ended at offset {offset} with {remaining} bytes left to copy"),
            ));
        }

        buffers.commit_output(returned);
        let remaining = remaining - returned as u64;
        self.phase = if remaining == 0 {
            Phase::Opcode
        } else {
            Phase::Copy {
                offset: offset + returned as u64,
                remaining,
            }
        };
        Ok(Advance::Continue)
    }
}

impl Stage for ApplyPatch<'_> {
    fn advance(&mut self, buffers: &mut Buffers<'_>, _tube: &mut Tube) -> JobResult<Advance> {
        match self.phase {
            Phase::Magic => {
                if !fill(&mut self.scoop, buffers, 4) {
                    return ended_or_blocked(buffers, "delta stream ended inside its header");
                }
                let magic = u32::from_be_bytes([
                    self.scoop[0],
                    self.scoop[1],
                    self.scoop[2],
                    self.scoop[3],
                ]);
                if magic != DELTA_MAGIC {
                    return Err(JobError::engine(
                        EngineCode::BadMagic,
                        format!("expected delta magic {DELTA_MAGIC:#010x}, found {magic:#010x}"),
                    ));
                }
                self.scoop.clear();
                self.phase = Phase::Opcode;
                Ok(Advance::Continue)
            }
            Phase::Opcode => {
                let Some(&byte) = buffers.take_input(1).first() else {
                    return ended_or_blocked(buffers, "delta stream ended without an END command");
                };
                let opcode = Opcode::from_byte(byte).ok_or_else(|| {
                    JobError::engine(
                        EngineCode::Corrupt,
                        format!("unknown delta command byte {byte:#04x}"),
                    )
                })?;
                if opcode.param_len() == 0 {
                    return self.begin(opcode.command(&[]));
                }
                self.phase = Phase::Params(opcode);
                Ok(Advance::Continue)
            }
            Phase::Params(opcode) => {
                if !fill(&mut self.scoop, buffers, opcode.param_len()) {
                    return ended_or_blocked(buffers, "delta stream ended inside a command");
                }
                let command = opcode.command(&self.scoop);
                self.scoop.clear();
                self.begin(command)
            }
            Phase::Literal { remaining } => {
                if remaining == 0 {
                    self.phase = Phase::Opcode;
                    return Ok(Advance::Continue);
                }
                if buffers.avail_out() == 0 {
                    return Ok(Advance::OutputFull);
                }
                let want = usize::try_from(remaining)
                    .map_or(buffers.avail_out(), |remaining| {
                        remaining.min(buffers.avail_out())
                    });
                let data = buffers.take_input(want);
                if data.is_empty() {
                    return ended_or_blocked(buffers, "delta stream ended inside a literal");
                }
                buffers.write(data);
                self.phase = Phase::Literal {
                    remaining: remaining - data.len() as u64,
                };
                Ok(Advance::Continue)
            }
            Phase::Copy { offset, remaining } => self.copy(buffers, offset, remaining),
        }
    }
}

fn ended_or_blocked(buffers: &Buffers<'_>, message: &str) -> JobResult<Advance> {
    if buffers.input_ended() {
        Err(JobError::engine(EngineCode::InputEnded, message))
    } else {
        Ok(Advance::NeedInput)
    }
}
