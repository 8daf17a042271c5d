//! crates/engine/src/jobs/delta.rs
//!
//! Delta computation against a built signature index.
//!
//! A block-sized window rolls over the buffered input. Bytes the window
//! slides past become literal data; a window whose weak and strong sums
//! match an indexed block becomes a copy. At end of input the window
//! shrinks from the front so a short final block of the basis can still
//! match the tail of the new data.

use checksums::RollingChecksum;
use signature::SignatureIndex;

use super::{Advance, Stage};
use crate::buffers::Buffers;
use crate::command::{self, Command, CommandStats};
use crate::error::{JobError, JobResult};
use crate::tube::Tube;

/// Literal runs are flushed once they reach this many bytes.
const MAX_LITERAL_RUN: usize = 32 * 1024;
/// Minimum number of input bytes absorbed into the scoop at once.
const MIN_SCOOP_READ: usize = 16 * 1024;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Phase {
    Header,
    Scan,
    Tail,
    End,
}

#[derive(Debug)]
pub(crate) struct ComputeDelta<'a> {
    index: &'a SignatureIndex,
    phase: Phase,
    scoop: Vec<u8>,
    /// Start of the window within `scoop`.
    pos: usize,
    /// Start of the pending literal run; always `<= pos`.
    literal_start: usize,
    rolling: RollingChecksum,
    /// `rolling` covers the window starting at `pos`.
    window_valid: bool,
    /// The current window has been looked up.
    checked: bool,
    pending_copy: Option<(u64, u64)>,
    stats: CommandStats,
}

impl<'a> ComputeDelta<'a> {
    pub(crate) fn new(index: &'a SignatureIndex) -> Self {
        Self {
            index,
            phase: Phase::Header,
            scoop: Vec::new(),
            pos: 0,
            literal_start: 0,
            rolling: RollingChecksum::new(),
            window_valid: false,
            checked: false,
            pending_copy: None,
            stats: CommandStats::default(),
        }
    }

    pub(crate) const fn stats(&self) -> CommandStats {
        self.stats
    }

    fn emit(&mut self, command: Command, tube: &mut Tube) {
        command::encode(command, tube.buffer_mut());
        self.stats.record(command);
    }

    fn flush_copy(&mut self, tube: &mut Tube) {
        if let Some((offset, len)) = self.pending_copy.take() {
            self.emit(Command::Copy { offset, len }, tube);
        }
    }

    fn flush_literal(&mut self, tube: &mut Tube) {
        if self.pos == self.literal_start {
            return;
        }
        self.flush_copy(tube);
        let len = (self.pos - self.literal_start) as u64;
        self.emit(Command::Literal(len), tube);
        tube.put(&self.scoop[self.literal_start..self.pos]);
        self.literal_start = self.pos;
    }

    fn queue_copy(&mut self, offset: u64, len: u64, tube: &mut Tube) {
        if let Some((start, pending)) = self.pending_copy.as_mut() {
            if *start + *pending == offset {
                *pending += len;
                return;
            }
        }
        self.flush_copy(tube);
        self.pending_copy = Some((offset, len));
    }

    /// Looks the current window up and turns a hit into a copy command.
    fn try_match(&mut self, window_len: usize, tube: &mut Tube) -> bool {
        self.checked = true;
        let window = &self.scoop[self.pos..self.pos + window_len];
        let Some(block) = self.index.find(self.rolling.value(), window) else {
            return false;
        };
        let offset = self.index.offset_of(block);
        self.flush_literal(tube);
        self.queue_copy(offset, window_len as u64, tube);
        self.pos += window_len;
        self.literal_start = self.pos;
        self.window_valid = false;
        true
    }

    /// Scans full-length windows; returns `true` once something was emitted
    /// and `false` when the scoop holds no further full window.
    fn scan(&mut self, tube: &mut Tube) -> JobResult<bool> {
        let block_len = self.index.block_len();
        loop {
            if self.pos + block_len > self.scoop.len() {
                return Ok(false);
            }
            if !self.window_valid {
                self.rolling
                    .update_from_block(&self.scoop[self.pos..self.pos + block_len]);
                self.window_valid = true;
                self.checked = false;
            }
            if !self.checked && self.try_match(block_len, tube) {
                return Ok(true);
            }
            if self.pos - self.literal_start >= MAX_LITERAL_RUN {
                self.flush_literal(tube);
                return Ok(true);
            }
            if self.pos + block_len >= self.scoop.len() {
                return Ok(false);
            }
            let outgoing = self.scoop[self.pos];
            let incoming = self.scoop[self.pos + block_len];
            self.rolling
                .roll(outgoing, incoming)
                .map_err(|err| JobError::internal(err.to_string()))?;
            self.pos += 1;
            self.checked = false;
        }
    }

    /// Shrinks the window over the end of the input.
    fn scan_tail(&mut self, tube: &mut Tube) -> JobResult<bool> {
        loop {
            let remaining = self.scoop.len() - self.pos;
            if remaining == 0 {
                return Ok(false);
            }
            if !self.window_valid {
                self.rolling.update_from_block(&self.scoop[self.pos..]);
                self.window_valid = true;
                self.checked = false;
            }
            if !self.checked && self.try_match(remaining, tube) {
                return Ok(true);
            }
            if self.pos - self.literal_start >= MAX_LITERAL_RUN {
                self.flush_literal(tube);
                return Ok(true);
            }
            self.rolling
                .roll_out(self.scoop[self.pos])
                .map_err(|err| JobError::internal(err.to_string()))?;
            self.pos += 1;
            self.checked = false;
        }
    }

    /// Drops bytes that are no longer part of a literal run or the window,
    /// then appends fresh input.
    fn absorb(&mut self, buffers: &mut Buffers<'_>) {
        if self.literal_start > 0 {
            self.scoop.drain(..self.literal_start);
            self.pos -= self.literal_start;
            self.literal_start = 0;
        }
        let want = (4 * self.index.block_len()).max(MIN_SCOOP_READ);
        self.scoop.extend_from_slice(buffers.take_input(want));
    }
}

impl Stage for ComputeDelta<'_> {
    fn advance(&mut self, buffers: &mut Buffers<'_>, tube: &mut Tube) -> JobResult<Advance> {
        match self.phase {
            Phase::Header => {
                command::encode_magic(tube.buffer_mut());
                self.phase = Phase::Scan;
                Ok(Advance::Continue)
            }
            Phase::Scan => {
                if self.scan(tube)? {
                    return Ok(Advance::Continue);
                }
                if buffers.avail_in() > 0 {
                    self.absorb(buffers);
                    return Ok(Advance::Continue);
                }
                if buffers.input_ended() {
                    self.phase = Phase::Tail;
                    return Ok(Advance::Continue);
                }
                Ok(Advance::NeedInput)
            }
            Phase::Tail => {
                if self.scan_tail(tube)? {
                    return Ok(Advance::Continue);
                }
                self.flush_literal(tube);
                self.flush_copy(tube);
                self.phase = Phase::End;
                Ok(Advance::Continue)
            }
            Phase::End => {
                self.emit(Command::End, tube);
                #[cfg(feature = "tracing")]
                logging::debug_delta!(
                    literal_commands = self.stats.literal_commands,
                    literal_bytes = self.stats.literal_bytes,
                    copy_commands = self.stats.copy_commands,
                    copy_bytes = self.stats.copy_bytes,
                    "delta complete"
                );
                Ok(Advance::Finished)
            }
        }
    }
}
