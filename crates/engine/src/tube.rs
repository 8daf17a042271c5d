//! Output produced by a job that has not yet fit into the caller's buffer.

use crate::buffers::Buffers;

/// FIFO of encoded bytes waiting for output space.
#[derive(Debug, Default)]
pub(crate) struct Tube {
    data: Vec<u8>,
    pos: usize,
}

impl Tube {
    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.pos == self.data.len()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Queues `bytes` behind anything already pending.
    pub(crate) fn put(&mut self, bytes: &[u8]) {
        self.buffer_mut().extend_from_slice(bytes);
    }

    /// Returns the backing buffer so encoders can append in place.
    pub(crate) fn buffer_mut(&mut self) -> &mut Vec<u8> {
        if self.is_empty() {
            self.data.clear();
            self.pos = 0;
        }
        &mut self.data
    }

    /// Moves as many pending bytes as fit into the output.
    pub(crate) fn drain_into(&mut self, buffers: &mut Buffers<'_>) {
        if self.is_empty() {
            return;
        }
        self.pos += buffers.write(&self.data[self.pos..]);
        if self.is_empty() {
            self.data.clear();
            self.pos = 0;
        }
    }
}
