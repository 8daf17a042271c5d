//! Cursors over the caller's input and output slices for one engine pass.

/// Input and output windows handed to a job state machine.
///
/// Jobs only move data through these cursors, so the driver can read back
/// how much was consumed and produced after each pass.
#[derive(Debug)]
pub(crate) struct Buffers<'a> {
    input: &'a [u8],
    consumed: usize,
    eof: bool,
    output: &'a mut [u8],
    written: usize,
}

impl<'a> Buffers<'a> {
    pub(crate) fn new(input: &'a [u8], eof: bool, output: &'a mut [u8]) -> Self {
        Self {
            input,
            consumed: 0,
            eof,
            output,
            written: 0,
        }
    }

    #[inline]
    pub(crate) fn avail_in(&self) -> usize {
        self.input.len() - self.consumed
    }

    #[inline]
    pub(crate) fn avail_out(&self) -> usize {
        self.output.len() - self.written
    }

    /// Reports whether the caller signalled end of input and every input
    /// byte has been consumed.
    #[inline]
    pub(crate) fn input_ended(&self) -> bool {
        self.eof && self.avail_in() == 0
    }

    /// Consumes up to `max` input bytes.
    pub(crate) fn take_input(&mut self, max: usize) -> &'a [u8] {
        let input: &'a [u8] = self.input;
        let n = max.min(self.avail_in());
        let taken = &input[self.consumed..self.consumed + n];
        self.consumed += n;
        taken
    }

    /// Copies as much of `data` as fits into the output and returns the
    /// number of bytes written.
    pub(crate) fn write(&mut self, data: &[u8]) -> usize {
        let n = data.len().min(self.avail_out());
        self.output[self.written..self.written + n].copy_from_slice(&data[..n]);
        self.written += n;
        n
    }

    /// Returns up to `max` bytes of unfilled output for direct writes.
    ///
    /// Bytes only count as produced once [`commit_output`](Self::commit_output)
    /// is called.
    pub(crate) fn output_window(&mut self, max: usize) -> &mut [u8] {
        let n = max.min(self.avail_out());
        &mut self.output[self.written..self.written + n]
    }

    pub(crate) fn commit_output(&mut self, n: usize) {
        debug_assert!(n <= self.avail_out());
        self.written += n;
    }

    #[inline]
    pub(crate) fn consumed(&self) -> usize {
        self.consumed
    }

    #[inline]
    pub(crate) fn written(&self) -> usize {
        self.written
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_input_is_bounded_by_availability() {
        let mut out = [0u8; 0];
        let mut buffers = Buffers::new(b"abcdef", false, &mut out);
        assert_eq!(buffers.take_input(4), b"abcd");
        assert_eq!(buffers.take_input(4), b"ef");
        assert_eq!(buffers.take_input(4), b"");
        assert_eq!(buffers.consumed(), 6);
        assert!(!buffers.input_ended());
    }

    #[test]
    fn input_ends_only_when_drained() {
        let mut out = [0u8; 0];
        let buffers = Buffers::new(b"", true, &mut out);
        assert!(buffers.input_ended());
    }

    #[test]
    fn write_truncates_to_available_space() {
        let mut out = [0u8; 3];
        let mut buffers = Buffers::new(b"", false, &mut out);
        assert_eq!(buffers.write(b"xy"), 2);
        assert_eq!(buffers.write(b"zw"), 1);
        assert_eq!(buffers.avail_out(), 0);
        assert_eq!(buffers.written(), 3);
        assert_eq!(&out, b"xyz");
    }

    #[test]
    fn output_window_requires_commit() {
        let mut out = [0u8; 4];
        let mut buffers = Buffers::new(b"", false, &mut out);
        buffers.output_window(8)[..2].copy_from_slice(b"hi");
        assert_eq!(buffers.written(), 0);
        buffers.commit_output(2);
        assert_eq!(buffers.output_window(8).len(), 2);
        assert_eq!(&out[..2], b"hi");
    }
}
