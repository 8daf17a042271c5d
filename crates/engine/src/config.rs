//! Buffer sizing for job steps.

use core::num::NonZeroUsize;

/// Default size of driver read buffers and the minimum size an output
/// buffer is grown to.
pub const IO_BUFFER_SIZE: usize = 64 * 1024;

const DEFAULT_IO_BUFFER_SIZE: NonZeroUsize = match NonZeroUsize::new(IO_BUFFER_SIZE) {
    Some(size) => size,
    None => panic!("IO_BUFFER_SIZE must be non-zero"),
};

/// Tunables applied when a job is stepped.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct JobConfig {
    io_buffer_size: NonZeroUsize,
}

impl JobConfig {
    /// Returns the default configuration.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            io_buffer_size: DEFAULT_IO_BUFFER_SIZE,
        }
    }

    /// Sets the I/O buffer size.
    #[must_use]
    pub const fn with_io_buffer_size(mut self, size: NonZeroUsize) -> Self {
        self.io_buffer_size = size;
        self
    }

    /// Returns the I/O buffer size in bytes.
    #[inline]
    #[must_use]
    pub const fn io_buffer_size(&self) -> usize {
        self.io_buffer_size.get()
    }

    /// Returns the length a full output buffer of `current` bytes grows to.
    ///
    /// The result is always larger than `current`.
    #[inline]
    #[must_use]
    pub const fn grown_len(&self, current: usize) -> usize {
        let doubled = current.saturating_mul(2);
        if doubled > self.io_buffer_size.get() {
            doubled
        } else {
            self.io_buffer_size.get()
        }
    }
}

impl Default for JobConfig {
    fn default() -> Self {
        Self::new()
    }
}
