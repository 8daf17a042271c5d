//! Random-access readers for the basis a patch copies from.

use std::io::{self, Read, Seek, SeekFrom};

/// Pull interface used by patch jobs to fetch basis bytes.
///
/// `read_at` fills a prefix of `buf` with the bytes starting at `offset` and
/// returns how many it wrote. A short count is fine: the job asks again for
/// the remainder at `offset + count`. Returning `Ok(0)` while the job still
/// needs bytes means the basis ended early and fails the patch. Reporting
/// more bytes than `buf.len()` is a protocol violation.
pub trait BasisSource {
    /// Reads basis bytes starting at `offset` into `buf`.
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<usize>;
}

impl<F> BasisSource for F
where
    F: FnMut(u64, &mut [u8]) -> io::Result<usize>,
{
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        self(offset, buf)
    }
}

impl BasisSource for &[u8] {
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        Ok(copy_from_slice_at(self, offset, buf))
    }
}

impl BasisSource for Vec<u8> {
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        Ok(copy_from_slice_at(self, offset, buf))
    }
}

fn copy_from_slice_at(data: &[u8], offset: u64, buf: &mut [u8]) -> usize {
    let Ok(start) = usize::try_from(offset) else {
        return 0;
    };
    let Some(available) = data.get(start..) else {
        return 0;
    };
    let n = available.len().min(buf.len());
    buf[..n].copy_from_slice(&available[..n]);
    n
}

/// Basis backed by a seekable reader such as a [`File`](std::fs::File).
///
/// The reader position is tracked so sequential copies do not seek.
#[derive(Debug)]
pub struct SeekSource<R> {
    inner: R,
    position: Option<u64>,
}

impl<R: Read + Seek> SeekSource<R> {
    /// Wraps `inner`.
    pub const fn new(inner: R) -> Self {
        Self {
            inner,
            position: None,
        }
    }

    /// Returns the wrapped reader.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read + Seek> BasisSource for SeekSource<R> {
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        if self.position != Some(offset) {
            self.position = None;
            self.inner.seek(SeekFrom::Start(offset))?;
        }

        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => {
                    self.position = None;
                    return Err(err);
                }
            }
        }
        self.position = Some(offset + filled as u64);
        Ok(filled)
    }
}
