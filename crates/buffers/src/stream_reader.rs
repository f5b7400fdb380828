//! Sequential reader over any `std::io::Read` source.

use std::io::Read;

use crate::{BufferError, Cursor};

/// A stream over an [`std::io::Read`] source whose end is unknown until it
/// is hit.
///
/// `remaining()` is always `None`, so envelope decoders never apply the
/// truncation policy on top of it; a record cut short by end of input is a
/// [`BufferError::ShortRead`] instead.
pub struct StreamReader<R> {
    inner: R,
    /// Bytes consumed so far.
    x: u64,
}

impl<R: Read> StreamReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, x: 0 }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Cursor for StreamReader<R> {
    fn read(&mut self, n: usize) -> Result<Vec<u8>, BufferError> {
        let start = self.x;
        // `take` keeps a bogus length field from allocating up front.
        let mut buf = Vec::new();
        let got = (&mut self.inner).take(n as u64).read_to_end(&mut buf)?;
        self.x += got as u64;
        if got < n {
            return Err(BufferError::ShortRead {
                wanted: n as u64,
                got: got as u64,
                at: start,
            });
        }
        Ok(buf)
    }

    fn remaining(&self) -> Option<u64> {
        None
    }

    fn position(&self) -> u64 {
        self.x
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_sequentially() {
        let data: &[u8] = &[1, 2, 3, 4, 5];
        let mut stream = StreamReader::new(data);
        assert_eq!(stream.read(2).unwrap(), [1, 2]);
        assert_eq!(stream.read(3).unwrap(), [3, 4, 5]);
        assert_eq!(stream.position(), 5);
        assert_eq!(stream.remaining(), None);
    }

    #[test]
    fn test_short_read_advances_past_partial() {
        let data: &[u8] = &[1, 2, 3];
        let mut stream = StreamReader::new(data);
        let err = stream.read(8).unwrap_err();
        assert!(err.is_short_read());
        assert_eq!(stream.position(), 3);
    }

    #[test]
    fn test_read_rest_is_unbounded() {
        let data: &[u8] = &[1];
        let mut stream = StreamReader::new(data);
        assert!(matches!(
            stream.read_rest(),
            Err(BufferError::Unbounded { at: 0 })
        ));
    }
}
