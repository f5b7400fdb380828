//! In-memory byte stream with cursor tracking.

use crate::{BufferError, Cursor};

/// A size-aware stream over a byte slice.
///
/// Unlike [`crate::StreamReader`], a `Reader` always knows how many bytes
/// are left, which lets envelope decoders detect truncated records.
///
/// # Example
///
/// ```
/// use ipts_buffers::{Cursor, Reader};
///
/// let data = [0x01, 0x02, 0x03, 0x04];
/// let mut reader = Reader::new(&data);
///
/// assert_eq!(reader.read(2).unwrap(), [0x01, 0x02]);
/// assert_eq!(reader.remaining(), Some(2));
/// ```
pub struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Bytes not yet consumed.
    pub fn size(&self) -> usize {
        self.bytes.len() - self.pos
    }

    /// True once every byte has been consumed.
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }
}

impl Cursor for Reader<'_> {
    fn read(&mut self, n: usize) -> Result<Vec<u8>, BufferError> {
        let start = self.pos;
        let got = n.min(self.size());
        self.pos += got;
        if got < n {
            return Err(BufferError::ShortRead {
                wanted: n as u64,
                got: got as u64,
                at: start as u64,
            });
        }
        Ok(self.bytes[start..self.pos].to_vec())
    }

    fn remaining(&self) -> Option<u64> {
        Some(self.size() as u64)
    }

    fn position(&self) -> u64 {
        self.pos as u64
    }
}
