//! Bounded scopes nested inside a cursor.

use crate::{BufferError, Cursor};

/// A byte range of declared size opened at the current position of a parent
/// cursor.
///
/// Reads go through the parent, so consumption is visible to the parent as
/// soon as it happens. A scope must be closed with [`Block::close`] after a
/// successful decode, which fails unless every declared byte was consumed.
/// Early returns via `?` simply drop the block without the check.
///
/// ```
/// use ipts_buffers::{Block, Cursor, Reader};
///
/// let data = [1u8, 2, 3, 4];
/// let mut reader = Reader::new(&data);
/// let mut block = Block::open(&mut reader, 3).unwrap();
/// assert_eq!(block.read(3).unwrap(), [1, 2, 3]);
/// block.close().unwrap();
/// assert_eq!(reader.remaining(), Some(1));
/// ```
pub struct Block<'a> {
    parent: &'a mut dyn Cursor,
    start: u64,
    size: u64,
}

impl<'a> Block<'a> {
    /// Opens a scope of `size` bytes at the parent's position.
    ///
    /// Fails with [`BufferError::OutOfBounds`] when the parent knows its
    /// remaining byte count and `size` exceeds it. A parent without a known
    /// end (an unbounded stream) accepts any size.
    pub fn open(parent: &'a mut dyn Cursor, size: u64) -> Result<Self, BufferError> {
        let start = parent.position();
        if let Some(available) = parent.remaining() {
            if size > available {
                return Err(BufferError::OutOfBounds {
                    wanted: size,
                    available,
                    at: start,
                });
            }
        }
        Ok(Self {
            parent,
            start,
            size,
        })
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn end(&self) -> u64 {
        self.start + self.size
    }

    /// Bytes left in this scope.
    pub fn left(&self) -> u64 {
        self.end().saturating_sub(self.parent.position())
    }

    /// Reads and drops whatever is left in the scope.
    pub fn discard_rest(&mut self) -> Result<(), BufferError> {
        let left = self.left();
        self.read(left as usize)?;
        Ok(())
    }

    /// Ends the scope, failing with [`BufferError::TrailingBytes`] if any
    /// declared byte was left unread.
    pub fn close(self) -> Result<(), BufferError> {
        let remaining = self.left();
        if remaining != 0 {
            return Err(BufferError::TrailingBytes {
                remaining,
                at: self.parent.position(),
                start: self.start,
                size: self.size,
            });
        }
        Ok(())
    }
}

impl Cursor for Block<'_> {
    fn read(&mut self, n: usize) -> Result<Vec<u8>, BufferError> {
        let available = self.left();
        if n as u64 > available {
            return Err(BufferError::OutOfBounds {
                wanted: n as u64,
                available,
                at: self.parent.position(),
            });
        }
        self.parent.read(n)
    }

    fn remaining(&self) -> Option<u64> {
        Some(self.left())
    }

    fn position(&self) -> u64 {
        self.parent.position()
    }
}
