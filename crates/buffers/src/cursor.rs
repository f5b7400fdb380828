//! The cursor abstraction every decoder reads through.

use crate::BufferError;

/// A positioned view over a byte stream.
///
/// Streams ([`crate::Reader`], [`crate::StreamReader`]) and bounded scopes
/// ([`crate::Block`]) share this interface so a record decoder does not care
/// whether it runs at top level or deep inside a nested scope.
pub trait Cursor {
    /// Returns the next `n` bytes and advances the position.
    ///
    /// Streams fail with [`BufferError::ShortRead`] when they run dry (the
    /// position still advances past whatever was consumed). Scopes fail with
    /// [`BufferError::OutOfBounds`] before consuming anything.
    fn read(&mut self, n: usize) -> Result<Vec<u8>, BufferError>;

    /// Bytes left before the end of this cursor, or `None` when the end is
    /// not known (an unbounded stream).
    fn remaining(&self) -> Option<u64>;

    /// Absolute offset in the underlying stream.
    fn position(&self) -> u64;

    /// Reads whatever is left. Fails with [`BufferError::Unbounded`] when
    /// the cursor has no known end.
    fn read_rest(&mut self) -> Result<Vec<u8>, BufferError> {
        match self.remaining() {
            Some(n) => self.read(n as usize),
            None => Err(BufferError::Unbounded {
                at: self.position(),
            }),
        }
    }
}
