//! Byte-level building blocks for decoding IPTS captures.
//!
//! - [`PrimitiveType`] / [`LePrimitive`]: fixed-width little-endian numbers.
//! - [`Cursor`]: anything positioned over a byte stream that hands out bytes.
//! - [`Reader`]: in-memory, size-aware stream.
//! - [`StreamReader`]: `std::io::Read` adapter with no known end.
//! - [`Block`]: a bounded scope nested inside another cursor.
//! - [`Writer`]: little-endian byte builder.

mod block;
mod cursor;
mod primitive;
mod reader;
mod stream_reader;
mod writer;

pub use block::Block;
pub use cursor::Cursor;
pub use primitive::{decode_all, LePrimitive, PrimitiveType, Scalar};
pub use reader::Reader;
pub use stream_reader::StreamReader;
pub use writer::Writer;

/// Failures raised while moving through a byte stream.
#[derive(Debug, thiserror::Error)]
pub enum BufferError {
    /// The underlying stream ended before `wanted` bytes could be read.
    #[error("short read: wanted {wanted} bytes at {at}, got {got}")]
    ShortRead { wanted: u64, got: u64, at: u64 },

    /// A read or nested scope asked for more bytes than the scope has left.
    #[error("cannot read {wanted} bytes at {at}, only {available} left in scope")]
    OutOfBounds { wanted: u64, available: u64, at: u64 },

    /// A scope was closed before all of its bytes were consumed.
    #[error("{remaining} unparsed bytes at {at}, block at {start} + {size}")]
    TrailingBytes {
        remaining: u64,
        at: u64,
        start: u64,
        size: u64,
    },

    /// "Read until exhausted" on a cursor that cannot report remaining bytes.
    #[error("cursor at {at} has no known end")]
    Unbounded { at: u64 },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl BufferError {
    /// True for the failure that signals the source ran dry.
    pub fn is_short_read(&self) -> bool {
        matches!(self, BufferError::ShortRead { .. })
    }
}
