//! Decode error type.

use ipts_buffers::BufferError;

/// Any failure that aborts decoding of a top-level record.
///
/// Byte-range violations (`ShortRead`, `OutOfBounds`, `TrailingBytes`) come
/// from the cursor layer and are wrapped as [`DecodeError::Buffer`].
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error(transparent)]
    Buffer(#[from] BufferError),

    /// A discriminator value that a strict dispatch layer does not know.
    #[error("unknown {layer} {value:#x} at {at}")]
    UnknownVariant {
        layer: &'static str,
        value: u64,
        at: u64,
    },

    #[error("container nesting exceeds {limit} levels at {at}")]
    DepthLimit { limit: usize, at: u64 },

    /// A dispatch step asked a record for a field its schema does not have.
    #[error("{schema} has no unsigned field `{field}`")]
    MissingField {
        schema: &'static str,
        field: &'static str,
    },

    #[error("text log line {line}: {message}")]
    TextLog { line: usize, message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl DecodeError {
    /// True when the source ran dry mid-read.
    pub fn is_short_read(&self) -> bool {
        matches!(self, DecodeError::Buffer(e) if e.is_short_read())
    }

    pub fn is_out_of_bounds(&self) -> bool {
        matches!(self, DecodeError::Buffer(BufferError::OutOfBounds { .. }))
    }

    pub fn is_trailing_bytes(&self) -> bool {
        matches!(self, DecodeError::Buffer(BufferError::TrailingBytes { .. }))
    }

    pub fn is_unknown_variant(&self) -> bool {
        matches!(self, DecodeError::UnknownVariant { .. })
    }
}
