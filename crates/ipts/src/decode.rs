//! The decode trait and the configuration threaded through it.

use ipts_buffers::Cursor;

use crate::DecodeError;

/// Container nesting accepted by default.
pub const DEFAULT_MAX_CONTAINER_DEPTH: usize = 512;

/// Reader configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Deepest container tree accepted before failing with
    /// [`DecodeError::DepthLimit`]. Root containers sit at depth 1.
    pub max_container_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_container_depth: DEFAULT_MAX_CONTAINER_DEPTH,
        }
    }
}

impl DecodeOptions {
    pub fn with_max_container_depth(mut self, depth: usize) -> Self {
        self.max_container_depth = depth;
        self
    }
}

/// Per-call decode state: the options plus the current container depth.
#[derive(Debug, Clone, Copy)]
pub struct DecodeContext {
    options: DecodeOptions,
    depth: usize,
}

impl Default for DecodeContext {
    fn default() -> Self {
        Self::new(DecodeOptions::default())
    }
}

impl DecodeContext {
    pub fn new(options: DecodeOptions) -> Self {
        Self { options, depth: 0 }
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Context for one more level of container nesting.
    pub fn nested(&self, at: u64) -> Result<Self, DecodeError> {
        if self.depth >= self.options.max_container_depth {
            return Err(DecodeError::DepthLimit {
                limit: self.options.max_container_depth,
                at,
            });
        }
        Ok(Self {
            options: self.options,
            depth: self.depth + 1,
        })
    }
}

/// A record kind that decodes itself, header and payload attachment, from
/// the cursor's current position.
pub trait Decode: Sized {
    fn decode(cursor: &mut dyn Cursor, ctx: &DecodeContext) -> Result<Self, DecodeError>;
}
