//! Top-level readers for the binary capture encodings.
//!
//! A [`RecordReader`] owns its cursor and decodes one top-level record per
//! call. Running out of input exactly at a record boundary ends the
//! sequence; running out anywhere else is a `ShortRead`.

use std::io::Read;
use std::marker::PhantomData;

use ipts_buffers::{Cursor, Reader, StreamReader};
use tracing::trace;

use crate::protocol::{ApiEnvelope, DataEnvelope};
use crate::{Decode, DecodeContext, DecodeError, DecodeOptions};

/// How top-level records are laid out in a capture.
pub trait Encoding {
    /// Decodes the next top-level record and returns its data envelope.
    fn decode_next(cursor: &mut dyn Cursor, ctx: &DecodeContext)
        -> Result<DataEnvelope, DecodeError>;
}

/// ITHC API envelopes back to back.
#[derive(Debug, Clone, Copy)]
pub struct Framed;

/// IPTS data envelopes back to back.
#[derive(Debug, Clone, Copy)]
pub struct Raw;

impl Encoding for Framed {
    fn decode_next(
        cursor: &mut dyn Cursor,
        ctx: &DecodeContext,
    ) -> Result<DataEnvelope, DecodeError> {
        let api = ApiEnvelope::decode(cursor, ctx)?;
        trace!(msg_num = api.header.uint("msg_num")?, "ITHC message");
        Ok(api.data)
    }
}

impl Encoding for Raw {
    fn decode_next(
        cursor: &mut dyn Cursor,
        ctx: &DecodeContext,
    ) -> Result<DataEnvelope, DecodeError> {
        DataEnvelope::decode(cursor, ctx)
    }
}

/// Iterates over the top-level records of one capture.
///
/// The iterator yields `Err` at most once and then stops for good.
pub struct RecordReader<C, E> {
    cursor: C,
    ctx: DecodeContext,
    done: bool,
    _encoding: PhantomData<E>,
}

impl<C: Cursor, E: Encoding> RecordReader<C, E> {
    pub fn new(cursor: C, options: DecodeOptions) -> Self {
        Self {
            cursor,
            ctx: DecodeContext::new(options),
            done: false,
            _encoding: PhantomData,
        }
    }

    /// Decodes the next record, or returns `Ok(None)` at end of input.
    pub fn next_record(&mut self) -> Result<Option<DataEnvelope>, DecodeError> {
        let start = self.cursor.position();
        match E::decode_next(&mut self.cursor, &self.ctx) {
            Ok(envelope) => Ok(Some(envelope)),
            Err(e) if e.is_short_read() && self.cursor.position() == start => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Offset of the next record.
    pub fn position(&self) -> u64 {
        self.cursor.position()
    }

    pub fn into_inner(self) -> C {
        self.cursor
    }
}

impl<C: Cursor, E: Encoding> Iterator for RecordReader<C, E> {
    type Item = Result<DataEnvelope, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_record() {
            Ok(Some(envelope)) => Some(Ok(envelope)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<C: Cursor, E: Encoding> std::iter::FusedIterator for RecordReader<C, E> {}

/// ITHC framed capture from any reader.
pub fn read_framed<R: Read>(
    reader: R,
    options: DecodeOptions,
) -> RecordReader<StreamReader<R>, Framed> {
    RecordReader::new(StreamReader::new(reader), options)
}

/// ITHC framed capture held in memory.
pub fn read_framed_bytes(bytes: &[u8], options: DecodeOptions) -> RecordReader<Reader<'_>, Framed> {
    RecordReader::new(Reader::new(bytes), options)
}

/// Raw IPTS capture from any reader. Truncated envelopes cannot be
/// detected here and fail as `ShortRead`.
pub fn read_raw<R: Read>(reader: R, options: DecodeOptions) -> RecordReader<StreamReader<R>, Raw> {
    RecordReader::new(StreamReader::new(reader), options)
}

/// Raw IPTS capture held in memory. An envelope that claims more bytes than
/// are left decodes as [`crate::protocol::DataPayload::Truncated`].
pub fn read_raw_bytes(bytes: &[u8], options: DecodeOptions) -> RecordReader<Reader<'_>, Raw> {
    RecordReader::new(Reader::new(bytes), options)
}
