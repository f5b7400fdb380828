//! The text log encoding: hex dumps of IPTS buffers under `=` header lines.
//!
//! ```text
//! ====== Buffer: 2 == Type: 0 == Size: 12 =====
//! 00 00 00 00 00 00 00 00
//! 00 00 00 00
//! ```
//!
//! Each entry is rebuilt into a raw data envelope (see [`envelope_bytes`])
//! and decoded over an in-memory slice that must be consumed exactly.

use std::io::BufRead;

use ipts_buffers::{Block, Reader, Writer};
use tracing::{debug, trace};

use crate::protocol::DataEnvelope;
use crate::{Decode, DecodeContext, DecodeError, DecodeOptions};

/// Size of the synthesized data-envelope header.
const HEADER_SIZE: usize = 64;

/// Builds a raw data envelope: `type, size, buffer`, reserved zeros, then
/// `data`.
pub fn envelope_bytes(ty: u32, size: u32, buffer: u32, data: &[u8]) -> Vec<u8> {
    let mut w = Writer::with_alloc_size(HEADER_SIZE + data.len());
    w.u32(ty);
    w.u32(size);
    w.u32(buffer);
    w.zeros(HEADER_SIZE - 12);
    w.buf(data);
    w.flush()
}

struct Entry {
    buffer: u32,
    ty: u32,
    size: u32,
    data: Vec<u8>,
}

/// Iterates over the entries of a text log.
///
/// Lines before the first header are ignored and an entry still short of
/// its declared size at end of input is dropped. Like the binary readers it
/// stops for good after the first error.
pub struct TextLogReader<R> {
    input: R,
    ctx: DecodeContext,
    line: usize,
    entry: Option<Entry>,
    done: bool,
}

impl<R: BufRead> TextLogReader<R> {
    pub fn new(input: R, options: DecodeOptions) -> Self {
        Self {
            input,
            ctx: DecodeContext::new(options),
            line: 0,
            entry: None,
            done: false,
        }
    }

    /// Decodes the next complete entry, or returns `Ok(None)` at end of
    /// input.
    pub fn next_record(&mut self) -> Result<Option<DataEnvelope>, DecodeError> {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if self.input.read_until(b'\n', &mut buf)? == 0 {
                if let Some(entry) = self.entry.take() {
                    debug!(
                        buffer = entry.buffer,
                        size = entry.size,
                        have = entry.data.len(),
                        "dropping incomplete text log entry"
                    );
                }
                return Ok(None);
            }
            self.line += 1;

            if buf.starts_with(b"=") {
                self.entry = Some(Entry {
                    buffer: self.header_value(&buf, b"Buffer:")?,
                    ty: self.header_value(&buf, b"Type:")?,
                    size: self.header_value(&buf, b"Size:")?,
                    data: Vec::new(),
                });
                continue;
            }

            let Some(entry) = self.entry.as_mut() else {
                continue;
            };
            for token in buf.split(|b| b.is_ascii_whitespace()).filter(|t| !t.is_empty()) {
                entry.data.push(hex_byte(token).ok_or_else(|| DecodeError::TextLog {
                    line: self.line,
                    message: format!("bad hex byte `{}`", String::from_utf8_lossy(token)),
                })?);
            }
            if entry.data.len() >= entry.size as usize {
                if let Some(entry) = self.entry.take() {
                    return self.decode_entry(entry).map(Some);
                }
            }
        }
    }

    /// Line number of the last line read.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn into_inner(self) -> R {
        self.input
    }

    fn decode_entry(&self, entry: Entry) -> Result<DataEnvelope, DecodeError> {
        trace!(buffer = entry.buffer, ty = entry.ty, size = entry.size, line = self.line, "text log entry");
        let bytes = envelope_bytes(entry.ty, entry.size, entry.buffer, &entry.data);
        let mut reader = Reader::new(&bytes);
        let mut root = Block::open(&mut reader, bytes.len() as u64)?;
        let envelope = DataEnvelope::decode(&mut root, &self.ctx)?;
        root.close()?;
        Ok(envelope)
    }

    /// The integer after `key`, running to the next `=` or end of line.
    fn header_value(&self, line: &[u8], key: &[u8]) -> Result<u32, DecodeError> {
        let err = |message: String| DecodeError::TextLog {
            line: self.line,
            message,
        };
        let key_text = String::from_utf8_lossy(key);
        let start = line
            .windows(key.len())
            .position(|w| w == key)
            .ok_or_else(|| err(format!("header has no `{key_text}`")))?
            + key.len();
        let rest = &line[start..];
        let end = rest.iter().position(|&b| b == b'=').unwrap_or(rest.len());
        let value = String::from_utf8_lossy(&rest[..end]);
        value
            .trim()
            .parse()
            .map_err(|_| err(format!("bad `{key_text}` value `{}`", value.trim())))
    }
}

fn hex_byte(token: &[u8]) -> Option<u8> {
    let digits = token
        .strip_prefix(b"0x")
        .or_else(|| token.strip_prefix(b"0X"))
        .unwrap_or(token);
    u8::from_str_radix(std::str::from_utf8(digits).ok()?, 16).ok()
}

impl<R: BufRead> Iterator for TextLogReader<R> {
    type Item = Result<DataEnvelope, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = self.next_record().transpose();
        if !matches!(item, Some(Ok(_))) {
            self.done = true;
        }
        item
    }
}

impl<R: BufRead> std::iter::FusedIterator for TextLogReader<R> {}

/// Text log capture from any buffered reader.
pub fn read_text_log<R: BufRead>(input: R, options: DecodeOptions) -> TextLogReader<R> {
    TextLogReader::new(input, options)
}
