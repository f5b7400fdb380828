//! Homogeneous list decoding.

use ipts_buffers::{decode_all, BufferError, Cursor, LePrimitive};

use crate::{Decode, DecodeContext, DecodeError};

/// How many elements a list holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Count {
    Fixed(usize),
    /// As many as fit in the enclosing scope, which must end exactly on an
    /// element boundary.
    UntilExhausted,
}

/// Bulk-decodes a run of primitives.
///
/// In [`Count::UntilExhausted`] mode the scope must hold a whole number of
/// elements; a ragged tail fails with `TrailingBytes` instead of being
/// dropped.
pub fn decode_scalars<T: LePrimitive>(
    cursor: &mut dyn Cursor,
    count: Count,
) -> Result<Vec<T>, DecodeError> {
    let at = cursor.position();
    let len = match count {
        Count::Fixed(n) => n.checked_mul(T::SIZE).ok_or(BufferError::OutOfBounds {
            wanted: u64::MAX,
            available: cursor.remaining().unwrap_or(u64::MAX),
            at,
        })?,
        Count::UntilExhausted => {
            let left = cursor.remaining().ok_or(BufferError::Unbounded { at })?;
            let ragged = left % T::SIZE as u64;
            if ragged != 0 {
                return Err(BufferError::TrailingBytes {
                    remaining: ragged,
                    at: at + left - ragged,
                    start: at,
                    size: left,
                }
                .into());
            }
            left as usize
        }
    };
    let bytes = cursor.read(len)?;
    Ok(decode_all(&bytes))
}

/// Decodes a list of elements with `decode_one`, one after another.
pub fn decode_each<T, F>(
    cursor: &mut dyn Cursor,
    count: Count,
    mut decode_one: F,
) -> Result<Vec<T>, DecodeError>
where
    F: FnMut(&mut dyn Cursor) -> Result<T, DecodeError>,
{
    let mut items = Vec::new();
    match count {
        Count::Fixed(n) => {
            for _ in 0..n {
                items.push(decode_one(&mut *cursor)?);
            }
        }
        Count::UntilExhausted => loop {
            let at = cursor.position();
            match cursor.remaining() {
                None => return Err(BufferError::Unbounded { at }.into()),
                Some(0) => break,
                Some(_) => items.push(decode_one(&mut *cursor)?),
            }
            // an element that consumes nothing would loop forever
            if cursor.position() == at {
                let left = cursor.remaining().unwrap_or(0);
                return Err(BufferError::TrailingBytes {
                    remaining: left,
                    at,
                    start: at,
                    size: left,
                }
                .into());
            }
        },
    }
    Ok(items)
}

/// Decodes a list of [`Decode`] records.
pub fn decode_records<T: Decode>(
    cursor: &mut dyn Cursor,
    ctx: &DecodeContext,
    count: Count,
) -> Result<Vec<T>, DecodeError> {
    decode_each(cursor, count, |c| T::decode(c, ctx))
}
