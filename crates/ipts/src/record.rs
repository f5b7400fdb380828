//! Fixed-layout record decoding.

use std::fmt;

use ipts_buffers::{BufferError, Cursor, Scalar};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::{DecodeError, Schema};

/// A decoded field: one value, or an inline array for repeated fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Scalar(Scalar),
    Array(Vec<Scalar>),
}

/// The named field values of one fixed-layout record.
#[derive(Clone, PartialEq)]
pub struct Record {
    schema: &'static Schema,
    values: Vec<FieldValue>,
}

impl Record {
    /// Reads exactly `schema.size()` bytes and unpacks them field by field.
    ///
    /// Fails with `ShortRead` when fewer bytes are available, whether the
    /// cursor is a stream that ran dry or a scope that is too small. Never
    /// touches bytes past the layout.
    pub fn decode(schema: &'static Schema, cursor: &mut dyn Cursor) -> Result<Self, DecodeError> {
        let bytes = cursor.read(schema.size()).map_err(|e| match e {
            BufferError::OutOfBounds {
                wanted,
                available,
                at,
            } => BufferError::ShortRead {
                wanted,
                got: available,
                at,
            },
            other => other,
        })?;
        let values = schema
            .fields()
            .iter()
            .map(|field| {
                let at = &bytes[field.offset..field.offset + field.size()];
                if field.count == 1 {
                    FieldValue::Scalar(field.ty.decode(at))
                } else {
                    FieldValue::Array(at.chunks_exact(field.ty.size()).map(|b| field.ty.decode(b)).collect())
                }
            })
            .collect();
        Ok(Self { schema, values })
    }

    pub fn schema(&self) -> &'static Schema {
        self.schema
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.schema.index_of(name).map(|i| &self.values[i])
    }

    pub fn scalar(&self, name: &str) -> Option<Scalar> {
        match self.get(name)? {
            FieldValue::Scalar(s) => Some(*s),
            FieldValue::Array(_) => None,
        }
    }

    pub fn array(&self, name: &str) -> Option<&[Scalar]> {
        match self.get(name)? {
            FieldValue::Array(a) => Some(a),
            FieldValue::Scalar(_) => None,
        }
    }

    /// An unsigned scalar field widened to `u64`. Used for discriminators
    /// and sizes.
    pub fn uint(&self, name: &'static str) -> Result<u64, DecodeError> {
        self.scalar(name)
            .and_then(Scalar::as_u64)
            .ok_or(DecodeError::MissingField {
                schema: self.schema.name(),
                field: name,
            })
    }

    /// Field names paired with their values, in layout order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.schema
            .fields()
            .iter()
            .map(|f| f.name.as_str())
            .zip(self.values.iter())
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.schema.name())?;
        f.debug_map().entries(self.fields()).finish()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in self.fields() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
