//! Fixed-width little-endian primitives.

use serde::Serialize;

/// The primitive field types a record layout can be built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    F32,
}

impl PrimitiveType {
    /// Encoded width in bytes.
    pub const fn size(self) -> usize {
        match self {
            PrimitiveType::U8 | PrimitiveType::I8 => 1,
            PrimitiveType::U16 | PrimitiveType::I16 => 2,
            PrimitiveType::U32 | PrimitiveType::I32 | PrimitiveType::F32 => 4,
            PrimitiveType::U64 => 8,
        }
    }

    /// Decodes one value from the front of `bytes`.
    ///
    /// `bytes` must hold at least [`size`](Self::size) bytes; callers slice
    /// it out of a buffer whose length was already checked.
    pub fn decode(self, bytes: &[u8]) -> Scalar {
        match self {
            PrimitiveType::U8 => Scalar::U8(u8::read_le(bytes)),
            PrimitiveType::I8 => Scalar::I8(i8::read_le(bytes)),
            PrimitiveType::U16 => Scalar::U16(u16::read_le(bytes)),
            PrimitiveType::I16 => Scalar::I16(i16::read_le(bytes)),
            PrimitiveType::U32 => Scalar::U32(u32::read_le(bytes)),
            PrimitiveType::I32 => Scalar::I32(i32::read_le(bytes)),
            PrimitiveType::U64 => Scalar::U64(u64::read_le(bytes)),
            PrimitiveType::F32 => Scalar::F32(f32::read_le(bytes)),
        }
    }
}

/// A single decoded primitive value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    U64(u64),
    F32(f32),
}

impl Scalar {
    /// Widens an unsigned value. Signed and float values yield `None`.
    pub fn as_u64(self) -> Option<u64> {
        match self {
            Scalar::U8(v) => Some(v as u64),
            Scalar::U16(v) => Some(v as u64),
            Scalar::U32(v) => Some(v as u64),
            Scalar::U64(v) => Some(v),
            _ => None,
        }
    }

    /// Widens any integer value. Floats yield `None`.
    pub fn as_i64(self) -> Option<i64> {
        match self {
            Scalar::I8(v) => Some(v as i64),
            Scalar::I16(v) => Some(v as i64),
            Scalar::I32(v) => Some(v as i64),
            Scalar::F32(_) => None,
            Scalar::U64(v) => i64::try_from(v).ok(),
            other => other.as_u64().map(|v| v as i64),
        }
    }

    pub fn as_f32(self) -> Option<f32> {
        match self {
            Scalar::F32(v) => Some(v),
            _ => None,
        }
    }
}

/// Native numeric types with a fixed little-endian encoding.
pub trait LePrimitive: Copy {
    const TYPE: PrimitiveType;
    const SIZE: usize = Self::TYPE.size();

    /// Decodes from the first [`SIZE`](Self::SIZE) bytes of `bytes`.
    fn read_le(bytes: &[u8]) -> Self;
}

macro_rules! impl_le_primitive {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl LePrimitive for $t {
                const TYPE: PrimitiveType = PrimitiveType::$variant;

                #[inline]
                fn read_le(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; std::mem::size_of::<$t>()];
                    raw.copy_from_slice(&bytes[..std::mem::size_of::<$t>()]);
                    <$t>::from_le_bytes(raw)
                }
            }
        )*
    };
}

impl_le_primitive! {
    u8 => U8,
    i8 => I8,
    u16 => U16,
    i16 => I16,
    u32 => U32,
    i32 => I32,
    u64 => U64,
    f32 => F32,
}

/// Bulk-decodes a packed run of `T`. Any tail shorter than one element is
/// ignored; callers that must reject it check the length first.
pub fn decode_all<T: LePrimitive>(bytes: &[u8]) -> Vec<T> {
    bytes.chunks_exact(T::SIZE).map(T::read_le).collect()
}
