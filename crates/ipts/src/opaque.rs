//! Byte spans kept verbatim.

use std::fmt;

use ipts_buffers::Cursor;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::DecodeError;

/// An uninterpreted byte span: an unknown-but-tolerated variant, or the
/// rest of a truncated envelope.
///
/// Formats and serializes as space-separated lowercase hex.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Opaque(pub Vec<u8>);

impl Opaque {
    /// Takes every byte left in `cursor`.
    pub fn read_rest(cursor: &mut dyn Cursor) -> Result<Self, DecodeError> {
        Ok(Self(cursor.read_rest()?))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, b) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Opaque[{self}]")
    }
}

impl Serialize for Opaque {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Raw heatmap samples, one byte per sensor cell.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct HeatmapData(pub Vec<u8>);

impl HeatmapData {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `(value, occurrences)` for every byte value present, ascending.
    pub fn histogram(&self) -> Vec<(u8, usize)> {
        let mut counts = [0usize; 256];
        for &b in &self.0 {
            counts[b as usize] += 1;
        }
        counts
            .iter()
            .enumerate()
            .filter_map(|(b, &n)| (n > 0).then_some((b as u8, n)))
            .collect()
    }

    fn histogram_text(&self) -> String {
        self.histogram()
            .iter()
            .map(|(b, n)| format!("{n}*{b:02x}"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Debug for HeatmapData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HeatmapData[{}]", self.histogram_text())
    }
}

impl Serialize for HeatmapData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("HeatmapData", 2)?;
        s.serialize_field("len", &self.0.len())?;
        s.serialize_field("histogram", &self.histogram_text())?;
        s.end()
    }
}
