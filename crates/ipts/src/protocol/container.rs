//! The recursive container tree carried by HID reports.

use std::sync::LazyLock;

use ipts_buffers::{Block, BufferError, Cursor, PrimitiveType::*};
use serde::Serialize;
use tracing::trace;

use super::packet::Packet;
use crate::list::{decode_records, Count};
use crate::{Decode, DecodeContext, DecodeError, HeatmapData, Record, Schema};

static CONTAINER: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder("Container")
        .field(U32, "size")
        .field(U8, "zero")
        .field(U8, "type")
        .field(U8, "")
        .build()
});

static HEATMAP: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder("Heatmap")
        .field(U8, "")
        .field(U32, "")
        .field(U32, "size")
        .build()
});

static METADATA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder("Metadata")
        .field(U32, "rows")
        .field(U32, "cols")
        .field(U32, "screen_width")
        .field(U32, "screen_height")
        .field(U8, "")
        .field(F32, "xx")
        .field(F32, "yx")
        .field(F32, "tx")
        .field(F32, "xy")
        .field(F32, "yy")
        .field(F32, "ty")
        .array(F32, 16, "")
        .build()
});

const TYPE_ROOT: u64 = 0x00;
const TYPE_HEATMAP: u64 = 0x01;
const TYPE_METADATA: u64 = 0x02;
const TYPE_PACKETS: u64 = 0xff;

/// Bytes of a container's `size` that the firmware does not count for one
/// specific packet container.
const SHORT_PACKET_CONTAINER_FIXUP: u64 = 4;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Container {
    pub header: Record,
    pub body: ContainerBody,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerBody {
    Containers(Vec<Container>),
    Heatmap(Heatmap),
    Metadata(Metadata),
    Packets(Vec<Packet>),
}

impl Container {
    pub fn container_type(&self) -> Result<u64, DecodeError> {
        self.header.uint("type")
    }

    /// Bytes the body occupies for a header declaring `size` bytes in total.
    ///
    /// Packet containers that declare exactly 11 bytes are four bytes longer
    /// than stated. No other size or type is adjusted.
    pub fn body_size(ty: u64, size: u64, at: u64) -> Result<u64, BufferError> {
        let fixed = CONTAINER.size() as u64;
        let body = size.checked_sub(fixed).ok_or(BufferError::OutOfBounds {
            wanted: fixed,
            available: size,
            at,
        })?;
        if ty == TYPE_PACKETS && size == 11 {
            Ok(body + SHORT_PACKET_CONTAINER_FIXUP)
        } else {
            Ok(body)
        }
    }
}

impl Decode for Container {
    fn decode(cursor: &mut dyn Cursor, ctx: &DecodeContext) -> Result<Self, DecodeError> {
        let at = cursor.position();
        let ctx = ctx.nested(at)?;
        let header = Record::decode(&CONTAINER, cursor)?;
        let ty = header.uint("type")?;
        let size = Self::body_size(ty, header.uint("size")?, at)?;
        trace!(ty, size, at, depth = ctx.depth(), "container");

        let mut block = Block::open(cursor, size)?;
        let body = match ty {
            TYPE_ROOT => {
                ContainerBody::Containers(decode_records(&mut block, &ctx, Count::UntilExhausted)?)
            }
            TYPE_HEATMAP => ContainerBody::Heatmap(Heatmap::decode(&mut block, &ctx)?),
            TYPE_METADATA => ContainerBody::Metadata(Metadata::decode(&mut block, &ctx)?),
            TYPE_PACKETS => {
                ContainerBody::Packets(decode_records(&mut block, &ctx, Count::UntilExhausted)?)
            }
            value => {
                return Err(DecodeError::UnknownVariant {
                    layer: "container type",
                    value,
                    at,
                })
            }
        };
        block.close()?;
        Ok(Self { header, body })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heatmap {
    pub header: Record,
    pub data: HeatmapData,
}

impl Decode for Heatmap {
    fn decode(cursor: &mut dyn Cursor, _ctx: &DecodeContext) -> Result<Self, DecodeError> {
        let header = Record::decode(&HEATMAP, cursor)?;
        let data = cursor.read(header.uint("size")? as usize)?;
        Ok(Self {
            header,
            data: HeatmapData(data),
        })
    }
}

/// Sensor geometry and the matrix mapping rows and columns to screen
/// coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metadata {
    pub header: Record,
}

impl Metadata {
    /// `[xx, yx, tx, xy, yy, ty]`.
    pub fn transform(&self) -> Option<[f32; 6]> {
        let mut out = [0f32; 6];
        for (slot, name) in out.iter_mut().zip(["xx", "yx", "tx", "xy", "yy", "ty"]) {
            *slot = self.header.scalar(name)?.as_f32()?;
        }
        Some(out)
    }
}

impl Decode for Metadata {
    fn decode(cursor: &mut dyn Cursor, _ctx: &DecodeContext) -> Result<Self, DecodeError> {
        Ok(Self {
            header: Record::decode(&METADATA, cursor)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::decode_scoped;
    use crate::DecodeOptions;
    use ipts_buffers::{Reader, Writer};

    fn container(w: &mut Writer, size: u32, ty: u8) {
        w.u32(size);
        w.u8(0);
        w.u8(ty);
        w.u8(0);
    }

    #[test]
    fn test_layouts() {
        assert_eq!(CONTAINER.size(), 7);
        assert_eq!(HEATMAP.size(), 9);
        assert_eq!(METADATA.size(), 17 + 24 + 64);
    }

    #[test]
    fn test_body_size() {
        assert_eq!(Container::body_size(0xff, 11, 0).unwrap(), 8);
        assert_eq!(Container::body_size(0xff, 12, 0).unwrap(), 5);
        assert_eq!(Container::body_size(0x00, 11, 0).unwrap(), 4);
        assert_eq!(Container::body_size(0x01, 7, 0).unwrap(), 0);
        assert!(matches!(
            Container::body_size(0x00, 6, 3),
            Err(BufferError::OutOfBounds { wanted: 7, available: 6, at: 3 })
        ));
    }

    #[test]
    fn test_short_packet_container_fixup() {
        let mut w = Writer::new();
        container(&mut w, 11, 0xff);
        // end packet: type 0xff, size 4, seq_num 1, num_packets 2
        w.u8(0xff);
        w.u8(0);
        w.u16(4);
        w.u16(1);
        w.u16(2);
        let bytes = w.flush();
        let c: Container = decode_scoped(&bytes).unwrap();
        let ContainerBody::Packets(packets) = c.body else {
            panic!("expected packets");
        };
        assert_eq!(packets.len(), 1);
    }

    #[test]
    fn test_nested_heatmap() {
        let mut w = Writer::new();
        container(&mut w, 7 + 7 + 9 + 3, 0x00);
        container(&mut w, 7 + 9 + 3, 0x01);
        w.u8(8);
        w.u32(0);
        w.u32(3);
        w.buf(&[0xff, 0xff, 0x00]);
        let bytes = w.flush();
        let root: Container = decode_scoped(&bytes).unwrap();
        let ContainerBody::Containers(children) = root.body else {
            panic!("expected containers");
        };
        let ContainerBody::Heatmap(heatmap) = &children[0].body else {
            panic!("expected heatmap");
        };
        assert_eq!(heatmap.data.histogram(), vec![(0x00, 1), (0xff, 2)]);
    }

    #[test]
    fn test_heatmap_shorter_than_scope_fails() {
        let mut w = Writer::new();
        container(&mut w, 7 + 9 + 4, 0x01);
        w.u8(8);
        w.u32(0);
        w.u32(3);
        w.buf(&[1, 2, 3, 4]);
        let bytes = w.flush();
        assert!(decode_scoped::<Container>(&bytes).unwrap_err().is_trailing_bytes());
    }

    #[test]
    fn test_metadata_transform() {
        let mut w = Writer::new();
        container(&mut w, 7 + 105, 0x02);
        for v in [46u32, 68, 2880, 1920] {
            w.u32(v);
        }
        w.u8(1);
        for v in [1.5f32, 0.0, 10.0, 0.0, 2.5, -4.0] {
            w.f32(v);
        }
        w.zeros(64);
        let bytes = w.flush();
        let c: Container = decode_scoped(&bytes).unwrap();
        let ContainerBody::Metadata(meta) = c.body else {
            panic!("expected metadata");
        };
        assert_eq!(meta.header.uint("rows").unwrap(), 46);
        assert_eq!(meta.transform(), Some([1.5, 0.0, 10.0, 0.0, 2.5, -4.0]));
    }

    #[test]
    fn test_unknown_type_is_hard_error() {
        let mut w = Writer::new();
        container(&mut w, 7, 0x03);
        let bytes = w.flush();
        let err = decode_scoped::<Container>(&bytes).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::UnknownVariant { layer: "container type", value: 3, at: 0 }
        ));
    }

    #[test]
    fn test_child_larger_than_parent_fails() {
        let mut w = Writer::new();
        container(&mut w, 7 + 7, 0x00);
        container(&mut w, 7 + 1, 0x00);
        let bytes = w.flush();
        assert!(decode_scoped::<Container>(&bytes).unwrap_err().is_out_of_bounds());
    }

    #[test]
    fn test_depth_limit() {
        let mut w = Writer::new();
        container(&mut w, 7 * 3, 0x00);
        container(&mut w, 7 * 2, 0x00);
        container(&mut w, 7, 0x00);
        let bytes = w.flush();
        let ctx = DecodeContext::new(DecodeOptions::default().with_max_container_depth(2));
        let err = Container::decode(&mut Reader::new(&bytes), &ctx).unwrap_err();
        assert!(matches!(err, DecodeError::DepthLimit { limit: 2, at: 14 }));

        let ctx = DecodeContext::new(DecodeOptions::default().with_max_container_depth(3));
        assert!(Container::decode(&mut Reader::new(&bytes), &ctx).is_ok());
    }
}
