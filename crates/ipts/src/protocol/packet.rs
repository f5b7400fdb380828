//! Packets, the leaves of packet frames and packet containers.

use std::sync::LazyLock;

use ipts_buffers::{Block, Cursor, PrimitiveType::*, Reader};
use serde::Serialize;
use tracing::{debug, trace};

use super::pen::{PenDftWindow, PenMagnitude};
use super::stylus::StylusReport;
use crate::{Decode, DecodeContext, DecodeError, HeatmapData, Opaque, Record, Schema};

static PACKET: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder("Packet")
        .field(U8, "type")
        .field(U8, "flags")
        .field(U16, "size")
        .build()
});

static START: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder("PacketStart")
        .array(U8, 2, "")
        .field(U16, "seq_num")
        .field(U32, "timestamp")
        .build()
});

static END: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder("PacketEnd")
        .field(U16, "seq_num")
        .field(U16, "num_packets")
        .build()
});

static HEATMAP_DIMENSIONS: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder("PacketHeatmapDimensions")
        .field(U8, "height")
        .field(U8, "width")
        .field(U8, "y_min")
        .field(U8, "y_max")
        .field(U8, "x_min")
        .field(U8, "x_max")
        .field(U8, "z_min")
        .field(U8, "z_max")
        .build()
});

static FREQUENCY_NOISE: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder("PacketFrequencyNoise")
        .field(U16, "timestamp")
        .array(U8, 2, "")
        .build()
});

static PEN_GENERAL: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder("PacketPenGeneral")
        .field(U16, "timestamp")
        .array(U8, 5, "")
        .field(U8, "")
        .field(U32, "group_counter")
        .field(U8, "")
        .field(U8, "")
        .field(U8, "")
        .array(I8, 49, "padding")
        .build()
});

static PEN_METADATA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder("PacketPenMetadata")
        .field(U32, "group_counter")
        .field(U8, "seq_num")
        .field(U8, "data_type")
        .field(U8, "")
        .array(I8, 9, "padding")
        .build()
});

static PEN_GROUP: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder("PacketPenGroup")
        .field(U32, "group_counter")
        .build()
});

/// Packet type codes with a known meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PacketKind {
    Start,
    HeatmapDimensions,
    FrequencyNoise,
    StylusV1,
    Heatmap,
    PenGeneral,
    PenJnrOutput,
    PenNoiseMetrics,
    PenDataSelection,
    PenMagnitude,
    PenDftWindow,
    PenMultipleRegion,
    PenTouchedAntennas,
    PenMetadata,
    StylusV2,
    StylusNoSerial,
    PenDetection,
    PenLift,
    End,
}

impl PacketKind {
    pub fn from_u8(ty: u8) -> Option<Self> {
        Some(match ty {
            0x00 => Self::Start,
            0x03 => Self::HeatmapDimensions,
            0x04 => Self::FrequencyNoise,
            0x10 => Self::StylusV1,
            0x25 => Self::Heatmap,
            0x57 => Self::PenGeneral,
            0x58 => Self::PenJnrOutput,
            0x59 => Self::PenNoiseMetrics,
            0x5a => Self::PenDataSelection,
            0x5b => Self::PenMagnitude,
            0x5c => Self::PenDftWindow,
            0x5d => Self::PenMultipleRegion,
            0x5e => Self::PenTouchedAntennas,
            0x5f => Self::PenMetadata,
            0x60 => Self::StylusV2,
            0x61 => Self::StylusNoSerial,
            0x62 => Self::PenDetection,
            0x63 => Self::PenLift,
            0xff => Self::End,
            _ => return None,
        })
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Start => 0x00,
            Self::HeatmapDimensions => 0x03,
            Self::FrequencyNoise => 0x04,
            Self::StylusV1 => 0x10,
            Self::Heatmap => 0x25,
            Self::PenGeneral => 0x57,
            Self::PenJnrOutput => 0x58,
            Self::PenNoiseMetrics => 0x59,
            Self::PenDataSelection => 0x5a,
            Self::PenMagnitude => 0x5b,
            Self::PenDftWindow => 0x5c,
            Self::PenMultipleRegion => 0x5d,
            Self::PenTouchedAntennas => 0x5e,
            Self::PenMetadata => 0x5f,
            Self::StylusV2 => 0x60,
            Self::StylusNoSerial => 0x61,
            Self::PenDetection => 0x62,
            Self::PenLift => 0x63,
            Self::End => 0xff,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Start => "Start",
            Self::HeatmapDimensions => "HeatmapDimensions",
            Self::FrequencyNoise => "FrequencyNoise",
            Self::StylusV1 => "Stylus",
            Self::Heatmap => "Heatmap",
            Self::PenGeneral => "PenGeneral",
            Self::PenJnrOutput => "PenJnrOutput",
            Self::PenNoiseMetrics => "PenNoiseMetricsOutput",
            Self::PenDataSelection => "PenDataSelection",
            Self::PenMagnitude => "PenMagnitude",
            Self::PenDftWindow => "PenDftWindow",
            Self::PenMultipleRegion => "PenMultipleRegion",
            Self::PenTouchedAntennas => "PenTouchedAntennas",
            Self::PenMetadata => "PenMetadata",
            Self::StylusV2 => "StylusV2",
            Self::StylusNoSerial => "StylusNoSerial",
            Self::PenDetection => "PenDetection",
            Self::PenLift => "PenLift",
            Self::End => "End",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Packet {
    pub header: Record,
    /// `None` for type codes with no known meaning.
    pub kind: Option<PacketKind>,
    pub body: PacketBody,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PacketBody {
    Start(Record),
    HeatmapDimensions(Record),
    FrequencyNoise(PartialPacket),
    Stylus(StylusReport),
    Heatmap(HeatmapData),
    PenGeneral(Record),
    PenMagnitude(PenMagnitude),
    PenDftWindow(PenDftWindow),
    PenMetadata(Record),
    PenDetection(PartialPacket),
    PenLift(PartialPacket),
    End(Record),
    Unhandled(Opaque),
}

/// A packet whose leading fields are understood and whose tail is kept raw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartialPacket {
    pub header: Record,
    pub rest: Opaque,
}

impl PartialPacket {
    fn decode(schema: &'static Schema, cursor: &mut dyn Cursor) -> Result<Self, DecodeError> {
        let header = Record::decode(schema, cursor)?;
        let rest = Opaque::read_rest(cursor)?;
        Ok(Self { header, rest })
    }
}

/// Decodes a packet whose layout is inferred rather than taken from captures.
///
/// The whole packet scope is read first. If `decode` fails or leaves bytes
/// over, the packet is kept as [`PacketBody::Unhandled`] and the stream
/// carries on.
fn provisional<F>(ty: u8, block: &mut Block<'_>, decode: F) -> Result<PacketBody, DecodeError>
where
    F: FnOnce(&mut dyn Cursor) -> Result<PacketBody, DecodeError>,
{
    let bytes = block.read_rest()?;
    let mut reader = Reader::new(&bytes);
    let mismatch = match decode(&mut reader) {
        Ok(body) if reader.is_empty() => return Ok(body),
        Ok(_) => format!("{} bytes left over", reader.size()),
        Err(e) => e.to_string(),
    };
    debug!(ty, size = bytes.len(), %mismatch, "packet kept raw");
    Ok(PacketBody::Unhandled(Opaque(bytes)))
}

impl Packet {
    pub fn packet_type(&self) -> Result<u64, DecodeError> {
        self.header.uint("type")
    }
}

impl Decode for Packet {
    fn decode(cursor: &mut dyn Cursor, ctx: &DecodeContext) -> Result<Self, DecodeError> {
        let at = cursor.position();
        let header = Record::decode(&PACKET, cursor)?;
        let ty = header.uint("type")? as u8;
        let size = header.uint("size")?;
        let kind = PacketKind::from_u8(ty);
        trace!(ty, size, at, kind = kind.map(PacketKind::name), "packet");

        let mut block = Block::open(cursor, size)?;
        let b = &mut block;
        let body = match kind {
            Some(PacketKind::Start) => PacketBody::Start(Record::decode(&START, b)?),
            Some(PacketKind::HeatmapDimensions) => {
                PacketBody::HeatmapDimensions(Record::decode(&HEATMAP_DIMENSIONS, b)?)
            }
            Some(PacketKind::FrequencyNoise) => provisional(ty, b, |c| {
                PartialPacket::decode(&FREQUENCY_NOISE, c).map(PacketBody::FrequencyNoise)
            })?,
            Some(PacketKind::StylusV1) => {
                provisional(ty, b, |c| StylusReport::decode_v1(c).map(PacketBody::Stylus))?
            }
            Some(PacketKind::Heatmap) => PacketBody::Heatmap(HeatmapData(b.read_rest()?)),
            Some(PacketKind::PenGeneral) => PacketBody::PenGeneral(Record::decode(&PEN_GENERAL, b)?),
            Some(PacketKind::PenMagnitude) => PacketBody::PenMagnitude(PenMagnitude::decode(b, ctx)?),
            Some(PacketKind::PenDftWindow) => PacketBody::PenDftWindow(PenDftWindow::decode(b, ctx)?),
            Some(PacketKind::PenMetadata) => {
                PacketBody::PenMetadata(Record::decode(&PEN_METADATA, b)?)
            }
            Some(PacketKind::StylusV2) => {
                provisional(ty, b, |c| StylusReport::decode_v2(c).map(PacketBody::Stylus))?
            }
            Some(PacketKind::StylusNoSerial) => {
                provisional(ty, b, |c| StylusReport::decode_no_serial(c).map(PacketBody::Stylus))?
            }
            Some(PacketKind::PenDetection) => provisional(ty, b, |c| {
                PartialPacket::decode(&PEN_GROUP, c).map(PacketBody::PenDetection)
            })?,
            Some(PacketKind::PenLift) => provisional(ty, b, |c| {
                PartialPacket::decode(&PEN_GROUP, c).map(PacketBody::PenLift)
            })?,
            Some(PacketKind::End) => PacketBody::End(Record::decode(&END, b)?),
            Some(
                PacketKind::PenJnrOutput
                | PacketKind::PenNoiseMetrics
                | PacketKind::PenDataSelection
                | PacketKind::PenMultipleRegion
                | PacketKind::PenTouchedAntennas,
            )
            | None => {
                debug!(ty, size, "unhandled packet type");
                PacketBody::Unhandled(Opaque::read_rest(b)?)
            }
        };
        block.close()?;
        Ok(Self { header, kind, body })
    }
}
