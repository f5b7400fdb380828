//! Envelopes, payloads and frames.

use std::sync::LazyLock;

use ipts_buffers::{Block, Cursor, PrimitiveType::*};
use serde::Serialize;
use tracing::{debug, trace, warn};

use super::hid::{HidFeatureReport, HidInputReport, HidReportDescriptor};
use super::packet::Packet;
use crate::list::{decode_records, Count};
use crate::{Decode, DecodeContext, DecodeError, Opaque, Record, Schema};

static ITHC_API: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder("IthcApi")
        .field(U8, "hdr_size")
        .array(U8, 3, "reserved")
        .field(U32, "msg_num")
        .field(U32, "size")
        .build()
});

static IPTS_DATA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder("IptsData")
        .field(U32, "type")
        .field(U32, "size")
        .field(U32, "buffer")
        .array(U32, 13, "")
        .build()
});

static IPTS_PAYLOAD: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder("IptsPayload")
        .field(U32, "counter")
        .field(U32, "frames")
        .field(U32, "")
        .build()
});

static IPTS_FRAME: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder("IptsFrame")
        .field(U16, "index")
        .field(U16, "type")
        .field(U32, "size")
        .array(U32, 2, "")
        .build()
});

const DATA_TYPE_PAYLOAD: u64 = 0;
const DATA_TYPE_HID_INPUT: u64 = 3;
const DATA_TYPE_HID_FEATURE: u64 = 4;
const DATA_TYPE_HID_DESCRIPTOR: u64 = 5;

/// Frame types whose body is a packet list.
const PACKET_FRAME_TYPES: [u64; 3] = [6, 7, 8];

/// ITHC driver framing around one data envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiEnvelope {
    pub header: Record,
    pub data: DataEnvelope,
}

impl Decode for ApiEnvelope {
    fn decode(cursor: &mut dyn Cursor, ctx: &DecodeContext) -> Result<Self, DecodeError> {
        let header = Record::decode(&ITHC_API, cursor)?;
        let hdr_size = header.uint("hdr_size")?;
        let fixed = ITHC_API.size() as u64;
        if hdr_size < fixed {
            warn!(hdr_size, fixed, at = cursor.position(), "ITHC header shorter than its fixed fields");
        } else {
            // newer drivers append header fields this decoder does not know
            cursor.read((hdr_size - fixed) as usize)?;
        }
        let mut block = Block::open(cursor, header.uint("size")?)?;
        let data = DataEnvelope::decode(&mut block, ctx)?;
        block.close()?;
        Ok(Self { header, data })
    }
}

/// One IPTS buffer as delivered by the driver.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataEnvelope {
    pub header: Record,
    pub payload: DataPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataPayload {
    Payload(Payload),
    HidInput(HidInputReport),
    HidFeature(HidFeatureReport),
    HidDescriptor(HidReportDescriptor),
    /// A buffer type this decoder does not interpret.
    Unhandled(Opaque),
    /// The declared size ran past the end of a size-aware source; these
    /// are the bytes that were left.
    Truncated(Opaque),
}

impl DataEnvelope {
    pub fn data_type(&self) -> Result<u64, DecodeError> {
        self.header.uint("type")
    }

    pub fn buffer(&self) -> Result<u64, DecodeError> {
        self.header.uint("buffer")
    }
}

impl Decode for DataEnvelope {
    fn decode(cursor: &mut dyn Cursor, ctx: &DecodeContext) -> Result<Self, DecodeError> {
        let header = Record::decode(&IPTS_DATA, cursor)?;
        let ty = header.uint("type")?;
        let size = header.uint("size")?;

        if let Some(left) = cursor.remaining() {
            if size > left {
                debug!(size, left, at = cursor.position(), "truncated IPTS data envelope");
                let rest = Opaque::read_rest(cursor)?;
                return Ok(Self {
                    header,
                    payload: DataPayload::Truncated(rest),
                });
            }
        }

        trace!(ty, size, at = cursor.position(), "IPTS data envelope");
        let mut block = Block::open(cursor, size)?;
        let payload = match ty {
            DATA_TYPE_PAYLOAD => DataPayload::Payload(Payload::decode(&mut block, ctx)?),
            DATA_TYPE_HID_INPUT => DataPayload::HidInput(HidInputReport::decode(&mut block, ctx)?),
            DATA_TYPE_HID_FEATURE => {
                DataPayload::HidFeature(HidFeatureReport::decode(&mut block, ctx)?)
            }
            DATA_TYPE_HID_DESCRIPTOR => {
                DataPayload::HidDescriptor(HidReportDescriptor::decode(&mut block, ctx)?)
            }
            _ => {
                debug!(ty, size, "unhandled IPTS data type");
                DataPayload::Unhandled(Opaque::read_rest(&mut block)?)
            }
        };
        block.close()?;
        Ok(Self { header, payload })
    }
}

/// A batch of frames.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Payload {
    pub header: Record,
    pub frames: Vec<Frame>,
}

impl Decode for Payload {
    fn decode(cursor: &mut dyn Cursor, ctx: &DecodeContext) -> Result<Self, DecodeError> {
        let header = Record::decode(&IPTS_PAYLOAD, cursor)?;
        let count = header.uint("frames")? as usize;
        let frames = decode_records(cursor, ctx, Count::Fixed(count))?;
        Ok(Self { header, frames })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub header: Record,
    pub body: FrameBody,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameBody {
    Packets(Vec<Packet>),
    Unhandled(Opaque),
}

impl Decode for Frame {
    fn decode(cursor: &mut dyn Cursor, ctx: &DecodeContext) -> Result<Self, DecodeError> {
        let header = Record::decode(&IPTS_FRAME, cursor)?;
        let ty = header.uint("type")?;
        let mut block = Block::open(cursor, header.uint("size")?)?;
        let body = if PACKET_FRAME_TYPES.contains(&ty) {
            FrameBody::Packets(decode_records(&mut block, ctx, Count::UntilExhausted)?)
        } else {
            debug!(ty, "unhandled IPTS frame type");
            FrameBody::Unhandled(Opaque::read_rest(&mut block)?)
        };
        block.close()?;
        Ok(Self { header, body })
    }
}
