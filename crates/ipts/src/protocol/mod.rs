//! The IPTS record catalog.
//!
//! Dispatch chain, outer to inner:
//!
//! ```text
//! ApiEnvelope ─► DataEnvelope ─┬─ 0 ► Payload ─► Frame* ─► Packet*
//!                              ├─ 3 ► HidInputReport ─► Container tree
//!                              ├─ 4 ► HidFeatureReport ─► Container tree
//!                              ├─ 5 ► HidReportDescriptor
//!                              └─ * ► opaque
//! Container ─┬─ 0x00 ► Container*
//!            ├─ 0x01 ► Heatmap
//!            ├─ 0x02 ► Metadata
//!            └─ 0xff ► Packet*
//! ```
//!
//! Data envelopes, frames and packets keep unknown types as opaque bytes.
//! HID report ids and container types are closed sets: an unknown value is
//! a hard [`crate::DecodeError::UnknownVariant`].

mod container;
mod envelope;
mod hid;
mod packet;
mod pen;
mod stylus;

pub use container::{Container, ContainerBody, Heatmap, Metadata};
pub use envelope::{ApiEnvelope, DataEnvelope, DataPayload, Frame, FrameBody, Payload};
pub use hid::{
    ContainerReport, HidFeatureBody, HidFeatureReport, HidInputBody, HidInputReport,
    HidReportDescriptor, MetadataFeature,
};
pub use packet::{Packet, PacketBody, PacketKind, PartialPacket};
pub use pen::{PenDftWindow, PenMagnitude};
pub use stylus::StylusReport;

/// Decodes `T` in a root scope spanning all of `bytes`, which must be
/// consumed exactly.
#[cfg(test)]
pub(crate) fn decode_scoped<T: crate::Decode>(bytes: &[u8]) -> Result<T, crate::DecodeError> {
    let mut reader = ipts_buffers::Reader::new(bytes);
    let mut block = ipts_buffers::Block::open(&mut reader, bytes.len() as u64)?;
    let value = T::decode(&mut block, &crate::DecodeContext::default())?;
    block.close()?;
    Ok(value)
}
