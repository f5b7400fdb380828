//! Decoder for Intel Precise Touch & Stylus (IPTS) digitizer captures.
//!
//! A capture is a sequence of fixed-header records, each owning a nested,
//! size-bounded body: ITHC API envelope → IPTS data envelope → payload →
//! frames → packets, or HID reports → container trees → packets and leaves.
//! Every nested body is decoded inside a [`ipts_buffers::Block`] that must be
//! consumed exactly, so a malformed record fails loudly instead of being
//! misread.
//!
//! # Layers
//!
//! - [`schema`]: record layouts declared once through a builder.
//! - [`record`]: fixed-layout record decoding into named fields.
//! - [`list`]: homogeneous lists, fixed count or until the scope runs out.
//! - [`protocol`]: the catalog of record kinds and their dispatch rules.
//! - [`reader`] / [`text_log`]: one entry point per input encoding.
//! - [`dump`]: JSON-lines output used by the `ipts-dump` binary.
//!
//! # Example
//!
//! ```
//! use ipts::{read_raw_bytes, DecodeOptions};
//! use ipts::protocol::DataPayload;
//!
//! // data envelope: type 0, size 12, buffer 0, reserved, then an empty payload
//! let mut capture = vec![0u8; 64];
//! capture[4] = 12;
//! capture.extend_from_slice(&[0u8; 12]);
//!
//! let mut records = read_raw_bytes(&capture, DecodeOptions::default());
//! let envelope = records.next().unwrap().unwrap();
//! assert!(matches!(envelope.payload, DataPayload::Payload(ref p) if p.frames.is_empty()));
//! assert!(records.next().is_none());
//! ```

pub mod decode;
pub mod dump;
pub mod error;
pub mod list;
pub mod opaque;
pub mod protocol;
pub mod reader;
pub mod record;
pub mod schema;
pub mod text_log;

pub use decode::{Decode, DecodeContext, DecodeOptions, DEFAULT_MAX_CONTAINER_DEPTH};
pub use error::DecodeError;
pub use list::Count;
pub use opaque::{HeatmapData, Opaque};
pub use reader::{
    read_framed, read_framed_bytes, read_raw, read_raw_bytes, Encoding, Framed, Raw, RecordReader,
};
pub use record::{FieldValue, Record};
pub use schema::{Field, Schema, SchemaBuilder};
pub use text_log::{envelope_bytes, read_text_log, TextLogReader};

pub use ipts_buffers::{PrimitiveType, Scalar};
