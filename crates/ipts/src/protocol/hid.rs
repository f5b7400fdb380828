//! HID input, feature and descriptor reports.

use std::sync::LazyLock;

use ipts_buffers::{Cursor, PrimitiveType::*};
use serde::Serialize;
use tracing::trace;

use super::container::Container;
use crate::{Decode, DecodeContext, DecodeError, Opaque, Record, Schema};

static REPORT_ID: LazyLock<Schema> =
    LazyLock::new(|| Schema::builder("HidReport").field(U8, "id").build());

static SINGLETOUCH: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder("HidReportSingletouch")
        .field(U8, "button")
        .field(U16, "x")
        .field(U16, "y")
        .build()
});

static CONTAINER_REPORT: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder("HidReportContainer")
        .field(U16, "timestamp")
        .build()
});

static MULTITOUCH: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder("HidFeatureMultitouch")
        .field(U8, "enabled")
        .build()
});

static DESCRIPTOR: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder("HidReportDescriptor")
        .array(U32, 2, "")
        .build()
});

const INPUT_NONE: u64 = 0;
const INPUT_SINGLETOUCH: u64 = 0x40;
const INPUT_CONTAINER: [u64; 8] = [7, 8, 10, 11, 12, 13, 26, 28];

const FEATURE_MULTITOUCH: u64 = 5;
const FEATURE_METADATA: u64 = 6;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HidInputReport {
    pub header: Record,
    pub body: HidInputBody,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HidInputBody {
    /// Report id 0 carries nothing.
    Empty,
    SingleTouch(Record),
    Container(ContainerReport),
}

impl HidInputReport {
    pub fn id(&self) -> Result<u64, DecodeError> {
        self.header.uint("id")
    }
}

impl Decode for HidInputReport {
    fn decode(cursor: &mut dyn Cursor, ctx: &DecodeContext) -> Result<Self, DecodeError> {
        let at = cursor.position();
        let header = Record::decode(&REPORT_ID, cursor)?;
        let id = header.uint("id")?;
        trace!(id, at, "HID input report");
        let body = match id {
            INPUT_NONE => HidInputBody::Empty,
            INPUT_SINGLETOUCH => HidInputBody::SingleTouch(Record::decode(&SINGLETOUCH, cursor)?),
            id if INPUT_CONTAINER.contains(&id) => {
                HidInputBody::Container(ContainerReport::decode(cursor, ctx)?)
            }
            value => {
                return Err(DecodeError::UnknownVariant {
                    layer: "HID input report id",
                    value,
                    at,
                })
            }
        };
        Ok(Self { header, body })
    }
}

/// A timestamped container tree followed by junk up to the end of the
/// enclosing scope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContainerReport {
    pub header: Record,
    pub root: Container,
    /// Count of trailing bytes that were read and dropped.
    pub discarded: u64,
}

impl Decode for ContainerReport {
    fn decode(cursor: &mut dyn Cursor, ctx: &DecodeContext) -> Result<Self, DecodeError> {
        let header = Record::decode(&CONTAINER_REPORT, cursor)?;
        let root = Container::decode(cursor, ctx)?;
        let junk = cursor.read_rest()?;
        Ok(Self {
            header,
            root,
            discarded: junk.len() as u64,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HidFeatureReport {
    pub header: Record,
    pub body: HidFeatureBody,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HidFeatureBody {
    Multitouch(Record),
    Metadata(MetadataFeature),
}

impl HidFeatureReport {
    pub fn id(&self) -> Result<u64, DecodeError> {
        self.header.uint("id")
    }
}

impl Decode for HidFeatureReport {
    fn decode(cursor: &mut dyn Cursor, ctx: &DecodeContext) -> Result<Self, DecodeError> {
        let at = cursor.position();
        let header = Record::decode(&REPORT_ID, cursor)?;
        let body = match header.uint("id")? {
            FEATURE_MULTITOUCH => HidFeatureBody::Multitouch(Record::decode(&MULTITOUCH, cursor)?),
            FEATURE_METADATA => HidFeatureBody::Metadata(MetadataFeature::decode(cursor, ctx)?),
            value => {
                return Err(DecodeError::UnknownVariant {
                    layer: "HID feature report id",
                    value,
                    at,
                })
            }
        };
        Ok(Self { header, body })
    }
}

/// The metadata feature has no fields of its own, only a container.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataFeature {
    pub container: Container,
}

impl Decode for MetadataFeature {
    fn decode(cursor: &mut dyn Cursor, ctx: &DecodeContext) -> Result<Self, DecodeError> {
        Ok(Self {
            container: Container::decode(cursor, ctx)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HidReportDescriptor {
    pub header: Record,
    pub descriptor: Opaque,
}

impl Decode for HidReportDescriptor {
    fn decode(cursor: &mut dyn Cursor, _ctx: &DecodeContext) -> Result<Self, DecodeError> {
        let header = Record::decode(&DESCRIPTOR, cursor)?;
        let descriptor = Opaque::read_rest(cursor)?;
        Ok(Self { header, descriptor })
    }
}
