//! Stylus position reports.

use std::sync::LazyLock;

use ipts_buffers::{Cursor, PrimitiveType::*};
use serde::Serialize;

use crate::list::{decode_each, Count};
use crate::{DecodeError, Record, Schema};

static REPORT_SERIAL: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder("StylusReportSerial")
        .field(U8, "elements")
        .array(U8, 3, "")
        .field(U32, "serial")
        .build()
});

static REPORT_NO_SERIAL: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder("StylusReport")
        .field(U8, "elements")
        .array(U8, 3, "")
        .build()
});

static SAMPLE_SIMPLE: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder("StylusDataSimple")
        .array(U8, 4, "")
        .field(U8, "mode")
        .field(U16, "x")
        .field(U16, "y")
        .field(U16, "pressure")
        .field(U8, "")
        .build()
});

static SAMPLE_TILT: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder("StylusDataTilt")
        .field(U16, "timestamp")
        .field(U16, "mode")
        .field(U16, "x")
        .field(U16, "y")
        .field(U16, "pressure")
        .field(U16, "altitude")
        .field(U16, "azimuth")
        .field(U16, "")
        .build()
});

/// A header announcing `elements` samples, then exactly that many.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StylusReport {
    pub header: Record,
    pub samples: Vec<Record>,
}

impl StylusReport {
    /// Serial header, simple samples.
    pub fn decode_v1(cursor: &mut dyn Cursor) -> Result<Self, DecodeError> {
        Self::decode_with(&REPORT_SERIAL, &SAMPLE_SIMPLE, cursor)
    }

    /// Serial header, tilt samples.
    pub fn decode_v2(cursor: &mut dyn Cursor) -> Result<Self, DecodeError> {
        Self::decode_with(&REPORT_SERIAL, &SAMPLE_TILT, cursor)
    }

    /// Tilt samples without a serial number in the header.
    pub fn decode_no_serial(cursor: &mut dyn Cursor) -> Result<Self, DecodeError> {
        Self::decode_with(&REPORT_NO_SERIAL, &SAMPLE_TILT, cursor)
    }

    fn decode_with(
        header: &'static Schema,
        sample: &'static Schema,
        cursor: &mut dyn Cursor,
    ) -> Result<Self, DecodeError> {
        let header = Record::decode(header, cursor)?;
        let n = header.uint("elements")? as usize;
        let samples = decode_each(cursor, Count::Fixed(n), |c| Record::decode(sample, c))?;
        Ok(Self { header, samples })
    }

    pub fn serial(&self) -> Option<u64> {
        self.header.scalar("serial")?.as_u64()
    }
}
