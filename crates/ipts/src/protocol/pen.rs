//! Pen signal packets: antenna magnitudes and DFT windows.

use std::sync::LazyLock;

use ipts_buffers::{Cursor, PrimitiveType::*};
use serde::Serialize;

use crate::list::{decode_each, decode_scalars, Count};
use crate::{Decode, DecodeContext, DecodeError, Record, Schema};

static PEN_MAGNITUDE: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder("PacketPenMagnitude")
        .array(U8, 2, "")
        .array(U8, 2, "")
        .field(U8, "flags")
        .array(I8, 3, "padding")
        .build()
});

static PEN_DFT_WINDOW: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder("PacketPenDftWindow")
        .field(U32, "timestamp")
        .field(U8, "num_rows")
        .field(U8, "seq_num")
        .field(U8, "")
        .field(U8, "")
        .field(U8, "")
        .field(U8, "data_type")
        .field(I16, "padding")
        .build()
});

static DFT_WINDOW_ROW: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder("DftWindowRow")
        .field(U32, "frequency")
        .field(U32, "magnitude")
        .array(I16, 9, "real")
        .array(I16, 9, "imag")
        .field(I8, "first")
        .field(I8, "last")
        .field(I8, "mid")
        .field(I8, "")
        .build()
});

/// Per-antenna signal magnitudes, x antennas first then y.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PenMagnitude {
    pub header: Record,
    pub magnitudes: Vec<u32>,
}

impl Decode for PenMagnitude {
    fn decode(cursor: &mut dyn Cursor, _ctx: &DecodeContext) -> Result<Self, DecodeError> {
        let header = Record::decode(&PEN_MAGNITUDE, cursor)?;
        let magnitudes = decode_scalars(cursor, Count::UntilExhausted)?;
        Ok(Self { header, magnitudes })
    }
}

/// One DFT window per axis, `num_rows` rows each. Values are raw and
/// unscaled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PenDftWindow {
    pub header: Record,
    pub x: Vec<Record>,
    pub y: Vec<Record>,
}

impl PenDftWindow {
    fn rows(cursor: &mut dyn Cursor, n: usize) -> Result<Vec<Record>, DecodeError> {
        decode_each(cursor, Count::Fixed(n), |c| Record::decode(&DFT_WINDOW_ROW, c))
    }
}

impl Decode for PenDftWindow {
    fn decode(cursor: &mut dyn Cursor, _ctx: &DecodeContext) -> Result<Self, DecodeError> {
        let header = Record::decode(&PEN_DFT_WINDOW, cursor)?;
        let n = header.uint("num_rows")? as usize;
        let x = Self::rows(cursor, n)?;
        let y = Self::rows(cursor, n)?;
        Ok(Self { header, x, y })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{decode_scoped, Packet, PacketBody};
    use ipts_buffers::{Scalar, Writer};

    fn row(w: &mut Writer, frequency: u32, magnitude: u32, real0: i16) {
        w.u32(frequency);
        w.u32(magnitude);
        w.i16(real0);
        w.zeros(8 * 2 + 9 * 2);
        w.i8(-1);
        w.i8(1);
        w.i8(0);
        w.i8(0);
    }

    fn dft_packet(rows: u8, body_rows: usize) -> Vec<u8> {
        let mut w = Writer::new();
        w.u8(0x5c);
        w.u8(0);
        w.u16((12 + body_rows * 48) as u16);
        w.u32(1000);
        w.u8(rows);
        w.u8(3);
        w.buf(&[1, 1, 1]);
        w.u8(6);
        w.i16(-1);
        for i in 0..body_rows {
            row(&mut w, 100 + i as u32, 5000, -(i as i16));
        }
        w.flush()
    }

    #[test]
    fn test_layouts() {
        assert_eq!(PEN_MAGNITUDE.size(), 8);
        assert_eq!(PEN_DFT_WINDOW.size(), 12);
        assert_eq!(DFT_WINDOW_ROW.size(), 48);
    }

    #[test]
    fn test_dft_window_rows() {
        let p: Packet = decode_scoped(&dft_packet(2, 4)).unwrap();
        let PacketBody::PenDftWindow(dft) = p.body else {
            panic!("expected dft window");
        };
        assert_eq!(dft.header.uint("data_type").unwrap(), 6);
        assert_eq!((dft.x.len(), dft.y.len()), (2, 2));
        assert_eq!(dft.x[1].uint("frequency").unwrap(), 101);
        assert_eq!(dft.y[0].uint("frequency").unwrap(), 102);
        assert_eq!(dft.y[1].array("real").unwrap()[0], Scalar::I16(-3));
        assert_eq!(dft.y[1].scalar("first"), Some(Scalar::I8(-1)));
    }

    #[test]
    fn test_dft_window_leftover_row_fails() {
        let err = decode_scoped::<Packet>(&dft_packet(1, 3)).unwrap_err();
        assert!(err.is_trailing_bytes());
    }

    #[test]
    fn test_magnitudes_until_exhausted() {
        let mut w = Writer::new();
        w.u8(0x5b);
        w.u8(0);
        w.u16(8 + 12);
        w.zeros(4);
        w.u8(8);
        w.buf(&[0xff; 3]);
        for m in [7u32, 0, 90_000] {
            w.u32(m);
        }
        let bytes = w.flush();
        let p: Packet = decode_scoped(&bytes).unwrap();
        let PacketBody::PenMagnitude(mag) = p.body else {
            panic!("expected magnitudes");
        };
        assert_eq!(mag.header.uint("flags").unwrap(), 8);
        assert_eq!(mag.magnitudes, vec![7, 0, 90_000]);
    }

    #[test]
    fn test_magnitudes_ragged_tail_fails() {
        let mut w = Writer::new();
        w.u8(0x5b);
        w.u8(0);
        w.u16(8 + 6);
        w.zeros(8 + 6);
        let bytes = w.flush();
        assert!(decode_scoped::<Packet>(&bytes).unwrap_err().is_trailing_bytes());
    }
}
