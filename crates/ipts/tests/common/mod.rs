//! Little-endian capture builders shared by the integration tests.

#![allow(dead_code)]

use ipts_buffers::Writer;

pub const DATA_PAYLOAD: u32 = 0;
pub const DATA_HID_INPUT: u32 = 3;
pub const DATA_HID_FEATURE: u32 = 4;
pub const DATA_HID_DESCRIPTOR: u32 = 5;

pub fn packet(ty: u8, body: &[u8]) -> Vec<u8> {
    let mut w = Writer::new();
    w.u8(ty);
    w.u8(0);
    w.u16(body.len() as u16);
    w.buf(body);
    w.flush()
}

/// A container whose `size` covers its own header and `body`.
pub fn container(ty: u8, body: &[u8]) -> Vec<u8> {
    container_sized(7 + body.len() as u32, ty, body)
}

pub fn container_sized(size: u32, ty: u8, body: &[u8]) -> Vec<u8> {
    let mut w = Writer::new();
    w.u32(size);
    w.u8(0);
    w.u8(ty);
    w.u8(0);
    w.buf(body);
    w.flush()
}

pub fn heatmap(cells: &[u8]) -> Vec<u8> {
    let mut w = Writer::new();
    w.u8(8);
    w.u32(0);
    w.u32(cells.len() as u32);
    w.buf(cells);
    w.flush()
}

pub fn frame(index: u16, ty: u16, body: &[u8]) -> Vec<u8> {
    let mut w = Writer::new();
    w.u16(index);
    w.u16(ty);
    w.u32(body.len() as u32);
    w.zeros(8);
    w.buf(body);
    w.flush()
}

pub fn payload(counter: u32, frames: &[Vec<u8>]) -> Vec<u8> {
    let mut w = Writer::new();
    w.u32(counter);
    w.u32(frames.len() as u32);
    w.u32(0);
    for f in frames {
        w.buf(f);
    }
    w.flush()
}

/// A data envelope whose declared size matches `body`.
pub fn data(ty: u32, buffer: u32, body: &[u8]) -> Vec<u8> {
    data_sized(ty, body.len() as u32, buffer, body)
}

pub fn data_sized(ty: u32, size: u32, buffer: u32, body: &[u8]) -> Vec<u8> {
    let mut w = Writer::new();
    w.u32(ty);
    w.u32(size);
    w.u32(buffer);
    w.zeros(52);
    w.buf(body);
    w.flush()
}

/// An ITHC API envelope with a 12-byte header.
pub fn ithc(msg_num: u32, data: &[u8]) -> Vec<u8> {
    ithc_padded(msg_num, 0, data)
}

/// An ITHC API envelope whose header carries `padding` extra bytes.
pub fn ithc_padded(msg_num: u32, padding: usize, data: &[u8]) -> Vec<u8> {
    let mut w = Writer::new();
    w.u8((12 + padding) as u8);
    w.zeros(3);
    w.u32(msg_num);
    w.u32(data.len() as u32);
    w.zeros(padding);
    w.buf(data);
    w.flush()
}

/// HID input report with a container tree: id, timestamp, root, junk.
pub fn container_report(id: u8, timestamp: u16, root: &[u8], junk: &[u8]) -> Vec<u8> {
    let mut w = Writer::new();
    w.u8(id);
    w.u16(timestamp);
    w.buf(root);
    w.buf(junk);
    w.flush()
}

pub fn concat(parts: &[Vec<u8>]) -> Vec<u8> {
    parts.concat()
}
