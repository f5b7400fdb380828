mod common;

use common::*;
use ipts::protocol::{DataEnvelope, DataPayload, FrameBody, PacketBody, PacketKind};
use ipts::{
    read_framed, read_framed_bytes, read_raw, read_raw_bytes, DecodeError, DecodeOptions, Opaque,
};

fn assert_empty_payload_then_end(mut records: impl Iterator<Item = Result<DataEnvelope, DecodeError>>) {
    let env = records.next().expect("one record").expect("decodes");
    assert_eq!(env.data_type().unwrap(), 0);
    match env.payload {
        DataPayload::Payload(p) => {
            assert_eq!(p.header.uint("counter").unwrap(), 0);
            assert!(p.frames.is_empty());
        }
        other => panic!("expected payload, got {other:?}"),
    }
    assert!(records.next().is_none());
}

#[test]
fn empty_payload_then_end_of_stream() {
    let capture = data(DATA_PAYLOAD, 0, &payload(0, &[]));
    assert_eq!(capture.len(), 76);
    assert_empty_payload_then_end(read_raw_bytes(&capture, DecodeOptions::default()));
    assert_empty_payload_then_end(read_raw(&capture[..], DecodeOptions::default()));
}

#[test]
fn frames_of_every_packet_type() {
    let packets = concat(&[
        packet(0x00, &[0, 0, 1, 0, 0xe8, 0x03, 0, 0]),
        packet(0x25, &[0, 0, 0xff, 0x10]),
        packet(0xff, &[1, 0, 3, 0]),
    ]);
    let frames = [
        frame(0, 6, &packets),
        frame(1, 7, &packet(0x5a, &[1, 2])),
        frame(2, 8, &[]),
        frame(3, 4, &[0xde, 0xad]),
    ];
    let capture = data(DATA_PAYLOAD, 1, &payload(17, &frames));
    let env = read_raw_bytes(&capture, DecodeOptions::default())
        .next()
        .unwrap()
        .unwrap();
    let DataPayload::Payload(p) = env.payload else {
        panic!("expected payload");
    };
    assert_eq!(p.frames.len(), 4);

    let FrameBody::Packets(first) = &p.frames[0].body else {
        panic!("frame type 6 holds packets");
    };
    let kinds: Vec<_> = first.iter().map(|p| p.kind).collect();
    assert_eq!(
        kinds,
        vec![Some(PacketKind::Start), Some(PacketKind::Heatmap), Some(PacketKind::End)]
    );
    let PacketBody::End(end) = &first[2].body else {
        panic!("expected end packet");
    };
    assert_eq!(end.uint("num_packets").unwrap(), 3);

    let FrameBody::Packets(second) = &p.frames[1].body else {
        panic!("frame type 7 holds packets");
    };
    assert_eq!(second[0].kind, Some(PacketKind::PenDataSelection));
    assert_eq!(second[0].body, PacketBody::Unhandled(Opaque(vec![1, 2])));

    assert_eq!(p.frames[2].body, FrameBody::Packets(vec![]));
    assert_eq!(p.frames[3].body, FrameBody::Unhandled(Opaque(vec![0xde, 0xad])));
}

#[test]
fn frame_count_beyond_envelope_is_short_read() {
    let mut body = payload(0, &[frame(0, 6, &[])]);
    // claim two frames
    body[4] = 2;
    let capture = data(DATA_PAYLOAD, 0, &body);
    let err = read_raw_bytes(&capture, DecodeOptions::default())
        .next()
        .unwrap()
        .unwrap_err();
    assert!(err.is_short_read(), "{err}");
}

#[test]
fn oversized_envelope_on_slice_is_truncated() {
    let capture = data_sized(DATA_PAYLOAD, 500, 0, &[1, 2, 3]);
    let mut records = read_raw_bytes(&capture, DecodeOptions::default());
    let env = records.next().unwrap().unwrap();
    assert_eq!(env.payload, DataPayload::Truncated(Opaque(vec![1, 2, 3])));
    assert!(records.next().is_none());
}

#[test]
fn oversized_envelope_on_stream_is_short_read() {
    let capture = data_sized(DATA_PAYLOAD, 500, 0, &[1, 2, 3]);
    let mut records = read_raw(&capture[..], DecodeOptions::default());
    assert!(records.next().unwrap().unwrap_err().is_short_read());
    assert!(records.next().is_none());
}

#[test]
fn undersized_payload_scope_is_trailing_bytes() {
    let capture = data(DATA_PAYLOAD, 0, &concat(&[payload(0, &[]), vec![0xaa]]));
    let err = read_raw_bytes(&capture, DecodeOptions::default())
        .next()
        .unwrap()
        .unwrap_err();
    assert!(err.is_trailing_bytes());
}

#[test]
fn unknown_data_type_is_kept_raw() {
    let capture = concat(&[data(42, 0, &[9, 9]), data(DATA_PAYLOAD, 1, &payload(1, &[]))]);
    let records: Vec<_> = read_raw_bytes(&capture, DecodeOptions::default())
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].payload, DataPayload::Unhandled(Opaque(vec![9, 9])));
    assert_eq!(records[1].buffer().unwrap(), 1);
}

#[test]
fn framed_envelopes_back_to_back() {
    let capture = concat(&[
        ithc(1, &data(DATA_PAYLOAD, 0, &payload(0, &[]))),
        ithc_padded(2, 4, &data(9, 0, &[7])),
    ]);
    let records: Vec<_> = read_framed(&capture[..], DecodeOptions::default())
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].payload, DataPayload::Unhandled(Opaque(vec![7])));
}

#[test]
fn framed_header_shorter_than_fixed_fields_skips_nothing() {
    let mut capture = ithc(1, &data(9, 0, &[7]));
    capture[0] = 4;
    let env = read_framed_bytes(&capture, DecodeOptions::default())
        .next()
        .unwrap()
        .unwrap();
    assert_eq!(env.payload, DataPayload::Unhandled(Opaque(vec![7])));
}

#[test]
fn framed_truncated_data_envelope_is_tolerated_inside_api_scope() {
    let capture = ithc(1, &data_sized(9, 100, 0, &[7, 8]));
    let env = read_framed(&capture[..], DecodeOptions::default())
        .next()
        .unwrap()
        .unwrap();
    assert_eq!(env.payload, DataPayload::Truncated(Opaque(vec![7, 8])));
}

#[test]
fn framed_partial_record_is_fatal() {
    let mut capture = ithc(1, &data(9, 0, &[7]));
    capture.extend_from_slice(&[12, 0, 0]);
    let mut records = read_framed(&capture[..], DecodeOptions::default());
    assert!(records.next().unwrap().is_ok());
    assert!(records.next().unwrap().unwrap_err().is_short_read());
    assert!(records.next().is_none());
}
