#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
//! Framing tests: [`PacketCodec`] driving `Framed` streams over in-memory
//! duplex pipes, including fragmented delivery and back-to-back frames.

use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use tokio::io::AsyncWriteExt;
use tokio_util::codec::{FramedRead, FramedWrite};

use tlv_protocol::{
    Attribute, AttributeKind, Multiplicity, Packet, PacketCodec, PacketKind, Registry, Value,
};

fn telemetry_registry() -> Arc<Registry> {
    let mut registry = Registry::new();
    let mote = registry.register_attribute_kind(AttributeKind::integer(0x01));
    let magnitude = registry.register_attribute_kind(AttributeKind::integer(0x03));
    registry.register_packet_kind(
        PacketKind::new(0x0000, 0x01)
            .mandatory(&mote, Multiplicity::Unbounded)
            .optional(&magnitude, Multiplicity::AtMost(1)),
    );
    Arc::new(registry)
}

fn request(registry: &Registry, mote_value: i32) -> Packet {
    let mote = registry.find_attribute(0x01).unwrap();
    let kind = registry.find_packet(0x0000, 0x01).unwrap();
    let mut packet = Packet::new(Arc::clone(kind));
    packet.add_attribute(Attribute::new(Arc::clone(mote), Value::Integer(mote_value)).unwrap());
    packet
}

#[tokio::test]
async fn framed_roundtrip_over_duplex() {
    let registry = telemetry_registry();
    let (client, server) = tokio::io::duplex(1024);

    let mut writer = FramedWrite::new(client, PacketCodec::new(Arc::clone(&registry)));
    let mut reader = FramedRead::new(server, PacketCodec::new(Arc::clone(&registry)));

    writer.send(request(&registry, 77)).await.unwrap();

    let decoded = reader.next().await.expect("one frame").unwrap();
    let mote = registry.find_attribute(0x01).unwrap();
    assert_eq!(decoded.get_values(mote), vec![&Value::Integer(77)]);
}

#[tokio::test]
async fn fragmented_delivery_reassembles_one_frame() {
    let registry = telemetry_registry();
    let (mut raw, server) = tokio::io::duplex(1024);
    let mut reader = FramedRead::new(server, PacketCodec::new(Arc::clone(&registry)));

    let bytes = request(&registry, 1234).encode().unwrap();

    // Dribble the frame one byte at a time.
    let write = async move {
        for b in bytes.iter() {
            raw.write_all(&[*b]).await.unwrap();
            raw.flush().await.unwrap();
            tokio::task::yield_now().await;
        }
        raw
    };
    let (decoded, _raw) = tokio::join!(reader.next(), write);

    let packet = decoded.expect("one frame").unwrap();
    let mote = registry.find_attribute(0x01).unwrap();
    assert_eq!(packet.get_values(mote), vec![&Value::Integer(1234)]);
}

#[tokio::test]
async fn back_to_back_frames_decode_in_order() {
    let registry = telemetry_registry();
    let (mut raw, server) = tokio::io::duplex(4096);
    let mut reader = FramedRead::new(server, PacketCodec::new(Arc::clone(&registry)));

    let mut wire = Vec::new();
    for v in 0..10 {
        wire.extend_from_slice(&request(&registry, v).encode().unwrap());
    }
    raw.write_all(&wire).await.unwrap();
    drop(raw);

    let mote = registry.find_attribute(0x01).unwrap();
    for v in 0..10 {
        let packet = reader.next().await.expect("frame present").unwrap();
        assert_eq!(packet.get_values(mote), vec![&Value::Integer(v)]);
    }
    assert!(reader.next().await.is_none());
}

#[tokio::test]
async fn undecodable_frame_surfaces_as_error() {
    let registry = telemetry_registry();
    let (mut raw, server) = tokio::io::duplex(1024);
    let mut reader = FramedRead::new(server, PacketCodec::new(Arc::clone(&registry)));

    // well-framed packet for an unregistered (application_id, code)
    raw.write_all(&[0x00, 0x07, 0x01, 0x00, 0x05]).await.unwrap();
    drop(raw);

    let result = reader.next().await.expect("one item");
    assert!(result.is_err());
}
