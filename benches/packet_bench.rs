use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};

use tlv_protocol::{
    decode, Attribute, AttributeKind, FieldKind, FieldValue, Multiplicity, Packet, PacketKind,
    Registry, Value,
};

#[allow(clippy::unwrap_used)]
fn telemetry_registry() -> Registry {
    let mut registry = Registry::new();
    let mote = registry.register_attribute_kind(AttributeKind::integer(0x01));
    let sample = registry.register_attribute_kind(AttributeKind::octets(
        0x04,
        vec![FieldKind::Integer, FieldKind::Integer, FieldKind::Timestamp],
    ));
    registry.register_packet_kind(
        PacketKind::new(0x0000, 0x01).mandatory(&mote, Multiplicity::Unbounded),
    );
    registry.register_packet_kind(
        PacketKind::new(0x0000, 0x02).mandatory(&sample, Multiplicity::Unbounded),
    );
    registry
}

#[allow(clippy::unwrap_used)]
fn response_with_samples(registry: &Registry, n: usize) -> Packet {
    let sample = registry.find_attribute(0x04).unwrap();
    let kind = registry.find_packet(0x0000, 0x02).unwrap();
    let mut packet = Packet::new(Arc::clone(kind));
    for i in 0..n {
        let value = Value::Octets(vec![
            FieldValue::Integer(i as i32),
            FieldValue::Integer((i * 10) as i32),
            FieldValue::Timestamp(1_700_000_000),
        ]);
        packet.add_attribute(Attribute::new(Arc::clone(sample), value).unwrap());
    }
    packet
}

#[allow(clippy::unwrap_used)]
fn bench_packet_encode_decode(c: &mut Criterion) {
    let registry = telemetry_registry();
    let mut group = c.benchmark_group("packet_encode_decode");
    let attribute_counts = [1usize, 10, 100, 1000];

    for &n in &attribute_counts {
        let packet = response_with_samples(&registry, n);
        let wire = packet.encode().unwrap();
        group.throughput(Throughput::Bytes(wire.len() as u64));

        group.bench_function(format!("encode_{n}_attrs"), |b| {
            b.iter_batched(
                || response_with_samples(&registry, n),
                |packet| {
                    let bytes = packet.encode().unwrap();
                    assert!(!bytes.is_empty());
                },
                BatchSize::SmallInput,
            )
        });
        group.bench_function(format!("decode_{n}_attrs"), |b| {
            b.iter(|| {
                let decoded = decode(&wire, &registry);
                assert!(decoded.is_some());
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_packet_encode_decode);
criterion_main!(benches);
