//! Top-level decoder: raw bytes to a packet instance.
//!
//! Malformed or unknown input never panics and never stalls. Unknown packet
//! kinds and header mismatches fail the whole decode (`None`); an unknown
//! attribute `type_id` is skipped by its declared length so the loop always
//! makes forward progress, a hard requirement on crafted input.

use std::sync::Arc;

use tracing::{debug, trace};

use super::attribute::Attribute;
use super::layout;
use super::packet::Packet;
use super::registry::Registry;

/// Reconstruct a packet from a complete raw buffer.
///
/// The header's `total_length` must equal `bytes.len()` exactly; there is
/// no partial-packet tolerance here (stream reassembly is the codec's job).
/// Returns `None` when no packet can be built: short or mismatched header,
/// unregistered packet kind, or an attribute that is malformed beyond
/// skipping.
pub fn decode(bytes: &[u8], registry: &Registry) -> Option<Packet> {
    if bytes.len() < layout::PACKET_HEADER_LEN {
        return None;
    }

    let application_id = u16::from_be_bytes([bytes[0], bytes[1]]);
    let code = bytes[layout::CODE_OFFSET];
    let total_length = u16::from_be_bytes([bytes[3], bytes[4]]) as usize;
    if total_length != bytes.len() {
        trace!(
            declared = total_length,
            actual = bytes.len(),
            "total_length mismatch"
        );
        return None;
    }

    let kind = registry.find_packet(application_id, code)?;
    let mut packet = Packet::new(Arc::clone(kind));

    let mut cursor = layout::PACKET_HEADER_LEN;
    while bytes.len() - cursor > layout::ATTR_HEADER_LEN {
        let type_id = bytes[cursor + layout::ATTR_TYPE_OFFSET];
        let attr_length =
            u16::from_be_bytes([bytes[cursor + 1], bytes[cursor + 2]]) as usize;

        // An attr_length shorter than its own header cannot advance the
        // cursor; an overrun cannot be skipped. Both fail the decode.
        if attr_length < layout::ATTR_HEADER_LEN || cursor + attr_length > bytes.len() {
            trace!(type_id, attr_length, "malformed attribute framing");
            return None;
        }

        if let Some(attr_kind) = registry.find_attribute(type_id) {
            let value_bytes = &bytes[cursor + layout::ATTR_HEADER_LEN..cursor + attr_length];
            let attribute = Attribute::decode(Arc::clone(attr_kind), value_bytes)?;
            if !packet.add_attribute(attribute) {
                debug!(type_id, "attribute dropped: multiplicity exceeded or undeclared");
            }
        } else {
            debug!(type_id, attr_length, "skipping unknown attribute kind");
        }

        // Advance by the declared length whether or not the kind was known.
        cursor += attr_length;
    }

    Some(packet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::attribute::AttributeKind;
    use crate::core::packet::{Multiplicity, PacketKind};
    use crate::core::value::Value;

    fn sample_registry() -> Registry {
        let mut registry = Registry::new();
        let mote = registry.register_attribute_kind(AttributeKind::integer(0x01));
        registry.register_packet_kind(
            PacketKind::new(0x0000, 0x01).mandatory(&mote, Multiplicity::Unbounded),
        );
        registry
    }

    #[test]
    fn decode_single_integer_attribute() {
        let registry = sample_registry();
        let bytes = [
            0x00, 0x00, 0x01, 0x00, 0x0C, // header, total_length 12
            0x01, 0x00, 0x07, 0x00, 0x00, 0x00, 0x7B, // MoteId = 123
        ];
        let packet = decode(&bytes, &registry).expect("decodes");
        let mote = registry.find_attribute(0x01).unwrap();
        assert_eq!(packet.get_values(mote), vec![&Value::Integer(123)]);
    }

    #[test]
    fn length_mismatch_rejected() {
        let registry = sample_registry();
        // header declares 10 bytes but only 9 arrive
        let truncated = [0x00, 0x00, 0x01, 0x00, 0x0A, 0x01, 0x00, 0x07, 0x00];
        assert!(decode(&truncated, &registry).is_none());

        // one padding byte beyond the declared length
        let mut padded = vec![0x00, 0x00, 0x01, 0x00, 0x05];
        padded.push(0xFF);
        assert!(decode(&padded, &registry).is_none());
    }

    #[test]
    fn unknown_packet_kind_rejected() {
        let registry = sample_registry();
        let bytes = [0x00, 0x01, 0x01, 0x00, 0x05];
        assert!(decode(&bytes, &registry).is_none());
    }

    #[test]
    fn unknown_attribute_skipped_by_declared_length() {
        let registry = sample_registry();
        let bytes = [
            0x00, 0x00, 0x01, 0x00, 0x13, // total_length 19
            0x7F, 0x00, 0x07, 0xDE, 0xAD, 0xBE, 0xEF, // unknown type 0x7F
            0x01, 0x00, 0x07, 0x00, 0x00, 0x00, 0x2A, // MoteId = 42
        ];
        let packet = decode(&bytes, &registry).expect("must terminate and decode");
        let mote = registry.find_attribute(0x01).unwrap();
        assert_eq!(packet.get_values(mote), vec![&Value::Integer(42)]);
    }

    #[test]
    fn zero_length_attribute_fails_instead_of_looping() {
        let registry = sample_registry();
        let bytes = [
            0x00, 0x00, 0x01, 0x00, 0x0C, //
            0x7F, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // attr_length 0
        ];
        assert!(decode(&bytes, &registry).is_none());
    }

    #[test]
    fn attribute_overrunning_buffer_rejected() {
        let registry = sample_registry();
        let bytes = [
            0x00, 0x00, 0x01, 0x00, 0x0A, //
            0x01, 0x00, 0x20, 0x00, 0x00, // claims 32 bytes, 5 remain
        ];
        assert!(decode(&bytes, &registry).is_none());
    }

    #[test]
    fn multiplicity_overflow_dropped_silently() {
        let mut registry = Registry::new();
        let magnitude = registry.register_attribute_kind(AttributeKind::integer(0x03));
        registry.register_packet_kind(
            PacketKind::new(0x0000, 0x01).optional(&magnitude, Multiplicity::AtMost(1)),
        );
        let bytes = [
            0x00, 0x00, 0x01, 0x00, 0x13, //
            0x03, 0x00, 0x07, 0x00, 0x00, 0x00, 0x01, //
            0x03, 0x00, 0x07, 0x00, 0x00, 0x00, 0x02, // beyond max_count
        ];
        let packet = decode(&bytes, &registry).expect("decode still succeeds");
        assert_eq!(packet.get_values(&magnitude), vec![&Value::Integer(1)]);
    }

    #[test]
    fn header_only_packet_decodes_empty() {
        let registry = sample_registry();
        let bytes = [0x00, 0x00, 0x01, 0x00, 0x05];
        let packet = decode(&bytes, &registry).expect("decodes");
        assert!(packet.attributes().is_empty());
    }
}
