//! Packet descriptors and the packet model.
//!
//! A [`PacketKind`] declares which attribute kinds a packet may carry and
//! how many times each may appear. A [`Packet`] holds the ordered attribute
//! instances of one message and serializes them behind the 5-byte header.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::{BufMut, Bytes, BytesMut};

use super::attribute::{Attribute, AttributeKind};
use super::layout;
use super::value::Value;
use crate::error::{ProtocolError, Result};

/// Maximum number of occurrences of one attribute kind in a packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Multiplicity {
    AtMost(u32),
    Unbounded,
}

impl Multiplicity {
    /// Whether another instance may be added given the current count.
    pub fn allows(self, current: usize) -> bool {
        match self {
            Multiplicity::AtMost(max) => current < max as usize,
            Multiplicity::Unbounded => true,
        }
    }
}

/// Descriptor for one packet vocabulary entry.
///
/// `(application_id, code)` must be unique within a registry. The attribute
/// tables are keyed by wire `type_id`, the identity the registry guarantees
/// unique per attribute kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketKind {
    pub application_id: u16,
    pub code: u8,
    mandatory: HashMap<u8, Multiplicity>,
    optional: HashMap<u8, Multiplicity>,
}

impl PacketKind {
    pub fn new(application_id: u16, code: u8) -> Self {
        Self {
            application_id,
            code,
            mandatory: HashMap::new(),
            optional: HashMap::new(),
        }
    }

    /// Declare a mandatory attribute kind with its maximum count.
    pub fn mandatory(mut self, kind: &AttributeKind, multiplicity: Multiplicity) -> Self {
        self.mandatory.insert(kind.type_id, multiplicity);
        self
    }

    /// Declare an optional attribute kind with its maximum count.
    pub fn optional(mut self, kind: &AttributeKind, multiplicity: Multiplicity) -> Self {
        self.optional.insert(kind.type_id, multiplicity);
        self
    }

    /// Multiplicity for `type_id`, consulting the mandatory table first.
    pub fn multiplicity_of(&self, type_id: u8) -> Option<Multiplicity> {
        self.mandatory
            .get(&type_id)
            .or_else(|| self.optional.get(&type_id))
            .copied()
    }

    /// Type ids of all mandatory attribute kinds.
    pub fn mandatory_type_ids(&self) -> impl Iterator<Item = u8> + '_ {
        self.mandatory.keys().copied()
    }
}

/// One packet instance: a kind handle plus attributes in insertion order.
///
/// Created empty, filled via [`Packet::add_attribute`], consumed read-only
/// by [`Packet::encode`]. Attribute instances are owned exclusively.
#[derive(Debug, Clone)]
pub struct Packet {
    kind: Arc<PacketKind>,
    attributes: Vec<Attribute>,
}

impl Packet {
    pub fn new(kind: Arc<PacketKind>) -> Self {
        Self {
            kind,
            attributes: Vec::new(),
        }
    }

    pub fn kind(&self) -> &Arc<PacketKind> {
        &self.kind
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Number of instances of `kind` currently in the packet.
    pub fn count(&self, kind: &AttributeKind) -> usize {
        self.count_type(kind.type_id)
    }

    fn count_type(&self, type_id: u8) -> usize {
        self.attributes
            .iter()
            .filter(|attr| attr.kind().type_id == type_id)
            .count()
    }

    /// Append an attribute, subject to this packet kind's declaration.
    ///
    /// Returns `false` without modifying the packet when the attribute kind
    /// is absent from both the mandatory and optional tables, or when its
    /// maximum count is already reached. No panic, no error: the caller
    /// decides whether a rejection is fatal.
    pub fn add_attribute(&mut self, attribute: Attribute) -> bool {
        let type_id = attribute.kind().type_id;
        match self.kind.multiplicity_of(type_id) {
            Some(multiplicity) if multiplicity.allows(self.count_type(type_id)) => {
                self.attributes.push(attribute);
                true
            }
            _ => false,
        }
    }

    /// All values of `kind` present in the packet, in insertion order.
    pub fn get_values(&self, kind: &AttributeKind) -> Vec<&Value> {
        self.attributes
            .iter()
            .filter(|attr| attr.kind().type_id == kind.type_id)
            .map(Attribute::value)
            .collect()
    }

    /// Serialize the packet, enforcing the kind's declaration.
    ///
    /// Every mandatory attribute kind must be present at least once;
    /// otherwise [`ProtocolError::MissingMandatoryAttribute`] is returned
    /// and nothing is written.
    pub fn encode(&self) -> Result<Bytes> {
        for type_id in self.kind.mandatory_type_ids() {
            if self.count_type(type_id) == 0 {
                return Err(ProtocolError::MissingMandatoryAttribute(type_id));
            }
        }
        self.encode_unchecked()
    }

    /// Serialize without the mandatory-presence check.
    ///
    /// Wire-compatible with peers that tolerate incomplete packets; length
    /// limits still apply.
    pub fn encode_unchecked(&self) -> Result<Bytes> {
        let mut body = BytesMut::new();
        for attribute in &self.attributes {
            attribute.encode(&mut body)?;
        }

        let total_length = layout::PACKET_HEADER_LEN + body.len();
        if total_length > layout::MAX_PACKET_LEN {
            return Err(ProtocolError::OversizedPacket(total_length));
        }

        let mut buf = BytesMut::with_capacity(total_length);
        buf.put_u16(self.kind.application_id);
        buf.put_u8(self.kind.code);
        buf.put_u16(total_length as u16);
        buf.extend_from_slice(&body);
        Ok(buf.freeze())
    }
}
