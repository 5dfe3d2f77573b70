//! Attribute descriptors and instances.
//!
//! An [`AttributeKind`] is an immutable descriptor registered once at
//! startup: the wire `type_id` plus the declared value kind. Instances hold
//! a shared handle to their descriptor rather than subclassing it.

use std::sync::Arc;

use bytes::{BufMut, BytesMut};

use super::layout;
use super::value::{FieldKind, Value, ValueKind};
use crate::error::{ProtocolError, Result};

/// Descriptor for one attribute vocabulary entry.
///
/// `type_id` must be unique within a registry; the registry enforces this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeKind {
    pub type_id: u8,
    pub value_kind: ValueKind,
}

impl AttributeKind {
    pub fn new(type_id: u8, value_kind: ValueKind) -> Self {
        Self {
            type_id,
            value_kind,
        }
    }

    pub fn integer(type_id: u8) -> Self {
        Self::new(type_id, ValueKind::Integer)
    }

    pub fn boolean(type_id: u8) -> Self {
        Self::new(type_id, ValueKind::Boolean)
    }

    pub fn timestamp(type_id: u8) -> Self {
        Self::new(type_id, ValueKind::Timestamp)
    }

    pub fn string(type_id: u8) -> Self {
        Self::new(type_id, ValueKind::String)
    }

    pub fn octets(type_id: u8, schema: Vec<FieldKind>) -> Self {
        Self::new(type_id, ValueKind::Octets(schema))
    }
}

/// One attribute instance inside a packet: a descriptor handle plus a value
/// whose shape matches the descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    kind: Arc<AttributeKind>,
    value: Value,
}

impl Attribute {
    /// Pair a value with its descriptor, rejecting shape mismatches so a
    /// mistyped value can never reach the wire.
    pub fn new(kind: Arc<AttributeKind>, value: Value) -> Result<Self> {
        if !value.matches(&kind.value_kind) {
            return Err(ProtocolError::ValueMismatch(kind.type_id));
        }
        Ok(Self { kind, value })
    }

    pub fn kind(&self) -> &Arc<AttributeKind> {
        &self.kind
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Encoded size including the 3-byte attribute header.
    pub fn wire_len(&self) -> usize {
        layout::ATTR_HEADER_LEN + self.value.wire_len()
    }

    /// Append header and value bytes to `buf`.
    pub fn encode(&self, buf: &mut BytesMut) -> Result<()> {
        let attr_len = self.wire_len();
        if attr_len > layout::MAX_ATTR_LEN {
            return Err(ProtocolError::OversizedAttribute {
                type_id: self.kind.type_id,
                len: self.value.wire_len(),
            });
        }
        buf.put_u8(self.kind.type_id);
        buf.put_u16(attr_len as u16);
        self.value.write(buf);
        Ok(())
    }

    /// Rebuild an instance from the value bytes of a decoded attribute.
    ///
    /// `value_bytes` is the slice delimited by `attr_length`; `None` means
    /// the bytes cannot satisfy the declared kind.
    pub fn decode(kind: Arc<AttributeKind>, value_bytes: &[u8]) -> Option<Self> {
        let value = Value::read(&kind.value_kind, value_bytes)?;
        Some(Self { kind, value })
    }
}
