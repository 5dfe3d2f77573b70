//! Attribute value kinds and their wire encodings.
//!
//! A single tagged sum type replaces per-kind subclassing: every value is a
//! `Value`, every declared kind a `ValueKind`, and one `write`/`read` pair
//! matches on the tag. All multi-byte fields are big-endian.
//!
//! | kind      | value encoding                               |
//! |-----------|----------------------------------------------|
//! | integer   | 4-byte signed                                |
//! | timestamp | 4-byte unsigned                              |
//! | boolean   | 1 byte                                       |
//! | string    | raw bytes, length implied by the attr header |
//! | octets    | sub-field encodings in schema order          |
//!
//! Inside an octets value a string sub-field carries its own 4-byte signed
//! length prefix; the outer attribute header cannot delimit it. The prefix
//! is wider than the attribute header's u16 length field on purpose: it is
//! part of the sub-field format, not the framing.

use bytes::{BufMut, BytesMut};

use super::layout;

/// Scalar kinds permitted inside an octets schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Integer,
    Boolean,
    Timestamp,
    String,
}

/// Value kind declared by an attribute descriptor.
///
/// `Octets` carries its sub-field schema: an ordered sequence of scalar
/// kinds describing the composite layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueKind {
    Integer,
    Boolean,
    Timestamp,
    String,
    Octets(Vec<FieldKind>),
}

/// One decoded sub-field of an octets value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Integer(i32),
    Boolean(bool),
    Timestamp(u32),
    String(Vec<u8>),
}

impl FieldValue {
    /// The schema kind this value satisfies.
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Integer(_) => FieldKind::Integer,
            FieldValue::Boolean(_) => FieldKind::Boolean,
            FieldValue::Timestamp(_) => FieldKind::Timestamp,
            FieldValue::String(_) => FieldKind::String,
        }
    }

    /// Encoded size in bytes, including the length prefix for strings.
    pub fn wire_len(&self) -> usize {
        match self {
            FieldValue::Integer(_) | FieldValue::Timestamp(_) => layout::SCALAR_WORD_LEN,
            FieldValue::Boolean(_) => layout::BOOLEAN_LEN,
            FieldValue::String(bytes) => layout::STRING_PREFIX_LEN + bytes.len(),
        }
    }

    fn write(&self, buf: &mut BytesMut) {
        match self {
            FieldValue::Integer(v) => buf.put_i32(*v),
            FieldValue::Boolean(v) => buf.put_u8(u8::from(*v)),
            FieldValue::Timestamp(v) => buf.put_u32(*v),
            FieldValue::String(bytes) => {
                buf.put_i32(bytes.len() as i32);
                buf.put_slice(bytes);
            }
        }
    }

    /// Read one sub-field at `cursor`, advancing it past the consumed bytes.
    fn read(kind: FieldKind, bytes: &[u8], cursor: &mut usize) -> Option<FieldValue> {
        match kind {
            FieldKind::Integer => {
                let word = read_word(bytes, cursor)?;
                Some(FieldValue::Integer(i32::from_be_bytes(word)))
            }
            FieldKind::Timestamp => {
                let word = read_word(bytes, cursor)?;
                Some(FieldValue::Timestamp(u32::from_be_bytes(word)))
            }
            FieldKind::Boolean => {
                let byte = *bytes.get(*cursor)?;
                *cursor += layout::BOOLEAN_LEN;
                Some(FieldValue::Boolean(byte != 0))
            }
            FieldKind::String => {
                let prefix = i32::from_be_bytes(read_word(bytes, cursor)?);
                let len = usize::try_from(prefix).ok()?;
                let raw = bytes.get(*cursor..*cursor + len)?;
                *cursor += len;
                Some(FieldValue::String(raw.to_vec()))
            }
        }
    }
}

/// Attribute value. The shape must match the declaring kind's `ValueKind`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Integer(i32),
    Boolean(bool),
    Timestamp(u32),
    String(Vec<u8>),
    Octets(Vec<FieldValue>),
}

impl Value {
    /// Whether this value's shape satisfies `kind`.
    ///
    /// For octets the sub-values must match the schema position by position.
    pub fn matches(&self, kind: &ValueKind) -> bool {
        match (self, kind) {
            (Value::Integer(_), ValueKind::Integer) => true,
            (Value::Boolean(_), ValueKind::Boolean) => true,
            (Value::Timestamp(_), ValueKind::Timestamp) => true,
            (Value::String(_), ValueKind::String) => true,
            (Value::Octets(fields), ValueKind::Octets(schema)) => {
                fields.len() == schema.len()
                    && fields.iter().zip(schema).all(|(f, k)| f.kind() == *k)
            }
            _ => false,
        }
    }

    /// Encoded size of the value bytes (attribute header excluded).
    pub fn wire_len(&self) -> usize {
        match self {
            Value::Integer(_) | Value::Timestamp(_) => layout::SCALAR_WORD_LEN,
            Value::Boolean(_) => layout::BOOLEAN_LEN,
            Value::String(bytes) => bytes.len(),
            Value::Octets(fields) => fields.iter().map(FieldValue::wire_len).sum(),
        }
    }

    /// Append the value bytes to `buf`.
    pub fn write(&self, buf: &mut BytesMut) {
        match self {
            Value::Integer(v) => buf.put_i32(*v),
            Value::Boolean(v) => buf.put_u8(u8::from(*v)),
            Value::Timestamp(v) => buf.put_u32(*v),
            Value::String(bytes) => buf.put_slice(bytes),
            Value::Octets(fields) => {
                for field in fields {
                    field.write(buf);
                }
            }
        }
    }

    /// Decode a value of `kind` from an attribute's value bytes.
    ///
    /// Fixed-width scalars must occupy the slice exactly; a string takes the
    /// whole slice as-is. An octets value walks the schema in order and stops
    /// once every sub-field is consumed, ignoring trailing bytes. Returns
    /// `None` when the slice cannot satisfy the declared kind.
    pub fn read(kind: &ValueKind, bytes: &[u8]) -> Option<Value> {
        match kind {
            ValueKind::Integer => {
                let word: [u8; 4] = bytes.try_into().ok()?;
                Some(Value::Integer(i32::from_be_bytes(word)))
            }
            ValueKind::Timestamp => {
                let word: [u8; 4] = bytes.try_into().ok()?;
                Some(Value::Timestamp(u32::from_be_bytes(word)))
            }
            ValueKind::Boolean => match bytes {
                [byte] => Some(Value::Boolean(*byte != 0)),
                _ => None,
            },
            ValueKind::String => Some(Value::String(bytes.to_vec())),
            ValueKind::Octets(schema) => {
                let mut cursor = 0usize;
                let mut fields = Vec::with_capacity(schema.len());
                for field_kind in schema {
                    fields.push(FieldValue::read(*field_kind, bytes, &mut cursor)?);
                }
                Some(Value::Octets(fields))
            }
        }
    }
}

fn read_word(bytes: &[u8], cursor: &mut usize) -> Option<[u8; 4]> {
    let word: [u8; 4] = bytes
        .get(*cursor..*cursor + layout::SCALAR_WORD_LEN)?
        .try_into()
        .ok()?;
    *cursor += layout::SCALAR_WORD_LEN;
    Some(word)
}
