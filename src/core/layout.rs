//! Wire layout constants.
//!
//! Single source of truth for field widths and offsets. Everything on the
//! wire is big-endian.
//!
//! ```text
//! Packet    := application_id:u16 code:u8 total_length:u16 attribute*
//! Attribute := type_id:u8 attr_length:u16 value
//! ```
//!
//! `total_length` counts the whole packet including its own 5-byte header;
//! `attr_length` counts the attribute including its own 3-byte header.

/// Size of the packet header in bytes.
pub const PACKET_HEADER_LEN: usize = 5;
/// Size of an attribute header in bytes.
pub const ATTR_HEADER_LEN: usize = 3;

/// Offset of the `code` field within the packet header.
pub const CODE_OFFSET: usize = 2;
/// Offset of the `type_id` field within an attribute header.
pub const ATTR_TYPE_OFFSET: usize = 0;

/// Largest encodable packet: `total_length` is a u16.
pub const MAX_PACKET_LEN: usize = u16::MAX as usize;
/// Largest encodable attribute: `attr_length` is a u16.
pub const MAX_ATTR_LEN: usize = u16::MAX as usize;

/// Wire width of an integer or timestamp scalar.
pub const SCALAR_WORD_LEN: usize = 4;
/// Wire width of a boolean scalar.
pub const BOOLEAN_LEN: usize = 1;
/// Wire width of the signed length prefix in front of an octets string field.
pub const STRING_PREFIX_LEN: usize = 4;
