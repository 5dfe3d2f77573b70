//! # TLV Protocol
//!
//! Generic Type-Length-Value application protocol: a byte-exact wire
//! encoding for packets composed of typed attributes, plus registries that
//! let an application declare its own packet and attribute vocabulary.
//!
//! The core is pure in-memory transformation — `encode(packet) -> bytes`
//! and `decode(bytes, registry) -> Option<Packet>` — with a tokio codec and
//! TCP request/reply transport layered on top.
//!
//! ## Wire Format
//! ```text
//! [application_id(2)] [code(1)] [total_length(2)] [attribute...]
//! [type_id(1)] [attr_length(2)] [value(attr_length-3)]
//! ```
//! All multi-byte fields are big-endian. `total_length` covers the whole
//! packet including its 5-byte header.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use tlv_protocol::core::{
//!     decode, Attribute, AttributeKind, Multiplicity, Packet, PacketKind, Registry, Value,
//! };
//!
//! # fn main() -> tlv_protocol::error::Result<()> {
//! // Declare the vocabulary once at startup.
//! let mut registry = Registry::new();
//! let mote_id = registry.register_attribute_kind(AttributeKind::integer(0x01));
//! let request = registry.register_packet_kind(
//!     PacketKind::new(0x0000, 0x01).mandatory(&mote_id, Multiplicity::Unbounded),
//! );
//!
//! // Build and encode a packet.
//! let mut packet = Packet::new(Arc::clone(&request));
//! assert!(packet.add_attribute(Attribute::new(Arc::clone(&mote_id), Value::Integer(123))?));
//! let bytes = packet.encode()?;
//!
//! // Decode it back against the same registry.
//! let reply = decode(&bytes, &registry).expect("well-formed packet");
//! assert_eq!(reply.get_values(&mote_id), vec![&Value::Integer(123)]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Model
//! Expected malformed input is reported through sentinel values —
//! `decode` returns `None`, `Packet::add_attribute` returns `false` — so a
//! hostile peer can never panic the process. Typed [`error::ProtocolError`]
//! values cover I/O, framing, configuration, and encode-time validation.

pub mod config;
pub mod core;
pub mod error;
pub mod protocol;
pub mod transport;
pub mod utils;

pub use config::ProtocolConfig;
pub use core::{
    decode, Attribute, AttributeKind, FieldKind, FieldValue, Multiplicity, Packet, PacketCodec,
    PacketKind, Registry, Value, ValueKind,
};
pub use error::{ProtocolError, Result};
pub use protocol::Dispatcher;
pub use transport::Client;
