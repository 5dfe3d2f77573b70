//! # Core Protocol Components
//!
//! The encode/decode engine and the type-registry model.
//!
//! This module is pure in-memory byte transformation: no I/O, no blocking,
//! no shared mutable state. Registries are populated at startup and shared
//! read-only; every decode produces a freshly owned packet.
//!
//! ## Components
//! - **Layout**: fixed-width field definitions, byte order, size limits
//! - **Value**: per-kind value encodings (integer, boolean, timestamp,
//!   string, composite octets)
//! - **Attribute / Packet**: descriptors plus instances with multiplicity
//!   enforcement
//! - **Registry**: wire identifier to descriptor lookup
//! - **Decode**: raw buffer to packet reconstruction
//! - **Codec**: tokio codec for framing packets over byte streams
//!
//! ## Wire Format
//! ```text
//! [application_id(2)] [code(1)] [total_length(2)] [attribute...]
//! [type_id(1)] [attr_length(2)] [value(attr_length-3)]
//! ```

pub mod attribute;
pub mod codec;
pub mod decode;
pub mod layout;
pub mod packet;
pub mod registry;
pub mod value;

pub use attribute::{Attribute, AttributeKind};
pub use codec::PacketCodec;
pub use decode::decode;
pub use packet::{Multiplicity, Packet, PacketKind};
pub use registry::Registry;
pub use value::{FieldKind, FieldValue, Value, ValueKind};
