//! # Error Types
//!
//! Error handling for the TLV protocol.
//!
//! This module defines all error variants that can occur during protocol
//! operations, from low-level I/O errors to encode-time validation failures.
//!
//! ## Error Categories
//! - **I/O Errors**: Network failures while talking to a peer
//! - **Framing Errors**: Invalid or oversized packet headers on a stream
//! - **Encoding Errors**: Packets that violate their kind's declaration
//! - **Dispatch Errors**: Packets nobody registered a handler for
//! - **Configuration Errors**: Bad TOML or invalid settings
//!
//! Expected malformed *input* is not an error: `decode` reports failure with
//! `None` and `Packet::add_attribute` with `false`, so callers can tell
//! "no packet could be built" apart from a broken transport.
//!
//! All errors implement `std::error::Error` for interoperability.

use std::io;
use thiserror::Error;

/// Primary error type for all protocol operations.
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid protocol header")]
    InvalidHeader,

    #[error("Packet too large: {0} bytes")]
    OversizedPacket(usize),

    #[error("Attribute 0x{type_id:02x} too large: {len} value bytes")]
    OversizedAttribute { type_id: u8, len: usize },

    #[error("Value shape does not match attribute kind 0x{0:02x}")]
    ValueMismatch(u8),

    #[error("Mandatory attribute 0x{0:02x} missing at encode time")]
    MissingMandatoryAttribute(u8),

    #[error("Received packet could not be decoded")]
    DecodeFailed,

    #[error("No handler for packet (application 0x{application_id:04x}, code 0x{code:02x})")]
    UnhandledPacket { application_id: u16, code: u8 },

    #[error("Connection closed")]
    ConnectionClosed,

    #[error("Operation timed out")]
    Timeout,

    #[error("Transport error: {0}")]
    TransportError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Type alias for Results using ProtocolError
pub type Result<T> = std::result::Result<T, ProtocolError>;
