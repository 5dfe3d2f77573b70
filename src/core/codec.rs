//! Stream framing codec.
//!
//! [`PacketCodec`] adapts the core encode/decode engine to
//! `tokio_util::codec::{Decoder, Encoder}` so transports can run `Framed`
//! streams. Frames are delimited by the header's `total_length`; partial
//! input is left untouched in the read buffer until the rest arrives.

use std::sync::Arc;

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use super::decode::decode;
use super::layout;
use super::packet::Packet;
use super::registry::Registry;
use crate::error::ProtocolError;

/// Tokio codec carrying the registry it decodes against.
#[derive(Debug, Clone)]
pub struct PacketCodec {
    registry: Arc<Registry>,
}

impl PacketCodec {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }
}

impl Decoder for PacketCodec {
    type Item = Packet;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Packet>, ProtocolError> {
        if src.len() < layout::PACKET_HEADER_LEN {
            return Ok(None);
        }

        let total_length = u16::from_be_bytes([src[3], src[4]]) as usize;
        if total_length < layout::PACKET_HEADER_LEN {
            // cannot even cover its own header; the stream is corrupt
            return Err(ProtocolError::InvalidHeader);
        }
        if src.len() < total_length {
            src.reserve(total_length - src.len());
            return Ok(None);
        }

        let frame = src.split_to(total_length);
        match decode(&frame, &self.registry) {
            Some(packet) => Ok(Some(packet)),
            None => Err(ProtocolError::DecodeFailed),
        }
    }
}

impl Encoder<Packet> for PacketCodec {
    type Error = ProtocolError;

    fn encode(&mut self, packet: Packet, dst: &mut BytesMut) -> Result<(), ProtocolError> {
        let bytes = packet.encode()?;
        dst.reserve(bytes.len());
        dst.extend_from_slice(&bytes);
        Ok(())
    }
}
