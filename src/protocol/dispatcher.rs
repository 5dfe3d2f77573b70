use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::core::packet::Packet;
use crate::error::{ProtocolError, Result};

type HandlerFn = dyn Fn(&Packet) -> Result<Packet> + Send + Sync + 'static;

/// Routes decoded packets to handlers by their wire identity.
///
/// Handlers are keyed by `(application_id, code)`, the same pair the
/// registry resolves packet kinds with, so one dispatcher serves a whole
/// application vocabulary. Registration normally happens once at startup;
/// dispatch is read-mostly and cheap to share behind an `Arc`.
pub struct Dispatcher {
    handlers: Arc<RwLock<HashMap<(u16, u8), Box<HandlerFn>>>>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register a handler for packets of `(application_id, code)`.
    ///
    /// Registering again for the same pair replaces the previous handler.
    pub fn register<F>(&self, application_id: u16, code: u8, handler: F) -> Result<()>
    where
        F: Fn(&Packet) -> Result<Packet> + Send + Sync + 'static,
    {
        let mut handlers = self.handlers.write().map_err(|_| {
            ProtocolError::TransportError("Failed to acquire write lock on dispatcher".to_string())
        })?;

        handlers.insert((application_id, code), Box::new(handler));
        Ok(())
    }

    /// Route a decoded packet to its handler and return the reply packet.
    pub fn dispatch(&self, packet: &Packet) -> Result<Packet> {
        let kind = packet.kind();
        let key = (kind.application_id, kind.code);

        let handlers = self.handlers.read().map_err(|_| {
            ProtocolError::TransportError("Failed to acquire read lock on dispatcher".to_string())
        })?;

        handlers
            .get(&key)
            .ok_or(ProtocolError::UnhandledPacket {
                application_id: key.0,
                code: key.1,
            })
            .and_then(|handler| handler(packet))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::packet::PacketKind;
    use std::sync::Arc;

    #[test]
    fn unregistered_route_is_an_error() {
        let dispatcher = Dispatcher::new();
        let packet = Packet::new(Arc::new(PacketKind::new(0x00A0, 0x01)));
        assert!(matches!(
            dispatcher.dispatch(&packet),
            Err(ProtocolError::UnhandledPacket {
                application_id: 0x00A0,
                code: 0x01
            })
        ));
    }

    #[test]
    fn handler_receives_matching_packets() {
        let dispatcher = Dispatcher::new();
        let request_kind = Arc::new(PacketKind::new(0x00A0, 0x01));
        let reply_kind = Arc::new(PacketKind::new(0x00A0, 0x02));

        let reply = Arc::clone(&reply_kind);
        dispatcher
            .register(0x00A0, 0x01, move |_| Ok(Packet::new(Arc::clone(&reply))))
            .unwrap();

        let response = dispatcher.dispatch(&Packet::new(request_kind)).unwrap();
        assert_eq!(response.kind().code, reply_kind.code);
    }

    #[test]
    fn re_registration_replaces_handler() {
        let dispatcher = Dispatcher::new();
        let kind = Arc::new(PacketKind::new(0x00A0, 0x01));

        let first = Arc::new(PacketKind::new(0x00A0, 0x10));
        let second = Arc::new(PacketKind::new(0x00A0, 0x20));
        let k = Arc::clone(&first);
        dispatcher
            .register(0x00A0, 0x01, move |_| Ok(Packet::new(Arc::clone(&k))))
            .unwrap();
        let k = Arc::clone(&second);
        dispatcher
            .register(0x00A0, 0x01, move |_| Ok(Packet::new(Arc::clone(&k))))
            .unwrap();

        let response = dispatcher.dispatch(&Packet::new(kind)).unwrap();
        assert_eq!(response.kind().code, 0x20);
    }
}
