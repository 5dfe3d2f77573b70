//! Type registry: the application's declared protocol vocabulary.
//!
//! Two independent catalogs map wire identifiers back to descriptors:
//! attribute kinds by `type_id`, packet kinds by `(application_id, code)`.
//! A registry is populated once at startup and shared read-only afterwards
//! (typically behind an `Arc`); no locking is needed for concurrent
//! encode/decode callers.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::attribute::AttributeKind;
use super::packet::PacketKind;

/// Catalogs of registered attribute and packet kinds.
#[derive(Debug, Default)]
pub struct Registry {
    attributes: HashMap<u8, Arc<AttributeKind>>,
    packets: HashMap<(u16, u8), Arc<PacketKind>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an attribute kind, returning its shared handle.
    ///
    /// Registration is idempotent: the first kind registered for a
    /// `type_id` wins, and later registrations return the existing handle
    /// unchanged. A later registration that disagrees with the stored
    /// descriptor is logged and ignored.
    pub fn register_attribute_kind(&mut self, kind: AttributeKind) -> Arc<AttributeKind> {
        if let Some(existing) = self.attributes.get(&kind.type_id) {
            if **existing != kind {
                debug!(type_id = kind.type_id, "conflicting attribute kind registration ignored");
            }
            return Arc::clone(existing);
        }
        let handle = Arc::new(kind);
        self.attributes.insert(handle.type_id, Arc::clone(&handle));
        handle
    }

    /// Register a packet kind, returning its shared handle.
    ///
    /// Same idempotence rule as [`Registry::register_attribute_kind`],
    /// keyed by `(application_id, code)`.
    pub fn register_packet_kind(&mut self, kind: PacketKind) -> Arc<PacketKind> {
        let key = (kind.application_id, kind.code);
        if let Some(existing) = self.packets.get(&key) {
            if **existing != kind {
                debug!(
                    application_id = kind.application_id,
                    code = kind.code,
                    "conflicting packet kind registration ignored"
                );
            }
            return Arc::clone(existing);
        }
        let handle = Arc::new(kind);
        self.packets.insert(key, Arc::clone(&handle));
        handle
    }

    /// Look up an attribute kind by wire `type_id`.
    pub fn find_attribute(&self, type_id: u8) -> Option<&Arc<AttributeKind>> {
        self.attributes.get(&type_id)
    }

    /// Look up a packet kind by `(application_id, code)`.
    pub fn find_packet(&self, application_id: u16, code: u8) -> Option<&Arc<PacketKind>> {
        self.packets.get(&(application_id, code))
    }

    /// Number of registered attribute kinds.
    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    /// Number of registered packet kinds.
    pub fn packet_count(&self) -> usize {
        self.packets.len()
    }
}
