//! Transport layer: moving encoded packets between peers.
//!
//! The core engine stays transport-agnostic; this module supplies the TCP
//! request/reply plumbing around it.

pub mod tcp;

pub use tcp::{connect, serve, serve_on, serve_with_shutdown, Client};
