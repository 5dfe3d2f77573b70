//! Packet routing on top of the core engine.

pub mod dispatcher;


pub use dispatcher::Dispatcher;
