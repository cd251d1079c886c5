//! Application layer: port traits, the receiver service, and its events.

pub mod events;
pub mod ports;
pub mod service;
