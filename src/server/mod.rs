//! Connection acceptance and admission control.

pub mod listener;
pub mod slots;

pub use listener::Server;
pub use slots::ConnectionSlots;
