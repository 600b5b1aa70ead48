pub mod config;
pub mod core;
pub mod providers;
pub mod registry;
pub mod runtime;
pub mod server;
pub mod streaming;
pub mod transport;

#[cfg(test)]
mod testing;

pub use config::GatewayConfig;
pub use core::types::*;
pub use runtime::{Gateway, GatewayBuilder};
pub use server::GatewayServer;
