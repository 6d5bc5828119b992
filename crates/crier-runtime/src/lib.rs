//! Crier Runtime - Adapter registry and message routing for the crier chat
//! bridge.
//!
//! This crate provides:
//! - The [`AdapterRegistry`]: the stateful hub owning registered adapters,
//!   the optional message filter, and the host's inbound sink
//! - Logging configuration ([`LoggingBuilder`])
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use crier_core::Message;
//! use crier_runtime::AdapterRegistry;
//!
//! let registry = Arc::new(AdapterRegistry::new());
//!
//! // Host startup: install the inbound sink, then register adapters.
//! registry.set_inbound_sink(|msg| println!("{msg}"));
//! registry.register(Arc::new(DiscordAdapter::connect(token)?));
//!
//! // Outbound: player chat goes to every adapter.
//! registry.broadcast(Message::from_host("u1", "Steve", "hello"));
//!
//! // Inbound: adapters hand external messages back through the registry.
//! registry.receive_from_adapter(Message::from_platform(
//!     "d#42", "steve_d", "hi!", "discord",
//! ));
//! ```

pub mod logging;
pub mod registry;

// Re-exports
pub use logging::LoggingBuilder;
pub use registry::{AdapterRegistry, InboundSink, MessageFilter, RegistryStats};

// Re-export tracing for use by adapter crates
pub use tracing;
pub use tracing_subscriber;

/// Prelude module for convenient imports.
///
/// This provides the commonly used logging macros:
/// - `trace!`, `debug!`, `info!`, `warn!`, `error!`
/// - `span`, `event`
/// - `instrument` attribute
/// - `Level` for span creation
pub mod prelude {
    pub use tracing::{Level, debug, error, event, info, instrument, span, trace, warn};
}
