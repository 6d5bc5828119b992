//! # Crier
//!
//! An in-process chat bridge API for game servers.
//!
//! ## Overview
//!
//! Crier lets a host application (typically a game server) exchange
//! chat-like messages with any number of pluggable external-platform
//! adapters: Discord bridges, Telegram bridges, and so on. The host and the
//! adapters never talk to each other directly; everything passes through
//! one [`AdapterRegistry`](crier_runtime::AdapterRegistry).
//!
//! ## Architecture
//!
//! ```text
//!                         ┌──────────────────┐
//!  host ── broadcast ────▶│ AdapterRegistry  │──▶ filter ──▶ adapter "discord"
//!                         │  (crier-runtime) │          ──▶ adapter "telegram"
//!  host ◀── inbound sink ─│                  │          ──▶ adapter ...
//!                         └──────────────────┘
//!                                  ▲
//!                adapter ── receive_from_adapter ──▶ filter ──▶ sink
//! ```
//!
//! - **Host**: constructs the registry, installs the inbound sink, and
//!   broadcasts host-side chat
//! - **Adapters**: implement [`Adapter`](crier_core::Adapter) and hand
//!   external messages back via `receive_from_adapter`
//! - **Filter**: one optional transform/veto function applied to every
//!   message in both directions
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use crier::prelude::*;
//!
//! let registry = Arc::new(AdapterRegistry::new());
//! registry.set_inbound_sink(|msg| game_chat::show(&msg));
//! registry.register(Arc::new(DiscordAdapter::connect(token)?));
//!
//! registry.broadcast(Message::from_host("u1", "Steve", "hello"));
//! ```

pub use crier_core as core;
pub use crier_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use crier::prelude::*;
/// ```
pub mod prelude {
    pub use crier_core::{
        Adapter, AdapterError, AdapterResult, HOST_PLATFORM, Message, Origin, SharedAdapter,
    };
    pub use crier_runtime::{AdapterRegistry, LoggingBuilder, RegistryStats};
}
