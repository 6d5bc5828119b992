//! The adapter capability.
//!
//! An adapter bridges the host application to one external chat platform
//! (a Discord bot, a Telegram bot, ...). Implementations live outside this
//! crate; the registry only ever sees them through the [`Adapter`] trait.
//!
//! # Contract
//!
//! - [`identifier()`](Adapter::identifier) must be stable for the lifetime of
//!   the adapter and unique among adapters registered at the same time. The
//!   registry keys replacement and removal purely on this string; object
//!   identity is irrelevant.
//! - [`handle_message()`](Adapter::handle_message) delivers one outbound
//!   message to the external platform. It is called synchronously on the
//!   broadcasting thread, so a slow handler stalls the broadcast.
//! - [`is_active()`](Adapter::is_active) reports liveness; the registry
//!   checks it before calling [`shutdown()`](Adapter::shutdown) so an
//!   already-stopped adapter is never torn down twice.
//! - [`shutdown()`](Adapter::shutdown) releases the adapter's resources.
//!   After it returns the registry never dispatches to the adapter again.
//!
//! To deliver a message it received from its platform, an adapter calls
//! `AdapterRegistry::receive_from_adapter` with an externally-originated
//! [`Message`](crate::Message).

use std::sync::Arc;

use crate::error::AdapterResult;
use crate::message::Message;

/// A pluggable bridge to one external chat platform.
pub trait Adapter: Send + Sync {
    /// Stable identifier of this adapter, unique among registered adapters.
    fn identifier(&self) -> &str;

    /// Delivers an outbound message to the external platform.
    ///
    /// Errors are logged by the registry and do not affect delivery to
    /// other adapters.
    fn handle_message(&self, message: &Message) -> AdapterResult<()>;

    /// Returns true while the adapter is running and able to deliver.
    fn is_active(&self) -> bool;

    /// Stops the adapter and releases its resources.
    ///
    /// Called at most once by the registry, and only while
    /// [`is_active()`](Self::is_active) reports true.
    fn shutdown(&self) -> AdapterResult<()>;
}

/// A shared, type-erased adapter handle as stored by the registry.
pub type SharedAdapter = Arc<dyn Adapter>;
