//! # Crier Core
//!
//! Foundation types for the crier chat bridge.
//!
//! This crate defines the pieces every side of the bridge agrees on:
//!
//! - **Message model**: the [`Message`] struct with its [`Origin`]
//!   discriminant distinguishing host-originated from externally-originated
//!   messages.
//! - **Adapter capability**: the [`Adapter`] trait implemented by each
//!   external-platform bridge, and the [`SharedAdapter`] handle the registry
//!   stores.
//! - **Error taxonomy**: [`AdapterError`] and [`AdapterResult`] for
//!   failures at the adapter boundary.
//!
//! The registry and router that tie these together live in `crier-runtime`.

pub mod adapter;
pub mod error;
pub mod message;

pub use adapter::{Adapter, SharedAdapter};
pub use error::{AdapterError, AdapterResult};
pub use message::{HOST_PLATFORM, Message, Origin};
