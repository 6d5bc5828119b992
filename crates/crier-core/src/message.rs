//! The chat message model shared by the host and all adapters.
//!
//! A [`Message`] is the single unit of exchange crossing the bridge boundary.
//! Every message carries its sender and content plus an explicit [`Origin`]
//! discriminant telling which side of the bridge produced it:
//!
//! - [`Origin::Host`]: sent by an end-user of the host application (a player
//!   on the game server). The platform tag is the fixed [`HOST_PLATFORM`]
//!   constant.
//! - [`Origin::External`]: sent by a user on an external platform and handed
//!   to us by an adapter. The platform tag is whatever the adapter supplied
//!   at construction time (`"discord"`, `"telegram"`, ...).
//!
//! The origin drives routing: host messages flow outward to adapters,
//! external messages flow inward to the host sink. Routing code matches on
//! the discriminant rather than inspecting the platform string.
//!
//! Messages are immutable once constructed; there are no public mutators.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// Platform tag reported for messages that originate from the host
/// application itself.
pub const HOST_PLATFORM: &str = "host";

/// Which side of the bridge a message originated from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "origin", rename_all = "snake_case")]
pub enum Origin {
    /// Sent by an end-user of the host application.
    Host,
    /// Sent by a user on an external platform, delivered via an adapter.
    External {
        /// Name of the platform the adapter bridges to.
        platform: String,
    },
}

/// A chat-style message crossing the bridge in either direction.
///
/// # Example
///
/// ```
/// use crier_core::{HOST_PLATFORM, Message};
///
/// let outbound = Message::from_host("u1", "Steve", "hello from the server");
/// assert_eq!(outbound.platform(), HOST_PLATFORM);
///
/// let inbound = Message::from_platform("d#42", "steve_d", "hi!", "discord");
/// assert!(inbound.is_external());
/// assert_eq!(inbound.platform(), "discord");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    sender_id: String,
    sender_name: String,
    content: String,
    #[serde(flatten)]
    origin: Origin,
}

impl Message {
    /// Creates a message sent by an end-user of the host application.
    pub fn from_host(
        sender_id: impl Into<String>,
        sender_name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            sender_id: sender_id.into(),
            sender_name: sender_name.into(),
            content: content.into(),
            origin: Origin::Host,
        }
    }

    /// Creates a message received from an external platform.
    ///
    /// `platform` identifies the producing platform and becomes the
    /// message's [`platform()`](Self::platform) tag.
    pub fn from_platform(
        sender_id: impl Into<String>,
        sender_name: impl Into<String>,
        content: impl Into<String>,
        platform: impl Into<String>,
    ) -> Self {
        Self {
            sender_id: sender_id.into(),
            sender_name: sender_name.into(),
            content: content.into(),
            origin: Origin::External {
                platform: platform.into(),
            },
        }
    }

    /// Stable identifier of the originating user or account.
    pub fn sender_id(&self) -> &str {
        &self.sender_id
    }

    /// Display name of the sender. Not guaranteed unique.
    pub fn sender_name(&self) -> &str {
        &self.sender_name
    }

    /// The message body.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// The origin discriminant.
    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    /// The platform tag: [`HOST_PLATFORM`] for host messages, the
    /// adapter-supplied name otherwise.
    pub fn platform(&self) -> &str {
        match &self.origin {
            Origin::Host => HOST_PLATFORM,
            Origin::External { platform } => platform,
        }
    }

    /// Returns true if this message originated from an external platform.
    pub fn is_external(&self) -> bool {
        matches!(self.origin, Origin::External { .. })
    }

    /// Returns true if this message originated from the host application.
    pub fn is_host(&self) -> bool {
        matches!(self.origin, Origin::Host)
    }
}

impl Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.platform(),
            self.sender_name,
            self.content
        )
    }
}
