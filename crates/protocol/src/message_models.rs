//! Conversation message models.
//!
//! This module defines the entries of a workflow conversation log and the
//! read-only snapshot that rendering consumers receive after every change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;
use uuid::Uuid;

/// Opaque identifier of a conversation message.
///
/// Ids are random (UUID v4) and unique for the lifetime of one engine.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, TS)]
pub struct MessageId(#[ts(type = "string")] Uuid);

impl MessageId {
    /// Generate a fresh, random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// First eight characters, used for compact display.
    pub fn short(&self) -> String {
        self.0.to_string().chars().take(8).collect()
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for MessageId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for MessageId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Actor that produced a message.
///
/// `System` and `User` entries are permanent. `Loading` is a transient
/// placeholder for simulated in-progress work; a log holds at most one.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Loading,
}

impl MessageRole {
    pub fn is_loading(self) -> bool {
        matches!(self, MessageRole::Loading)
    }
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Loading => "loading",
        };
        f.write_str(name)
    }
}

/// Roles accepted for permanent messages.
///
/// Loading entries go through the dedicated loading operations, so they
/// cannot be created as permanent messages.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, TS)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
}

impl From<ChatRole> for MessageRole {
    fn from(role: ChatRole) -> Self {
        match role {
            ChatRole::System => MessageRole::System,
            ChatRole::User => MessageRole::User,
        }
    }
}

/// A single entry in the conversation log.
///
/// The payload `C` is opaque: the engine stores and returns it but never
/// inspects it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
pub struct Message<C> {
    /// Unique identifier assigned at creation.
    pub id: MessageId,

    /// Actor that produced this entry.
    pub role: MessageRole,

    /// Renderable payload.
    pub content: C,

    /// Creation time. Informational only.
    pub timestamp: DateTime<Utc>,

    /// Marks the insertion point of an inline customization control.
    pub show_customization: bool,

    /// 1-based workflow step that was active when the message was created.
    ///
    /// Editing a message rewinds the conversation to this step.
    pub step: usize,
}

impl<C> Message<C> {
    /// Create a message with a fresh id and the current time.
    pub fn new(role: MessageRole, content: C, show_customization: bool, step: usize) -> Self {
        Self {
            id: MessageId::new(),
            role,
            content,
            timestamp: Utc::now(),
            show_customization,
            step,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.role.is_loading()
    }
}

/// Read-only copy of a conversation's observable state.
///
/// Rendering consumers re-render from a snapshot after every mutation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
pub struct ConversationSnapshot<C> {
    /// Messages in display order.
    pub messages: Vec<Message<C>>,

    /// 1-based current workflow step.
    pub current_step: usize,

    /// Message currently carrying a live customization control.
    pub active_customization_id: Option<MessageId>,
}

impl<C> ConversationSnapshot<C> {
    /// The loading message, if one is present.
    pub fn loading_message(&self) -> Option<&Message<C>> {
        self.messages.iter().find(|m| m.is_loading())
    }

    /// The message carrying the active customization control.
    pub fn active_customization(&self) -> Option<&Message<C>> {
        let id = self.active_customization_id?;
        self.messages.iter().find(|m| m.id == id)
    }
}

impl<C> Default for ConversationSnapshot<C> {
    fn default() -> Self {
        Self {
            messages: Vec::new(),
            current_step: 1,
            active_customization_id: None,
        }
    }
}
