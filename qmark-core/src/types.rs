//! Core types: author, chat, message, message kind, handler response, and Handler trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Who posted a message. `display_name` is what reports show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: i64,
    pub display_name: String,
}

/// Kind of chat a message was posted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatType {
    Private,
    Group,
    Supergroup,
    Channel,
}

impl ChatType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatType::Private => "private",
            ChatType::Group => "group",
            ChatType::Supergroup => "supergroup",
            ChatType::Channel => "channel",
        }
    }

    /// Parses the stored form; unknown values are treated as private.
    pub fn parse(s: &str) -> Self {
        match s {
            "group" => ChatType::Group,
            "supergroup" => ChatType::Supergroup,
            "channel" => ChatType::Channel,
            _ => ChatType::Private,
        }
    }

    /// True for multi-member chats (group, supergroup, channel).
    pub fn is_group(&self) -> bool {
        !matches!(self, ChatType::Private)
    }
}

/// Chat identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    pub chat_type: ChatType,
}

impl Chat {
    pub fn new(id: i64, chat_type: ChatType) -> Self {
        Self { id, chat_type }
    }
}

/// Message kind tag. Only [`MessageKind::Default`] is a plain user post; everything else is a service notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKind {
    Default,
    Join,
    Leave,
    Pin,
    System,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Default => "default",
            MessageKind::Join => "join",
            MessageKind::Leave => "leave",
            MessageKind::Pin => "pin",
            MessageKind::System => "system",
        }
    }

    /// Parses the stored form. Unknown tags map to [`MessageKind::System`] so they never count as valid.
    pub fn parse(s: &str) -> Self {
        match s {
            "default" => MessageKind::Default,
            "join" => MessageKind::Join,
            "leave" => MessageKind::Leave,
            "pin" => MessageKind::Pin,
            _ => MessageKind::System,
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single chat message. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Transport message id; increases monotonically within a chat.
    pub id: i32,
    pub chat: Chat,
    pub author: Author,
    pub content: String,
    pub kind: MessageKind,
    pub created_at: DateTime<Utc>,
    /// Set when this is an edited version of an earlier message.
    pub edited_at: Option<DateTime<Utc>>,
}

impl Message {
    pub fn is_edit(&self) -> bool {
        self.edited_at.is_some()
    }
}

/// Handler result for the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerResponse {
    /// Pass to next handler.
    Continue,
    /// Stop the chain.
    Stop,
    /// Skip this handler, try next.
    Ignore,
}

/// Converts a transport-specific message type to core [`Message`].
pub trait ToCoreMessage: Send + Sync {
    fn to_core(&self) -> Message;
}

/// Single handler concept: optional before / handle. Chain runs all before, then handle until Stop.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Runs before the handle phase. Return false to stop the chain.
    async fn before(&self, _message: &Message) -> crate::error::Result<bool> {
        Ok(true)
    }
    /// Processes the message. Return Stop to end the handle phase. Default: Continue.
    async fn handle(&self, _message: &Message) -> crate::error::Result<HandlerResponse> {
        Ok(HandlerResponse::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_kind_round_trips_through_storage_form() {
        for kind in [
            MessageKind::Default,
            MessageKind::Join,
            MessageKind::Leave,
            MessageKind::Pin,
            MessageKind::System,
        ] {
            assert_eq!(MessageKind::parse(kind.as_str()), kind);
        }
    }

    #[test]
    fn test_unknown_kind_is_system() {
        assert_eq!(MessageKind::parse("sticker_set_changed"), MessageKind::System);
        assert_eq!(MessageKind::parse(""), MessageKind::System);
    }

    #[test]
    fn test_chat_type_is_group() {
        assert!(!ChatType::Private.is_group());
        assert!(ChatType::Group.is_group());
        assert!(ChatType::Supergroup.is_group());
        assert_eq!(ChatType::parse("supergroup"), ChatType::Supergroup);
        assert_eq!(ChatType::parse("nonsense"), ChatType::Private);
    }
}
