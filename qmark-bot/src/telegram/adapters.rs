use qmark_core::{Author, Chat, ChatType, Message, MessageKind, ToCoreMessage};
use teloxide::types::MessageKind as TgMessageKind;

/// Telegram user to core author.
pub struct TelegramUserWrapper<'a>(pub &'a teloxide::types::User);

impl<'a> TelegramUserWrapper<'a> {
    /// `@username` when the user has one, otherwise their full name.
    pub fn display_name(&self) -> String {
        match self.0.username.as_deref() {
            Some(username) => format!("@{}", username),
            None => self.0.full_name(),
        }
    }

    pub fn to_author(&self) -> Author {
        Author {
            id: self.0.id.0 as i64,
            display_name: self.display_name(),
        }
    }
}

/// Telegram message to core message.
pub struct TelegramMessageWrapper<'a>(pub &'a teloxide::types::Message);

impl<'a> ToCoreMessage for TelegramMessageWrapper<'a> {
    fn to_core(&self) -> Message {
        Message {
            id: self.0.id.0,
            chat: Chat::new(self.0.chat.id.0, self.chat_type()),
            author: self.author(),
            content: self.0.text().unwrap_or("").to_string(),
            kind: map_kind(&self.0.kind),
            created_at: self.0.date,
            edited_at: self.0.edit_date().copied(),
        }
    }
}

impl<'a> TelegramMessageWrapper<'a> {
    fn chat_type(&self) -> ChatType {
        let chat = &self.0.chat;
        if chat.is_private() {
            ChatType::Private
        } else if chat.is_supergroup() {
            ChatType::Supergroup
        } else if chat.is_group() {
            ChatType::Group
        } else {
            ChatType::Channel
        }
    }

    /// Posts made on behalf of a chat (anonymous admins, linked channels) carry a placeholder `from`;
    /// the sender chat is the real author.
    fn author(&self) -> Author {
        if let Some(sender_chat) = self.0.sender_chat.as_ref() {
            return Author {
                id: sender_chat.id.0,
                display_name: sender_chat.title().unwrap_or("anonymous").to_string(),
            };
        }
        match self.0.from.as_ref() {
            Some(user) => TelegramUserWrapper(user).to_author(),
            None => Author {
                id: 0,
                display_name: "unknown".to_string(),
            },
        }
    }
}

/// Only ordinary posts are [`MessageKind::Default`]; service messages keep a coarse tag.
pub fn map_kind(kind: &TgMessageKind) -> MessageKind {
    match kind {
        TgMessageKind::Common(_) => MessageKind::Default,
        TgMessageKind::NewChatMembers(_) => MessageKind::Join,
        TgMessageKind::LeftChatMember(_) => MessageKind::Leave,
        TgMessageKind::Pinned(_) => MessageKind::Pin,
        _ => MessageKind::System,
    }
}
