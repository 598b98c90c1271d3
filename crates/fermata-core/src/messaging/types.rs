use crate::domain::ChatId;

/// Messenger-agnostic incoming update.
///
/// Telegram-specific fields live in the Telegram adapter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IncomingUpdate {
    Text(TextMessage),
    /// Anything that is not a text message (stickers, edits, joins...).
    Other,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextMessage {
    pub chat_id: ChatId,
    pub text: String,
}

impl IncomingUpdate {
    pub fn text(chat_id: ChatId, text: impl Into<String>) -> Self {
        Self::Text(TextMessage {
            chat_id,
            text: text.into(),
        })
    }
}

/// Capabilities / limits of a messenger implementation.
#[derive(Clone, Copy, Debug)]
pub struct MessagingCapabilities {
    /// Longest single message, in UTF-16 code units.
    pub max_message_len: usize,
}
