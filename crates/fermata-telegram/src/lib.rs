//! Telegram adapter (teloxide).
//!
//! This crate implements the `fermata-core` MessagingPort over the Telegram
//! Bot API and feeds inbound updates to the core relay.

use async_trait::async_trait;

use teloxide::prelude::*;

pub mod router;

use fermata_core::{
    domain::{ChatId, MessageId, MessageRef},
    errors::Error,
    messaging::{
        port::MessagingPort,
        types::{IncomingUpdate, MessagingCapabilities, TextMessage},
    },
    Result,
};

/// Hard Telegram limit for a single text message.
pub const TELEGRAM_MAX_MESSAGE_LEN: usize = 4096;

#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
    max_message_len: usize,
}

impl TelegramMessenger {
    pub fn new(bot: Bot, max_message_len: usize) -> Self {
        Self {
            bot,
            max_message_len: max_message_len.clamp(1, TELEGRAM_MAX_MESSAGE_LEN),
        }
    }

    fn tg_chat(chat_id: ChatId) -> teloxide::types::ChatId {
        teloxide::types::ChatId(chat_id.0)
    }

    fn map_err(e: teloxide::RequestError) -> Error {
        Error::Send(format!("telegram error: {e}"))
    }
}

#[async_trait]
impl MessagingPort for TelegramMessenger {
    fn capabilities(&self) -> MessagingCapabilities {
        MessagingCapabilities {
            max_message_len: self.max_message_len,
        }
    }

    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<MessageRef> {
        let msg = self
            .bot
            .send_message(Self::tg_chat(chat_id), text.to_string())
            .await
            .map_err(Self::map_err)?;

        Ok(MessageRef {
            chat_id,
            message_id: MessageId(msg.id.0),
        })
    }
}

/// Convert a Telegram message into the messenger-agnostic update.
pub fn to_incoming(msg: &Message) -> IncomingUpdate {
    match msg.text() {
        Some(text) => IncomingUpdate::Text(TextMessage {
            chat_id: ChatId(msg.chat.id.0),
            text: text.to_string(),
        }),
        None => IncomingUpdate::Other,
    }
}
