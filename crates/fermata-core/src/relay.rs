//! Inbound message → reply dispatcher.
//!
//! The relay is either idle (waiting on the inbound channel) or processing a
//! single update. Processing always ends back in idle: whatever goes wrong
//! while fetching, rendering or sending is logged and the next update is
//! picked up.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::{
    classify::{classify, Classification},
    config::Config,
    domain::ChatId,
    messaging::{
        port::MessagingPort,
        types::{IncomingUpdate, TextMessage},
    },
    provider::TransitProvider,
    render::{split_message, Language, Renderer},
    Result,
};

/// What happened to one inbound update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Not a text message.
    Ignored,
    /// Text matched neither a stop nor a line and no reply is configured.
    Unrecognized,
    Replied,
    /// The backend failed; the fallback reply (if any) was sent.
    ProviderFailed,
    SendFailed,
}

/// Reply policy knobs taken from [`Config`].
#[derive(Clone, Debug, Default)]
pub struct RelayOptions {
    pub language: Language,
    pub unrecognized_reply: Option<String>,
    pub provider_error_reply: Option<String>,
}

impl From<&Config> for RelayOptions {
    fn from(cfg: &Config) -> Self {
        Self {
            language: cfg.language,
            unrecognized_reply: cfg.unrecognized_reply.clone(),
            provider_error_reply: cfg.provider_error_reply.clone(),
        }
    }
}

pub struct Relay {
    provider: Arc<dyn TransitProvider>,
    messenger: Arc<dyn MessagingPort>,
    renderer: Renderer,
    opts: RelayOptions,
}

impl Relay {
    pub fn new(
        provider: Arc<dyn TransitProvider>,
        messenger: Arc<dyn MessagingPort>,
        renderer: Renderer,
        opts: RelayOptions,
    ) -> Self {
        Self {
            provider,
            messenger,
            renderer,
            opts,
        }
    }

    /// Process updates in arrival order until every sender is dropped.
    pub async fn run(&self, mut updates: mpsc::Receiver<IncomingUpdate>) {
        let mut handled = 0u64;
        while let Some(update) = updates.recv().await {
            let outcome = self.handle(update).await;
            tracing::debug!(?outcome, "update handled");
            handled += 1;
        }
        tracing::info!(handled, "inbound stream closed, relay stopping");
    }

    /// Handle a single update. Never fails: errors are logged and reported
    /// through the returned [`Outcome`].
    pub async fn handle(&self, update: IncomingUpdate) -> Outcome {
        match update {
            IncomingUpdate::Text(msg) => self.handle_text(msg).await,
            IncomingUpdate::Other => Outcome::Ignored,
        }
    }

    async fn handle_text(&self, msg: TextMessage) -> Outcome {
        let chat_id = msg.chat_id;

        if let Some(cmd) = parse_command(&msg.text) {
            if matches!(cmd, "start" | "help") {
                return self.reply(chat_id, &self.help_text()).await;
            }
        }

        let reply = match classify(&msg.text) {
            Classification::StopCode(code) => {
                tracing::debug!(chat_id = chat_id.0, %code, "stop query");
                self.provider
                    .fetch_stop(&code)
                    .await
                    .map(|stop| self.renderer.render_stop(&stop))
            }
            Classification::LineCode(code) => {
                tracing::debug!(chat_id = chat_id.0, %code, "line query");
                self.provider
                    .fetch_line(&code)
                    .await
                    .map(|line| self.renderer.render_line(&line))
            }
            Classification::Unrecognized => {
                tracing::debug!(chat_id = chat_id.0, "unrecognized text");
                return match &self.opts.unrecognized_reply {
                    Some(text) => self.reply(chat_id, text).await,
                    None => Outcome::Unrecognized,
                };
            }
        };

        match reply {
            Ok(text) => self.reply(chat_id, &text).await,
            Err(e) => {
                tracing::warn!(chat_id = chat_id.0, error = %e, "backend request failed");
                if let Some(fallback) = &self.opts.provider_error_reply {
                    if let Err(e) = self.send_chunks(chat_id, fallback).await {
                        tracing::warn!(chat_id = chat_id.0, error = %e, "fallback send failed");
                    }
                }
                Outcome::ProviderFailed
            }
        }
    }

    async fn reply(&self, chat_id: ChatId, text: &str) -> Outcome {
        match self.send_chunks(chat_id, text).await {
            Ok(_) => Outcome::Replied,
            Err(e) => {
                tracing::warn!(chat_id = chat_id.0, error = %e, "send failed");
                Outcome::SendFailed
            }
        }
    }

    /// Send `text` as one or more messages within the messenger's length
    /// limit, stopping at the first failure.
    async fn send_chunks(&self, chat_id: ChatId, text: &str) -> Result<()> {
        let max_len = self.messenger.capabilities().max_message_len;
        for chunk in split_message(text, max_len) {
            self.messenger.send_text(chat_id, &chunk).await?;
        }
        Ok(())
    }

    fn help_text(&self) -> String {
        match self.opts.language {
            Language::Italian => "Invia il codice di una fermata (4 cifre, es. 1234) per gli \
arrivi in tempo reale, oppure il codice di una linea (es. 61) per gli orari."
                .to_string(),
            Language::English => "Send a stop code (4 digits, e.g. 1234) for live arrivals, \
or a line code (e.g. 61) for its timetable."
                .to_string(),
        }
    }
}

/// `/name` or `/name@bot` at the start of the text.
fn parse_command(text: &str) -> Option<&str> {
    let rest = text.strip_prefix('/')?;
    let word = rest.split_whitespace().next()?;
    let name = word.split('@').next().unwrap_or(word);
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}
