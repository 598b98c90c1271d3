use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*, ApiError, RequestError};

use tokio::sync::mpsc;

use fermata_core::{
    config::Config,
    errors::Error,
    messaging::{port::MessagingPort, types::IncomingUpdate},
    provider::TransitProvider,
    relay::{Relay, RelayOptions},
    render::Renderer,
};

use crate::{to_incoming, TelegramMessenger};

#[derive(Clone)]
pub struct AppState {
    pub inbound: mpsc::Sender<IncomingUpdate>,
}

/// Long-poll Telegram and relay every message until Ctrl-C.
///
/// Updates are queued into a single channel drained by one [`Relay`], so
/// replies go out one at a time in arrival order.
pub async fn run_polling(
    cfg: Arc<Config>,
    token: String,
    provider: Arc<dyn TransitProvider>,
) -> anyhow::Result<()> {
    let bot = Bot::new(token);

    match bot.get_me().await {
        Ok(me) => tracing::info!(username = %me.username(), "fermata started"),
        Err(RequestError::Api(ApiError::NotFound)) => {
            return Err(Error::Credential {
                path: cfg.token_file.clone(),
                reason: "telegram rejected the bot token".to_string(),
            }
            .into());
        }
        // Polling retries on its own; a flaky network at startup is not fatal.
        Err(e) => tracing::warn!(error = %e, "get_me failed"),
    }
    tracing::info!(backend = %cfg.backend.base_url(), language = ?cfg.language, "config loaded");

    let messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(
        bot.clone(),
        cfg.telegram_message_limit,
    ));
    let relay = Relay::new(
        provider,
        messenger,
        Renderer::new(cfg.render_strings()),
        RelayOptions::from(cfg.as_ref()),
    );

    let (tx, rx) = mpsc::channel(cfg.inbound_queue_size);
    let consumer = tokio::spawn(async move { relay.run(rx).await });

    let state = Arc::new(AppState { inbound: tx });

    let handler = Update::filter_message().endpoint(handle_message);

    let mut dispatcher = Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        // Non-message updates (edits, callbacks, member changes) are dropped.
        .default_handler(|_| async {})
        .enable_ctrlc_handler()
        .build();
    dispatcher.dispatch().await;

    // Dropping the dispatcher drops the last sender; the relay drains what is
    // queued and stops.
    drop(dispatcher);
    consumer
        .await
        .map_err(|e| anyhow::anyhow!("relay task failed: {e}"))?;

    Ok(())
}

async fn handle_message(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    if state.inbound.send(to_incoming(&msg)).await.is_err() {
        tracing::warn!(chat_id = msg.chat.id.0, "relay stopped, dropping message");
    }
    Ok(())
}
