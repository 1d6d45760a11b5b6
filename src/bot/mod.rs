use std::sync::Arc;

use teloxide::error_handlers::LoggingErrorHandler;
use teloxide::prelude::*;
use tracing::info;

use crate::config::settings::BotConfig;

pub mod client;
pub mod handlers;
pub mod session;

use client::ProcessingClient;
use session::{InMemorySessionStore, SessionStore};

/// Long-polling dispatcher for the two-step video/emoji conversation.
pub async fn run(config: BotConfig) {
    let bot = Bot::new(config.bot_token.clone());
    let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::default());
    let client = ProcessingClient::new(config.backend_url.clone());

    info!("Starting Telegram front end (backend: {})", config.backend_url);

    let handler = Update::filter_message()
        .branch(
            dptree::filter(|msg: Message| msg.video().is_some() || msg.document().is_some())
                .endpoint(handlers::handle_media),
        )
        .branch(
            dptree::filter_map(|msg: Message| msg.text().map(str::to_owned))
                .endpoint(handlers::handle_text),
        );

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![store, client])
        .error_handler(LoggingErrorHandler::with_custom_text(
            "Unhandled error in bot handler",
        ))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}
