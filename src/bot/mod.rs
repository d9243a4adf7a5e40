// Telegram bot shell - Bot API client, dispatcher wiring and long polling until Ctrl-C

pub mod commands;
pub mod handler;
pub mod status;
pub mod transport;

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::{error, info, warn};

pub use commands::Command;
pub use handler::{Delivery, Outcome};
pub use transport::{ChatTransport, TelegramTransport, TransportError};

use crate::downloader::DownloadError;

/// Username the bot answers to in `/command@name` form
#[derive(Clone, Debug)]
pub struct BotName(pub String);

/// Build the teloxide client, routing Bot API traffic through `proxy` when set
pub fn build_bot(token: &str, proxy: Option<&str>) -> anyhow::Result<Bot> {
    let Some(proxy) = proxy else {
        return Ok(Bot::new(token));
    };

    let client = teloxide::net::default_reqwest_settings()
        .proxy(reqwest::Proxy::all(proxy)?)
        .build()?;
    info!(proxy = %proxy, "using proxy for Telegram API");
    Ok(Bot::with_client(token, client))
}

/// Run long polling until the process is interrupted
pub async fn serve(bot: Bot, delivery: Arc<Delivery>) -> anyhow::Result<()> {
    let me = bot.get_me().await?;
    let name = BotName(me.username().to_string());
    info!(bot = %name.0, "connected to Telegram");

    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        warn!(error = %e, "failed to register bot commands");
    }

    let transport = Arc::new(TelegramTransport::new(bot.clone()));

    let handler = Update::filter_message().endpoint(
        |msg: Message, transport: Arc<TelegramTransport>, delivery: Arc<Delivery>, name: BotName| async move {
            let Some(text) = msg.text() else {
                return respond(());
            };
            let chat = msg.chat.id;

            let handled = AssertUnwindSafe(delivery.handle_update(transport.as_ref(), chat, text, &name.0))
                .catch_unwind()
                .await;

            if handled.is_err() {
                error!(chat_id = chat.0, "message handler panicked");
                let reply = DownloadError::Unknown(String::new()).user_message();
                if let Err(e) = transport.send_text(chat, reply).await {
                    warn!(chat_id = chat.0, error = %e, "failed to report handler failure");
                }
            }

            respond(())
        },
    );

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![transport, delivery, name])
        .default_handler(|_| async {})
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("dispatcher stopped");
    Ok(())
}
