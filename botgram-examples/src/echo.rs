//! Echo bot over long polling: replies to every text message with its text.
//! Ctrl-C requests a graceful stop and waits for the worker to exit.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use botgram_client::{Bot, BotConfig, DeleteWebhookParams, PollingOptions, SendMessageParams};
use botgram_core::{init_tracing, Update, UpdateHandler};
use tracing::{info, warn};

struct EchoHandler {
    bot: Bot,
}

#[async_trait]
impl UpdateHandler for EchoHandler {
    async fn handle_update(&self, update: Update) -> Result<()> {
        if let Some(message) = update.message() {
            if let Some(text) = &message.text {
                info!(chat_id = message.chat.id, "echoing message");
                self.bot
                    .send_message(&SendMessageParams::new(
                        message.chat.id,
                        format!("echo: {}", text),
                    ))
                    .await?;
            }
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let config = BotConfig::from_env()?;
    init_tracing(config.log_file.as_deref())?;

    let bot = Bot::from_config(&config);

    // Long polling is refused while a webhook is registered.
    if let Err(e) = bot.delete_webhook(&DeleteWebhookParams::default()).await {
        warn!(error = %e, "could not delete webhook before polling");
    }

    let me = bot.get_me().await?;
    info!(username = ?me.username, "echo bot starting");

    let handler = Arc::new(EchoHandler { bot: bot.clone() });
    let handle = bot.start_polling(handler, PollingOptions::default())?;

    tokio::signal::ctrl_c().await?;
    handle.stop();
    handle.join().await;
    info!("echo bot stopped");
    Ok(())
}
