//! Webhook bot: serves the ingestion endpoint and logs every pushed update.
//! Set `WEBHOOK_URL` to also register the webhook with the API on startup.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use botgram_client::{webhook_router, Bot, BotConfig, SetWebhookParams, WebhookOptions};
use botgram_core::{init_tracing, Update, UpdateHandler};
use tracing::info;

struct LoggingHandler;

#[async_trait]
impl UpdateHandler for LoggingHandler {
    async fn handle_update(&self, update: Update) -> Result<()> {
        match update.message() {
            Some(message) => info!(
                update_id = update.update_id,
                chat_id = message.chat.id,
                text = ?message.text,
                "received message"
            ),
            None => info!(update_id = update.update_id, "received non-message update"),
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

    if let Ok(url) = std::env::var("WEBHOOK_URL") {
        let mut params = SetWebhookParams::new(url.clone());
        params.secret_token = config.webhook_secret.clone();
        bot.set_webhook(&params).await?;
        info!(url = %url, "webhook registered");
    }

    let app = webhook_router(
        Arc::new(LoggingHandler),
        WebhookOptions {
            secret_token: config.webhook_secret.clone(),
        },
    );

    let bind_addr =
        std::env::var("WEBHOOK_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, "webhook server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
