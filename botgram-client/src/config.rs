//! Minimal client configuration: token, API URL, webhook secret, log path.
//! Loaded from environment variables; binaries load `.env` first via dotenvy.

use anyhow::Result;
use std::env;

/// Configuration for one bot process.
pub struct BotConfig {
    pub bot_token: String,
    /// Overrides the hosted API base URL (e.g. a local Bot API server).
    pub api_url: Option<String>,
    /// Secret expected in the webhook secret-token header.
    pub webhook_secret: Option<String>,
    pub log_file: Option<String>,
}

impl BotConfig {
    /// Loads from the environment: `BOT_TOKEN` is required;
    /// `TELEGRAM_API_URL`, `WEBHOOK_SECRET_TOKEN`, and `LOG_FILE` are optional.
    pub fn from_env() -> Result<Self> {
        let bot_token = env::var("BOT_TOKEN").map_err(|_| anyhow::anyhow!("BOT_TOKEN not set"))?;
        let api_url = env::var("TELEGRAM_API_URL").ok();
        let webhook_secret = env::var("WEBHOOK_SECRET_TOKEN").ok();
        let log_file = env::var("LOG_FILE").ok();
        Ok(Self {
            bot_token,
            api_url,
            webhook_secret,
            log_file,
        })
    }

    /// Constructs with the given token; everything else unset.
    pub fn with_token(bot_token: String) -> Self {
        Self {
            bot_token,
            api_url: None,
            webhook_secret: None,
            log_file: None,
        }
    }
}
