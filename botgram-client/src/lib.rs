//! # botgram-client
//!
//! Transport-and-delivery engine for the Telegram Bot API: an authenticated
//! request transport with timeout, retry, and backoff; a long-polling engine
//! with offset-cursor acknowledgment and graceful stop; and a webhook
//! ingestion router. Both delivery channels feed the same
//! [`botgram_core::UpdateHandler`].

pub mod backoff;
mod bot;
pub mod config;
mod error;
mod methods;
mod polling;
mod transport;
pub mod webhook;

pub use bot::Bot;
pub use config::BotConfig;
pub use error::{ApiClientError, PollingError};
pub use methods::{
    ChatTarget, DeleteWebhookParams, GetUpdatesParams, SendMessageParams, SetWebhookParams,
};
pub use polling::{ErrorSink, PollingHandle, PollingOptions, TracingErrorSink};
pub use transport::{mask_token, ApiClient, ClientOptions};
pub use webhook::{webhook_router, WebhookOptions, SECRET_TOKEN_HEADER};
