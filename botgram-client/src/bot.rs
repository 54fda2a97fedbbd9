//! The bot facade: owns the transport, exposes the typed convenience methods,
//! and guards the one-polling-worker-per-bot rule with an explicit state
//! machine instead of an ad hoc flag.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use botgram_core::{Message, Update, UpdateHandler, User};

use crate::config::BotConfig;
use crate::error::{ApiClientError, PollingError};
use crate::methods::{
    DeleteWebhookParams, GetUpdatesParams, NoParams, SendMessageParams, SetWebhookParams,
};
use crate::polling::{self, PollingHandle, PollingOptions, STATE_IDLE, STATE_RUNNING};
use crate::transport::{ApiClient, ClientOptions};

/// A bot client. Cloning is cheap and clones share the transport and the
/// polling guard, so "one polling worker per bot" holds across clones.
#[derive(Clone)]
pub struct Bot {
    api: Arc<ApiClient>,
    poll_state: Arc<AtomicU8>,
}

impl Bot {
    /// Creates a bot with default transport options.
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_options(token, ClientOptions::default())
    }

    /// Creates a bot with explicit transport options.
    pub fn with_options(token: impl Into<String>, options: ClientOptions) -> Self {
        Self {
            api: Arc::new(ApiClient::with_options(token, options)),
            poll_state: Arc::new(AtomicU8::new(STATE_IDLE)),
        }
    }

    /// Creates a bot from loaded configuration.
    pub fn from_config(config: &BotConfig) -> Self {
        Self::with_options(
            config.bot_token.clone(),
            ClientOptions {
                api_base: config.api_url.clone(),
                ..Default::default()
            },
        )
    }

    /// The underlying transport, for methods this facade does not wrap.
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Generic API call: any method name, any serializable parameters.
    pub async fn call<T, P>(&self, method: &str, params: &P) -> Result<T, ApiClientError>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        self.api.call(method, params).await
    }

    /// Returns the bot's own account.
    pub async fn get_me(&self) -> Result<User, ApiClientError> {
        self.api.call("getMe", &NoParams {}).await
    }

    /// Sends a text message.
    pub async fn send_message(&self, params: &SendMessageParams) -> Result<Message, ApiClientError> {
        self.api.call("sendMessage", params).await
    }

    /// Fetches pending updates; the polling engine drives this internally,
    /// but one-shot callers can use it directly.
    pub async fn get_updates(&self, params: &GetUpdatesParams) -> Result<Vec<Update>, ApiClientError> {
        self.api.call("getUpdates", params).await
    }

    /// Registers a webhook URL for pushed delivery.
    pub async fn set_webhook(&self, params: &SetWebhookParams) -> Result<bool, ApiClientError> {
        self.api.call("setWebhook", params).await
    }

    /// Removes a registered webhook; required before long polling works again.
    pub async fn delete_webhook(&self, params: &DeleteWebhookParams) -> Result<bool, ApiClientError> {
        self.api.call("deleteWebhook", params).await
    }

    /// Starts the long-polling worker delivering updates to `handler`.
    ///
    /// Fails with [`PollingError::AlreadyStarted`] if a worker is running or
    /// has ever run on this bot (the engine is not restartable); the running
    /// worker is unaffected by the failed attempt.
    pub fn start_polling(
        &self,
        handler: Arc<dyn UpdateHandler>,
        options: PollingOptions,
    ) -> Result<PollingHandle, PollingError> {
        self.poll_state
            .compare_exchange(STATE_IDLE, STATE_RUNNING, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| PollingError::AlreadyStarted)?;
        Ok(polling::spawn(
            Arc::clone(&self.api),
            Arc::clone(&self.poll_state),
            handler,
            options,
        ))
    }
}
