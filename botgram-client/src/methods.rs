//! Typed parameter structs for the outbound operations. Optional fields are
//! omitted from the JSON body entirely rather than sent as `null`.

use serde::Serialize;

/// Addressee of a message: numeric chat id or `@channelusername`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ChatTarget {
    Id(i64),
    Username(String),
}

impl From<i64> for ChatTarget {
    fn from(id: i64) -> Self {
        ChatTarget::Id(id)
    }
}

impl From<&str> for ChatTarget {
    fn from(username: &str) -> Self {
        ChatTarget::Username(username.to_string())
    }
}

impl From<String> for ChatTarget {
    fn from(username: String) -> Self {
        ChatTarget::Username(username)
    }
}

/// Parameters for `sendMessage`.
#[derive(Debug, Clone, Serialize)]
pub struct SendMessageParams {
    pub chat_id: ChatTarget,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_web_page_preview: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_notification: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protect_content: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to_message_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_sending_without_reply: Option<bool>,
    /// Keyboard markup, passed through opaque.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<serde_json::Value>,
}

impl SendMessageParams {
    /// A plain text message with every optional field unset.
    pub fn new(chat_id: impl Into<ChatTarget>, text: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
            text: text.into(),
            parse_mode: None,
            disable_web_page_preview: None,
            disable_notification: None,
            protect_content: None,
            reply_to_message_id: None,
            allow_sending_without_reply: None,
            reply_markup: None,
        }
    }
}

/// Parameters for `getUpdates`. An omitted offset (or one ≤ 0 upstream) means
/// "only new updates".
#[derive(Debug, Clone, Default, Serialize)]
pub struct GetUpdatesParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Server-side long-poll duration in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_updates: Option<Vec<String>>,
}

/// Parameters for `setWebhook`.
#[derive(Debug, Clone, Serialize)]
pub struct SetWebhookParams {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drop_pending_updates: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_updates: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_connections: Option<u32>,
}

impl SetWebhookParams {
    /// Registers `url` with every optional field unset.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            secret_token: None,
            drop_pending_updates: None,
            allowed_updates: None,
            ip_address: None,
            max_connections: None,
        }
    }
}

/// Parameters for `deleteWebhook`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeleteWebhookParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drop_pending_updates: Option<bool>,
}

/// Zero-parameter methods still send an empty JSON object body.
#[derive(Debug, Serialize)]
pub(crate) struct NoParams {}
