//! Wire types for the Telegram Bot API: users, chats, messages, updates, and
//! the top-level response envelope.

use serde::{Deserialize, Serialize};

/// A Telegram user or bot account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub is_bot: bool,
    pub first_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
}

/// A chat: private conversation, group, supergroup, or channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    /// Chat kind as reported by the API: "private", "group", "supergroup", "channel".
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

/// A message in a chat. Only the fields the client acts on are typed; anything
/// else the API sends is ignored on decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub message_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<User>,
    pub chat: Chat,
    /// Unix timestamp of the message.
    pub date: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// One inbound unit of bot activity, identified by a monotonically increasing
/// `update_id` and carrying exactly one payload variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(flatten)]
    pub kind: UpdateKind,
}

impl Update {
    /// Returns the new incoming message, if this update carries one.
    pub fn message(&self) -> Option<&Message> {
        match &self.kind {
            UpdateKind::Message(message) => Some(message),
            _ => None,
        }
    }
}

/// The closed set of update payloads. Message-shaped payloads are fully typed;
/// the rest are passed through as opaque JSON for the application to interpret.
/// Payload keys this client does not know yet land in `Unknown`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateKind {
    Message(Message),
    EditedMessage(Message),
    ChannelPost(Message),
    EditedChannelPost(Message),
    CallbackQuery(serde_json::Value),
    InlineQuery(serde_json::Value),
    ChosenInlineResult(serde_json::Value),
    ShippingQuery(serde_json::Value),
    PreCheckoutQuery(serde_json::Value),
    Poll(serde_json::Value),
    PollAnswer(serde_json::Value),
    MyChatMember(serde_json::Value),
    ChatMember(serde_json::Value),
    ChatJoinRequest(serde_json::Value),
    #[serde(untagged)]
    Unknown(serde_json::Value),
}

/// Top-level response wrapper: `ok` distinguishes success from failure, and the
/// failure side carries a numeric code, a human description, and retry hints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<ResponseParameters>,
}

/// Structured hints attached to failure envelopes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseParameters {
    /// Seconds the caller should wait before repeating the request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
    /// The chat id a group was migrated to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub migrate_to_chat_id: Option<i64>,
}
