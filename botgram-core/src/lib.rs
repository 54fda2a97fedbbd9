//! # botgram-core
//!
//! Core types for the Telegram Bot API client: update and message wire types,
//! the response envelope, the [`UpdateHandler`] trait, and tracing initialization.
//! Transport-agnostic; used by botgram-client.

pub mod handler;
pub mod logger;
pub mod types;

pub use handler::UpdateHandler;
pub use logger::init_tracing;
pub use types::{ApiResponse, Chat, Message, ResponseParameters, Update, UpdateKind, User};
