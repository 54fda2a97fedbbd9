//! The application-side seam: one trait through which every inbound update is
//! delivered, whether it arrived by long polling or by webhook push.

use crate::types::Update;
use async_trait::async_trait;

/// Receives decoded updates from a delivery channel.
///
/// Errors returned here are the application's concern: the delivery layer
/// reports them and moves on, it never stops delivering because of them.
#[async_trait]
pub trait UpdateHandler: Send + Sync {
    /// Processes a single update. Called once per update, in batch order for
    /// long polling and once per request for webhooks.
    async fn handle_update(&self, update: Update) -> anyhow::Result<()>;
}
