//! Error taxonomy for the transport and the polling engine.
//!
//! Retry exhaustion keeps the underlying kind: a call that gave up after N
//! rate-limit responses surfaces as [`ApiClientError::RateLimited`], not as a
//! generic failure, so callers can tell the terminal causes apart.

use botgram_core::ResponseParameters;
use thiserror::Error;

/// A failed API call, after any retries the budget allowed.
///
/// The bot token never appears in these messages; network errors are stripped
/// of the request URL before being stored.
#[derive(Error, Debug)]
pub enum ApiClientError {
    /// Connection-level failure (DNS, TLS, reset, ...).
    #[error("network error calling {method}: {source}")]
    Network {
        method: String,
        #[source]
        source: reqwest::Error,
    },

    /// The per-attempt deadline elapsed.
    #[error("request to {method} timed out after {timeout_ms}ms")]
    Timeout { method: String, timeout_ms: u64 },

    /// HTTP 429 or an explicit retry-after hint, persisting past the budget.
    #[error("rate limited calling {method} after {attempts} attempts (retry_after: {retry_after:?})")]
    RateLimited {
        method: String,
        retry_after: Option<u64>,
        attempts: u32,
    },

    /// HTTP 5xx, persisting past the budget.
    #[error("server error {status} calling {method} after {attempts} attempts")]
    Server {
        method: String,
        status: u16,
        attempts: u32,
    },

    /// The API reported an application-level failure; never retried.
    #[error("api error calling {method}: {description} (code {code:?})")]
    Api {
        method: String,
        code: Option<i64>,
        description: String,
        parameters: Option<ResponseParameters>,
    },

    /// A body that could not be decoded as the expected envelope; never retried.
    #[error("malformed response from {method}: {detail}")]
    MalformedResponse { method: String, detail: String },
}

/// Failures surfaced by the polling engine, either to the caller of
/// `start_polling` or through the configured error sink.
#[derive(Error, Debug)]
pub enum PollingError {
    /// The bot already has (or had) an active polling worker.
    #[error("polling already started for this bot")]
    AlreadyStarted,

    /// A getUpdates call failed after its retry budget; the worker backs off
    /// and continues.
    #[error("update fetch failed: {0}")]
    Fetch(#[from] ApiClientError),

    /// The application handler returned an error for one update; delivery of
    /// the rest of the batch is unaffected.
    #[error("update handler failed: {0}")]
    Handler(#[from] anyhow::Error),
}
