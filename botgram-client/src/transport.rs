//! Authenticated request transport: builds the per-method URL, applies the
//! per-attempt timeout, classifies each response into a closed outcome set,
//! and retries transient failures within a configurable budget.

use std::fmt;
use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use botgram_core::ApiResponse;

use crate::backoff;
use crate::error::ApiClientError;

const DEFAULT_API_BASE: &str = "https://api.telegram.org";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(90);
const DEFAULT_MAX_RETRIES: u32 = 3;

/// Transport tuning; all fields optional, defaults match the hosted Bot API.
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    /// Base URL, e.g. a local test server; default `https://api.telegram.org`.
    pub api_base: Option<String>,
    /// Per-attempt timeout; default 90s.
    pub timeout: Option<Duration>,
    /// Total attempt budget per call; default 3, floor 1.
    pub max_retries: Option<u32>,
}

/// Issues authenticated Bot API calls. Holds no mutable state: one instance
/// may serve any number of concurrent callers.
pub struct ApiClient {
    http: reqwest::Client,
    token: String,
    api_base: String,
    timeout: Duration,
    max_retries: u32,
}

/// Classification of one attempt. Retrying is an explicit loop over this set,
/// not error-driven control flow.
enum Outcome<T> {
    Success(T),
    Retry {
        error: ApiClientError,
        delay: Option<Duration>,
    },
    Fatal(ApiClientError),
}

impl ApiClient {
    /// Creates a client with default options.
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_options(token, ClientOptions::default())
    }

    /// Creates a client with explicit transport options.
    pub fn with_options(token: impl Into<String>, options: ClientOptions) -> Self {
        Self {
            http: reqwest::Client::new(),
            token: token.into(),
            api_base: options
                .api_base
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            timeout: options.timeout.unwrap_or(DEFAULT_TIMEOUT),
            max_retries: options.max_retries.unwrap_or(DEFAULT_MAX_RETRIES).max(1),
        }
    }

    /// Calls `method` with the given parameters (serialized as a JSON body)
    /// and decodes the envelope's `result` as `T`.
    ///
    /// Rate limits and 5xx responses are retried within the attempt budget,
    /// honoring a server `retry_after` hint over the exponential curve;
    /// application-level API errors and malformed bodies fail immediately.
    pub async fn call<T, P>(&self, method: &str, params: &P) -> Result<T, ApiClientError>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let url = format!("{}/bot{}/{}", self.api_base, self.token, method);

        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match self.attempt(&url, method, attempt, params).await {
                Outcome::Success(value) => return Ok(value),
                Outcome::Retry { error, delay } => {
                    if attempt >= self.max_retries {
                        return Err(error);
                    }
                    let wait = delay.unwrap_or_else(|| backoff::exponential(attempt));
                    debug!(
                        method,
                        attempt,
                        wait_ms = wait.as_millis() as u64,
                        error = %error,
                        "transient failure, retrying"
                    );
                    tokio::time::sleep(wait).await;
                }
                Outcome::Fatal(error) => return Err(error),
            }
        }
    }

    async fn attempt<T, P>(&self, url: &str, method: &str, attempt: u32, params: &P) -> Outcome<T>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let response = self
            .http
            .post(url)
            .timeout(self.timeout)
            .json(params)
            .send()
            .await;

        let response = match response {
            Ok(response) => response,
            Err(source) => {
                return Outcome::Retry {
                    error: self.transport_error(method, source),
                    delay: None,
                }
            }
        };

        let status = response.status();
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(source) => {
                // The deadline also covers reading the body.
                return Outcome::Retry {
                    error: self.transport_error(method, source),
                    delay: None,
                }
            }
        };

        classify(method, attempt, status, &body)
    }

    fn transport_error(&self, method: &str, source: reqwest::Error) -> ApiClientError {
        if source.is_timeout() {
            ApiClientError::Timeout {
                method: method.to_string(),
                timeout_ms: self.timeout.as_millis() as u64,
            }
        } else {
            ApiClientError::Network {
                method: method.to_string(),
                // The URL embeds the token; strip it before storing.
                source: source.without_url(),
            }
        }
    }

    /// The configured attempt budget.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("token", &mask_token(&self.token))
            .field("api_base", &self.api_base)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

/// Maps one HTTP status plus body into a typed outcome. Order matters:
/// envelope success first, then rate limit (429 or hint), then 5xx, then
/// fatal API error.
fn classify<T: DeserializeOwned>(
    method: &str,
    attempt: u32,
    status: StatusCode,
    body: &[u8],
) -> Outcome<T> {
    let envelope: ApiResponse<T> = match serde_json::from_slice(body) {
        Ok(envelope) => envelope,
        Err(e) => {
            let detail = if status.is_success() {
                format!("undecodable body: {}", e)
            } else {
                format!("http status {} with undecodable body", status.as_u16())
            };
            return Outcome::Fatal(ApiClientError::MalformedResponse {
                method: method.to_string(),
                detail,
            });
        }
    };

    if envelope.ok {
        return match envelope.result {
            Some(value) => Outcome::Success(value),
            None => Outcome::Fatal(ApiClientError::MalformedResponse {
                method: method.to_string(),
                detail: "ok response missing result field".to_string(),
            }),
        };
    }

    let retry_after = envelope.parameters.as_ref().and_then(|p| p.retry_after);

    if status == StatusCode::TOO_MANY_REQUESTS || retry_after.is_some() {
        return Outcome::Retry {
            error: ApiClientError::RateLimited {
                method: method.to_string(),
                retry_after,
                attempts: attempt,
            },
            delay: retry_after.map(Duration::from_secs),
        };
    }

    if status.is_server_error() {
        return Outcome::Retry {
            error: ApiClientError::Server {
                method: method.to_string(),
                status: status.as_u16(),
                attempts: attempt,
            },
            delay: None,
        };
    }

    Outcome::Fatal(ApiClientError::Api {
        method: method.to_string(),
        code: envelope.error_code,
        description: envelope
            .description
            .unwrap_or_else(|| "telegram api error".to_string()),
        parameters: envelope.parameters,
    })
}

/// Masks a bot token for logging: first 7 + `***` + last 4 characters;
/// tokens of 11 characters or fewer are fully masked.
pub fn mask_token(token: &str) -> String {
    if token.len() <= 11 {
        return "***".to_string();
    }
    format!("{}***{}", &token[..7], &token[token.len() - 4..])
}
