//! Backoff policy: pure mapping from attempt number (and optional server
//! hint) to a wait duration. No I/O here; the transport and the polling
//! worker decide when to actually sleep.

use std::time::Duration;

const BASE_MS: u64 = 500;
const CAP_MS: u64 = 30_000;

/// Capped exponential backoff: `min(30s, 500ms * 2^(attempt-1))`.
///
/// `attempt` is 1-based and counts the attempt that just failed; values past
/// the cap (or large enough to overflow the shift) all map to 30s.
pub fn exponential(attempt: u32) -> Duration {
    let exp = attempt.saturating_sub(1).min(16);
    Duration::from_millis(CAP_MS.min(BASE_MS << exp))
}

/// Delay before the next retry: a server-provided `retry_after` hint (in
/// seconds) takes precedence over the exponential curve.
pub fn for_retry(attempt: u32, retry_after_secs: Option<u64>) -> Duration {
    match retry_after_secs {
        Some(secs) => Duration::from_secs(secs),
        None => exponential(attempt),
    }
}
