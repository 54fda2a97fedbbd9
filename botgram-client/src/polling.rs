//! Long-polling delivery: one worker task per bot that fetches updates,
//! dispatches them in order, and advances the offset cursor only after each
//! hand-off. Fetch failures back off and continue; only `stop()` ends the loop.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info};

use botgram_core::{Update, UpdateHandler};

use crate::backoff;
use crate::error::PollingError;
use crate::methods::GetUpdatesParams;
use crate::transport::ApiClient;

pub(crate) const STATE_IDLE: u8 = 0;
pub(crate) const STATE_RUNNING: u8 = 1;
pub(crate) const STATE_STOPPED: u8 = 2;

const DEFAULT_POLL_TIMEOUT_SECS: u32 = 60;

/// Receives errors the polling worker absorbed: fetch failures (with the
/// running backoff attempt count) and per-update handler failures.
pub trait ErrorSink: Send + Sync {
    fn report(&self, error: &PollingError, attempt: u32);
}

/// Default sink: reports through `tracing::error`.
pub struct TracingErrorSink;

impl ErrorSink for TracingErrorSink {
    fn report(&self, error: &PollingError, attempt: u32) {
        error!(attempt, error = %error, "polling error");
    }
}

/// Options for one polling run.
pub struct PollingOptions {
    /// Server-side long-poll duration in seconds; default 60.
    pub timeout_secs: u32,
    /// Maximum batch size per fetch.
    pub limit: Option<u32>,
    /// Restricts which update kinds the server delivers.
    pub allowed_updates: Option<Vec<String>>,
    /// First offset to request; 0 means "only new updates".
    pub initial_offset: i64,
    /// Where absorbed errors go; defaults to [`TracingErrorSink`].
    pub error_sink: Arc<dyn ErrorSink>,
}

impl Default for PollingOptions {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_POLL_TIMEOUT_SECS,
            limit: None,
            allowed_updates: None,
            initial_offset: 0,
            error_sink: Arc::new(TracingErrorSink),
        }
    }
}

/// Stop switch for a running polling worker.
///
/// `stop()` is idempotent and non-blocking: it prevents the next iteration
/// from starting but never cancels an in-flight fetch, a backoff sleep, or a
/// running handler. `join()` awaits the worker's exit.
pub struct PollingHandle {
    stop: Arc<AtomicBool>,
    state: Arc<AtomicU8>,
    worker: JoinHandle<()>,
}

impl PollingHandle {
    /// Requests a graceful stop; safe to call any number of times.
    pub fn stop(&self) {
        if !self.stop.swap(true, Ordering::SeqCst) {
            info!("polling stop requested");
        }
    }

    /// True until the worker has exited.
    pub fn is_running(&self) -> bool {
        self.state.load(Ordering::SeqCst) == STATE_RUNNING
    }

    /// Waits for the worker to finish its current iteration and exit.
    pub async fn join(self) {
        let _ = self.worker.await;
    }
}

pub(crate) fn spawn(
    api: Arc<ApiClient>,
    state: Arc<AtomicU8>,
    handler: Arc<dyn UpdateHandler>,
    options: PollingOptions,
) -> PollingHandle {
    let stop = Arc::new(AtomicBool::new(false));
    let worker = tokio::spawn(run_loop(
        api,
        Arc::clone(&state),
        Arc::clone(&stop),
        handler,
        options,
    ));
    PollingHandle {
        stop,
        state,
        worker,
    }
}

async fn run_loop(
    api: Arc<ApiClient>,
    state: Arc<AtomicU8>,
    stop: Arc<AtomicBool>,
    handler: Arc<dyn UpdateHandler>,
    options: PollingOptions,
) {
    // Cursor invariant: non-decreasing, written only by this task.
    let mut cursor: i64 = options.initial_offset.max(0);
    let mut attempt: u32 = 0;

    info!(
        initial_offset = cursor,
        timeout_secs = options.timeout_secs,
        "polling started"
    );

    while !stop.load(Ordering::SeqCst) {
        let params = GetUpdatesParams {
            offset: (cursor > 0).then_some(cursor),
            limit: options.limit,
            timeout: Some(options.timeout_secs),
            allowed_updates: options.allowed_updates.clone(),
        };

        match api.call::<Vec<Update>, _>("getUpdates", &params).await {
            Ok(updates) => {
                if updates.is_empty() {
                    // An empty but successful poll leaves the attempt counter
                    // unchanged; only a delivered batch resets it.
                    continue;
                }
                for update in updates {
                    let update_id = update.update_id;
                    if let Err(e) = handler.handle_update(update).await {
                        options
                            .error_sink
                            .report(&PollingError::Handler(e), attempt);
                    }
                    // Advance past the update whether or not the handler
                    // succeeded; redelivery is not the transport's job.
                    cursor = cursor.max(update_id + 1);
                }
                attempt = 0;
            }
            Err(e) => {
                attempt += 1;
                options.error_sink.report(&PollingError::Fetch(e), attempt);
                tokio::time::sleep(backoff::exponential(attempt)).await;
            }
        }
    }

    state.store(STATE_STOPPED, Ordering::SeqCst);
    info!(cursor, "polling stopped");
}
