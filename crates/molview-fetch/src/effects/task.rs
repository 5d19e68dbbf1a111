use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::data::{Outcome, Payload};
use crate::error::{FetchError, Result};

/// A fetch running on the tokio runtime.
///
/// Dropping a `FetchTask` detaches it; the fetch keeps running until it
/// settles. Use [`cancel`](FetchTask::cancel) to stop it.
#[derive(Debug)]
pub struct FetchTask {
    title: String,
    cancel: CancellationToken,
    join: JoinHandle<Result<Outcome<Payload>>>,
}

impl FetchTask {
    pub(crate) fn new(
        title: String,
        cancel: CancellationToken,
        join: JoinHandle<Result<Outcome<Payload>>>,
    ) -> Self {
        Self {
            title,
            cancel,
            join,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Request cancellation. A no-op once the transfer has completed.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Wait for the task to settle.
    ///
    /// # Errors
    ///
    /// The fetch's own error, or [`FetchError::Transfer`] if the task
    /// panicked.
    pub async fn join(self) -> Result<Outcome<Payload>> {
        match self.join.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Ok(Outcome::Cancelled),
            Err(e) => Err(FetchError::transfer(format!("fetch task '{}' failed: {e}", self.title))),
        }
    }
}
