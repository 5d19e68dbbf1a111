use std::fmt;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::progress::Progress;

pub type ProgressCallback = Arc<dyn Fn(&Progress) + Send + Sync>;

/// Per-task options: where progress goes and how the task is cancelled.
///
/// # Examples
///
/// ```
/// use molview_fetch::{FetchOptions, FetchPhase, Progress};
/// use std::sync::Arc;
/// use tokio_util::sync::CancellationToken;
///
/// let token = CancellationToken::new();
/// let options = FetchOptions::default()
///     .cancel_token(token.clone())
///     .on_progress(Arc::new(|progress: &Progress| {
///         if progress.phase == FetchPhase::Transferring {
///             if let Some(pct) = progress.percentage() {
///                 println!("{:.1}%", pct);
///             }
///         }
///     }));
/// ```
#[derive(Clone, Default)]
pub struct FetchOptions {
    /// Invoked on stage changes and after received chunks. A panic inside the
    /// callback fails the task with
    /// [`FetchError::Progress`](crate::FetchError::Progress).
    pub on_progress: Option<ProgressCallback>,

    /// Cancelling this token aborts the task at its next suspension point.
    pub cancel: CancellationToken,
}

impl fmt::Debug for FetchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchOptions")
            .field("on_progress", &self.on_progress.as_ref().map(|_| "{ ... }"))
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}

impl FetchOptions {
    #[must_use]
    pub fn on_progress(mut self, on_progress: ProgressCallback) -> Self {
        self.on_progress = Some(on_progress);
        self
    }

    #[must_use]
    pub fn cancel_token(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }
}
