use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

use crate::core::{advance, transfer_message};
use crate::data::{FetchOptions, FetchPhase, Progress, ProgressCallback};
use crate::error::{FetchError, Result};

/// Delivers one task's progress updates to the caller's callback.
///
/// The reporter is owned by the task future, so once the task settles there
/// is nothing left that could emit. Transfer updates are kept monotonic and
/// bounded by the announced total, and are throttled to `interval` except for
/// the last one of a transfer.
pub(crate) struct ProgressReporter<'a> {
    callback: Option<&'a ProgressCallback>,
    interval: Duration,
    last_emit: Option<Instant>,
    reported: u64,
    emitted: Option<u64>,
}

impl<'a> ProgressReporter<'a> {
    pub(crate) fn new(options: &'a FetchOptions, interval: Duration) -> Self {
        Self {
            callback: options.on_progress.as_ref(),
            interval,
            last_emit: None,
            reported: 0,
            emitted: None,
        }
    }

    pub(crate) fn stage(&mut self, phase: FetchPhase, message: &str, can_abort: bool) -> Result<()> {
        self.emit(Progress {
            phase,
            message: message.to_string(),
            is_indeterminate: true,
            current: None,
            max: None,
            can_abort,
        })
    }

    /// Report `loaded` bytes received so far. `last` marks the end of the
    /// transfer and bypasses throttling.
    pub(crate) fn transfer(
        &mut self,
        action: &str,
        loaded: u64,
        total: Option<u64>,
        last: bool,
    ) -> Result<()> {
        self.reported = advance(self.reported, loaded, total);
        if last && self.emitted == Some(self.reported) {
            return Ok(());
        }
        if !last && !self.due() {
            return Ok(());
        }

        self.emitted = Some(self.reported);
        self.emit(Progress {
            phase: FetchPhase::Transferring,
            message: transfer_message(action, loaded, total),
            is_indeterminate: total.is_none(),
            current: total.map(|_| self.reported),
            max: total,
            can_abort: true,
        })
    }

    fn due(&self) -> bool {
        self.interval.is_zero()
            || self
                .last_emit
                .is_none_or(|last| last.elapsed() >= self.interval)
    }

    fn emit(&mut self, progress: Progress) -> Result<()> {
        self.last_emit = Some(Instant::now());
        let Some(callback) = self.callback else {
            return Ok(());
        };
        panic::catch_unwind(AssertUnwindSafe(|| callback(&progress)))
            .map_err(|payload| FetchError::Progress(panic_message(payload.as_ref())))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "progress callback panicked".to_string()
    }
}
