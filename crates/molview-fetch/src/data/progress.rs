use std::fmt;

/// Stages of a fetch task.
///
/// Tasks move through these in order:
/// Opening → Transferring → Parsing
///
/// Parsing only occurs for JSON and XML payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPhase {
    /// Waiting for the server to answer, or for the file to open.
    #[default]
    Opening,

    /// Receiving bytes.
    Transferring,

    /// Decoding JSON or XML.
    Parsing,
}

impl fmt::Display for FetchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchPhase::Opening => write!(f, "Opening"),
            FetchPhase::Transferring => write!(f, "Transferring"),
            FetchPhase::Parsing => write!(f, "Parsing"),
        }
    }
}

/// A progress update passed to the caller's callback.
///
/// `current` and `max` are byte counts and are only set for determinate
/// transfer updates. Within one task `current` never decreases and never
/// exceeds `max`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    pub phase: FetchPhase,
    pub message: String,
    pub is_indeterminate: bool,
    pub current: Option<u64>,
    pub max: Option<u64>,
    /// Whether cancelling at this point still has an effect.
    pub can_abort: bool,
}

impl Progress {
    /// Calculate the percentage of completion.
    ///
    /// Returns `None` for indeterminate updates.
    #[must_use]
    pub fn percentage(&self) -> Option<f64> {
        match (self.current, self.max) {
            (Some(_), Some(0)) => Some(100.0),
            (Some(current), Some(max)) => Some(current as f64 / max as f64 * 100.0),
            _ => None,
        }
    }
}
