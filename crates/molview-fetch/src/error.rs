//! Error types for molview-fetch.

use std::io;

use thiserror::Error;

use crate::core::status_reason;

pub type Result<T> = std::result::Result<T, FetchError>;

/// Failure of a single fetch task.
///
/// Cancellation is not an error; it is reported through
/// [`Outcome::Cancelled`](crate::Outcome::Cancelled).
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request or configuration is inconsistent. Raised before any I/O.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// Network failure, unsuccessful HTTP status, or file read error.
    #[error("transfer failed: {reason}")]
    Transfer { status: Option<u16>, reason: String },

    #[error("{0} is not implemented")]
    NotImplemented(&'static str),

    #[error("failed to parse {format}: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },

    /// The progress callback panicked.
    #[error("progress reporting failed: {0}")]
    Progress(String),
}

impl FetchError {
    pub(crate) fn transfer(reason: impl Into<String>) -> Self {
        FetchError::Transfer {
            status: None,
            reason: reason.into(),
        }
    }

    /// Failure for an unsuccessful status. A reason phrase supplied by the
    /// transport wins over the canonical one.
    pub(crate) fn http_status(status: u16, reason: Option<&str>) -> Self {
        let reason = match reason {
            Some(phrase) => format!("{status} {phrase}"),
            None => status_reason(status),
        };
        FetchError::Transfer {
            status: Some(status),
            reason,
        }
    }

    pub(crate) fn parse(format: &'static str, message: impl std::fmt::Display) -> Self {
        FetchError::Parse {
            format,
            message: message.to_string(),
        }
    }

    /// HTTP status carried by a transfer failure, if the server answered.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Transfer { status, .. } => *status,
            _ => None,
        }
    }

    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, FetchError::Configuration(_))
    }

    #[must_use]
    pub fn is_transfer(&self) -> bool {
        matches!(self, FetchError::Transfer { .. })
    }

    #[must_use]
    pub fn is_not_implemented(&self) -> bool {
        matches!(self, FetchError::NotImplemented(_))
    }

    #[must_use]
    pub fn is_parse(&self) -> bool {
        matches!(self, FetchError::Parse { .. })
    }
}

impl From<io::Error> for FetchError {
    fn from(e: io::Error) -> Self {
        FetchError::transfer(e.to_string())
    }
}
