//! Progress message text and ordering rules.

pub(crate) const WAITING_FOR_SERVER: &str = "Waiting for server...";
pub(crate) const OPENING_FILE: &str = "Opening file...";
pub(crate) const DOWNLOADING: &str = "Downloading...";
pub(crate) const READING: &str = "Reading...";
pub(crate) const PARSING_JSON: &str = "Parsing JSON...";
pub(crate) const PARSING_XML: &str = "Parsing XML...";

const MEGABYTE: f64 = 1024.0 * 1024.0;

/// Message for a transfer update. Indeterminate transfers carry the received
/// size since there is no total to show.
pub(crate) fn transfer_message(action: &str, loaded: u64, total: Option<u64>) -> String {
    match total {
        Some(_) => action.to_string(),
        None => format!("{action} {:.2} MB", loaded as f64 / MEGABYTE),
    }
}

/// Next reported byte count: never below what was already reported and never
/// above the announced total.
pub(crate) fn advance(previous: u64, loaded: u64, total: Option<u64>) -> u64 {
    let bounded = match total {
        Some(total) => loaded.min(total),
        None => loaded,
    };
    bounded.max(previous)
}
