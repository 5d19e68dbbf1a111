use bytes::Bytes;

use crate::data::{Payload, PayloadKind};
use crate::error::{FetchError, Result};

use super::xml::parse_xml;

/// Interpret received bytes as the requested payload kind.
///
/// Text is decoded as UTF-8; invalid sequences become U+FFFD rather than
/// failing the task.
///
/// # Errors
///
/// [`FetchError::Parse`] when a JSON or XML body is malformed.
pub fn decode_payload(data: Bytes, kind: PayloadKind) -> Result<Payload> {
    match kind {
        PayloadKind::Text => Ok(Payload::Text(into_text(data))),
        PayloadKind::Binary => Ok(Payload::Binary(data)),
        PayloadKind::Json => serde_json::from_slice(&data)
            .map(Payload::Json)
            .map_err(|e| FetchError::parse("JSON", e)),
        PayloadKind::Xml => parse_xml(&into_text(data)).map(Payload::Xml),
    }
}

fn into_text(data: Bytes) -> String {
    match String::from_utf8(data.into()) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}
