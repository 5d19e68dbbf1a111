use bytes::Bytes;

use super::request::PayloadKind;
use super::xml::XmlDocument;

/// Fetched content, decoded according to the requested [`PayloadKind`].
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Text(String),
    Binary(Bytes),
    Json(serde_json::Value),
    Xml(XmlDocument),
}

impl Payload {
    pub fn kind(&self) -> PayloadKind {
        match self {
            Payload::Text(_) => PayloadKind::Text,
            Payload::Binary(_) => PayloadKind::Binary,
            Payload::Json(_) => PayloadKind::Json,
            Payload::Xml(_) => PayloadKind::Xml,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Payload::Binary(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Payload::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_xml(&self) -> Option<&XmlDocument> {
        match self {
            Payload::Xml(document) => Some(document),
            _ => None,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            Payload::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn into_bytes(self) -> Option<Bytes> {
        match self {
            Payload::Binary(bytes) => Some(bytes),
            _ => None,
        }
    }
}
