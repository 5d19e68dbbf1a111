use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::is_compressed_name;
use crate::error::{FetchError, Result};

/// Requested interpretation of the fetched bytes.
///
/// The serialized names follow the wire vocabulary used by viewer
/// descriptors: `"string"`, `"binary"`, `"json"` and `"xml"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PayloadKind {
    #[default]
    #[serde(rename = "string")]
    Text,
    #[serde(rename = "binary")]
    Binary,
    #[serde(rename = "json")]
    Json,
    #[serde(rename = "xml")]
    Xml,
}

impl PayloadKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayloadKind::Text => "string",
            PayloadKind::Binary => "binary",
            PayloadKind::Json => "json",
            PayloadKind::Xml => "xml",
        }
    }
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PayloadKind {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "string" | "text" => Ok(PayloadKind::Text),
            "binary" => Ok(PayloadKind::Binary),
            "json" => Ok(PayloadKind::Json),
            "xml" => Ok(PayloadKind::Xml),
            other => Err(FetchError::Configuration(format!(
                "unknown payload kind '{other}'"
            ))),
        }
    }
}

/// Descriptor of a remote fetch.
///
/// # Examples
///
/// ```
/// use molview_fetch::{FetchRequest, PayloadKind};
///
/// let request = FetchRequest::new("https://example.org/api/entry")
///     .kind(PayloadKind::Json)
///     .title("Entry metadata")
///     .body(r#"{"id":"1cbs"}"#);
/// assert!(request.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: String,
    pub kind: PayloadKind,
    pub title: Option<String>,
    pub body: Option<String>,
    /// Run the received bytes through decompression. Only valid for
    /// [`PayloadKind::Binary`].
    pub compressed: bool,
}

impl FetchRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind: PayloadKind::default(),
            title: None,
            body: None,
            compressed: false,
        }
    }

    #[must_use]
    pub fn kind(mut self, kind: PayloadKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    #[must_use]
    pub fn compressed(mut self, compressed: bool) -> Self {
        self.compressed = compressed;
        self
    }

    /// Human-readable name of the task, falling back to the URL.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.url)
    }

    /// Reject descriptors that can never succeed.
    ///
    /// # Errors
    ///
    /// [`FetchError::Configuration`] when decompression is requested for a
    /// payload kind other than binary.
    pub fn validate(&self) -> Result<()> {
        if self.compressed && self.kind != PayloadKind::Binary {
            return Err(FetchError::Configuration(format!(
                "decompression requires a binary payload, got '{}'",
                self.kind
            )));
        }
        Ok(())
    }
}

/// Descriptor of a local file read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRequest {
    pub path: PathBuf,
    pub kind: PayloadKind,
}

impl FileRequest {
    pub fn new(path: impl Into<PathBuf>, kind: PayloadKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    pub fn text(path: impl Into<PathBuf>) -> Self {
        Self::new(path, PayloadKind::Text)
    }

    pub fn binary(path: impl Into<PathBuf>) -> Self {
        Self::new(path, PayloadKind::Binary)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name used as the task title.
    pub fn display_title(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Whether the file name follows the compressed-archive convention.
    pub fn is_compressed(&self) -> bool {
        self.path
            .file_name()
            .is_some_and(|name| is_compressed_name(&name.to_string_lossy()))
    }
}
