//! Immutable data types for fetch operations.
//!
//! Requests, decoded payloads, progress events and configuration live here.
//! None of these types perform I/O.

pub mod config;
pub mod options;
pub mod outcome;
pub mod payload;
pub mod progress;
pub mod request;
pub mod xml;

pub use config::FetcherConfig;
pub use options::{FetchOptions, ProgressCallback};
pub use outcome::Outcome;
pub use payload::Payload;
pub use progress::{FetchPhase, Progress};
pub use request::{FetchRequest, FileRequest, PayloadKind};
pub use xml::{XmlDocument, XmlElement, XmlNode};
