//! Cancellable, progress-reporting retrieval of remote and local data for
//! structure viewers.
//!
//! # Architecture
//!
//! This crate follows the three-layer pattern:
//! - [`data`] - Immutable requests, payloads, progress and configuration
//! - [`core`] - Pure transformations (status checks, decoding, XML trees)
//! - [`effects`] - I/O: transports, the handle pool and fetch tasks
//!
//! # Key Features
//!
//! - **Pooled Handles**: transport handles are recycled through a bounded,
//!   explicitly owned [`HandlePool`] and returned on every exit path
//! - **Cancellation**: every task honours a [`CancellationToken`] and settles
//!   as [`Outcome::Cancelled`] rather than as an error
//! - **Progress**: ordered updates through a caller-supplied callback
//! - **Mechanism-Only**: no retries or timeouts; callers race a cancellation
//!   token against completion if they need one
//!
//! # Example
//!
//! ```no_run
//! use molview_fetch::{FetchOptions, FetchRequest, Fetcher, FetcherConfig, PayloadKind};
//!
//! # async fn run() -> molview_fetch::Result<()> {
//! let fetcher = Fetcher::reqwest(FetcherConfig::default());
//! let request = FetchRequest::new("https://example.org/api/pdb/entry/summary")
//!     .kind(PayloadKind::Json)
//!     .body(r#"{"ids":["1cbs"]}"#);
//! if let Some(payload) = fetcher.fetch(&request, &FetchOptions::default()).await?.completed() {
//!     println!("{:?}", payload.as_json());
//! }
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod data;
pub mod effects;
mod error;

pub use data::{
    FetchOptions, FetchPhase, FetchRequest, FetcherConfig, FileRequest, Outcome, Payload,
    PayloadKind, Progress, ProgressCallback, XmlDocument, XmlElement, XmlNode,
};
pub use effects::{
    FetchTask, Fetcher, HandlePool, PoolStats, PooledHandle, ResponseHead, Transport,
    TransportRequest,
};
pub use error::{FetchError, Result};
pub use tokio_util::sync::CancellationToken;

#[cfg(feature = "reqwest")]
pub use effects::ReqwestTransport;
