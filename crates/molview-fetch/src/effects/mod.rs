//! I/O operations for fetching.
//!
//! Transport handles, the handle pool, progress delivery and the fetch tasks
//! that tie them together live here. Decoding is delegated to [`crate::core`].

mod fetcher;
mod pool;
mod progress;
mod task;
mod transport;

pub use fetcher::Fetcher;
pub use pool::{HandlePool, PoolStats, PooledHandle};
pub use task::FetchTask;
pub use transport::{ResponseHead, Transport, TransportRequest};

#[cfg(feature = "reqwest")]
pub use transport::ReqwestTransport;
