use std::path::Path;
use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use tokio::io::AsyncReadExt;
use tracing::{Instrument, debug, info_span, trace, warn};

use crate::core::{
    DOWNLOADING, OPENING_FILE, PARSING_JSON, PARSING_XML, READING, WAITING_FOR_SERVER,
    decode_payload, decompress, is_success_status,
};
use crate::data::{
    FetchOptions, FetchPhase, FetchRequest, FetcherConfig, FileRequest, Outcome, Payload,
    PayloadKind,
};
use crate::error::{FetchError, Result};

use super::pool::HandlePool;
use super::progress::ProgressReporter;
use super::task::FetchTask;
use super::transport::{Transport, TransportRequest};

const READ_CHUNK: usize = 64 * 1024;

/// Issues remote fetches and local file reads.
///
/// A fetcher owns a shared [`HandlePool`]; clones share the same pool, so one
/// fetcher per component is enough and concurrent tasks recycle each other's
/// handles.
pub struct Fetcher<T: Transport> {
    pool: Arc<HandlePool<T>>,
    config: FetcherConfig,
}

impl<T: Transport> Clone for Fetcher<T> {
    fn clone(&self) -> Self {
        Self {
            pool: Arc::clone(&self.pool),
            config: self.config.clone(),
        }
    }
}

impl<T: Transport> std::fmt::Debug for Fetcher<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fetcher")
            .field("pool", &self.pool)
            .field("config", &self.config)
            .finish()
    }
}

impl<T: Transport> Fetcher<T> {
    /// Create a fetcher around an existing pool. The pool's own capacity
    /// applies; `config.pool_capacity` is not consulted.
    pub fn new(pool: Arc<HandlePool<T>>, config: FetcherConfig) -> Self {
        Self { pool, config }
    }

    /// Create a fetcher with a fresh pool sized by `config.pool_capacity`.
    pub fn with_factory(config: FetcherConfig, factory: impl Fn() -> T + Send + Sync + 'static) -> Self {
        let pool = Arc::new(HandlePool::new(config.pool_capacity, factory));
        Self::new(pool, config)
    }

    pub fn pool(&self) -> &Arc<HandlePool<T>> {
        &self.pool
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    /// Fetch a remote resource and decode it as `request.kind`.
    ///
    /// The handle used for the transfer goes back to the pool as soon as the
    /// body is received, before any decompression or parsing, and on every
    /// failure or cancellation path.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Configuration`] if `request` is invalid; no handle is
    ///   acquired in that case.
    /// - [`FetchError::Transfer`] for network failures and statuses outside
    ///   200..=399.
    /// - [`FetchError::NotImplemented`] when decompression is requested.
    /// - [`FetchError::Parse`] for malformed JSON or XML.
    /// - [`FetchError::Progress`] if the progress callback panics.
    pub async fn fetch(&self, request: &FetchRequest, options: &FetchOptions) -> Result<Outcome<Payload>> {
        request.validate()?;

        let span = info_span!("fetch", title = %request.display_title(), kind = %request.kind);
        let result = self.fetch_remote(request, options).instrument(span).await;
        if let Err(e) = &result {
            warn!(url = %request.url, error = %e, "fetch failed");
        }
        result
    }

    async fn fetch_remote(&self, request: &FetchRequest, options: &FetchOptions) -> Result<Outcome<Payload>> {
        let cancel = &options.cancel;
        if cancel.is_cancelled() {
            debug!("cancelled before start");
            return Ok(Outcome::Cancelled);
        }

        let mut reporter = ProgressReporter::new(options, self.config.progress_interval_duration());
        reporter.stage(FetchPhase::Opening, WAITING_FOR_SERVER, true)?;

        let mut handle = self.pool.acquire();
        let transport_request = TransportRequest::from(request);
        debug!(url = %transport_request.url, method = TransportRequest::METHOD, "request started");

        let received = tokio::select! {
            biased;
            () = cancel.cancelled() => None,
            received = receive(&mut *handle, &transport_request, &mut reporter) => Some(received),
        };

        let Some(received) = received else {
            handle.abort();
            handle.release();
            debug!("cancelled during transfer");
            return Ok(Outcome::Cancelled);
        };
        handle.release();

        let mut data = received?;
        debug!(bytes = data.len(), "response received");
        if request.compressed {
            data = decompress(data)?;
        }
        decode(data, request.kind, &mut reporter).map(Outcome::Completed)
    }

    /// Read a local file and decode it as `request.kind`.
    ///
    /// Files named `*.gz` are always read as raw bytes and passed through
    /// decompression before decoding.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Transfer`] if the file cannot be opened or read.
    /// - [`FetchError::NotImplemented`] for compressed files.
    /// - [`FetchError::Parse`] for malformed JSON or XML.
    /// - [`FetchError::Progress`] if the progress callback panics.
    pub async fn read_file(&self, request: &FileRequest, options: &FetchOptions) -> Result<Outcome<Payload>> {
        let span = info_span!("read_file", title = %request.display_title(), kind = %request.kind);
        let result = self.read_local(request, options).instrument(span).await;
        if let Err(e) = &result {
            warn!(path = %request.path.display(), error = %e, "read failed");
        }
        result
    }

    async fn read_local(&self, request: &FileRequest, options: &FetchOptions) -> Result<Outcome<Payload>> {
        let cancel = &options.cancel;
        if cancel.is_cancelled() {
            debug!("cancelled before start");
            return Ok(Outcome::Cancelled);
        }

        let mut reporter = ProgressReporter::new(options, self.config.progress_interval_duration());
        reporter.stage(FetchPhase::Opening, OPENING_FILE, true)?;

        let read = tokio::select! {
            biased;
            () = cancel.cancelled() => None,
            read = read_all(request.path(), &mut reporter) => Some(read),
        };
        let Some(read) = read else {
            debug!("cancelled during read");
            return Ok(Outcome::Cancelled);
        };

        let mut data = read?;
        debug!(bytes = data.len(), "file read");
        if request.is_compressed() {
            data = decompress(data)?;
        }
        decode(data, request.kind, &mut reporter).map(Outcome::Completed)
    }

    /// Run [`fetch`](Self::fetch) on the tokio runtime and return a handle to
    /// cancel or await it.
    pub fn spawn_fetch(&self, request: FetchRequest, options: FetchOptions) -> FetchTask {
        let fetcher = self.clone();
        let title = request.display_title().to_string();
        let cancel = options.cancel.clone();
        let join = tokio::spawn(async move { fetcher.fetch(&request, &options).await });
        FetchTask::new(title, cancel, join)
    }

    /// Run [`read_file`](Self::read_file) on the tokio runtime.
    pub fn spawn_read_file(&self, request: FileRequest, options: FetchOptions) -> FetchTask {
        let fetcher = self.clone();
        let title = request.display_title();
        let cancel = options.cancel.clone();
        let join = tokio::spawn(async move { fetcher.read_file(&request, &options).await });
        FetchTask::new(title, cancel, join)
    }
}

#[cfg(feature = "reqwest")]
impl Fetcher<super::transport::ReqwestTransport> {
    /// Create a fetcher whose handles share one default [`reqwest::Client`].
    pub fn reqwest(config: FetcherConfig) -> Self {
        Self::with_client(config, reqwest::Client::new())
    }

    pub fn with_client(config: FetcherConfig, client: reqwest::Client) -> Self {
        Self::with_factory(config, move || {
            super::transport::ReqwestTransport::with_client(client.clone())
        })
    }
}

async fn receive<T: Transport>(
    transport: &mut T,
    request: &TransportRequest,
    reporter: &mut ProgressReporter<'_>,
) -> Result<Bytes> {
    let head = transport
        .open(request)
        .await
        .map_err(|e| FetchError::transfer(e.to_string()))?;
    if !is_success_status(head.status) {
        return Err(FetchError::http_status(head.status, head.reason.as_deref()));
    }

    let total = head.content_length;
    let mut buffer = BytesMut::with_capacity(initial_capacity(total));
    while let Some(chunk) = transport
        .next_chunk()
        .await
        .map_err(|e| FetchError::transfer(e.to_string()))?
    {
        buffer.extend_from_slice(&chunk);
        trace!(chunk = chunk.len(), loaded = buffer.len(), total, "chunk received");
        reporter.transfer(DOWNLOADING, buffer.len() as u64, total, false)?;
    }
    reporter.transfer(DOWNLOADING, buffer.len() as u64, total, true)?;
    Ok(buffer.freeze())
}

async fn read_all(path: &Path, reporter: &mut ProgressReporter<'_>) -> Result<Bytes> {
    let mut file = tokio::fs::File::open(path).await?;
    let total = file.metadata().await?.len();

    let mut buffer = BytesMut::with_capacity(initial_capacity(Some(total)));
    let mut chunk = vec![0u8; READ_CHUNK];
    loop {
        let read = file.read(&mut chunk).await?;
        if read == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..read]);
        trace!(chunk = read, loaded = buffer.len(), total, "chunk read");
        reporter.transfer(READING, buffer.len() as u64, Some(total), false)?;
    }
    reporter.transfer(READING, buffer.len() as u64, Some(total), true)?;
    Ok(buffer.freeze())
}

fn decode(data: Bytes, kind: PayloadKind, reporter: &mut ProgressReporter<'_>) -> Result<Payload> {
    match kind {
        PayloadKind::Json => reporter.stage(FetchPhase::Parsing, PARSING_JSON, false)?,
        PayloadKind::Xml => reporter.stage(FetchPhase::Parsing, PARSING_XML, false)?,
        PayloadKind::Text | PayloadKind::Binary => {}
    }
    decode_payload(data, kind)
}

/// Preallocate for the announced size, up to 8 MiB; larger bodies grow the
/// buffer as chunks arrive.
fn initial_capacity(total: Option<u64>) -> usize {
    const MAX_PREALLOCATION: u64 = 8 * 1024 * 1024;
    total.map_or(0, |total| total.min(MAX_PREALLOCATION) as usize)
}
