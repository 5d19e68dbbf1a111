//! Scripted transport shared by the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use molview_fetch::{
    FetchOptions, Fetcher, FetcherConfig, Progress, ResponseHead, Transport, TransportRequest,
};

#[derive(Debug)]
pub struct TestError(pub String);

impl std::fmt::Display for TestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for TestError {}

/// What the fake server answers.
#[derive(Debug, Clone)]
pub struct Script {
    pub status: u16,
    pub reason: Option<String>,
    pub content_length: Option<u64>,
    pub chunks: Vec<Bytes>,
    /// Never deliver chunks past this index; the transfer hangs there.
    pub stall_after: Option<usize>,
    pub open_error: Option<String>,
    /// The response head never arrives.
    pub stall_on_open: bool,
    pub chunk_delay: Duration,
}

impl Script {
    pub fn ok(body: impl Into<Bytes>) -> Self {
        let body = body.into();
        Self {
            status: 200,
            reason: None,
            content_length: Some(body.len() as u64),
            chunks: vec![body],
            stall_after: None,
            open_error: None,
            stall_on_open: false,
            chunk_delay: Duration::ZERO,
        }
    }

    pub fn chunked(body: &[u8], chunk_size: usize) -> Self {
        Self {
            chunks: body
                .chunks(chunk_size)
                .map(Bytes::copy_from_slice)
                .collect(),
            ..Self::ok(Bytes::copy_from_slice(body))
        }
    }

    pub fn status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn reason(mut self, reason: &str) -> Self {
        self.reason = Some(reason.to_string());
        self
    }

    pub fn content_length(mut self, content_length: Option<u64>) -> Self {
        self.content_length = content_length;
        self
    }

    pub fn stall_after(mut self, chunks: usize) -> Self {
        self.stall_after = Some(chunks);
        self
    }

    pub fn stall_on_open(mut self) -> Self {
        self.stall_on_open = true;
        self
    }

    pub fn open_error(mut self, message: &str) -> Self {
        self.open_error = Some(message.to_string());
        self
    }

    pub fn chunk_delay(mut self, delay: Duration) -> Self {
        self.chunk_delay = delay;
        self
    }
}

/// Counters shared between a test and every handle its pool creates.
#[derive(Debug, Default)]
pub struct Probe {
    pub opened: AtomicUsize,
    pub aborted: AtomicUsize,
    pub requests: Mutex<Vec<TransportRequest>>,
}

impl Probe {
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn aborted(&self) -> usize {
        self.aborted.load(Ordering::SeqCst)
    }
}

pub struct ScriptedTransport {
    script: Script,
    probe: Arc<Probe>,
    pending: Option<VecDeque<Bytes>>,
    delivered: usize,
}

impl ScriptedTransport {
    pub fn new(script: Script, probe: Arc<Probe>) -> Self {
        Self {
            script,
            probe,
            pending: None,
            delivered: 0,
        }
    }
}

impl Transport for ScriptedTransport {
    type Error = TestError;

    async fn open(&mut self, request: &TransportRequest) -> Result<ResponseHead, TestError> {
        self.probe.opened.fetch_add(1, Ordering::SeqCst);
        self.probe.requests.lock().unwrap().push(request.clone());
        if self.script.stall_on_open {
            std::future::pending::<()>().await;
        }
        if let Some(message) = &self.script.open_error {
            return Err(TestError(message.clone()));
        }
        self.pending = Some(self.script.chunks.iter().cloned().collect());
        self.delivered = 0;
        Ok(ResponseHead {
            status: self.script.status,
            reason: self.script.reason.clone(),
            content_length: self.script.content_length,
        })
    }

    async fn next_chunk(&mut self) -> Result<Option<Bytes>, TestError> {
        if self.script.stall_after == Some(self.delivered) {
            std::future::pending::<()>().await;
        }
        if !self.script.chunk_delay.is_zero() {
            tokio::time::sleep(self.script.chunk_delay).await;
        }
        let Some(pending) = self.pending.as_mut() else {
            return Ok(None);
        };
        let chunk = pending.pop_front();
        if chunk.is_some() {
            self.delivered += 1;
        } else {
            self.pending = None;
        }
        Ok(chunk)
    }

    fn abort(&mut self) {
        if self.pending.take().is_some() {
            self.probe.aborted.fetch_add(1, Ordering::SeqCst);
        }
    }
}

pub fn fetcher(script: Script, capacity: usize) -> (Fetcher<ScriptedTransport>, Arc<Probe>) {
    let probe = Arc::new(Probe::default());
    let shared = Arc::clone(&probe);
    let config = FetcherConfig::default().pool_capacity(capacity);
    let fetcher = Fetcher::with_factory(config, move || {
        ScriptedTransport::new(script.clone(), Arc::clone(&shared))
    });
    (fetcher, probe)
}

/// Options that record every progress update.
pub fn recording_options() -> (FetchOptions, Arc<Mutex<Vec<Progress>>>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let options = FetchOptions::default().on_progress(Arc::new(move |progress: &Progress| {
        sink.lock().unwrap().push(progress.clone());
    }));
    (options, events)
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}
