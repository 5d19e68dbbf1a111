use std::future::Future;

use bytes::Bytes;

use crate::data::FetchRequest;

/// Wire-level description of a remote request.
///
/// The method and content type are fixed for this subsystem; only the URL
/// and the optional body vary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    pub url: String,
    pub body: Option<String>,
}

impl TransportRequest {
    pub const METHOD: &'static str = "POST";
    pub const CONTENT_TYPE: &'static str = "application/json";
}

impl From<&FetchRequest> for TransportRequest {
    fn from(request: &FetchRequest) -> Self {
        Self {
            url: request.url.clone(),
            body: request.body.clone(),
        }
    }
}

/// Status line and size announced by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHead {
    pub status: u16,
    /// Reason phrase for `status`; `None` falls back to the canonical one.
    pub reason: Option<String>,
    /// Body length from `Content-Length`, if the server sent one.
    pub content_length: Option<u64>,
}

/// One reusable network handle.
///
/// A handle carries at most one live response at a time. [`open`] starts it,
/// [`next_chunk`] drains its body, and [`abort`] drops whatever is still in
/// flight so the handle can be handed to another task without leaking data
/// from the previous one.
///
/// # Implementations
///
/// - [`ReqwestTransport`]: production implementation using `reqwest`
/// - Scripted implementations for testing
///
/// [`open`]: Transport::open
/// [`next_chunk`]: Transport::next_chunk
/// [`abort`]: Transport::abort
pub trait Transport: Send + 'static {
    /// Error type for transport operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Send the request and wait for the response head.
    fn open(
        &mut self,
        request: &TransportRequest,
    ) -> impl Future<Output = Result<ResponseHead, Self::Error>> + Send;

    /// Next body chunk of the live response, `None` once the body is done.
    fn next_chunk(&mut self) -> impl Future<Output = Result<Option<Bytes>, Self::Error>> + Send;

    /// Drop the live response, if any. Idempotent.
    fn abort(&mut self);
}

#[cfg(feature = "reqwest")]
mod reqwest_impl {
    use std::pin::Pin;

    use futures_util::{Stream, StreamExt};

    use super::*;

    type BodyStream = Pin<Box<dyn Stream<Item = reqwest::Result<Bytes>> + Send>>;

    /// Production transport using `reqwest`.
    ///
    /// Handles created from clones of one [`reqwest::Client`] share its
    /// connection pool.
    pub struct ReqwestTransport {
        client: reqwest::Client,
        body: Option<BodyStream>,
    }

    impl ReqwestTransport {
        /// Create a new ReqwestTransport with default configuration.
        pub fn new() -> Self {
            Self::with_client(reqwest::Client::new())
        }

        pub fn with_client(client: reqwest::Client) -> Self {
            Self { client, body: None }
        }

        /// Returns `true` when no response is in flight.
        pub fn is_idle(&self) -> bool {
            self.body.is_none()
        }
    }

    impl Default for ReqwestTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Transport for ReqwestTransport {
        type Error = reqwest::Error;

        async fn open(&mut self, request: &TransportRequest) -> Result<ResponseHead, Self::Error> {
            self.body = None;

            let mut builder = self
                .client
                .post(&request.url)
                .header(reqwest::header::CONTENT_TYPE, TransportRequest::CONTENT_TYPE);
            if let Some(body) = &request.body {
                builder = builder.body(body.clone());
            }

            let response = builder.send().await?;
            let head = ResponseHead {
                status: response.status().as_u16(),
                reason: response.status().canonical_reason().map(str::to_owned),
                content_length: response.content_length(),
            };
            self.body = Some(Box::pin(response.bytes_stream()));
            Ok(head)
        }

        async fn next_chunk(&mut self) -> Result<Option<Bytes>, Self::Error> {
            let Some(body) = self.body.as_mut() else {
                return Ok(None);
            };
            match body.next().await {
                Some(chunk) => chunk.map(Some),
                None => {
                    self.body = None;
                    Ok(None)
                }
            }
        }

        fn abort(&mut self) {
            self.body = None;
        }
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest_impl::ReqwestTransport;
