//! Fetching SVG documents over the network

use crate::{
    backend::{Bitmap, ImageOf, VectorBackend},
    document::VectorDocument,
    error::{FetchError, TransportError},
};
use log::debug;
use reqwest::StatusCode;
use std::{future::Future, sync::Arc};

/// A response as seen by the fetcher: status and full body. Transports may
/// leave the body empty for anything but 200.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Issues GET requests. One attempt per call.
pub trait Transport: Send + Sync {
    fn get(&self, url: &str) -> impl Future<Output = Result<Response, TransportError>> + Send;
}

pub struct HttpTransport {
    inner: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        HttpTransport {
            inner: reqwest::Client::new(),
        }
    }

    pub fn with_user_agent(user_agent: &str) -> Result<Self, TransportError> {
        let inner = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()?;

        Ok(HttpTransport { inner })
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<Response, TransportError> {
        let res = self.inner.get(url).send().await?;

        let status = res.status();
        if status != StatusCode::OK {
            return Ok(Response {
                status: status.as_u16(),
                body: Vec::new(),
            });
        }

        let body = res.bytes().await?.to_vec();

        Ok(Response {
            status: status.as_u16(),
            body,
        })
    }
}

/// Fetches, decodes and rasterizes SVG documents.
///
/// Construct one and share it (behind an `Arc` if needed); concurrent fetches
/// are independent. There is no retry, caching or timeout: wrap calls in
/// `tokio::time::timeout` to bound them.
pub struct ImageFetcher<T, B> {
    transport: T,
    backend: Arc<B>,
}

impl<T: Transport, B: VectorBackend> ImageFetcher<T, B> {
    pub fn new(transport: T, backend: Arc<B>) -> Self {
        ImageFetcher { transport, backend }
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    /// The response body, if the server answered with 200.
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        debug!("Fetching {url}");

        let res = self
            .transport
            .get(url)
            .await
            .map_err(FetchError::Transport)?;

        if res.status != StatusCode::OK.as_u16() {
            debug!("{url} responded with {}", res.status);
            return Err(FetchError::HttpStatus(res.status));
        }

        debug!("Received {} bytes from {url}", res.body.len());
        Ok(res.body)
    }

    pub async fn fetch_document(&self, url: &str) -> Result<VectorDocument<B>, FetchError> {
        let body = self.fetch_bytes(url).await?;
        Ok(VectorDocument::decode(self.backend.clone(), &body)?)
    }
}

impl<T, B> ImageFetcher<T, B>
where
    T: Transport,
    B: VectorBackend,
    B::Context: Bitmap,
{
    /// Fetch and rasterize at the document's own canvas size.
    pub async fn fetch_image(&self, url: &str) -> Result<ImageOf<B>, FetchError> {
        let document = self.fetch_document(url).await?;
        Ok(document.render_native()?)
    }
}
