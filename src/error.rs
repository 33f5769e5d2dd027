//! Error types for decoding, drawing and fetching

use std::error::Error as StdError;
use thiserror::Error;

/// Errors that can occur when decoding raw bytes into a document
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// The backend could not parse the bytes
    #[error("malformed SVG document: {0}")]
    Malformed(String),

    /// The document parsed but has no usable intrinsic size
    #[error("SVG document has no usable canvas size")]
    EmptyCanvas,
}

/// A target rectangle with no usable dimension
#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[error("invalid target {width}x{height}: at least one dimension must be positive")]
pub struct InvalidTarget {
    pub width: f32,
    pub height: f32,
}

/// Errors that can occur when rasterizing a document into a new bitmap
#[derive(Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    InvalidTarget(#[from] InvalidTarget),

    #[error("failed to allocate a {width}x{height} bitmap")]
    Allocation { width: u32, height: u32 },
}

/// A network-layer failure: DNS, connection, TLS, timeout or a broken body
#[derive(Error, Debug)]
#[error(transparent)]
pub struct TransportError(Box<dyn StdError + Send + Sync>);

impl TransportError {
    pub fn new(cause: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self(cause.into())
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self::new(err)
    }
}

/// Errors that can occur when fetching a document over the network
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("failed to reach server")]
    Transport(#[source] TransportError),

    #[error("server responded with HTTP {0}")]
    HttpStatus(u16),

    #[error("failed to decode fetched document")]
    Decode(#[from] DecodeError),

    #[error("failed to render fetched document")]
    Render(#[from] RenderError),
}
