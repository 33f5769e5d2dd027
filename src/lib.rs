//! Load SVG documents from memory or the network and draw them aspect-fitted
//! into any graphics context.
//!
//! ```ignore
//! use std::sync::Arc;
//! use svgfetch::{HttpTransport, ImageFetcher, ResvgBackend, TargetRect, VectorDocument};
//!
//! let backend = Arc::new(ResvgBackend::with_system_fonts());
//!
//! let document = VectorDocument::decode(backend.clone(), &bytes)?;
//! let thumbnail = document.render(TargetRect::from_height(64.0))?;
//!
//! let fetcher = ImageFetcher::new(HttpTransport::new(), backend);
//! let logo = fetcher.fetch_image("https://example.com/logo.svg").await?;
//! ```

pub mod backend;
pub mod document;
pub mod error;
pub mod fetch;
pub mod geometry;

pub use backend::{
    raster::{Canvas, Image, ResvgBackend},
    Bitmap, GraphicsContext, VectorBackend,
};
pub use document::VectorDocument;
pub use error::{DecodeError, FetchError, InvalidTarget, RenderError, TransportError};
pub use fetch::{HttpTransport, ImageFetcher, Response, Transport};
pub use geometry::{Fit, Size, TargetRect};
