use crate::geometry::Size;
use resvg::tiny_skia::Transform;
use thiserror::Error;

#[cfg(test)]
pub mod fake;
pub mod raster;

/// Why a backend refused to create a document.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CreateError {
    #[error("{0}")]
    Malformed(String),

    #[error("document has no intrinsic size")]
    NoSize,
}

/// A drawing surface that accepts a current transform.
pub trait GraphicsContext {
    fn transform(&self) -> Transform;

    fn set_transform(&mut self, transform: Transform);
}

/// A graphics context backed by a freshly allocated pixel buffer.
pub trait Bitmap: GraphicsContext + Sized {
    type Image;

    /// Allocates whole pixels covering `frame`, bottom-up with the origin at
    /// the bottom-left of `frame` itself. Slack from rounding up ends up along
    /// the bottom and right edges.
    fn allocate(frame: Size) -> Option<Self>;

    fn into_image(self) -> Self::Image;
}

/// The vector-graphics capability documents are decoded and drawn with.
///
/// Implementations must be safe to call from concurrent tasks; handles are
/// only ever read after creation and released exactly once by their owner.
pub trait VectorBackend: Send + Sync {
    type Handle: Send + Sync;
    type Context: GraphicsContext;

    fn create_document(&self, data: &[u8]) -> Result<Self::Handle, CreateError>;

    /// Adapters whose handles free themselves on drop may make this a no-op.
    fn release_document(&self, handle: &Self::Handle);

    fn canvas_size(&self, handle: &Self::Handle) -> Size;

    fn draw_document(&self, context: &mut Self::Context, handle: &Self::Handle);
}

/// Image type produced by rasterizing with backend `B`.
pub type ImageOf<B> = <<B as VectorBackend>::Context as Bitmap>::Image;
