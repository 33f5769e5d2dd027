//! Decoded vector documents and aspect-fit drawing

use crate::{
    backend::{Bitmap, CreateError, GraphicsContext, ImageOf, VectorBackend},
    error::{DecodeError, InvalidTarget, RenderError},
    geometry::{Fit, Size, TargetRect},
};
use log::{debug, trace};
use std::{fmt, sync::Arc};

/// A decoded SVG document.
///
/// Exclusively owns its backend handle and releases it exactly once, when the
/// document is dropped. A document always has a positive canvas size.
pub struct VectorDocument<B: VectorBackend> {
    backend: Arc<B>,
    handle: B::Handle,
    canvas_size: Size,
}

impl<B: VectorBackend> VectorDocument<B> {
    /// Decode raw bytes. No I/O happens here.
    pub fn decode(backend: Arc<B>, data: &[u8]) -> Result<Self, DecodeError> {
        if data.is_empty() {
            return Err(DecodeError::Malformed("no data".into()));
        }

        let handle = backend.create_document(data).map_err(|err| match err {
            CreateError::Malformed(reason) => DecodeError::Malformed(reason),
            CreateError::NoSize => DecodeError::EmptyCanvas,
        })?;

        let canvas_size = backend.canvas_size(&handle);
        let document = Self {
            backend,
            handle,
            canvas_size,
        };

        // Dropping the document here releases the handle
        if !document.canvas_size.is_positive() {
            return Err(DecodeError::EmptyCanvas);
        }

        debug!(
            "Decoded {} bytes into a {}x{} document",
            data.len(),
            canvas_size.width,
            canvas_size.height
        );

        Ok(document)
    }

    pub fn decode_str(backend: Arc<B>, svg: &str) -> Result<Self, DecodeError> {
        Self::decode(backend, svg.as_bytes())
    }

    /// The document's intrinsic size, in its own units.
    pub fn canvas_size(&self) -> Size {
        self.canvas_size
    }

    /// How the document would be placed into `target`.
    pub fn fit(&self, target: TargetRect) -> Result<Fit, InvalidTarget> {
        Fit::compute(self.canvas_size, target)
    }

    /// Draw into `context`, aspect-fitted and centered within `target`.
    ///
    /// The context is treated as bottom-up with its origin at the bottom-left
    /// of the target. Its transform is restored before returning.
    pub fn draw(&self, context: &mut B::Context, target: TargetRect) -> Result<(), InvalidTarget> {
        let fit = self.fit(target)?;
        self.draw_fit(context, &fit);
        Ok(())
    }

    /// Draw at the document's own canvas size.
    pub fn draw_native(&self, context: &mut B::Context) {
        self.draw_fit(context, &Fit::native(self.canvas_size));
    }

    fn draw_fit(&self, context: &mut B::Context, fit: &Fit) {
        trace!(
            "Drawing at scale {} into a {}x{} frame",
            fit.scale,
            fit.frame.width,
            fit.frame.height
        );

        let saved = context.transform();
        context.set_transform(saved.pre_concat(fit.transform()));
        self.backend.draw_document(context, &self.handle);
        context.set_transform(saved);
    }
}

impl<B> VectorDocument<B>
where
    B: VectorBackend,
    B::Context: Bitmap,
{
    /// Rasterize into a new bitmap sized to the fitted frame.
    pub fn render(&self, target: TargetRect) -> Result<ImageOf<B>, RenderError> {
        let fit = self.fit(target)?;
        let (width, height) = fit.frame.to_pixels().ok_or(RenderError::Allocation {
            width: 0,
            height: 0,
        })?;

        let mut bitmap = <B::Context as Bitmap>::allocate(fit.frame)
            .ok_or(RenderError::Allocation { width, height })?;
        self.draw_fit(&mut bitmap, &fit);

        Ok(bitmap.into_image())
    }

    /// Rasterize at the document's own canvas size.
    pub fn render_native(&self) -> Result<ImageOf<B>, RenderError> {
        self.render(self.canvas_size.into())
    }
}

impl<B: VectorBackend> fmt::Debug for VectorDocument<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VectorDocument")
            .field("canvas_size", &self.canvas_size)
            .finish_non_exhaustive()
    }
}

impl<B: VectorBackend> Drop for VectorDocument<B> {
    fn drop(&mut self) {
        self.backend.release_document(&self.handle);
    }
}
