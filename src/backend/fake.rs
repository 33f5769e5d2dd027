//! A handle-counting backend for tests.
//!
//! Documents are written as `"<width> <height>"`; the literal `nosize` makes
//! the backend refuse the document for having no size. Anything else is
//! malformed.

use super::{Bitmap, CreateError, GraphicsContext, VectorBackend};
use crate::geometry::Size;
use resvg::tiny_skia::Transform;
use std::{
    collections::HashSet,
    sync::{
        atomic::{AtomicU64, AtomicUsize, Ordering},
        Mutex,
    },
};

#[derive(Debug)]
pub struct FakeHandle {
    id: u64,
    size: Size,
}

#[derive(Default)]
pub struct FakeBackend {
    next_id: AtomicU64,
    created: AtomicUsize,
    released: Mutex<HashSet<u64>>,
}

impl FakeBackend {
    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.lock().unwrap().len()
    }

    pub fn live(&self) -> usize {
        self.created() - self.released()
    }
}

impl VectorBackend for FakeBackend {
    type Handle = FakeHandle;
    type Context = Recorder;

    fn create_document(&self, data: &[u8]) -> Result<FakeHandle, CreateError> {
        let text = std::str::from_utf8(data).map_err(|e| CreateError::Malformed(e.to_string()))?;

        if text == "nosize" {
            return Err(CreateError::NoSize);
        }

        let mut parts = text.split_whitespace().map(str::parse::<f32>);
        let size = match (parts.next(), parts.next(), parts.next()) {
            (Some(Ok(width)), Some(Ok(height)), None) => Size::new(width, height),
            _ => return Err(CreateError::Malformed(format!("not a fake document: {text}"))),
        };

        self.created.fetch_add(1, Ordering::SeqCst);
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);

        Ok(FakeHandle { id, size })
    }

    fn release_document(&self, handle: &FakeHandle) {
        let fresh = self.released.lock().unwrap().insert(handle.id);
        assert!(fresh, "handle {} released twice", handle.id);
    }

    fn canvas_size(&self, handle: &FakeHandle) -> Size {
        handle.size
    }

    fn draw_document(&self, context: &mut Recorder, handle: &FakeHandle) {
        context.draws.push(Draw {
            id: handle.id,
            transform: context.transform,
        });
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Draw {
    pub id: u64,
    pub transform: Transform,
}

/// Records every draw along with the transform current at the time.
#[derive(Debug, Default)]
pub struct Recorder {
    pub size: Option<(u32, u32)>,
    pub transform: Transform,
    pub draws: Vec<Draw>,
}

impl GraphicsContext for Recorder {
    fn transform(&self) -> Transform {
        self.transform
    }

    fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }
}

impl Bitmap for Recorder {
    type Image = Recorder;

    fn allocate(frame: Size) -> Option<Self> {
        Some(Recorder {
            size: Some(frame.to_pixels()?),
            ..Default::default()
        })
    }

    fn into_image(self) -> Recorder {
        self
    }
}
