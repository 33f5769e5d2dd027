use crate::error::InvalidTarget;
use resvg::tiny_skia::Transform;

/// A 2D size in document units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Whether both sides are finite and strictly positive.
    pub fn is_positive(&self) -> bool {
        is_specified(self.width) && is_specified(self.height)
    }

    pub fn scaled(&self, factor: f32) -> Size {
        Size::new(self.width * factor, self.height * factor)
    }

    /// Smallest whole-pixel size that covers this size.
    pub fn to_pixels(&self) -> Option<(u32, u32)> {
        if !self.is_positive() {
            return None;
        }

        let width = self.width.ceil();
        let height = self.height.ceil();

        if width > u32::MAX as f32 || height > u32::MAX as f32 {
            return None;
        }

        Some((width as u32, height as u32))
    }
}

/// The box a document is drawn into.
///
/// A dimension that is zero, negative or not finite is unspecified and gets
/// derived from the document's aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetRect {
    pub width: f32,
    pub height: f32,
}

impl TargetRect {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn from_width(width: f32) -> Self {
        Self::new(width, 0.0)
    }

    pub fn from_height(height: f32) -> Self {
        Self::new(0.0, height)
    }

    fn specified_width(&self) -> Option<f32> {
        is_specified(self.width).then_some(self.width)
    }

    fn specified_height(&self) -> Option<f32> {
        is_specified(self.height).then_some(self.height)
    }
}

impl From<Size> for TargetRect {
    fn from(size: Size) -> Self {
        Self::new(size.width, size.height)
    }
}

fn is_specified(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

/// Placement of a document inside a target box: uniform scale, the frame the
/// document is fitted into and the centering offset in document units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fit {
    pub scale: f32,
    pub frame: Size,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl Fit {
    /// Aspect-fits `canvas` into `target`.
    ///
    /// With one dimension specified the other is derived from the same ratio.
    /// With both specified the smaller ratio wins and the leftover space on
    /// the other axis is split evenly.
    pub fn compute(canvas: Size, target: TargetRect) -> Result<Fit, InvalidTarget> {
        let invalid = InvalidTarget {
            width: target.width,
            height: target.height,
        };

        if !canvas.is_positive() {
            return Err(invalid);
        }

        let (scale, frame) = match (target.specified_width(), target.specified_height()) {
            (None, Some(height)) => {
                let scale = height / canvas.height;
                (scale, Size::new(canvas.width * scale, height))
            }
            (Some(width), None) => {
                let scale = width / canvas.width;
                (scale, Size::new(width, canvas.height * scale))
            }
            (Some(width), Some(height)) => {
                let scale = (width / canvas.width).min(height / canvas.height);
                (scale, Size::new(width, height))
            }
            (None, None) => return Err(invalid),
        };

        if !is_specified(scale) {
            return Err(invalid);
        }

        Ok(Fit {
            scale,
            frame,
            offset_x: (frame.width / scale - canvas.width) / 2.0,
            offset_y: (frame.height / scale - canvas.height) / 2.0,
        })
    }

    /// Draws the document at its own size.
    pub fn native(canvas: Size) -> Fit {
        Fit {
            scale: 1.0,
            frame: canvas,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }

    /// Document space to a bottom-up context of the frame's height.
    ///
    /// Applied to points in this order: centering translation, uniform scale,
    /// Y flip, translation by the frame height.
    pub fn transform(&self) -> Transform {
        Transform::from_translate(0.0, self.frame.height)
            .pre_scale(1.0, -1.0)
            .pre_scale(self.scale, self.scale)
            .pre_translate(self.offset_x, self.offset_y)
    }
}
