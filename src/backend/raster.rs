use super::{Bitmap, CreateError, GraphicsContext, VectorBackend};
use crate::geometry::Size;
use image::{ImageError, ImageFormat, ImageResult, Rgb, RgbImage, Rgba, RgbaImage};
use log::trace;
use resvg::{
    tiny_skia::{Pixmap, Transform},
    usvg::{self, fontdb::Database, Options, Tree},
};
use std::{fs, io::Cursor, path::Path, sync::Arc};

/// Decodes with usvg and draws with resvg into tiny-skia pixmaps.
#[derive(Clone)]
pub struct ResvgBackend {
    fontdb: Arc<Database>,
}

impl Default for ResvgBackend {
    fn default() -> Self {
        Self::new(Arc::new(Database::new()))
    }
}

impl ResvgBackend {
    pub fn new(fontdb: Arc<Database>) -> Self {
        Self { fontdb }
    }

    pub fn with_system_fonts() -> Self {
        let mut db = Database::new();
        db.load_system_fonts();
        Self::new(Arc::new(db))
    }
}

impl VectorBackend for ResvgBackend {
    type Handle = Tree;
    type Context = Canvas;

    fn create_document(&self, data: &[u8]) -> Result<Tree, CreateError> {
        let opt = Options {
            fontdb: self.fontdb.clone(),
            ..Default::default()
        };

        Tree::from_data(data, &opt).map_err(|err| match err {
            usvg::Error::InvalidSize => CreateError::NoSize,
            err => CreateError::Malformed(err.to_string()),
        })
    }

    fn release_document(&self, _handle: &Tree) {
        // The tree frees itself once its owner drops it
        trace!("Released usvg tree");
    }

    fn canvas_size(&self, handle: &Tree) -> Size {
        let size = handle.size();
        Size::new(size.width(), size.height())
    }

    fn draw_document(&self, context: &mut Canvas, handle: &Tree) {
        resvg::render(handle, context.transform, &mut context.pixmap.as_mut());
    }
}

/// A pixmap with a bottom-left origin, the way platform bitmap contexts are
/// laid out.
pub struct Canvas {
    pixmap: Pixmap,
    transform: Transform,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Option<Self> {
        Self::with_origin_height(width, height, height as f32)
    }

    /// A canvas whose bottom-up origin sits `origin_height` pixels below the
    /// top row, which may be above the last row of the pixmap.
    pub fn with_origin_height(width: u32, height: u32, origin_height: f32) -> Option<Self> {
        let pixmap = Pixmap::new(width, height)?;
        let transform = Transform::from_row(1.0, 0.0, 0.0, -1.0, 0.0, origin_height);

        Some(Self { pixmap, transform })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }
}

impl GraphicsContext for Canvas {
    fn transform(&self) -> Transform {
        self.transform
    }

    fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }
}

impl Bitmap for Canvas {
    type Image = Image;

    fn allocate(frame: Size) -> Option<Self> {
        let (width, height) = frame.to_pixels()?;
        Canvas::with_origin_height(width, height, frame.height)
    }

    fn into_image(self) -> Image {
        Image::from_pixmap(&self.pixmap)
    }
}

/// A rasterized document, RGBA8 with straight alpha.
#[derive(Debug, Clone)]
pub struct Image {
    inner: RgbaImage,
}

impl Image {
    fn from_pixmap(pixmap: &Pixmap) -> Self {
        // tiny-skia stores premultiplied alpha
        let inner = RgbaImage::from_fn(pixmap.width(), pixmap.height(), |x, y| {
            pixmap
                .pixel(x, y)
                .map(|pixel| {
                    let color = pixel.demultiply();
                    Rgba([color.red(), color.green(), color.blue(), color.alpha()])
                })
                .unwrap_or(Rgba([0, 0, 0, 0]))
        });

        Self { inner }
    }

    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.inner.get_pixel_checked(x, y).map(|pixel| pixel.0)
    }

    pub fn as_rgba(&self) -> &RgbaImage {
        &self.inner
    }

    pub fn into_rgba(self) -> RgbaImage {
        self.inner
    }

    /// Encodes into `format`. Formats without an alpha channel get the image
    /// flattened onto white.
    pub fn encode(&self, format: ImageFormat) -> ImageResult<Vec<u8>> {
        let mut writer = Cursor::new(Vec::new());

        if keeps_alpha(format) {
            self.inner.write_to(&mut writer, format)?;
        } else {
            self.flatten().write_to(&mut writer, format)?;
        }

        Ok(writer.into_inner())
    }

    pub fn encode_png(&self) -> ImageResult<Vec<u8>> {
        self.encode(ImageFormat::Png)
    }

    /// Writes to `path`, picking the format from its extension.
    pub fn save(&self, path: impl AsRef<Path>) -> ImageResult<()> {
        let path = path.as_ref();
        let format = ImageFormat::from_path(path)?;
        let data = self.encode(format)?;

        fs::write(path, data).map_err(ImageError::IoError)
    }

    fn flatten(&self) -> RgbImage {
        RgbImage::from_fn(self.width(), self.height(), |x, y| {
            let [r, g, b, a] = self.inner.get_pixel(x, y).0;
            let over_white = |c: u8| {
                let a = u32::from(a);
                ((u32::from(c) * a + 255 * (255 - a) + 127) / 255) as u8
            };
            Rgb([over_white(r), over_white(g), over_white(b)])
        })
    }
}

fn keeps_alpha(format: ImageFormat) -> bool {
    !matches!(format, ImageFormat::Jpeg | ImageFormat::Pnm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{document::VectorDocument, geometry::TargetRect};

    const RED: [u8; 4] = [255, 0, 0, 255];
    const BLUE: [u8; 4] = [0, 0, 255, 255];
    const CLEAR: [u8; 4] = [0, 0, 0, 0];

    fn decode(svg: &str) -> VectorDocument<ResvgBackend> {
        VectorDocument::decode_str(Arc::new(ResvgBackend::default()), svg).unwrap()
    }

    fn split_square() -> VectorDocument<ResvgBackend> {
        decode(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100">
                <rect x="0" y="0" width="100" height="50" fill="red"/>
                <rect x="0" y="50" width="100" height="50" fill="blue"/>
            </svg>"#,
        )
    }

    #[test]
    fn test_canvas_size_is_exact() {
        let document = decode(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="120" height="45"></svg>"#,
        );
        assert_eq!(document.canvas_size(), Size::new(120.0, 45.0));
    }

    #[test]
    fn test_unparseable_bytes_are_malformed() {
        let backend = ResvgBackend::default();
        assert!(matches!(
            backend.create_document(b"this is not <svg"),
            Err(CreateError::Malformed(_))
        ));
    }

    #[test]
    fn test_native_render_is_upright() {
        let image = split_square()
            .render(TargetRect::new(100.0, 100.0))
            .unwrap();

        assert_eq!((image.width(), image.height()), (100, 100));
        assert_eq!(image.pixel(50, 10), Some(RED));
        assert_eq!(image.pixel(50, 90), Some(BLUE));
    }

    #[test]
    fn test_render_centers_in_wide_target() {
        let image = split_square()
            .render(TargetRect::new(200.0, 100.0))
            .unwrap();

        assert_eq!((image.width(), image.height()), (200, 100));
        assert_eq!(image.pixel(20, 10), Some(CLEAR));
        assert_eq!(image.pixel(100, 10), Some(RED));
        assert_eq!(image.pixel(100, 90), Some(BLUE));
        assert_eq!(image.pixel(180, 90), Some(CLEAR));
    }

    #[test]
    fn test_render_derives_missing_dimension() {
        let image = split_square().render(TargetRect::from_width(40.0)).unwrap();

        assert_eq!((image.width(), image.height()), (40, 40));
        assert_eq!(image.pixel(20, 5), Some(RED));
        assert_eq!(image.pixel(20, 35), Some(BLUE));
    }

    #[test]
    fn test_draw_restores_context_transform() {
        let document = split_square();
        let mut canvas = Canvas::new(100, 100).unwrap();
        let before = canvas.transform();

        document
            .draw(&mut canvas, TargetRect::new(50.0, 50.0))
            .unwrap();

        assert_eq!(canvas.transform(), before);
    }

    #[test]
    fn test_render_centers_in_tall_target() {
        let image = split_square()
            .render(TargetRect::new(100.0, 200.0))
            .unwrap();

        assert_eq!((image.width(), image.height()), (100, 200));
        assert_eq!(image.pixel(50, 20), Some(CLEAR));
        assert_eq!(image.pixel(50, 60), Some(RED));
        assert_eq!(image.pixel(50, 140), Some(BLUE));
        assert_eq!(image.pixel(50, 180), Some(CLEAR));
    }

    #[test]
    fn test_fractional_height_starts_at_top_row() {
        let image = decode(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="9.5">
                <rect x="0" y="0" width="10" height="9.5" fill="red"/>
            </svg>"#,
        )
        .render_native()
        .unwrap();

        assert_eq!((image.width(), image.height()), (10, 10));
        assert_eq!(image.pixel(5, 0), Some(RED));
        assert_eq!(image.pixel(5, 8), Some(RED));

        let alpha = image.pixel(5, 9).unwrap()[3];
        assert!(alpha > 0 && alpha < 255, "bottom row alpha was {alpha}");
    }

    #[test]
    fn test_fractional_frame_starts_at_top_row() {
        let document = decode(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="30" height="20">
                <rect x="0" y="0" width="30" height="20" fill="blue"/>
            </svg>"#,
        );

        // 10 x 6.67 frame, rounded up to 7 rows
        let image = document.render(TargetRect::from_width(10.0)).unwrap();

        assert_eq!((image.width(), image.height()), (10, 7));
        assert_eq!(image.pixel(5, 0), Some(BLUE));
        assert!(image.pixel(5, 6).unwrap()[3] < 255);
    }

    #[test]
    fn test_canvas_origin_height() {
        let canvas = Canvas::with_origin_height(10, 10, 9.5).unwrap();
        assert_eq!(canvas.transform().ty, 9.5);
        assert_eq!(canvas.transform().sy, -1.0);
        assert_eq!(Canvas::new(10, 10).unwrap().transform().ty, 10.0);
    }

    #[test]
    fn test_encode_png() {
        let image = split_square().render(TargetRect::from_height(10.0)).unwrap();
        let png = image.encode_png().unwrap();

        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (10, 10));
    }

    #[test]
    fn test_encode_jpeg_flattens_onto_white() {
        let image = decode(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="16" height="16">
                <rect x="0" y="0" width="16" height="8" fill="red"/>
            </svg>"#,
        )
        .render_native()
        .unwrap();

        let jpeg = image.encode(ImageFormat::Jpeg).unwrap();
        let decoded = image::load_from_memory(&jpeg).unwrap().to_rgb8();

        assert_eq!(decoded.dimensions(), (16, 16));
        let [r, g, b] = decoded.get_pixel(8, 14).0;
        assert!(r > 240 && g > 240 && b > 240, "expected white, got {r},{g},{b}");
        let [r, g, b] = decoded.get_pixel(8, 2).0;
        assert!(r > 200 && g < 60 && b < 60, "expected red, got {r},{g},{b}");
    }

    #[test]
    fn test_save_picks_format_from_extension() {
        let dir = assert_fs::TempDir::new().unwrap();
        let image = split_square().render(TargetRect::from_height(20.0)).unwrap();

        let png = dir.path().join("square.png");
        let jpg = dir.path().join("square.jpg");
        image.save(&png).unwrap();
        image.save(&jpg).unwrap();

        assert_eq!(
            image::ImageFormat::from_path(&png).unwrap(),
            image::guess_format(&fs::read(&png).unwrap()).unwrap()
        );
        assert_eq!(
            image::guess_format(&fs::read(&jpg).unwrap()).unwrap(),
            ImageFormat::Jpeg
        );
        assert_eq!(image::image_dimensions(&jpg).unwrap(), (20, 20));
        assert_eq!(image::open(&png).unwrap().to_rgba8().get_pixel(10, 2).0, RED);
    }

    #[test]
    fn test_save_rejects_unknown_extension() {
        let dir = assert_fs::TempDir::new().unwrap();
        let image = split_square().render_native().unwrap();

        assert!(image.save(dir.path().join("square.nope")).is_err());
        assert!(!dir.path().join("square.nope").exists());
    }
}
