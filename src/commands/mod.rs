use anyhow::Context;
use image::ImageFormat;
use std::{path::Path, sync::Arc};
use svgfetch::{HttpTransport, Image, ImageFetcher, ResvgBackend, Size, TargetRect};
use tokio::{fs, task};

use crate::config::FetchSettings;

pub mod batch;
pub mod info;
pub mod render;

pub type Fetcher = ImageFetcher<HttpTransport, ResvgBackend>;

pub fn build_fetcher(settings: &FetchSettings) -> anyhow::Result<Fetcher> {
    let transport = match settings.user_agent() {
        Some(user_agent) => HttpTransport::with_user_agent(&user_agent)
            .context("Failed to build HTTP client")?,
        None => HttpTransport::new(),
    };

    let backend = if settings.system_fonts {
        ResvgBackend::with_system_fonts()
    } else {
        ResvgBackend::default()
    };

    Ok(ImageFetcher::new(transport, Arc::new(backend)))
}

/// The canvas size when neither dimension is given, otherwise the given
/// dimensions with the missing one left for the fit to derive.
pub fn target_for(canvas: Size, width: Option<f32>, height: Option<f32>) -> TargetRect {
    match (width, height) {
        (None, None) => canvas.into(),
        (width, height) => TargetRect::new(width.unwrap_or(0.0), height.unwrap_or(0.0)),
    }
}

pub async fn write_image(image: Image, path: &Path) -> anyhow::Result<()> {
    ImageFormat::from_path(path)
        .with_context(|| format!("Unsupported image format for {}", path.display()))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create folder {}", parent.display()))?;
    }

    let output = path.to_owned();
    task::spawn_blocking(move || image.save(output))
        .await?
        .with_context(|| format!("Failed to write image to {}", path.display()))
}
