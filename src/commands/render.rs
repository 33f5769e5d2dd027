use anyhow::Context;
use log::info;

use super::{build_fetcher, target_for, write_image};
use crate::{cli::RenderArgs, config::FetchSettings};

pub async fn render(args: RenderArgs) -> anyhow::Result<()> {
    let settings = FetchSettings::from(&args.fetch);
    let fetcher = build_fetcher(&settings)?;

    let document = args.source.load(&fetcher, settings.timeout()).await?;
    let target = target_for(document.canvas_size(), args.width, args.height);

    let image = document
        .render(target)
        .with_context(|| format!("Failed to render {}", args.source))?;

    let (width, height) = (image.width(), image.height());
    write_image(image, &args.output).await?;

    info!(
        "Rendered {} to {} ({width}x{height})",
        args.source,
        args.output.display(),
    );

    Ok(())
}
