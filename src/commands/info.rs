use console::style;

use super::build_fetcher;
use crate::{cli::InfoArgs, config::FetchSettings};

pub async fn info(args: InfoArgs) -> anyhow::Result<()> {
    let settings = FetchSettings::from(&args.fetch);
    let fetcher = build_fetcher(&settings)?;

    let document = args.source.load(&fetcher, settings.timeout()).await?;
    let size = document.canvas_size();

    println!(
        "{}: {}x{}",
        style(&args.source).bold(),
        size.width,
        size.height
    );

    Ok(())
}
