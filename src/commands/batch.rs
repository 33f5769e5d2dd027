use anyhow::{bail, Context};
use indicatif::MultiProgress;
use log::{debug, info, warn};
use std::{sync::Arc, time::Duration};
use tokio::task::JoinSet;

use super::{build_fetcher, target_for, write_image, Fetcher};
use crate::{
    cli::BatchArgs,
    config::{Config, Job},
    err::format_anyhow_chain,
    progress_bar::ProgressBar,
};

pub async fn batch(args: BatchArgs, multi_progress: MultiProgress) -> anyhow::Result<()> {
    let config = Config::read(&args.config)?;

    if config.jobs.is_empty() {
        warn!("No jobs listed in {}", args.config.display());
        return Ok(());
    }

    let fetcher = Arc::new(build_fetcher(&config.fetch)?);
    let timeout = config.fetch.timeout();
    let total = config.jobs.len();

    let pb = ProgressBar::new(multi_progress, "Rendering", total);

    let mut tasks = JoinSet::new();
    for job in config.jobs {
        let fetcher = fetcher.clone();
        tasks.spawn(async move {
            let res = run_job(&fetcher, &job, timeout).await;
            (job, res)
        });
    }

    while let Some(joined) = tasks.join_next().await {
        let (job, res) = joined.context("Render task panicked")?;

        match &res {
            Ok(()) => debug!("Rendered {} to {}", job.source, job.output.display()),
            Err(err) => warn!("Failed to render {}: {}", job.source, format_anyhow_chain(err)),
        }

        pb.job_done(job.source.to_string(), res.is_ok());
    }

    pb.finish();

    let failed = pb.failed();
    if failed > 0 {
        bail!("{failed} of {total} jobs failed");
    }

    info!("Rendered {total} jobs");
    Ok(())
}

async fn run_job(fetcher: &Fetcher, job: &Job, timeout: Option<Duration>) -> anyhow::Result<()> {
    let image = {
        let document = job.source.load(fetcher, timeout).await?;
        let target = target_for(document.canvas_size(), job.width, job.height);

        document
            .render(target)
            .with_context(|| format!("Failed to render {}", job.source))?
    };

    write_image(image, &job.output).await
}
