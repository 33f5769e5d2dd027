use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use cli::{Cli, Commands};
use indicatif::MultiProgress;
use indicatif_log_bridge::LogWrapper;
use log::LevelFilter;

mod cli;
mod commands;
mod config;
mod err;
mod progress_bar;
mod source;

/// Routes log lines through `progress` so they print above any live bars.
fn init_logging(verbose: &Verbosity<InfoLevel>, progress: MultiProgress) -> anyhow::Result<()> {
    let logger = env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .filter_module(env!("CARGO_CRATE_NAME"), verbose.log_level_filter())
        .parse_default_env()
        .format_timestamp(None)
        .format_module_path(false)
        .build();

    let max_level = logger.filter();
    LogWrapper::new(progress, logger).try_init()?;
    log::set_max_level(max_level);

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let progress = MultiProgress::new();
    init_logging(&cli.verbose, progress.clone())?;

    match cli.command {
        Commands::Render(args) => commands::render::render(args).await,
        Commands::Info(args) => commands::info::info(args).await,
        Commands::Batch(args) => commands::batch::batch(args, progress).await,
    }
}
