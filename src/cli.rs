use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use std::path::PathBuf;

use crate::source::Source;

#[derive(Parser)]
#[command(version, about = "Fetch SVG documents and render them to images.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub verbose: Verbosity<InfoLevel>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Renders a single SVG to an image file.
    Render(RenderArgs),

    /// Prints the canvas size of an SVG.
    Info(InfoArgs),

    /// Renders every job listed in a config file.
    Batch(BatchArgs),
}

#[derive(Args, Clone)]
pub struct FetchArgs {
    /// Give up fetching after this many seconds.
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Don't load system fonts for text rendering.
    #[arg(long)]
    pub no_system_fonts: bool,
}

#[derive(Args)]
pub struct RenderArgs {
    /// A URL or a path to a local SVG file.
    pub source: Source,

    /// Where to write the image. The format is picked from the extension.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Target width. Derived from the aspect ratio if left out.
    #[arg(long)]
    pub width: Option<f32>,

    /// Target height. Derived from the aspect ratio if left out.
    #[arg(long)]
    pub height: Option<f32>,

    #[command(flatten)]
    pub fetch: FetchArgs,
}

#[derive(Args)]
pub struct InfoArgs {
    /// A URL or a path to a local SVG file.
    pub source: Source,

    #[command(flatten)]
    pub fetch: FetchArgs,
}

#[derive(Args)]
pub struct BatchArgs {
    /// The config file listing the jobs.
    #[arg(short, long, default_value = crate::config::FILE_NAME)]
    pub config: PathBuf,
}
