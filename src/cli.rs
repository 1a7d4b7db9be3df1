use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Quotewall main parser
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Activate debug mode
    #[arg(short, long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Generate and apply a quote wallpaper on every display
    Run(RunArgs),

    /// Compose a single wallpaper image without applying it
    Preview(PreviewArgs),

    /// Apply an existing image as the desktop picture
    Apply(ApplyArgs),

    /// List the detected displays
    Displays,

    /// Configure the backdrop picture used behind the quotes
    Background(BackgroundArgs),
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Run(RunArgs::default())
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Quote source file (defaults to the configured location)
    #[arg(short, long)]
    pub quotes: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct PreviewArgs {
    /// Where to write the composed image
    pub output: PathBuf,

    /// Canvas width in pixels
    #[arg(long, default_value_t = 2560)]
    pub width: u32,

    /// Canvas height in pixels
    #[arg(long, default_value_t = 1440)]
    pub height: u32,

    /// Quote source file (defaults to the configured location)
    #[arg(short, long)]
    pub quotes: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ApplyArgs {
    /// Path to the image file
    pub path: PathBuf,

    /// 1-based desktop slot to address (defaults to every desktop)
    #[arg(long)]
    pub display: Option<usize>,
}

#[derive(Args, Debug, Clone)]
pub struct BackgroundArgs {
    /// Path to the backdrop image
    pub path: String,
}
