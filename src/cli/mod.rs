use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "audiosrc",
    about = "Audio Source Resolver - find the playable audio stream behind an episode URL",
    version,
    long_about = "Resolves a direct audio stream URL from YouTube, Apple Podcasts, Xiaoyuzhou, RSS-hosted podcasts and generic pages. Platform extractors are tried first, then yt-dlp."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve the audio stream URL for an episode
    Resolve {
        /// Episode URL (YouTube, Apple Podcasts, Xiaoyuzhou, Spotify, RSS or any page)
        #[arg(value_name = "URL")]
        url: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Overall deadline in seconds (overrides the config file)
        #[arg(short, long, value_name = "SECS", env = "AUDIOSRC_TIMEOUT")]
        timeout: Option<u64>,

        /// Path to the yt-dlp binary (overrides the config file)
        #[arg(long, value_name = "PATH", env = "YT_DLP_PATH")]
        yt_dlp_path: Option<PathBuf>,

        /// Skip platform extractors and go straight to yt-dlp
        #[arg(long)]
        no_specialized: bool,
    },

    /// Show or initialise configuration
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,

        /// Write the current configuration to the config file
        #[arg(long)]
        init: bool,
    },

    /// Check that yt-dlp can be executed
    Doctor {
        /// Path to the yt-dlp binary (overrides the config file)
        #[arg(long, value_name = "PATH", env = "YT_DLP_PATH")]
        yt_dlp_path: Option<PathBuf>,
    },

    /// List platforms with a dedicated extractor
    Platforms,
}

#[derive(ValueEnum, Clone, Debug)]
pub enum OutputFormat {
    /// The bare audio URL
    Text,
    /// JSON with strategy and timestamp
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
