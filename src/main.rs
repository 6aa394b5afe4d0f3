use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use audio_source_resolver::cli::{Cli, Commands};
use audio_source_resolver::extractors::ytdlp::{BinaryLocator, YtDlpTool};
use audio_source_resolver::{output, utils, AudioSourceResolver, Config, Platform};

fn init_tracing(verbose: bool, json_logs: bool) {
    let default_filter = if verbose {
        "audio_source_resolver=debug,audiosrc=debug"
    } else {
        "audio_source_resolver=info,audiosrc=info"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    // Logs go to stderr so stdout stays pipeable
    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn spinner(message: String) -> Result<ProgressBar> {
    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?,
    );
    progress.set_message(message);
    progress.enable_steady_tick(Duration::from_millis(100));
    Ok(progress)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.json_logs);

    match cli.command {
        Commands::Resolve {
            url,
            format,
            timeout,
            yt_dlp_path,
            no_specialized,
        } => {
            let url = utils::validate_and_normalize_url(&url)?;

            let mut config = Config::load()?;
            if let Some(secs) = timeout {
                config.resolver.timeout_secs = Some(secs);
            }
            if yt_dlp_path.is_some() {
                config.resolver.yt_dlp_path = yt_dlp_path;
            }
            if no_specialized {
                config.resolver.specialized_extractors = false;
            }
            config.validate()?;

            let resolver = AudioSourceResolver::from_config(&config)?;

            let domain = utils::extract_domain(&url).unwrap_or_else(|| url.clone());
            let progress = if cli.quiet {
                None
            } else {
                Some(spinner(format!("Resolving audio from {}...", domain))?)
            };

            let result = resolver.resolve(&url).await;

            if let Some(progress) = progress {
                progress.finish_and_clear();
            }

            output::print_to_console(&result, &format)?;

            if result.is_err() {
                std::process::exit(1);
            }
        }
        Commands::Config { show, init } => {
            let config = Config::load()?;
            if init {
                let path = config.save()?;
                println!("Configuration written to: {}", path.display());
            }
            if show || !init {
                config.display();
            }
        }
        Commands::Doctor { yt_dlp_path } => {
            let config = Config::load()?;
            let locator = BinaryLocator::new(yt_dlp_path.or(config.resolver.yt_dlp_path));
            let tool = YtDlpTool::from_locator(&locator);

            let problems = utils::check_dependencies(&tool).await;
            if problems.is_empty() {
                println!("✓ yt-dlp is available at {}", tool.binary().display());
            } else {
                eprintln!("⚠️  Dependency check failed:");
                for problem in problems {
                    eprintln!("   • {}", problem);
                }
                std::process::exit(1);
            }
        }
        Commands::Platforms => {
            println!("Platforms with a dedicated extractor (tried before yt-dlp):");
            for platform in Platform::all().iter().filter(|p| p.is_specialized()) {
                println!("  • {} ({})", platform, platform.markers().join(", "));
            }
            println!("Everything else is resolved with yt-dlp:");
            println!("  • YouTube, Spotify, SoundCloud, RSS-hosted podcasts and generic pages");
        }
    }

    Ok(())
}
