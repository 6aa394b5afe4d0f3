use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;
use uuid::Uuid;

pub mod classify;
pub mod engine;
pub mod selector;

use crate::config::Config;
use crate::extractors::ytdlp::{BinaryLocator, ExtractionTool, YtDlpTool};
use crate::extractors::ExtractorRegistry;
use crate::platform::Platform;
use crate::{ResolutionError, Result};
use engine::GenericEngine;

/// How the audio URL was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Strategy {
    Specialized { platform: Platform },
    Generic { attempt: u8 },
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Specialized { platform } => write!(f, "{} extractor", platform),
            Strategy::Generic { attempt: 1 } => write!(f, "yt-dlp"),
            Strategy::Generic { attempt } => write!(f, "yt-dlp (attempt {})", attempt),
        }
    }
}

/// A non-empty URL of a fetchable audio stream
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedAudioUrl {
    url: String,
    strategy: Strategy,
    resolved_at: DateTime<Utc>,
}

impl ResolvedAudioUrl {
    /// Returns `None` for blank input
    pub fn new(url: impl Into<String>, strategy: Strategy) -> Option<Self> {
        let url = url.into().trim().to_string();
        if url.is_empty() {
            return None;
        }

        Some(Self {
            url,
            strategy,
            resolved_at: Utc::now(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.url
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn resolved_at(&self) -> DateTime<Utc> {
        self.resolved_at
    }

    pub fn into_string(self) -> String {
        self.url
    }
}

impl std::fmt::Display for ResolvedAudioUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.url)
    }
}

/// Result of a stage that may be skipped without failing the request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome<T> {
    Found(T),
    NotFound,
    Errored(String),
}

/// Resolves an episode URL to a playable audio stream.
///
/// Specialized extractors get the first attempt for recognised platforms; their
/// failures are logged and never surface. yt-dlp is then tried with the primary
/// and fallback option sets, and any remaining failure is classified.
pub struct AudioSourceResolver {
    registry: ExtractorRegistry,
    engine: GenericEngine,
    deadline: Option<Duration>,
}

impl AudioSourceResolver {
    pub fn new(registry: ExtractorRegistry, tool: Arc<dyn ExtractionTool>) -> Self {
        Self {
            registry,
            engine: GenericEngine::new(tool),
            deadline: None,
        }
    }

    /// Build the resolver described by the configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let registry = if config.resolver.specialized_extractors {
            ExtractorRegistry::with_defaults(&config.http)?
        } else {
            ExtractorRegistry::empty()
        };

        let locator = BinaryLocator::new(config.resolver.yt_dlp_path.clone());
        let tool = YtDlpTool::from_locator(&locator);
        tracing::debug!("Using extraction tool at {}", tool.binary().display());

        Ok(Self::new(registry, Arc::new(tool)).with_deadline(config.deadline()))
    }

    /// Overall deadline per request, `None` leaves bounding to the tool
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Resolve `url` to exactly one of an audio URL or a classified failure
    pub async fn resolve(&self, url: &str) -> std::result::Result<ResolvedAudioUrl, ResolutionError> {
        let span = tracing::info_span!("resolve", request_id = %Uuid::new_v4(), url = %url);

        async move {
            let outcome = match self.deadline {
                // Dropping the chain on expiry kills any running yt-dlp child
                Some(deadline) => tokio::time::timeout(deadline, self.run(url))
                    .await
                    .unwrap_or_else(|_| Err(ResolutionError::timeout(deadline))),
                None => self.run(url).await,
            };

            match &outcome {
                Ok(resolved) => tracing::info!("Resolved audio via {}: {}", resolved.strategy(), resolved),
                Err(e) => tracing::error!("Resolution failed [{}]: {}", e.code(), e.diagnostic),
            }

            outcome
        }
        .instrument(span)
        .await
    }

    async fn run(&self, url: &str) -> std::result::Result<ResolvedAudioUrl, ResolutionError> {
        let platform = Platform::detect(url);
        tracing::debug!("Matched platform: {}", platform);

        match self.try_specialized(platform, url).await {
            StageOutcome::Found(audio_url) => {
                if let Some(resolved) = ResolvedAudioUrl::new(audio_url, Strategy::Specialized { platform }) {
                    return Ok(resolved);
                }
            }
            StageOutcome::NotFound | StageOutcome::Errored(_) => {}
        }

        let extracted = match self.engine.extract(url).await {
            Ok(extracted) => extracted,
            Err(failure) => return Err(classify::classify_failure(failure.diagnostic())),
        };

        let stream = selector::select_stream(&extracted.metadata)?;
        ResolvedAudioUrl::new(stream, Strategy::Generic { attempt: extracted.attempt })
            .ok_or_else(ResolutionError::no_stream_found)
    }

    async fn try_specialized(&self, platform: Platform, url: &str) -> StageOutcome<String> {
        if !platform.is_specialized() {
            return StageOutcome::NotFound;
        }

        let Some(extractor) = self.registry.find(platform) else {
            tracing::debug!("No extractor registered for {}", platform);
            return StageOutcome::NotFound;
        };

        match extractor.extract_episode(url).await {
            Ok(episode) => match episode.usable_url() {
                Some(audio_url) => StageOutcome::Found(audio_url.to_string()),
                None => {
                    tracing::warn!("{} extractor found no audio, falling back to yt-dlp", platform);
                    StageOutcome::NotFound
                }
            },
            Err(e) => {
                let message = format!("{:#}", e);
                tracing::warn!("{} extraction failed, falling back to yt-dlp: {}", platform, message);
                StageOutcome::Errored(message)
            }
        }
    }
}
