use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use super::{EpisodeAudio, PlatformExtractor};
use crate::platform::Platform;
use crate::Result;

const LOOKUP_ENDPOINT: &str = "https://itunes.apple.com/lookup";
const LOOKUP_LIMIT: &str = "200";

/// Apple Podcasts extractor backed by the public iTunes lookup API
pub struct ApplePodcastsExtractor {
    client: Client,
    lookup_endpoint: String,
}

/// Identifiers carried by an Apple Podcasts URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppleEpisodeRef {
    pub podcast_id: u64,
    pub episode_id: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    results: Vec<LookupEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupEntry {
    wrapper_type: Option<String>,
    track_id: Option<u64>,
    track_name: Option<String>,
    episode_url: Option<String>,
}

impl ApplePodcastsExtractor {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            lookup_endpoint: LOOKUP_ENDPOINT.to_string(),
        }
    }

    /// Point lookups at a different endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.lookup_endpoint = endpoint.into();
        self
    }

    /// Pull the podcast id (`id<digits>` path segment) and episode id (`i` query) from a URL
    pub fn parse_episode_ref(url: &str) -> Option<AppleEpisodeRef> {
        let parsed = Url::parse(url).ok()?;

        let podcast_id = parsed
            .path_segments()?
            .filter_map(|segment| segment.strip_prefix("id"))
            .find_map(|digits| digits.parse::<u64>().ok())?;

        let episode_id = parsed
            .query_pairs()
            .find(|(key, _)| key == "i")
            .and_then(|(_, value)| value.parse::<u64>().ok());

        Some(AppleEpisodeRef {
            podcast_id,
            episode_id,
        })
    }

    async fn lookup(&self, podcast_id: u64) -> Result<LookupResponse> {
        tracing::debug!("Querying iTunes lookup for podcast {}", podcast_id);

        let id = podcast_id.to_string();
        let response = self
            .client
            .get(&self.lookup_endpoint)
            .query(&[
                ("id", id.as_str()),
                ("entity", "podcastEpisode"),
                ("limit", LOOKUP_LIMIT),
            ])
            .send()
            .await
            .context("iTunes lookup request failed")?;

        if !response.status().is_success() {
            anyhow::bail!("iTunes lookup failed: HTTP {}", response.status());
        }

        response
            .json::<LookupResponse>()
            .await
            .context("iTunes lookup returned malformed JSON")
    }
}

fn find_episode(response: &LookupResponse, episode_id: u64) -> EpisodeAudio {
    response
        .results
        .iter()
        .filter(|entry| entry.wrapper_type.as_deref() == Some("podcastEpisode"))
        .find(|entry| entry.track_id == Some(episode_id))
        .map(|entry| EpisodeAudio {
            audio_url: entry.episode_url.clone(),
            title: entry.track_name.clone(),
        })
        .unwrap_or_default()
}

#[async_trait]
impl PlatformExtractor for ApplePodcastsExtractor {
    fn platform(&self) -> Platform {
        Platform::ApplePodcasts
    }

    async fn extract_episode(&self, url: &str) -> Result<EpisodeAudio> {
        let episode_ref = Self::parse_episode_ref(url)
            .ok_or_else(|| anyhow::anyhow!("No podcast id in Apple Podcasts URL: {}", url))?;

        // Show pages without `?i=` name no single episode
        let Some(episode_id) = episode_ref.episode_id else {
            tracing::debug!("Apple Podcasts URL has no episode id: {}", url);
            return Ok(EpisodeAudio::default());
        };

        let response = self.lookup(episode_ref.podcast_id).await?;
        Ok(find_episode(&response, episode_id))
    }
}
