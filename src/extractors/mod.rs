use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub mod apple;
pub mod xiaoyuzhou;
pub mod ytdlp;

use crate::config::HttpConfig;
use crate::platform::Platform;
use crate::Result;

/// What a platform-specific extractor found for an episode page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeAudio {
    /// Direct audio URL, `None` when the page was understood but carried no enclosure
    pub audio_url: Option<String>,

    /// Episode title if the platform exposes it
    pub title: Option<String>,
}

impl EpisodeAudio {
    /// The audio URL, if present and non-blank
    pub fn usable_url(&self) -> Option<&str> {
        self.audio_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
    }
}

/// Fast path for platforms whose pages expose the audio enclosure directly
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlatformExtractor: Send + Sync {
    /// The platform this extractor handles
    fn platform(&self) -> Platform;

    /// Look up the audio for an episode URL
    async fn extract_episode(&self, url: &str) -> Result<EpisodeAudio>;
}

/// Registry for the specialized extractors, keyed by platform
pub struct ExtractorRegistry {
    extractors: Vec<Box<dyn PlatformExtractor>>,
}

impl ExtractorRegistry {
    /// Registry with no extractors, every URL goes straight to yt-dlp
    pub fn empty() -> Self {
        Self {
            extractors: Vec::new(),
        }
    }

    /// Create a registry with the built-in extractors sharing one HTTP client
    pub fn with_defaults(http: &HttpConfig) -> Result<Self> {
        let client = http_client(http)?;
        let mut registry = Self::empty();

        registry.register(Box::new(apple::ApplePodcastsExtractor::new(client.clone())));
        registry.register(Box::new(xiaoyuzhou::XiaoyuzhouExtractor::new(client)));

        Ok(registry)
    }

    /// Register a new extractor
    pub fn register(&mut self, extractor: Box<dyn PlatformExtractor>) {
        self.extractors.push(extractor);
    }

    /// Find the extractor for a platform, first registered wins
    pub fn find(&self, platform: Platform) -> Option<&dyn PlatformExtractor> {
        self.extractors
            .iter()
            .find(|extractor| extractor.platform() == platform)
            .map(|boxed| boxed.as_ref())
    }

    /// List platforms with a registered extractor
    pub fn list_platforms(&self) -> Vec<Platform> {
        self.extractors
            .iter()
            .map(|extractor| extractor.platform())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::empty()
    }
}

/// Build the HTTP client used by page and API based extractors
pub fn http_client(http: &HttpConfig) -> Result<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(http.timeout_secs))
        .user_agent(http.user_agent.clone())
        .build()?;

    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usable_url_rejects_blank() {
        let blank = EpisodeAudio {
            audio_url: Some("   ".to_string()),
            title: None,
        };
        assert_eq!(blank.usable_url(), None);
        assert_eq!(EpisodeAudio::default().usable_url(), None);

        let found = EpisodeAudio {
            audio_url: Some("https://cdn.example.com/ep.mp3".to_string()),
            title: None,
        };
        assert_eq!(found.usable_url(), Some("https://cdn.example.com/ep.mp3"));
    }

    #[test]
    fn test_registry_find_by_platform() {
        let mut apple = MockPlatformExtractor::new();
        apple.expect_platform().return_const(Platform::ApplePodcasts);

        let mut registry = ExtractorRegistry::empty();
        assert!(registry.is_empty());
        registry.register(Box::new(apple));

        assert!(registry.find(Platform::ApplePodcasts).is_some());
        assert!(registry.find(Platform::Xiaoyuzhou).is_none());
        assert_eq!(registry.list_platforms(), vec![Platform::ApplePodcasts]);
    }

    #[test]
    fn test_default_registry_covers_specialized_platforms() {
        let registry = ExtractorRegistry::with_defaults(&HttpConfig::default()).unwrap();
        let platforms = registry.list_platforms();
        assert!(platforms.contains(&Platform::ApplePodcasts));
        assert!(platforms.contains(&Platform::Xiaoyuzhou));
        assert!(!platforms.contains(&Platform::Generic));
    }
}
