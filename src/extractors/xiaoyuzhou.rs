use anyhow::Context;
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use std::sync::OnceLock;

use super::{EpisodeAudio, PlatformExtractor};
use crate::platform::Platform;
use crate::Result;

/// Xiaoyuzhou FM extractor reading the Open Graph tags of an episode page
pub struct XiaoyuzhouExtractor {
    client: Client,
}

fn meta_content_regex(property: &str) -> Regex {
    // Attribute order differs between page builds
    let pattern = format!(
        r#"(?is)<meta[^>]*?(?:property|name)\s*=\s*["']{p}["'][^>]*?content\s*=\s*["']([^"']+)["']|<meta[^>]*?content\s*=\s*["']([^"']+)["'][^>]*?(?:property|name)\s*=\s*["']{p}["']"#,
        p = regex::escape(property)
    );
    Regex::new(&pattern).expect("meta pattern is built from an escaped literal")
}

fn og_audio_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| meta_content_regex("og:audio"))
}

fn og_title_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| meta_content_regex("og:title"))
}

fn cdn_audio_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"https?://media\.xyzcdn\.net/[^"'\s<>\\]+?\.(?:m4a|mp3|aac)"#)
            .expect("cdn audio pattern is valid")
    })
}

fn meta_content(re: &Regex, html: &str) -> Option<String> {
    re.captures(html)
        .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Find the episode audio in an episode page
pub fn parse_episode_page(html: &str) -> EpisodeAudio {
    let audio_url = meta_content(og_audio_regex(), html)
        .or_else(|| cdn_audio_regex().find(html).map(|m| m.as_str().to_string()));

    EpisodeAudio {
        audio_url,
        title: meta_content(og_title_regex(), html),
    }
}

impl XiaoyuzhouExtractor {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn fetch_page(&self, url: &str) -> Result<String> {
        tracing::debug!("Fetching Xiaoyuzhou episode page: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Xiaoyuzhou page request failed")?;

        if !response.status().is_success() {
            anyhow::bail!("Failed to fetch Xiaoyuzhou page: HTTP {}", response.status());
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl PlatformExtractor for XiaoyuzhouExtractor {
    fn platform(&self) -> Platform {
        Platform::Xiaoyuzhou
    }

    async fn extract_episode(&self, url: &str) -> Result<EpisodeAudio> {
        // Share text like "小宇宙 ... https://..." carries the link somewhere inside
        let page_url = url
            .split_whitespace()
            .find(|part| part.starts_with("http://") || part.starts_with("https://"))
            .ok_or_else(|| anyhow::anyhow!("No link found in Xiaoyuzhou input: {}", url))?;

        let html = self.fetch_page(page_url).await?;
        Ok(parse_episode_page(&html))
    }
}
