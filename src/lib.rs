//! Audio Source Resolver - find a playable audio stream for an episode URL
//!
//! This library resolves a direct audio URL from YouTube, Apple Podcasts, Xiaoyuzhou,
//! RSS-hosted podcasts or generic pages. Platform-specific extractors get the first
//! attempt, then yt-dlp is consulted with a primary and a fallback option set.

pub mod cli;
pub mod config;
pub mod extractors;
pub mod output;
pub mod platform;
pub mod resolver;
pub mod utils;

pub use cli::{Cli, Commands, OutputFormat};
pub use config::Config;
pub use extractors::{EpisodeAudio, ExtractorRegistry, PlatformExtractor};
pub use extractors::ytdlp::{ExtractionOptions, ExtractionTool, YtDlpTool};
pub use platform::Platform;
pub use resolver::{AudioSourceResolver, ResolvedAudioUrl, Strategy};

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Actionable category of a failed resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureKind {
    /// Content requires sign-in, a subscription or is DRM protected
    PaywallDetected,
    /// The extraction tool could not be executed
    BinaryUnavailable,
    /// Metadata was extracted but carried no usable audio reference
    NoStreamFound,
    /// Catch-all, carries the diagnostic text
    ExtractionFailed,
    /// The per-request deadline expired
    Timeout,
}

impl FailureKind {
    pub fn code(&self) -> &'static str {
        match self {
            FailureKind::PaywallDetected => "PAYWALL_DETECTED",
            FailureKind::BinaryUnavailable => "BINARY_UNAVAILABLE",
            FailureKind::NoStreamFound => "NO_STREAM_FOUND",
            FailureKind::ExtractionFailed => "EXTRACTION_FAILED",
            FailureKind::Timeout => "TIMEOUT",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Classified failure returned by [`AudioSourceResolver::resolve`].
///
/// `diagnostic` keeps the raw upstream text for logs. The `Display` output is the
/// user-facing message, which only echoes the diagnostic for `ExtractionFailed`.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub struct ResolutionError {
    pub kind: FailureKind,
    pub diagnostic: String,
}

impl ResolutionError {
    pub fn new(kind: FailureKind, diagnostic: impl Into<String>) -> Self {
        Self {
            kind,
            diagnostic: diagnostic.into(),
        }
    }

    pub fn no_stream_found() -> Self {
        Self::new(
            FailureKind::NoStreamFound,
            "Could not find a valid audio stream URL.",
        )
    }

    pub fn timeout(after: std::time::Duration) -> Self {
        Self::new(
            FailureKind::Timeout,
            format!("resolution deadline of {}s exceeded", after.as_secs()),
        )
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Only deadline expiry is worth retrying with backoff
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind, FailureKind::Timeout)
    }

    pub fn user_message(&self) -> String {
        match self.kind {
            FailureKind::PaywallDetected => {
                "This episode requires sign-in or a subscription and cannot be accessed.".to_string()
            }
            FailureKind::BinaryUnavailable => {
                "Binary execution failed or not found. Please contact support.".to_string()
            }
            FailureKind::NoStreamFound => "Could not find a valid audio stream URL.".to_string(),
            FailureKind::ExtractionFailed => format!("Extraction failed: {}", self.diagnostic),
            FailureKind::Timeout => {
                "Resolving the audio source took too long. Please try again.".to_string()
            }
        }
    }
}

impl std::fmt::Display for ResolutionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.user_message())
    }
}

impl Serialize for ResolutionError {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let has_details = !self.diagnostic.is_empty();
        let mut state =
            serializer.serialize_struct("ResolutionError", if has_details { 3 } else { 2 })?;
        state.serialize_field("code", self.code())?;
        state.serialize_field("message", &self.user_message())?;
        if has_details {
            state.serialize_field("details", &self.diagnostic)?;
        } else {
            state.skip_field("details")?;
        }
        state.end()
    }
}
