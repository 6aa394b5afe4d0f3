use serde_json::Value;
use std::sync::Arc;

use crate::extractors::ytdlp::{ExtractionOptions, ExtractionTool};

const UNKNOWN_ERROR: &str = "unknown extraction error";

/// Metadata returned by a successful attempt
#[derive(Debug, Clone)]
pub struct Extracted {
    pub metadata: Value,
    /// 1 for the primary option set, 2 for the fallback
    pub attempt: u8,
}

/// Both attempts failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineFailure {
    pub first: String,
    pub second: String,
}

impl EngineFailure {
    /// The second attempt's message if it has one, else the first's
    pub fn diagnostic(&self) -> String {
        [self.second.trim(), self.first.trim()]
            .into_iter()
            .find(|message| !message.is_empty())
            .unwrap_or(UNKNOWN_ERROR)
            .to_string()
    }
}

/// Runs the extraction tool with the primary options, then once with the fallback
pub struct GenericEngine {
    tool: Arc<dyn ExtractionTool>,
}

impl GenericEngine {
    pub fn new(tool: Arc<dyn ExtractionTool>) -> Self {
        Self { tool }
    }

    /// Attempts are sequential. The fallback runs only when the primary attempt errors,
    /// never because of what the primary attempt returned.
    pub async fn extract(&self, url: &str) -> Result<Extracted, EngineFailure> {
        let first = match self.tool.dump_metadata(url, &ExtractionOptions::PRIMARY).await {
            Ok(metadata) => return Ok(Extracted { metadata, attempt: 1 }),
            Err(e) => format!("{:#}", e),
        };

        tracing::warn!("Extraction attempt failed, retrying with minimal flags: {}", first);

        match self.tool.dump_metadata(url, &ExtractionOptions::FALLBACK).await {
            Ok(metadata) => Ok(Extracted { metadata, attempt: 2 }),
            Err(e) => Err(EngineFailure {
                first,
                second: format!("{:#}", e),
            }),
        }
    }
}
