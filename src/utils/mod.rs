use anyhow::Result;
use url::Url;

use crate::extractors::ytdlp::YtDlpTool;

/// Validate a URL and return normalized version
pub fn validate_and_normalize_url(url: &str) -> Result<String> {
    let parsed = Url::parse(url.trim())
        .map_err(|_| anyhow::anyhow!("Invalid URL format: {}", url))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        anyhow::bail!("URL must use HTTP or HTTPS protocol");
    }

    Ok(parsed.to_string())
}

/// Extract domain from URL for display purposes
pub fn extract_domain(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()?
        .host_str()
        .map(|host| host.strip_prefix("www.").unwrap_or(host).to_string())
}

/// Check that the extraction tool runs, returning problems found
pub async fn check_dependencies(tool: &YtDlpTool) -> Vec<String> {
    let mut problems = Vec::new();

    match tool.version().await {
        Ok(version) => {
            tracing::debug!("{} version {}", tool.binary().display(), version);
        }
        Err(e) => {
            problems.push(format!(
                "yt-dlp ({}) - required for generic extraction: {:#}",
                tool.binary().display(),
                e
            ));
        }
    }

    problems
}
