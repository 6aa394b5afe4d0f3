use anyhow::Result;
use console::style;
use serde_json::json;

use crate::cli::OutputFormat;
use crate::resolver::ResolvedAudioUrl;
use crate::ResolutionError;

/// Render a successful resolution
pub fn format_resolution(resolved: &ResolvedAudioUrl, format: &OutputFormat) -> Result<String> {
    let content = match format {
        OutputFormat::Text => resolved.to_string(),
        OutputFormat::Json => serde_json::to_string_pretty(&json!({
            "audio_url": resolved.as_str(),
            "strategy": resolved.strategy(),
            "resolved_at": resolved.resolved_at(),
        }))?,
    };

    Ok(content)
}

/// Render a classified failure
pub fn format_failure(error: &ResolutionError, format: &OutputFormat) -> Result<String> {
    let content = match format {
        OutputFormat::Text => format!("{} [{}] {}", style("error:").red().bold(), error.code(), error),
        OutputFormat::Json => serde_json::to_string_pretty(&json!({ "error": error }))?,
    };

    Ok(content)
}

/// Print a resolution result, successes to stdout and failures to stderr
pub fn print_to_console(
    result: &std::result::Result<ResolvedAudioUrl, ResolutionError>,
    format: &OutputFormat,
) -> Result<()> {
    match result {
        Ok(resolved) => println!("{}", format_resolution(resolved, format)?),
        Err(error) => eprintln!("{}", format_failure(error, format)?),
    }
    Ok(())
}
