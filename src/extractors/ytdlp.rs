use anyhow::Context;
use async_trait::async_trait;
use serde_json::Value;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use crate::Result;

const DEFAULT_BINARY: &str = "yt-dlp";

/// Flags passed to the metadata extraction tool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionOptions {
    /// Print the metadata record as a single JSON document without downloading
    pub dump_metadata_only: bool,
    pub suppress_warnings: bool,
    pub skip_certificate_validation: bool,
    pub prefer_free_formats: bool,
    /// Format selector, e.g. `worstaudio/bestaudio`
    pub format_preference: Option<&'static str>,
}

impl ExtractionOptions {
    /// First attempt: smallest audio-only stream, falling back to the best audio stream
    pub const PRIMARY: Self = Self {
        dump_metadata_only: true,
        suppress_warnings: true,
        skip_certificate_validation: true,
        prefer_free_formats: true,
        format_preference: Some("worstaudio/bestaudio"),
    };

    /// Second attempt: only what is needed to get metadata at all
    pub const FALLBACK: Self = Self {
        dump_metadata_only: true,
        suppress_warnings: false,
        skip_certificate_validation: true,
        prefer_free_formats: false,
        format_preference: None,
    };

    /// Render as yt-dlp command line flags
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        if self.dump_metadata_only {
            args.push("--dump-single-json".to_string());
        }
        if self.suppress_warnings {
            args.push("--no-warnings".to_string());
        }
        if self.skip_certificate_validation {
            args.push("--no-check-certificates".to_string());
        }
        if self.prefer_free_formats {
            args.push("--prefer-free-formats".to_string());
        }
        if let Some(format) = self.format_preference {
            args.push("--format".to_string());
            args.push(format.to_string());
        }

        args
    }
}

/// A general-purpose media metadata extractor
///
/// Implementations return the raw metadata record. Errors must carry readable
/// diagnostic text, the resolver classifies failures from it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExtractionTool: Send + Sync {
    async fn dump_metadata(&self, url: &str, options: &ExtractionOptions) -> Result<Value>;
}

/// Finds the yt-dlp binary to run
#[derive(Debug, Clone, Default)]
pub struct BinaryLocator {
    configured: Option<PathBuf>,
}

impl BinaryLocator {
    pub fn new(configured: Option<PathBuf>) -> Self {
        Self { configured }
    }

    /// Configured path if set, else the first `yt-dlp` on `PATH`, else the bare name
    pub fn locate(&self) -> PathBuf {
        if let Some(path) = &self.configured {
            return path.clone();
        }

        std::env::var_os("PATH")
            .and_then(|paths| {
                std::env::split_paths(&paths)
                    .map(|dir| dir.join(binary_file_name()))
                    .find(|candidate| candidate.is_file())
            })
            .unwrap_or_else(|| PathBuf::from(DEFAULT_BINARY))
    }
}

fn binary_file_name() -> &'static str {
    if cfg!(windows) {
        "yt-dlp.exe"
    } else {
        DEFAULT_BINARY
    }
}

/// yt-dlp invoked as a subprocess
pub struct YtDlpTool {
    binary: PathBuf,
}

impl YtDlpTool {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn from_locator(locator: &BinaryLocator) -> Self {
        Self::new(locator.locate())
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Report the tool version, failing if it cannot be executed
    pub async fn version(&self) -> Result<String> {
        let output = Command::new(&self.binary)
            .arg("--version")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| spawn_error(&self.binary, e))?;

        if !output.status.success() {
            let error = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("{} --version failed: {}", self.binary.display(), error.trim());
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// Rewrite spawn failures so the cause survives as text
fn spawn_error(binary: &Path, err: io::Error) -> anyhow::Error {
    match err.kind() {
        io::ErrorKind::NotFound => {
            anyhow::anyhow!("spawn {} ENOENT: binary not found", binary.display())
        }
        io::ErrorKind::PermissionDenied => {
            anyhow::anyhow!("spawn {} EACCES: permission denied", binary.display())
        }
        _ => anyhow::Error::new(err).context(format!("Failed to run {}", binary.display())),
    }
}

#[async_trait]
impl ExtractionTool for YtDlpTool {
    async fn dump_metadata(&self, url: &str, options: &ExtractionOptions) -> Result<Value> {
        tracing::debug!("Running {} for: {}", self.binary.display(), url);

        let output = Command::new(&self.binary)
            .args(options.to_args())
            .arg("--")
            .arg(url)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| spawn_error(&self.binary, e))?;

        if !output.status.success() {
            let error = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("yt-dlp failed ({}): {}", output.status, error.trim());
        }

        let info: Value = serde_json::from_slice(&output.stdout)
            .context("yt-dlp produced malformed output")?;

        if !info.is_object() {
            anyhow::bail!("yt-dlp produced malformed output: expected a JSON object");
        }

        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_args() {
        assert_eq!(
            ExtractionOptions::PRIMARY.to_args(),
            vec![
                "--dump-single-json",
                "--no-warnings",
                "--no-check-certificates",
                "--prefer-free-formats",
                "--format",
                "worstaudio/bestaudio",
            ]
        );
    }

    #[test]
    fn test_fallback_args_are_minimal() {
        assert_eq!(
            ExtractionOptions::FALLBACK.to_args(),
            vec!["--dump-single-json", "--no-check-certificates"]
        );
    }

    #[test]
    fn test_locator_prefers_configured_path() {
        let locator = BinaryLocator::new(Some(PathBuf::from("/opt/tools/yt-dlp")));
        assert_eq!(locator.locate(), PathBuf::from("/opt/tools/yt-dlp"));
    }

    #[test]
    fn test_spawn_errors_keep_cause_in_text() {
        let missing = spawn_error(Path::new("/nope/yt-dlp"), io::Error::from(io::ErrorKind::NotFound));
        assert!(format!("{:#}", missing).contains("not found"));

        let denied = spawn_error(Path::new("/nope/yt-dlp"), io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(format!("{:#}", denied).contains("EACCES"));
    }

    #[tokio::test]
    async fn test_missing_binary_reports_not_found() {
        let tool = YtDlpTool::new("/definitely/not/here/yt-dlp");
        let err = tool
            .dump_metadata("https://example.com/episode", &ExtractionOptions::PRIMARY)
            .await
            .unwrap_err();
        assert!(format!("{:#}", err).contains("not found"));
        assert!(tool.version().await.is_err());
    }
}
