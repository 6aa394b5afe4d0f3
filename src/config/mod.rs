use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_USER_AGENT: &str = concat!("audio-source-resolver/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Resolution pipeline settings
    pub resolver: ResolverConfig,

    /// HTTP settings for the platform extractors
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Explicit yt-dlp binary, searched on PATH when unset
    pub yt_dlp_path: Option<PathBuf>,

    /// Overall deadline per resolution in seconds, unbounded when unset
    pub timeout_secs: Option<u64>,

    /// Try Apple Podcasts / Xiaoyuzhou extractors before yt-dlp
    pub specialized_extractors: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    pub user_agent: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            yt_dlp_path: None,
            timeout_secs: Some(120),
            specialized_extractors: true,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file, or defaults when there is none
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Ok(path) if path.exists() => Self::load_from(&path),
            _ => {
                tracing::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load and validate a specific config file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs_err::read_to_string(path)
            .context("Failed to read config file")?;

        let config: Config = serde_yaml::from_str(&content)
            .context("Failed to parse config file")?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default location, returning where it went
    pub fn save(&self) -> Result<PathBuf> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs_err::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)
            .context("Failed to serialize config")?;

        fs_err::write(path, content)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Get configuration file path
    pub fn config_path() -> Result<PathBuf> {
        // First try current directory for easy testing
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?;

        Ok(config_dir.join("audio-source-resolver").join("config.yaml"))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.resolver.timeout_secs == Some(0) {
            anyhow::bail!("resolver.timeout_secs must be greater than zero (omit it to disable the deadline)");
        }

        if self.http.timeout_secs == 0 {
            anyhow::bail!("http.timeout_secs must be greater than zero");
        }

        if self.http.user_agent.trim().is_empty() {
            anyhow::bail!("http.user_agent must not be empty");
        }

        Ok(())
    }

    /// Overall resolution deadline
    pub fn deadline(&self) -> Option<Duration> {
        self.resolver.timeout_secs.map(Duration::from_secs)
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        match &self.resolver.yt_dlp_path {
            Some(path) => println!("  yt-dlp: {}", path.display()),
            None => println!("  yt-dlp: (search PATH)"),
        }
        match self.resolver.timeout_secs {
            Some(secs) => println!("  Deadline: {}s", secs),
            None => println!("  Deadline: none"),
        }
        println!("  Specialized extractors: {}", self.resolver.specialized_extractors);
        println!("  HTTP timeout: {}s", self.http.timeout_secs);
        println!("  User agent: {}", self.http.user_agent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.deadline(), Some(Duration::from_secs(120)));
        assert!(config.resolver.specialized_extractors);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config: Config = serde_yaml::from_str("resolver:\n  yt_dlp_path: /usr/local/bin/yt-dlp\n").unwrap();
        assert_eq!(config.resolver.yt_dlp_path, Some(PathBuf::from("/usr/local/bin/yt-dlp")));
        assert_eq!(config.resolver.timeout_secs, Some(120));
        assert_eq!(config.http.timeout_secs, 15);
    }

    #[test]
    fn test_zero_deadline_rejected() {
        let mut config = Config::default();
        config.resolver.timeout_secs = Some(0);
        assert!(config.validate().is_err());

        config.resolver.timeout_secs = None;
        assert!(config.validate().is_ok());
        assert_eq!(config.deadline(), None);
    }

    #[test]
    fn test_blank_user_agent_rejected() {
        let mut config = Config::default();
        config.http.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        let mut config = Config::default();
        config.resolver.specialized_extractors = false;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert!(!loaded.resolver.specialized_extractors);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs_err::write(&path, "http:\n  timeout_secs: 0\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
