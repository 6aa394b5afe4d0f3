use serde::Serialize;

/// Host markers checked in priority order, first match wins
const APPLE_PODCASTS_MARKERS: &[&str] = &["podcasts.apple.com"];
const XIAOYUZHOU_MARKERS: &[&str] = &["xiaoyuzhoufm.com", "小宇宙"];

/// Platforms with a purpose-built extractor, everything else is `Generic`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    ApplePodcasts,
    Xiaoyuzhou,
    Generic,
}

impl Platform {
    /// Classify a source URL by substring containment.
    ///
    /// Never fails and never touches the network. Percent-encoded input is decoded
    /// before matching so `%E5%B0%8F%E5%AE%87%E5%AE%99` matches the same as `小宇宙`.
    pub fn detect(url: &str) -> Self {
        let decoded = urlencoding::decode(url)
            .map(|s| s.into_owned())
            .unwrap_or_else(|_| url.to_string());
        let lower = decoded.to_lowercase();

        let contains_any = |markers: &[&str]| markers.iter().any(|m| lower.contains(m));

        if contains_any(APPLE_PODCASTS_MARKERS) {
            Platform::ApplePodcasts
        } else if contains_any(XIAOYUZHOU_MARKERS) {
            Platform::Xiaoyuzhou
        } else {
            Platform::Generic
        }
    }

    /// Whether a specialized extractor should get the first attempt
    pub fn is_specialized(&self) -> bool {
        !matches!(self, Platform::Generic)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Platform::ApplePodcasts => "Apple Podcasts",
            Platform::Xiaoyuzhou => "Xiaoyuzhou",
            Platform::Generic => "Generic (yt-dlp)",
        }
    }

    pub fn markers(&self) -> &'static [&'static str] {
        match self {
            Platform::ApplePodcasts => APPLE_PODCASTS_MARKERS,
            Platform::Xiaoyuzhou => XIAOYUZHOU_MARKERS,
            Platform::Generic => &[],
        }
    }

    pub fn all() -> [Platform; 3] {
        [Platform::ApplePodcasts, Platform::Xiaoyuzhou, Platform::Generic]
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_apple_podcasts() {
        assert_eq!(
            Platform::detect("https://podcasts.apple.com/us/podcast/the-daily/id1200361736?i=1000650000000"),
            Platform::ApplePodcasts
        );
    }

    #[test]
    fn test_detect_xiaoyuzhou() {
        assert_eq!(
            Platform::detect("https://www.xiaoyuzhoufm.com/episode/6512d7b6a1f2f2e7f3c2d1a0"),
            Platform::Xiaoyuzhou
        );
        assert_eq!(Platform::detect("小宇宙 分享 https://example.com/x"), Platform::Xiaoyuzhou);
        assert_eq!(
            Platform::detect("https://example.com/?q=%E5%B0%8F%E5%AE%87%E5%AE%99"),
            Platform::Xiaoyuzhou
        );
    }

    #[test]
    fn test_apple_wins_over_xiaoyuzhou() {
        assert_eq!(
            Platform::detect("https://podcasts.apple.com/cn/podcast/x/id1?ref=xiaoyuzhoufm.com"),
            Platform::ApplePodcasts
        );
    }

    #[test]
    fn test_everything_else_is_generic() {
        assert_eq!(Platform::detect("https://www.youtube.com/watch?v=abc"), Platform::Generic);
        assert_eq!(Platform::detect("https://open.spotify.com/episode/123"), Platform::Generic);
        assert_eq!(Platform::detect(""), Platform::Generic);
        assert_eq!(Platform::detect("not a url %ZZ"), Platform::Generic);
        assert!(!Platform::Generic.is_specialized());
    }

    #[test]
    fn test_case_insensitive_host() {
        assert_eq!(Platform::detect("HTTPS://PODCASTS.APPLE.COM/us/podcast/x/id1"), Platform::ApplePodcasts);
    }
}
