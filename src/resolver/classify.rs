use crate::{FailureKind, ResolutionError};

/// Lower-case markers of content behind a login, subscription or DRM
const PAYWALL_MARKERS: &[&str] = &["sign in", "premium", "drm", "exclusive"];

/// Errno token for a binary that exists but cannot be executed, matched as written
const PERMISSION_TOKEN: &str = "EACCES";

const MISSING_MARKER: &str = "not found";

/// Map free-form diagnostic text to a failure category.
///
/// Paywall markers are checked first, then binary problems. Everything else is
/// `ExtractionFailed`.
pub fn classify(diagnostic: &str) -> FailureKind {
    let lower = diagnostic.to_lowercase();

    if PAYWALL_MARKERS.iter().any(|marker| lower.contains(marker)) {
        FailureKind::PaywallDetected
    } else if diagnostic.contains(PERMISSION_TOKEN) || lower.contains(MISSING_MARKER) {
        FailureKind::BinaryUnavailable
    } else {
        FailureKind::ExtractionFailed
    }
}

/// Classify and wrap, keeping the diagnostic for logs
pub fn classify_failure(diagnostic: impl Into<String>) -> ResolutionError {
    let diagnostic = diagnostic.into();
    ResolutionError::new(classify(&diagnostic), diagnostic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paywall() {
        assert_eq!(
            classify("ERROR: [youtube] abc: Sign in to confirm you're not a bot"),
            FailureKind::PaywallDetected
        );
        assert_eq!(classify("This video is only available for Premium members"), FailureKind::PaywallDetected);
        assert_eq!(classify("ERROR: This video is DRM protected"), FailureKind::PaywallDetected);
        assert_eq!(classify("Spotify exclusive episode"), FailureKind::PaywallDetected);
    }

    #[test]
    fn test_binary_unavailable() {
        assert_eq!(classify("spawn yt-dlp ENOENT: binary not found"), FailureKind::BinaryUnavailable);
        assert_eq!(classify("spawn /tmp/yt-dlp EACCES"), FailureKind::BinaryUnavailable);
        assert_eq!(classify("yt-dlp: command NOT FOUND"), FailureKind::BinaryUnavailable);
    }

    #[test]
    fn test_errno_token_is_case_sensitive() {
        assert_eq!(classify("eacces"), FailureKind::ExtractionFailed);
    }

    #[test]
    fn test_paywall_takes_priority() {
        assert_eq!(classify("Premium content not found"), FailureKind::PaywallDetected);
    }

    #[test]
    fn test_everything_else() {
        assert_eq!(classify("ERROR: Unsupported URL: https://example.com"), FailureKind::ExtractionFailed);
        assert_eq!(classify(""), FailureKind::ExtractionFailed);
    }

    #[test]
    fn test_classify_failure_keeps_diagnostic() {
        let err = classify_failure("Unsupported URL");
        assert_eq!(err.kind, FailureKind::ExtractionFailed);
        assert_eq!(err.diagnostic, "Unsupported URL");
    }
}
