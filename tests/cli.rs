use assert_cmd::Command;
use predicates::prelude::*;

fn audiosrc() -> Command {
    Command::cargo_bin("audiosrc").unwrap()
}

#[test]
fn test_platforms_lists_specialized_extractors() {
    audiosrc()
        .arg("platforms")
        .assert()
        .success()
        .stdout(predicate::str::contains("Apple Podcasts"))
        .stdout(predicate::str::contains("xiaoyuzhoufm.com"));
}

#[test]
fn test_resolve_rejects_invalid_url() {
    audiosrc()
        .args(["resolve", "not-a-url", "--quiet"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid URL format"));
}

#[test]
fn test_resolve_rejects_non_http_scheme() {
    audiosrc()
        .args(["resolve", "ftp://example.com/episode.mp3", "--quiet"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("HTTP or HTTPS"));
}

#[test]
fn test_missing_binary_is_classified() {
    audiosrc()
        .args([
            "resolve",
            "https://www.youtube.com/watch?v=abc",
            "--quiet",
            "--format",
            "json",
            "--yt-dlp-path",
            "/definitely/not/here/yt-dlp",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("BINARY_UNAVAILABLE"));
}

#[test]
fn test_doctor_reports_missing_binary() {
    audiosrc()
        .args(["doctor", "--yt-dlp-path", "/definitely/not/here/yt-dlp"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}
