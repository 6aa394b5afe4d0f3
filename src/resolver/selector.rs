use serde_json::Value;

use crate::ResolutionError;

/// Codec value yt-dlp uses for formats without an audio track
const NO_CODEC: &str = "none";

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Whether a format entry declares an audio codec.
///
/// A missing or non-string `acodec` does not qualify.
fn has_audio(format: &Value) -> bool {
    format
        .get("acodec")
        .and_then(Value::as_str)
        .is_some_and(|codec| codec != NO_CODEC)
}

/// Pick the stream URL from a yt-dlp metadata record.
///
/// Only `url` and `formats[].{acodec,url}` are read, the rest of the record is ignored.
/// A top-level `url` wins; otherwise the first audio-capable format is taken as-is,
/// and if that entry has no usable `url` the record has no stream.
pub fn select_stream(metadata: &Value) -> Result<String, ResolutionError> {
    if let Some(url) = non_empty_str(metadata.get("url")) {
        return Ok(url.to_string());
    }

    let first_audio = metadata
        .get("formats")
        .and_then(Value::as_array)
        .and_then(|formats| formats.iter().find(|format| has_audio(format)));

    match first_audio {
        Some(format) => non_empty_str(format.get("url"))
            .map(str::to_string)
            .ok_or_else(ResolutionError::no_stream_found),
        None => Err(ResolutionError::no_stream_found()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FailureKind;
    use serde_json::json;

    fn assert_no_stream(metadata: Value) {
        let err = select_stream(&metadata).unwrap_err();
        assert_eq!(err.kind, FailureKind::NoStreamFound);
    }

    #[test]
    fn test_top_level_url_wins() {
        let metadata = json!({
            "url": "http://a",
            "formats": [{"acodec": "aac", "url": "http://b"}]
        });
        assert_eq!(select_stream(&metadata).unwrap(), "http://a");
    }

    #[test]
    fn test_first_audio_format() {
        let metadata = json!({
            "formats": [
                {"acodec": "none", "url": "http://x"},
                {"acodec": "aac", "url": "http://y"},
                {"acodec": "opus", "url": "http://z"}
            ]
        });
        assert_eq!(select_stream(&metadata).unwrap(), "http://y");
    }

    #[test]
    fn test_missing_acodec_is_excluded() {
        assert_no_stream(json!({"formats": [{"url": "http://z"}]}));
        assert_no_stream(json!({"formats": [{"acodec": null, "url": "http://z"}]}));
    }

    #[test]
    fn test_empty_record() {
        assert_no_stream(json!({}));
        assert_no_stream(json!({"formats": []}));
        assert_no_stream(json!({"formats": "not a list"}));
    }

    #[test]
    fn test_empty_top_level_url_falls_through_to_formats() {
        let metadata = json!({"url": "", "formats": [{"acodec": "mp4a.40.2", "url": "http://m"}]});
        assert_eq!(select_stream(&metadata).unwrap(), "http://m");
    }

    #[test]
    fn test_first_audio_format_without_url_does_not_fall_through() {
        assert_no_stream(json!({
            "formats": [
                {"acodec": "aac"},
                {"acodec": "opus", "url": "http://later"}
            ]
        }));
        assert_no_stream(json!({"formats": [{"acodec": "aac", "url": 42}]}));
    }

    #[test]
    fn test_unrelated_fields_are_ignored() {
        let metadata = json!({
            "id": 7,
            "title": ["unexpected", "shape"],
            "formats": [{"acodec": "mp3", "url": "http://ok", "abr": "n/a"}]
        });
        assert_eq!(select_stream(&metadata).unwrap(), "http://ok");
    }
}
