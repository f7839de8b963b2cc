//! YouTube URL validation and video id extraction
//!
//! Pure string checks, no network access. Three URL shapes are accepted:
//! `watch?v=<id>`, the short link `youtu.be/<id>`, and `/embed/<id>`.

use std::sync::OnceLock;

use regex::Regex;

fn video_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // The capture stops at the first `&`, `?`, `#`, or newline.
        Regex::new(r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/)([^&\n?#]+)")
            .expect("video id pattern is valid")
    })
}

/// Check whether `url` matches one of the accepted YouTube URL shapes.
///
/// Total over arbitrary input; an empty or unrelated string is simply `false`.
pub fn is_valid_video_url(url: &str) -> bool {
    extract_video_id(url).is_some()
}

/// Extract the video id from a YouTube URL, or `None` when the URL does not
/// match any accepted shape.
pub fn extract_video_id(url: &str) -> Option<&str> {
    video_id_pattern()
        .captures(url)
        .and_then(|captures| captures.get(1))
        .map(|id| id.as_str())
        .filter(|id| !id.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_the_three_url_shapes() {
        assert!(is_valid_video_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
        assert!(is_valid_video_url("https://youtu.be/dQw4w9WgXcQ"));
        assert!(is_valid_video_url("https://www.youtube.com/embed/dQw4w9WgXcQ"));
    }

    #[test]
    fn test_rejects_everything_else() {
        assert!(!is_valid_video_url(""));
        assert!(!is_valid_video_url("https://example.com/video"));
        assert!(!is_valid_video_url("https://vimeo.com/123456"));
        assert!(!is_valid_video_url("not a url at all"));
        assert!(!is_valid_video_url("https://youtube.com/playlist?list=PL123"));
    }

    #[test]
    fn test_extracts_id_up_to_delimiter() {
        assert_eq!(
            extract_video_id("https://youtube.com/watch?v=abc123&t=5"),
            Some("abc123")
        );
        assert_eq!(extract_video_id("https://youtu.be/xyz789"), Some("xyz789"));
        assert_eq!(
            extract_video_id("https://youtu.be/xyz789?si=share"),
            Some("xyz789")
        );
        assert_eq!(
            extract_video_id("https://www.youtube.com/embed/abc#fragment"),
            Some("abc")
        );
        assert_eq!(
            extract_video_id("https://youtu.be/abc\nrest"),
            Some("abc")
        );
    }

    #[test]
    fn test_empty_capture_is_invalid() {
        assert_eq!(extract_video_id("https://youtu.be/"), None);
        assert_eq!(extract_video_id("https://youtube.com/watch?v=&t=1"), None);
    }
}
