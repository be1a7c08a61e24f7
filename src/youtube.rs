//! YouTube id extraction and the URLs derived from it.

use std::sync::LazyLock;

use regex::Regex;

static BARE_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").unwrap());

// Tried in order; the first capture that cleans up to 11 characters wins.
static URL_SHAPES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"youtube\.com/watch\?v=([A-Za-z0-9_-]{11})",
        r"youtu\.be/([A-Za-z0-9_-]{11})",
        r"youtube\.com/embed/([A-Za-z0-9_-]{11})",
        r"youtube\.com/v/([A-Za-z0-9_-]{11})",
        r"youtube\.com/shorts/([A-Za-z0-9_-]{11})",
        r"youtube\.com/live/([A-Za-z0-9_-]{11})",
        r"youtube\.com/watch\?.*v=([A-Za-z0-9_-]{11})",
        r"youtu\.be/([A-Za-z0-9_-]{11})(?:\?|&|#|$)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Za-z0-9_-]+").unwrap());

const EMBED_PARAMS: &str = "autoplay=1&rel=0&modestbranding=1&playsinline=1&enablejsapi=1";

/// Pull an 11-character video id out of a bare id or any common YouTube URL shape.
pub fn extract_video_id(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() { return None; }
    if BARE_ID.is_match(raw) { return Some(raw.to_string()); }

    for shape in URL_SHAPES.iter() {
        let Some(caps) = shape.captures(raw) else { continue };
        let Some(m) = caps.get(1) else { continue };
        let id = m.as_str().split(['?', '&', '#']).next().unwrap_or_default();
        if id.len() == 11 { return Some(id.to_string()); }
    }

    // last resort: a standalone token of exactly eleven id characters
    TOKEN.find_iter(raw).map(|m| m.as_str()).find(|t| t.len() == 11).map(str::to_string)
}

pub fn thumbnail_url(raw: &str, quality: &str) -> Option<String> {
    extract_video_id(raw).map(|id| format!("https://img.youtube.com/vi/{id}/{quality}.jpg"))
}

pub fn embed_url(raw: &str) -> Option<String> {
    extract_video_id(raw).map(|id| format!("https://www.youtube.com/embed/{id}?{EMBED_PARAMS}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_shapes() {
        let cases = [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=10",
            "https://youtu.be/dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ?si=abc",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://www.youtube.com/v/dQw4w9WgXcQ",
            "https://youtube.com/shorts/dQw4w9WgXcQ",
            "https://www.youtube.com/live/dQw4w9WgXcQ?feature=share",
            "https://www.youtube.com/watch?feature=related&v=dQw4w9WgXcQ",
            "  dQw4w9WgXcQ  ",
        ];
        for url in cases {
            assert_eq!(extract_video_id(url).as_deref(), Some("dQw4w9WgXcQ"), "{url}");
        }
    }

    #[test]
    fn non_video_text_has_no_id() {
        assert_eq!(extract_video_id("not a url"), None);
        assert_eq!(extract_video_id(""), None);
        assert_eq!(extract_video_id("https://vimeo.com/12345"), None);
    }

    #[test]
    fn fallback_finds_standalone_token() {
        assert_eq!(extract_video_id("https://example.com/play/abcdefghijk/").as_deref(), Some("abcdefghijk"));
        // twelve characters is not an id
        assert_eq!(extract_video_id("video abcdefghijkl"), None);
    }

    #[test]
    fn derived_urls() {
        assert_eq!(
            thumbnail_url("https://youtu.be/dQw4w9WgXcQ", "hqdefault").as_deref(),
            Some("https://img.youtube.com/vi/dQw4w9WgXcQ/hqdefault.jpg")
        );
        let embed = embed_url("dQw4w9WgXcQ").unwrap();
        assert!(embed.starts_with("https://www.youtube.com/embed/dQw4w9WgXcQ?autoplay=1"));
        assert!(thumbnail_url("nope", "hqdefault").is_none());
    }
}
