//! Video-id extraction and validation.

use super::transcript::TranscriptError;
use url::Url;

/// An 11-character YouTube video identifier.
///
/// Only constructed through [`extract_video_id`] (or `FromStr`), so a held
/// value is always a valid id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    /// The raw 11-character id.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical watch URL for this video, used as document provenance.
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }
}

impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for VideoId {
    type Err = TranscriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        extract_video_id(s)
    }
}

/// Check the fixed-length id alphabet: 11 characters from `[A-Za-z0-9_-]`.
fn is_valid_id(s: &str) -> bool {
    s.len() == 11
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Extract a video id from a bare id or any of the common YouTube URL shapes.
///
/// Accepted inputs, in priority order:
/// - a bare 11-character id
/// - `youtube.com/watch?v=<id>` (extra query parameters ignored)
/// - `youtube.com/shorts/<id>` and `youtube.com/live/<id>`
/// - `youtu.be/<id>`
///
/// Playlist and channel links do not carry an id at these positions and are
/// rejected. Pure function, no I/O.
pub fn extract_video_id(input: &str) -> Result<VideoId, TranscriptError> {
    let input = input.trim();

    if is_valid_id(input) {
        return Ok(VideoId(input.to_string()));
    }

    let url = Url::parse(input)
        .map_err(|_| TranscriptError::InvalidVideoId(input.to_string()))?;

    let host = url.host_str().unwrap_or("").to_ascii_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);
    let path = url.path();

    if host.ends_with("youtube.com") {
        if path == "/watch" {
            if let Some((_, value)) = url.query_pairs().find(|(k, _)| k == "v") {
                // Truncate at an embedded '&' in case the query string was
                // mangled before it reached us.
                let candidate = value.split('&').next().unwrap_or("");
                if is_valid_id(candidate) {
                    return Ok(VideoId(candidate.to_string()));
                }
            }
        }

        for prefix in ["/shorts/", "/live/"] {
            if let Some(rest) = path.strip_prefix(prefix) {
                let candidate: String = rest.chars().take(11).collect();
                if is_valid_id(&candidate) {
                    return Ok(VideoId(candidate));
                }
            }
        }
    }

    if host == "youtu.be" {
        if let Some(first) = url.path_segments().and_then(|mut segs| segs.next()) {
            if is_valid_id(first) {
                return Ok(VideoId(first.to_string()));
            }
        }
    }

    Err(TranscriptError::InvalidVideoId(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(input: &str) -> Result<String, TranscriptError> {
        extract_video_id(input).map(|id| id.as_str().to_string())
    }

    #[test]
    fn bare_id_passes_through() {
        assert_eq!(extract("dQw4w9WgXcQ").unwrap(), "dQw4w9WgXcQ");
        assert_eq!(extract("  dQw4w9WgXcQ  ").unwrap(), "dQw4w9WgXcQ");
        assert_eq!(extract("a-b_c1D2E3F").unwrap(), "a-b_c1D2E3F");
    }

    #[test]
    fn watch_url() {
        assert_eq!(
            extract("https://www.youtube.com/watch?v=dQw4w9WgXcQ").unwrap(),
            "dQw4w9WgXcQ"
        );
    }

    #[test]
    fn watch_url_with_trailing_params() {
        assert_eq!(
            extract("https://www.youtube.com/watch?v=dQw4w9WgXcQ&list=PLxyz").unwrap(),
            "dQw4w9WgXcQ"
        );
        assert_eq!(
            extract("https://youtube.com/watch?v=dQw4w9WgXcQ&t=120").unwrap(),
            "dQw4w9WgXcQ"
        );
    }

    #[test]
    fn short_link() {
        assert_eq!(extract("https://youtu.be/dQw4w9WgXcQ").unwrap(), "dQw4w9WgXcQ");
        assert_eq!(
            extract("https://youtu.be/dQw4w9WgXcQ?si=abc").unwrap(),
            "dQw4w9WgXcQ"
        );
    }

    #[test]
    fn shorts_and_live() {
        assert_eq!(
            extract("https://www.youtube.com/shorts/dQw4w9WgXcQ").unwrap(),
            "dQw4w9WgXcQ"
        );
        assert_eq!(
            extract("https://www.youtube.com/live/dQw4w9WgXcQ?feature=share").unwrap(),
            "dQw4w9WgXcQ"
        );
    }

    #[test]
    fn host_case_is_normalized() {
        assert_eq!(
            extract("https://WWW.YouTube.COM/watch?v=dQw4w9WgXcQ").unwrap(),
            "dQw4w9WgXcQ"
        );
    }

    #[test]
    fn playlist_and_channel_links_fail() {
        assert!(matches!(
            extract("https://www.youtube.com/playlist?list=PLxyz"),
            Err(TranscriptError::InvalidVideoId(_))
        ));
        assert!(matches!(
            extract("https://www.youtube.com/channel/UCabcdef"),
            Err(TranscriptError::InvalidVideoId(_))
        ));
        assert!(matches!(
            extract("https://www.youtube.com/@somecreator"),
            Err(TranscriptError::InvalidVideoId(_))
        ));
    }

    #[test]
    fn malformed_inputs_fail() {
        assert!(extract("").is_err());
        assert!(extract("not-a-video-id").is_err());
        assert!(extract("tooshort").is_err());
        assert!(extract("twelve_chars").is_err());
        // Valid length but invalid alphabet
        assert!(extract("dQw4w9WgXc!").is_err());
        // URL with no scheme fails structural parsing
        assert!(extract("youtube.com/watch?v=dQw4w9WgXcQ").is_err());
    }

    #[test]
    fn watch_url_with_invalid_id_fails() {
        assert!(extract("https://www.youtube.com/watch?v=short").is_err());
        assert!(extract("https://youtu.be/short").is_err());
    }

    #[test]
    fn unrelated_host_fails() {
        assert!(extract("https://vimeo.com/watch?v=dQw4w9WgXcQ").is_err());
    }

    #[test]
    fn watch_url_builds_canonical_source() {
        let id = extract_video_id("dQw4w9WgXcQ").unwrap();
        assert_eq!(id.watch_url(), "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
    }
}
