//! Transcript retrieval with language fallback.

use super::id::{extract_video_id, VideoId};
use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

/// Tag recorded in document metadata naming the retrieval mechanism.
pub const LOADER_TAG: &str = "youtube-captions";

/// Default language preference order: regional Portuguese, generic
/// Portuguese, then English.
pub const DEFAULT_LANGUAGES: &[&str] = &["pt-BR", "pt", "en"];

/// One captioned utterance as returned by the transcript source.
#[derive(Debug, Clone)]
pub struct CaptionLine {
    pub text: String,
    /// Start offset in seconds.
    pub start: f64,
    /// Duration in seconds.
    pub duration: f64,
}

/// Failure taxonomy of the transcript-retrieval capability.
///
/// Whatever the transport (HTTP scrape, SDK), a fetch attempt for one
/// `(video id, language)` pair resolves to one of these.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("captions are disabled for this video")]
    Disabled,

    #[error("no captions available for the requested language")]
    NotFound,

    #[error("video is unavailable")]
    Unavailable,

    #[error("video id was rejected by the transcript source")]
    InvalidId,

    #[error("{0}")]
    Other(String),
}

impl FetchError {
    /// Short identifying name for diagnostics.
    fn cause_name(&self) -> String {
        match self {
            FetchError::Disabled => "Disabled".to_string(),
            FetchError::NotFound => "NotFound".to_string(),
            FetchError::Unavailable => "Unavailable".to_string(),
            FetchError::InvalidId => "InvalidId".to_string(),
            FetchError::Other(cause) => cause.clone(),
        }
    }
}

/// Errors surfaced by transcript loading, one variant per user-facing cause.
#[derive(Error, Debug)]
pub enum TranscriptError {
    #[error(
        "could not extract a valid video id from '{0}': \
         use a video link (watch?v=..., youtu.be/..., shorts/ or live/), \
         not a playlist or channel"
    )]
    InvalidVideoId(String),

    #[error("video id {0} was rejected by the transcript source")]
    IdRejected(String),

    #[error("transcripts are disabled for video {0}")]
    TranscriptsDisabled(String),

    #[error("video {video_id} has no transcript in any requested language (tried {languages:?})")]
    NoTranscriptFound {
        video_id: String,
        languages: Vec<String>,
    },

    #[error("video {0} is unavailable (private, removed or region-restricted)")]
    VideoUnavailable(String),

    #[error("transcript for video {0} came back empty")]
    EmptyTranscript(String),

    #[error("could not retrieve transcript for video {video_id}: {cause}")]
    Retrieval { video_id: String, cause: String },
}

/// The assembled transcript plus source metadata.
///
/// `content` is always non-empty; an empty retrieval result fails with
/// [`TranscriptError::EmptyTranscript`] instead of constructing one of these.
#[derive(Debug, Clone)]
pub struct TranscriptDocument {
    /// Caption lines joined with newlines, in original order.
    pub content: String,
    /// Canonical watch URL, used as document provenance.
    pub source: String,
    pub video_id: VideoId,
    /// Fixed tag naming the retrieval mechanism.
    pub loader: &'static str,
}

/// Transcript-retrieval capability for one `(video id, language)` pair.
#[async_trait]
pub trait TranscriptFetcher: Send + Sync {
    async fn fetch(
        &self,
        video_id: &VideoId,
        language: &str,
    ) -> std::result::Result<Vec<CaptionLine>, FetchError>;
}

/// Loads a transcript for a video URL or bare id, trying languages in
/// preference order.
///
/// The fallback loop is strictly sequential: attempts are cheap relative to
/// early termination on success, and the upstream rate-limits aggressively,
/// so speculative parallel requests would only burn quota.
pub struct TranscriptLoader {
    fetcher: Box<dyn TranscriptFetcher>,
    languages: Vec<String>,
}

impl TranscriptLoader {
    pub fn new(fetcher: Box<dyn TranscriptFetcher>) -> Self {
        Self {
            fetcher,
            languages: DEFAULT_LANGUAGES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Override the language preference order. An empty list keeps the
    /// defaults.
    pub fn with_languages(mut self, languages: Vec<String>) -> Self {
        if !languages.is_empty() {
            self.languages = languages;
        }
        self
    }

    /// Resolve `input` to a video id and fetch its transcript.
    ///
    /// The first language that yields any transcript wins; transcripts are
    /// never merged across languages. When every attempt fails, the most
    /// recent failure decides the reported error kind.
    pub async fn load(&self, input: &str) -> std::result::Result<TranscriptDocument, TranscriptError> {
        let video_id = extract_video_id(input)?;

        let mut lines: Option<Vec<CaptionLine>> = None;
        let mut last_err: Option<FetchError> = None;

        for language in &self.languages {
            match self.fetcher.fetch(&video_id, language).await {
                Ok(fetched) => {
                    debug!("got transcript for {} in '{}'", video_id, language);
                    lines = Some(fetched);
                    break;
                }
                Err(e) => {
                    debug!("no transcript for {} in '{}': {}", video_id, language, e);
                    last_err = Some(e);
                }
            }
        }

        let Some(lines) = lines else {
            return Err(self.classify_failure(&video_id, last_err));
        };

        let content = lines
            .iter()
            .map(|line| line.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string();

        if content.is_empty() {
            return Err(TranscriptError::EmptyTranscript(video_id.to_string()));
        }

        Ok(TranscriptDocument {
            content,
            source: video_id.watch_url(),
            video_id,
            loader: LOADER_TAG,
        })
    }

    /// Map the last recorded fetch failure to a specific error kind, never a
    /// generic one.
    fn classify_failure(&self, video_id: &VideoId, last_err: Option<FetchError>) -> TranscriptError {
        match last_err {
            Some(FetchError::Disabled) => {
                TranscriptError::TranscriptsDisabled(video_id.to_string())
            }
            Some(FetchError::NotFound) | None => TranscriptError::NoTranscriptFound {
                video_id: video_id.to_string(),
                languages: self.languages.clone(),
            },
            Some(FetchError::Unavailable) => {
                TranscriptError::VideoUnavailable(video_id.to_string())
            }
            Some(FetchError::InvalidId) => TranscriptError::IdRejected(video_id.to_string()),
            Some(other @ FetchError::Other(_)) => TranscriptError::Retrieval {
                video_id: video_id.to_string(),
                cause: other.cause_name(),
            },
        }
    }
}
