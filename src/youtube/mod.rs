//! YouTube transcript ingestion.
//!
//! Two pieces: video-id extraction from the many URL shapes YouTube uses
//! (`extract_video_id`), and transcript retrieval with language fallback
//! (`TranscriptLoader`). The retrieval transport is behind the
//! [`TranscriptFetcher`] trait so it can be swapped out in tests.

mod fetcher;
mod id;
mod transcript;

pub use fetcher::HttpCaptionFetcher;
pub use id::{extract_video_id, VideoId};
pub use transcript::{
    CaptionLine, FetchError, TranscriptDocument, TranscriptError, TranscriptFetcher,
    TranscriptLoader, DEFAULT_LANGUAGES, LOADER_TAG,
};
