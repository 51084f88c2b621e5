//! YouTube transcript loader: bridges the transcript core into the common
//! document shape.

use super::{Document, DocumentMetadata};
use crate::config::YoutubeSettings;
use crate::error::Result;
use crate::youtube::{HttpCaptionFetcher, TranscriptLoader};

/// Load a video transcript as a document.
///
/// `input` may be a watch/short/shorts/live URL or a bare 11-character
/// video id. Languages are tried in the configured preference order.
pub async fn load_youtube(input: &str, settings: &YoutubeSettings) -> Result<Document> {
    let loader = TranscriptLoader::new(Box::new(HttpCaptionFetcher::new()))
        .with_languages(settings.languages.clone());

    let transcript = loader.load(input).await?;

    Ok(Document {
        content: transcript.content,
        metadata: DocumentMetadata {
            source: transcript.source,
            loader: transcript.loader.to_string(),
            video_id: Some(transcript.video_id.to_string()),
        },
    })
}
