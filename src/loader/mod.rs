//! Document loaders.
//!
//! One loader per input kind (web page, YouTube transcript, PDF/CSV/TXT
//! file, directory of files), all producing the same [`Document`] shape.
//! A loader either returns a document with non-empty content or a
//! classified error; an empty extraction is never a silent success.

mod file;
mod site;
mod youtube;

pub use file::{load_dir, load_file, ParserRegistry};
pub use site::load_site;
pub use youtube::load_youtube;

use crate::config::Settings;
use crate::error::{MaxchatError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Kind of document source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Site,
    Youtube,
    Pdf,
    Csv,
    Txt,
    Dir,
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentKind::Site => write!(f, "site"),
            DocumentKind::Youtube => write!(f, "youtube"),
            DocumentKind::Pdf => write!(f, "pdf"),
            DocumentKind::Csv => write!(f, "csv"),
            DocumentKind::Txt => write!(f, "txt"),
            DocumentKind::Dir => write!(f, "dir"),
        }
    }
}

impl std::str::FromStr for DocumentKind {
    type Err = MaxchatError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "site" | "web" | "url" => Ok(DocumentKind::Site),
            "youtube" | "yt" => Ok(DocumentKind::Youtube),
            "pdf" => Ok(DocumentKind::Pdf),
            "csv" => Ok(DocumentKind::Csv),
            "txt" | "text" => Ok(DocumentKind::Txt),
            "dir" | "folder" => Ok(DocumentKind::Dir),
            _ => Err(MaxchatError::InvalidInput(format!(
                "unknown document kind: {} (expected site, youtube, pdf, csv, txt or dir)",
                s
            ))),
        }
    }
}

/// Provenance metadata attached to a loaded document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Canonical source reference (URL or file path).
    pub source: String,
    /// Tag naming the mechanism that produced the content.
    pub loader: String,
    /// Video id, for YouTube documents only.
    pub video_id: Option<String>,
}

/// A loaded document: full text plus provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub content: String,
    pub metadata: DocumentMetadata,
}

impl Document {
    pub fn new(content: String, source: String, loader: &str) -> Self {
        Self {
            content,
            metadata: DocumentMetadata {
                source,
                loader: loader.to_string(),
                video_id: None,
            },
        }
    }
}

/// Guess the document kind from the input shape.
///
/// URLs go to the YouTube loader when a video id can be extracted, to the
/// site loader otherwise. Paths are routed by directory-ness and extension.
pub fn detect_kind(input: &str) -> Result<DocumentKind> {
    let input = input.trim();

    if input.starts_with("http://") || input.starts_with("https://") {
        if crate::youtube::extract_video_id(input).is_ok() {
            return Ok(DocumentKind::Youtube);
        }
        return Ok(DocumentKind::Site);
    }

    let path = Path::new(input);
    if path.is_dir() {
        return Ok(DocumentKind::Dir);
    }
    if path.is_file() {
        return match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .as_deref()
        {
            Some("pdf") => Ok(DocumentKind::Pdf),
            Some("csv") => Ok(DocumentKind::Csv),
            Some("txt") | Some("text") | Some("md") | Some("markdown") => Ok(DocumentKind::Txt),
            _ => Err(MaxchatError::InvalidInput(format!(
                "unsupported file type: {} (expected .pdf, .csv or .txt)",
                input
            ))),
        };
    }

    // Not a URL and not an existing path; a bare video id is the last
    // sensible interpretation.
    if crate::youtube::extract_video_id(input).is_ok() {
        return Ok(DocumentKind::Youtube);
    }

    Err(MaxchatError::InvalidInput(format!(
        "could not determine document kind for '{}': pass --kind explicitly",
        input
    )))
}

/// Load a document of the given kind from `input`.
pub async fn load_document(kind: DocumentKind, input: &str, settings: &Settings) -> Result<Document> {
    let document = match kind {
        DocumentKind::Site => load_site(input, &settings.site).await?,
        DocumentKind::Youtube => load_youtube(input, &settings.youtube).await?,
        DocumentKind::Pdf | DocumentKind::Csv | DocumentKind::Txt => {
            load_file(Path::new(input), Some(kind))?
        }
        DocumentKind::Dir => load_dir(Path::new(input))?,
    };

    if document.content.trim().is_empty() {
        return Err(MaxchatError::EmptyDocument(input.to_string()));
    }

    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn kind_round_trips_through_strings() {
        for kind in [
            DocumentKind::Site,
            DocumentKind::Youtube,
            DocumentKind::Pdf,
            DocumentKind::Csv,
            DocumentKind::Txt,
            DocumentKind::Dir,
        ] {
            assert_eq!(kind.to_string().parse::<DocumentKind>().unwrap(), kind);
        }
        assert!("spreadsheet".parse::<DocumentKind>().is_err());
    }

    #[test]
    fn detects_youtube_urls_before_sites() {
        assert_eq!(
            detect_kind("https://www.youtube.com/watch?v=dQw4w9WgXcQ").unwrap(),
            DocumentKind::Youtube
        );
        assert_eq!(
            detect_kind("https://youtu.be/dQw4w9WgXcQ").unwrap(),
            DocumentKind::Youtube
        );
        // Playlist links carry no video id and fall through to the site loader
        assert_eq!(
            detect_kind("https://www.youtube.com/playlist?list=PLxyz").unwrap(),
            DocumentKind::Site
        );
        assert_eq!(
            detect_kind("https://example.com/article").unwrap(),
            DocumentKind::Site
        );
    }

    #[test]
    fn detects_bare_video_id() {
        assert_eq!(detect_kind("dQw4w9WgXcQ").unwrap(), DocumentKind::Youtube);
    }

    #[test]
    fn detects_files_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        for (name, kind) in [
            ("a.pdf", DocumentKind::Pdf),
            ("b.csv", DocumentKind::Csv),
            ("c.txt", DocumentKind::Txt),
        ] {
            let path = dir.path().join(name);
            let mut f = std::fs::File::create(&path).unwrap();
            f.write_all(b"x").unwrap();
            assert_eq!(detect_kind(path.to_str().unwrap()).unwrap(), kind);
        }
        assert_eq!(
            detect_kind(dir.path().to_str().unwrap()).unwrap(),
            DocumentKind::Dir
        );
    }

    #[test]
    fn unknown_input_is_rejected() {
        assert!(detect_kind("definitely not a thing").is_err());
    }
}
