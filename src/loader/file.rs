//! File parsers for uploaded documents (PDF, CSV, plain text).

use super::{Document, DocumentKind};
use crate::error::{MaxchatError, Result};
use std::path::Path;
use tracing::debug;

/// A parser for one family of file formats.
trait FileParser: Send + Sync {
    /// Parse a file and return its text content.
    fn parse(&self, path: &Path) -> Result<String>;

    /// Supported file extensions.
    fn extensions(&self) -> &[&str];

    /// Tag recorded in document metadata.
    fn tag(&self) -> &'static str;
}

/// Registry of available file parsers.
pub struct ParserRegistry {
    parsers: Vec<Box<dyn FileParser>>,
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserRegistry {
    pub fn new() -> Self {
        Self {
            parsers: vec![
                Box::new(PdfParser),
                Box::new(CsvParser),
                Box::new(TextParser),
            ],
        }
    }

    fn find(&self, extension: &str) -> Option<&dyn FileParser> {
        self.parsers
            .iter()
            .find(|p| {
                p.extensions()
                    .iter()
                    .any(|e| e.eq_ignore_ascii_case(extension))
            })
            .map(|p| p.as_ref())
    }

    /// Whether any parser handles the given extension.
    pub fn supports(&self, extension: &str) -> bool {
        self.find(extension).is_some()
    }
}

/// Load a single file as a document.
///
/// With an explicit `kind` the matching parser is used regardless of the
/// file's extension (the caller said what the bytes are); otherwise the
/// extension decides.
pub fn load_file(path: &Path, kind: Option<DocumentKind>) -> Result<Document> {
    let registry = ParserRegistry::new();

    let extension = match kind {
        Some(DocumentKind::Pdf) => "pdf".to_string(),
        Some(DocumentKind::Csv) => "csv".to_string(),
        Some(DocumentKind::Txt) => "txt".to_string(),
        _ => path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .ok_or_else(|| {
                MaxchatError::InvalidInput(format!("{}: no file extension", path.display()))
            })?,
    };

    let parser = registry.find(&extension).ok_or_else(|| {
        MaxchatError::InvalidInput(format!("no parser for .{} files", extension))
    })?;

    debug!("parsing {} with {}", path.display(), parser.tag());
    let content = parser.parse(path)?;
    if content.trim().is_empty() {
        return Err(MaxchatError::EmptyDocument(path.display().to_string()));
    }

    Ok(Document::new(
        content,
        path.display().to_string(),
        parser.tag(),
    ))
}

/// Load every parseable file in a directory (one level deep) as a single
/// document, sections separated by filename headers.
pub fn load_dir(path: &Path) -> Result<Document> {
    let registry = ParserRegistry::new();

    let mut entries: Vec<_> = std::fs::read_dir(path)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .and_then(|e| e.to_str())
                    .map(|e| registry.supports(e))
                    .unwrap_or(false)
        })
        .collect();
    entries.sort();

    let mut sections = Vec::new();
    for file in &entries {
        match load_file(file, None) {
            Ok(doc) => {
                let name = file
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                sections.push(format!("=== {} ===\n{}", name, doc.content));
            }
            Err(e) => {
                // One unreadable file should not sink the whole folder.
                tracing::warn!("skipping {}: {}", file.display(), e);
            }
        }
    }

    if sections.is_empty() {
        return Err(MaxchatError::InvalidInput(format!(
            "no readable documents in {}",
            path.display()
        )));
    }

    Ok(Document::new(
        sections.join("\n\n"),
        path.display().to_string(),
        "dir",
    ))
}

/// PDF parser using pdf-extract.
struct PdfParser;

impl FileParser for PdfParser {
    fn parse(&self, path: &Path) -> Result<String> {
        let bytes = std::fs::read(path)?;
        let text = pdf_extract::extract_text_from_mem(&bytes).map_err(|e| {
            MaxchatError::FileParse {
                path: path.display().to_string(),
                reason: e.to_string(),
            }
        })?;
        Ok(text.trim().to_string())
    }

    fn extensions(&self) -> &[&str] {
        &["pdf"]
    }

    fn tag(&self) -> &'static str {
        "pdf-extract"
    }
}

/// CSV parser: each row rendered as `header: value` lines.
struct CsvParser;

impl FileParser for CsvParser {
    fn parse(&self, path: &Path) -> Result<String> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(|e| MaxchatError::FileParse {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        let headers = reader
            .headers()
            .map_err(|e| MaxchatError::FileParse {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?
            .clone();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| MaxchatError::FileParse {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
            let row: Vec<String> = record
                .iter()
                .enumerate()
                .map(|(i, field)| {
                    let header = headers.get(i).unwrap_or("");
                    format!("{}: {}", header, field)
                })
                .collect();
            rows.push(row.join("\n"));
        }

        Ok(rows.join("\n\n"))
    }

    fn extensions(&self) -> &[&str] {
        &["csv"]
    }

    fn tag(&self) -> &'static str {
        "csv"
    }
}

/// Plain text parser.
struct TextParser;

impl FileParser for TextParser {
    fn parse(&self, path: &Path) -> Result<String> {
        Ok(std::fs::read_to_string(path)?.trim().to_string())
    }

    fn extensions(&self) -> &[&str] {
        &["txt", "text", "md", "markdown"]
    }

    fn tag(&self) -> &'static str {
        "text"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn registry_covers_expected_extensions() {
        let registry = ParserRegistry::new();
        assert!(registry.supports("pdf"));
        assert!(registry.supports("CSV"));
        assert!(registry.supports("txt"));
        assert!(registry.supports("md"));
        assert!(!registry.supports("xyz"));
    }

    #[test]
    fn loads_plain_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "  hello from a file\n").unwrap();

        let doc = load_file(&path, None).unwrap();
        assert_eq!(doc.content, "hello from a file");
        assert_eq!(doc.metadata.loader, "text");
        assert_eq!(doc.metadata.source, path.display().to_string());
    }

    #[test]
    fn explicit_kind_overrides_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.bin");
        std::fs::write(&path, "plain text, odd extension").unwrap();

        let doc = load_file(&path, Some(DocumentKind::Txt)).unwrap();
        assert_eq!(doc.content, "plain text, odd extension");
    }

    #[test]
    fn empty_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        std::fs::write(&path, "   \n\n").unwrap();

        assert!(matches!(
            load_file(&path, None),
            Err(MaxchatError::EmptyDocument(_))
        ));
    }

    #[test]
    fn csv_rows_become_header_value_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("people.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "name,age").unwrap();
        writeln!(f, "Ada,36").unwrap();
        writeln!(f, "Alan,41").unwrap();

        let doc = load_file(&path, None).unwrap();
        assert_eq!(doc.content, "name: Ada\nage: 36\n\nname: Alan\nage: 41");
        assert_eq!(doc.metadata.loader, "csv");
    }

    #[test]
    fn dir_concatenates_with_section_headers() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "first").unwrap();
        std::fs::write(dir.path().join("b.md"), "second").unwrap();
        std::fs::write(dir.path().join("ignored.xyz"), "nope").unwrap();

        let doc = load_dir(dir.path()).unwrap();
        assert!(doc.content.contains("=== a.txt ===\nfirst"));
        assert!(doc.content.contains("=== b.md ===\nsecond"));
        assert!(!doc.content.contains("nope"));
        assert_eq!(doc.metadata.loader, "dir");
    }

    #[test]
    fn empty_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_dir(dir.path()).is_err());
    }
}
