//! Load command: fetch a document and print or save its text.

use crate::cli::Output;
use crate::config::Settings;
use crate::error::Result;
use crate::loader::{detect_kind, load_document};

/// Run the load command.
pub async fn run_load(
    input: &str,
    kind: Option<&str>,
    output: Option<&str>,
    settings: Settings,
) -> Result<()> {
    let kind = match kind {
        Some(k) => k.parse()?,
        None => detect_kind(input)?,
    };

    let spinner = Output::spinner(&format!("Loading {} document...", kind));
    let document = load_document(kind, input, &settings).await;
    spinner.finish_and_clear();
    let document = document?;

    Output::success("Document loaded");
    Output::kv("source", &document.metadata.source);
    Output::kv("loader", &document.metadata.loader);
    if let Some(video_id) = &document.metadata.video_id {
        Output::kv("video_id", video_id);
    }
    Output::kv(
        "characters",
        &document.content.chars().count().to_string(),
    );

    match output {
        Some(path) => {
            std::fs::write(path, &document.content)?;
            Output::success(&format!("Wrote document text to {}", path));
        }
        None => {
            println!("\n{}", document.content);
        }
    }

    Ok(())
}
