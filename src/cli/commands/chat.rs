//! Interactive chat command.

use crate::chat::{build_system_prompt, ChatSession};
use crate::cli::Output;
use crate::config::{Prompts, Settings};
use crate::error::{MaxchatError, Result};
use crate::llm::{create_client, resolve_api_key, Provider};
use crate::loader::{detect_kind, load_document, Document, DocumentKind};
use console::style;
use std::io::{self, BufRead, Write};
use tracing::info;

/// Run the interactive chat command.
pub async fn run_chat(
    input: &str,
    kind: Option<&str>,
    provider: Option<&str>,
    model: Option<&str>,
    api_key: Option<&str>,
    settings: Settings,
) -> Result<()> {
    let kind = resolve_kind(input, kind)?;
    let document = load_with_spinner(kind, input, &settings).await?;

    let provider = match provider {
        Some(p) => p.parse::<Provider>()?,
        None => settings.llm.provider,
    };
    let model = model
        .map(|m| m.to_string())
        .or_else(|| settings.llm.model.clone())
        .unwrap_or_else(|| provider.default_model().to_string());
    let api_key = resolve_api_key(provider, api_key, &settings.llm)?;

    info!("chatting about {} via {} ({})", document.metadata.source, provider, model);

    let prompts = Prompts::load(
        settings.prompts.custom_dir.as_deref(),
        Some(&settings.prompts.variables),
    )?;
    let system_prompt = build_system_prompt(&prompts, &kind.to_string(), &document);

    let client = create_client(provider, &api_key);
    let mut chat = ChatSession::new(client, &model, &system_prompt, &settings.chat)?;

    println!("\n{}", style("Max").bold().cyan());
    println!(
        "{}\n",
        style("Ask about the loaded document. Type 'exit' to quit, 'clear' to reset the conversation.")
            .dim()
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", style("You:").green().bold());
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let line = line.trim();

        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            Output::info("Goodbye!");
            break;
        }

        if line.eq_ignore_ascii_case("clear") {
            chat.clear_history();
            Output::info("Conversation history cleared.");
            continue;
        }

        print!("\n{} ", style("Max:").cyan().bold());
        stdout.flush()?;

        match chat
            .send_message(line, |token| {
                print!("{}", token);
                io::stdout().flush().ok();
            })
            .await
        {
            Ok(_) => println!("\n"),
            Err(e) => {
                println!();
                Output::error(&format!("Error: {}", e));
            }
        }
    }

    Ok(())
}

fn resolve_kind(input: &str, kind: Option<&str>) -> Result<DocumentKind> {
    match kind {
        Some(k) => k.parse(),
        None => detect_kind(input),
    }
}

async fn load_with_spinner(
    kind: DocumentKind,
    input: &str,
    settings: &Settings,
) -> Result<Document> {
    let spinner = Output::spinner(&format!("Loading {} document...", kind));
    let result = load_document(kind, input, settings).await;
    spinner.finish_and_clear();

    match result {
        Ok(document) => {
            Output::success(&format!(
                "Loaded {} ({} characters)",
                document.metadata.source,
                document.content.chars().count()
            ));
            Ok(document)
        }
        Err(e) => {
            Output::error(&format!("Failed to load document: {}", e));
            if kind == DocumentKind::Youtube {
                print_youtube_hints(&e);
            }
            Err(e)
        }
    }
}

/// Actionable hints for the common YouTube failure modes.
fn print_youtube_hints(error: &MaxchatError) {
    use crate::youtube::TranscriptError;

    let MaxchatError::Transcript(transcript_error) = error else {
        return;
    };

    match transcript_error {
        TranscriptError::InvalidVideoId(_) => {
            Output::info("Use a video link, e.g. https://www.youtube.com/watch?v=XXXXXXXXXXX or https://youtu.be/XXXXXXXXXXX.");
            Output::info("Playlist and channel links do not work; shorts and live links do, as long as they carry the 11-character id.");
        }
        TranscriptError::TranscriptsDisabled(_) | TranscriptError::NoTranscriptFound { .. } => {
            Output::info("Some videos have no transcript (not even an automatic one) or have transcripts turned off.");
        }
        _ => {}
    }
}
