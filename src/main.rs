//! Maxchat CLI entry point.

use anyhow::Result;
use clap::Parser;
use maxchat::cli::{commands, Cli, Commands};
use maxchat::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("maxchat={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    // Execute command
    match &cli.command {
        Commands::Chat {
            input,
            kind,
            provider,
            model,
            api_key,
        } => {
            commands::run_chat(
                input,
                kind.as_deref(),
                provider.as_deref(),
                model.as_deref(),
                api_key.as_deref(),
                settings,
            )
            .await?;
        }

        Commands::Load {
            input,
            kind,
            output,
        } => {
            commands::run_load(input, kind.as_deref(), output.as_deref(), settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings)?;
        }
    }

    Ok(())
}
