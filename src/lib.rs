//! Maxchat - Document Chat Assistant
//!
//! A CLI assistant (named Max) that ingests a single document and answers
//! questions grounded in its text.
//!
//! # Overview
//!
//! Maxchat allows you to:
//! - Load a document from a web page, a YouTube transcript, a PDF/CSV/TXT
//!   file or a folder of files
//! - Chat about it with a Groq or OpenAI model, with streamed answers
//! - Print extracted document text for use in other tools
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration and prompt management
//! - `youtube` - Video-id extraction and transcript retrieval
//! - `loader` - Document loaders (site, YouTube, files, directories)
//! - `llm` - Provider selection and chat client construction
//! - `chat` - Conversation memory and response streaming
//!
//! # Example
//!
//! ```rust,no_run
//! use maxchat::config::Settings;
//! use maxchat::loader::{load_document, DocumentKind};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let doc = load_document(DocumentKind::Youtube, "dQw4w9WgXcQ", &settings).await?;
//!     println!("{} characters from {}", doc.content.len(), doc.metadata.source);
//!     Ok(())
//! }
//! ```

pub mod chat;
pub mod cli;
pub mod config;
pub mod error;
pub mod llm;
pub mod loader;
pub mod youtube;

pub use error::{MaxchatError, Result};
