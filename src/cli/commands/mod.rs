//! CLI command implementations.

mod chat;
mod config;
mod load;

pub use chat::run_chat;
pub use config::run_config;
pub use load::run_load;
