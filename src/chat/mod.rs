//! The chat session and the messenger shell's supporting pieces.
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`session`]: the transcript-owning session that drives the generator
//! - [`commands`]: slash command parsing

mod commands;
mod config;
mod session;

pub use crate::render::{PlainTextRenderer, Renderer};
pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{ChatArgs, ChatConfig};
pub use session::{ChatSession, Submission};
