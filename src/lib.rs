// Public modules
pub mod chat;
pub mod client;
pub mod client_logger;
pub mod credential;
pub mod error;
pub mod generator;
pub mod render;
pub mod repl;
pub mod sse;
pub mod transcript;
pub mod types;

mod observability;

// Re-exports
pub use client::Gemini;
pub use client_logger::{ClientLogger, StderrLogger};
pub use credential::Credential;
pub use error::{Error, Result};
pub use generator::{FragmentStream, HttpTransport, ResponseGenerator, Transport};
pub use observability::register_biometrics;
pub use render::{PlainTextRenderer, Renderer};
pub use transcript::{Message, Role, Transcript, TranscriptStats};
pub use types::*;
