//! Configuration types for the chat shells.
//!
//! This module provides CLI argument parsing via `arrrg` and configuration
//! structures for controlling chat behavior.

use std::sync::Arc;
use std::time::Duration;

use arrrg_derive::CommandLine;

use crate::client::DEFAULT_TIMEOUT;
use crate::client_logger::StderrLogger;
use crate::generator::{HttpTransport, ResponseGenerator};
use crate::types::Model;

/// Command-line arguments shared by the gemchat binaries.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Model to use for chat.
    #[arrrg(optional, "Model to use (default: gemini-2.5-pro)", "MODEL")]
    pub model: Option<String>,

    /// Override the API endpoint.
    #[arrrg(optional, "API base URL", "URL")]
    pub base_url: Option<String>,

    /// Transport timeout per request, in seconds.
    #[arrrg(optional, "Request timeout in seconds (default: 60)", "SECS")]
    pub timeout_secs: Option<u64>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,

    /// Log requests and streamed chunks to stderr.
    #[arrrg(flag, "Log requests and stream events to stderr as JSON lines")]
    pub verbose: bool,
}

/// Configuration for a chat session.
///
/// This struct holds the resolved configuration values after processing
/// command-line arguments with appropriate defaults.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// The model to use for generating responses.
    pub model: Model,

    /// API base URL; `None` uses the public endpoint.
    pub base_url: Option<String>,

    /// Transport timeout for one generation.
    pub timeout: Duration,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,

    /// Whether to log API traffic to stderr.
    pub verbose: bool,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Model: gemini-2.5-pro
    /// - Timeout: 60 seconds
    /// - Color: enabled
    /// - Verbose: disabled
    pub fn new() -> Self {
        Self {
            model: Model::default(),
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
            use_color: true,
            verbose: false,
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    /// Sets the API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the transport timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }

    /// Enables or disables traffic logging.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// The HTTP transport described by this configuration.
    pub fn transport(&self) -> HttpTransport {
        HttpTransport::new()
            .with_base_url(self.base_url.clone())
            .with_timeout(Some(self.timeout))
    }

    /// A generator described by this configuration.
    pub fn generator(&self) -> ResponseGenerator<HttpTransport> {
        if self.verbose {
            let logger = Arc::new(StderrLogger::new());
            ResponseGenerator::with_transport(
                self.transport().with_logger(logger.clone()),
                self.model.clone(),
            )
            .with_logger(logger)
        } else {
            ResponseGenerator::with_transport(self.transport(), self.model.clone())
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ChatArgs> for ChatConfig {
    fn from(args: ChatArgs) -> Self {
        let model = args
            .model
            .and_then(|s| s.parse::<Model>().ok())
            .unwrap_or_default();

        ChatConfig {
            model,
            base_url: args.base_url,
            timeout: args
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_TIMEOUT),
            use_color: !args.no_color,
            verbose: args.verbose,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::KnownModel;

    #[test]
    fn default_config() {
        let config = ChatConfig::new();
        assert_eq!(config.model, Model::Known(KnownModel::Gemini25Pro));
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert!(config.base_url.is_none());
        assert!(config.use_color);
        assert!(!config.verbose);
    }

    #[test]
    fn config_from_args_defaults() {
        let config = ChatConfig::from(ChatArgs::default());
        assert_eq!(config.model, Model::Known(KnownModel::Gemini25Pro));
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(config.use_color);
    }

    #[test]
    fn config_from_args_custom() {
        let args = ChatArgs {
            model: Some("gemini-2.5-flash".to_string()),
            base_url: Some("http://localhost:9000/v1beta/".to_string()),
            timeout_secs: Some(5),
            no_color: true,
            verbose: true,
        };
        let config = ChatConfig::from(args);
        assert_eq!(config.model, Model::Known(KnownModel::Gemini25Flash));
        assert_eq!(
            config.base_url.as_deref(),
            Some("http://localhost:9000/v1beta/")
        );
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert!(!config.use_color);
        assert!(config.verbose);
    }

    #[test]
    fn unknown_model_is_custom() {
        let args = ChatArgs {
            model: Some("gemini-exp-1206".to_string()),
            ..ChatArgs::default()
        };
        let config = ChatConfig::from(args);
        assert_eq!(config.model, Model::Custom("gemini-exp-1206".to_string()));
    }

    #[test]
    fn config_builder_pattern() {
        let config = ChatConfig::new()
            .with_model(Model::Known(KnownModel::Gemini20Flash))
            .with_base_url("http://127.0.0.1:1/")
            .with_timeout(Duration::from_secs(3))
            .without_color()
            .with_verbose(true);
        assert_eq!(config.model, Model::Known(KnownModel::Gemini20Flash));
        assert_eq!(config.base_url.as_deref(), Some("http://127.0.0.1:1/"));
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert!(!config.use_color);
        assert!(config.verbose);
        assert_eq!(config.generator().model(), &config.model);
    }
}
