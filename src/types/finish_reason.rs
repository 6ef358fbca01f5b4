use serde::{Deserialize, Serialize};

/// Why the model stopped producing a candidate.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinishReason {
    /// Natural stop point.
    Stop,
    /// The output token limit was reached.
    MaxTokens,
    /// Stopped by safety filters.
    Safety,
    /// Stopped for reciting training data.
    Recitation,
    /// Unsupported language.
    Language,
    /// Output contained a blocked term.
    Blocklist,
    /// Output contained prohibited content.
    ProhibitedContent,
    /// Output contained sensitive personal information.
    Spii,
    /// The model emitted an invalid function call.
    MalformedFunctionCall,
    /// Any reason this client does not know about.
    #[serde(other)]
    Other,
}
