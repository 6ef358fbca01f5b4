use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{Candidate, UsageMetadata};

/// A complete response, or one chunk of a streamed response.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Candidate replies; the client only ever asks for one.
    #[serde(default)]
    pub candidates: Vec<Candidate>,

    /// Feedback on the prompt, present when the prompt was blocked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_feedback: Option<Value>,

    /// Token accounting.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_metadata: Option<UsageMetadata>,

    /// The model version that served the request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,

    /// Identifier of the response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_id: Option<String>,
}

impl GenerateContentResponse {
    /// The fragment of answer text carried by this chunk.
    ///
    /// This is the text of the first candidate with thought parts removed; a
    /// chunk with no text yields the empty string.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .map(Candidate::text)
            .unwrap_or_default()
    }
}
