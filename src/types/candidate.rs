use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{Content, FinishReason};

/// One candidate reply, or a slice of one when streaming.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Generated content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,

    /// Set on the final chunk of the candidate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<FinishReason>,

    /// Position of this candidate in the response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,

    /// Search queries and sources used to ground the reply; kept opaque.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grounding_metadata: Option<Value>,
}

impl Candidate {
    /// The answer text carried by this candidate.
    pub fn text(&self) -> String {
        self.content
            .as_ref()
            .map(Content::text)
            .unwrap_or_default()
    }
}
