use serde::{Deserialize, Serialize};

use crate::types::ThinkingConfig;

/// MIME type for unstructured text output.
pub const TEXT_PLAIN: &str = "text/plain";

/// Options controlling how the model generates its reply.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Reasoning configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking_config: Option<ThinkingConfig>,

    /// Requested output MIME type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
}

impl GenerationConfig {
    /// Dynamic reasoning and plain-text output.
    pub fn plain_text_dynamic() -> Self {
        Self {
            thinking_config: Some(ThinkingConfig::dynamic()),
            response_mime_type: Some(TEXT_PLAIN.to_string()),
        }
    }
}
