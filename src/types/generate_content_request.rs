use serde::{Deserialize, Serialize};

use crate::types::{Content, GenerationConfig, Tool};

/// Body of a `generateContent` / `streamGenerateContent` call.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// The conversation so far, oldest turn first.
    pub contents: Vec<Content>,

    /// Capabilities the model may invoke.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Tool>,

    /// Generation options.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    /// Create a request from the given conversation with no tools or options.
    pub fn new(contents: Vec<Content>) -> Self {
        Self {
            contents,
            tools: Vec::new(),
            generation_config: None,
        }
    }

    /// Create a single-turn request holding the prompt verbatim.
    pub fn single_turn(prompt: impl Into<String>) -> Self {
        Self::new(vec![Content::user(prompt)])
    }

    /// Add a tool.
    pub fn with_tool(mut self, tool: Tool) -> Self {
        self.tools.push(tool);
        self
    }

    /// Set the generation options.
    pub fn with_generation_config(mut self, config: GenerationConfig) -> Self {
        self.generation_config = Some(config);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, to_value};

    #[test]
    fn search_grounded_request_serialization() {
        let request = GenerateContentRequest::single_turn("What is 2+2?")
            .with_tool(Tool::google_search())
            .with_generation_config(GenerationConfig::plain_text_dynamic());
        assert_eq!(
            to_value(&request).unwrap(),
            json!({
                "contents": [{"role": "user", "parts": [{"text": "What is 2+2?"}]}],
                "tools": [{"googleSearch": {}}],
                "generationConfig": {
                    "thinkingConfig": {"thinkingBudget": -1},
                    "responseMimeType": "text/plain"
                }
            })
        );
    }

    #[test]
    fn bare_request_omits_optional_fields() {
        let request = GenerateContentRequest::single_turn("hi");
        assert_eq!(
            to_value(&request).unwrap(),
            json!({"contents": [{"role": "user", "parts": [{"text": "hi"}]}]})
        );
    }
}
