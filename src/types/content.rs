use serde::{Deserialize, Serialize};

use crate::types::Part;

/// The producer of a piece of content.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentRole {
    /// Content written by the end user.
    User,

    /// Content produced by the model.
    Model,
}

/// One turn of a conversation: a role and the parts that make it up.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Content {
    /// The producer of the content.  Absent on some streamed chunks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<ContentRole>,

    /// The ordered parts of this turn.
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// Create a user turn holding a single text part, verbatim.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Some(ContentRole::User),
            parts: vec![Part::text(text)],
        }
    }

    /// Concatenate the answer text of every part, skipping thought summaries.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter(|part| !part.is_thought())
            .filter_map(|part| part.text.as_deref())
            .collect()
    }
}
