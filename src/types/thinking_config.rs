use serde::{Deserialize, Serialize};

/// Budget value that lets the model pick its own reasoning depth.
pub const DYNAMIC_THINKING_BUDGET: i32 = -1;

/// Configuration for the model's internal reasoning.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ThinkingConfig {
    /// Token budget for reasoning; `-1` is dynamic and `0` turns reasoning off
    /// on models that allow it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking_budget: Option<i32>,

    /// Whether reasoning summaries are streamed back as thought parts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_thoughts: Option<bool>,
}

impl ThinkingConfig {
    /// Let the model decide how much to reason.
    pub fn dynamic() -> Self {
        Self::budget(DYNAMIC_THINKING_BUDGET)
    }

    /// Cap reasoning at the given number of tokens.
    pub fn budget(thinking_budget: i32) -> Self {
        Self {
            thinking_budget: Some(thinking_budget),
            include_thoughts: None,
        }
    }

    /// Returns true if the model chooses its own budget.
    pub fn is_dynamic(&self) -> bool {
        self.thinking_budget == Some(DYNAMIC_THINKING_BUDGET)
    }
}
