use serde::{Deserialize, Serialize};

use crate::Error;

/// The error envelope returned in HTTP bodies and in-stream error events.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiErrorResponse {
    /// The error details.
    pub error: ApiErrorObject,
}

/// Details of an API error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ApiErrorObject {
    /// HTTP-style status code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,

    /// Human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Canonical status name such as `RESOURCE_EXHAUSTED`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl ApiErrorResponse {
    /// Convert to an upstream [`Error`], falling back to `status_code` and
    /// `fallback_message` where the payload is silent.
    pub fn into_error(self, status_code: u16, fallback_message: &str) -> Error {
        let ApiErrorObject {
            code,
            message,
            status,
        } = self.error;
        Error::api(
            code.unwrap_or(status_code),
            status,
            message.unwrap_or_else(|| fallback_message.to_string()),
        )
    }
}
