// Public modules
pub mod api_error;
pub mod candidate;
pub mod content;
pub mod finish_reason;
pub mod generate_content_request;
pub mod generate_content_response;
pub mod generation_config;
pub mod model;
pub mod part;
pub mod thinking_config;
pub mod tool;
pub mod usage_metadata;

// Re-exports
pub use api_error::{ApiErrorObject, ApiErrorResponse};
pub use candidate::Candidate;
pub use content::{Content, ContentRole};
pub use finish_reason::FinishReason;
pub use generate_content_request::GenerateContentRequest;
pub use generate_content_response::GenerateContentResponse;
pub use generation_config::{GenerationConfig, TEXT_PLAIN};
pub use model::{KnownModel, Model};
pub use part::Part;
pub use thinking_config::{DYNAMIC_THINKING_BUDGET, ThinkingConfig};
pub use tool::{GoogleSearch, Tool};
pub use usage_metadata::UsageMetadata;
