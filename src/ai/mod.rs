//! AI integration: backends, gateway, and prompt templates.

pub mod gateway;
pub mod local;
pub mod openai;
pub mod prompts;
pub mod provider;

pub use gateway::{GatewayHealth, ModelGateway, RateLimiter, RetryPolicy};
pub use local::LocalBackend;
pub use openai::OpenAIBackend;
pub use prompts::{PromptManager, PromptTemplate};
pub use provider::{strip_code_fences, ChatBackend, ChatMessage, ChatRole, GenerateOptions};
