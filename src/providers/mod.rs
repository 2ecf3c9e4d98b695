mod anthropic;
mod factory;
mod open_ai;
mod prompt;

pub use anthropic::AnthropicProvider;
pub use factory::ProviderFactory;
pub use open_ai::OpenAIProvider;
pub use prompt::{build_extraction_prompt, RECIPE_EXTRACTION_PROMPT};

use async_trait::async_trait;
use std::error::Error;

/// Unified trait for all AI providers
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider name (e.g., "openai", "anthropic")
    fn provider_name(&self) -> &str;

    /// Send a prompt and return the model's raw text answer
    async fn complete(&self, prompt: &str) -> Result<String, Box<dyn Error + Send + Sync>>;
}
