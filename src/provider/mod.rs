pub mod anthropic;
pub mod openai;

pub use anthropic::AnthropicProvider;
pub use openai::OpenAiProvider;

use serde::{Deserialize, Serialize};

use crate::config::{ForgeConfig, ProviderType};
use crate::error::generation_error::NoCredentialsSnafu;
use crate::error::GenerationError;

/// Normalized schema-constrained generation trait. Implementations take an
/// instruction pair plus a declared output schema and return a JSON value
/// the remote capability claims conforms to that schema; the gateway
/// revalidates by deserializing into the target type.
pub trait StructuredProvider: Send + Sync {
    fn generate(&self, request: &GenerationRequest) -> Result<serde_json::Value, GenerationError>;
    fn name(&self) -> &str;
    fn model(&self) -> &str;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub system: String,
    pub user: String,
    /// Identifier for the declared schema, surfaced to the API.
    pub schema_name: String,
    /// JSON Schema the output must conform to.
    pub schema: serde_json::Value,
    pub max_tokens: u32,
}

/// Discover the best available provider.
///
/// Priority:
/// 1. User-level config (~/.skill-forge.toml)
/// 2. Environment variable detection (OPENAI_API_KEY, then ANTHROPIC_API_KEY)
/// 3. Error: no provider configured
pub fn discover_provider(
    config: &ForgeConfig,
) -> Result<Box<dyn StructuredProvider>, GenerationError> {
    let key_from = |env: &str| std::env::var(env).ok().filter(|k| !k.is_empty());

    match config.provider.provider_type {
        ProviderType::OpenAi => {
            let key_env = config
                .provider
                .api_key_env
                .clone()
                .unwrap_or_else(|| "OPENAI_API_KEY".to_string());
            if let Some(api_key) = key_from(&key_env) {
                return Ok(Box::new(OpenAiProvider::new(
                    api_key,
                    config.provider.model.clone(),
                )));
            }
            // Config says openai but the key is not set; fall through.
        }
        ProviderType::Anthropic => {
            let key_env = config
                .provider
                .api_key_env
                .clone()
                .unwrap_or_else(|| "ANTHROPIC_API_KEY".to_string());
            if let Some(api_key) = key_from(&key_env) {
                return Ok(Box::new(AnthropicProvider::new(
                    api_key,
                    config.provider.model.clone(),
                )));
            }
        }
        ProviderType::None => {}
    }

    if let Some(api_key) = key_from("OPENAI_API_KEY") {
        return Ok(Box::new(OpenAiProvider::new(api_key, None)));
    }
    if let Some(api_key) = key_from("ANTHROPIC_API_KEY") {
        return Ok(Box::new(AnthropicProvider::new(api_key, None)));
    }

    NoCredentialsSnafu.fail()
}
