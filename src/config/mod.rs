use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use snafu::ResultExt;

use crate::error::forge_error::{ConfigSnafu, IoSnafu};
use crate::error::Result;

/// User-level config stored at ~/.skill-forge.toml, merged with
/// environment overrides by [`load_config`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ForgeConfig {
    pub provider: ProviderConfig,
    pub store: StoreConfig,
    pub templates: TemplateIds,
}

/// Provider configuration within user config.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderConfig {
    #[serde(rename = "type")]
    pub provider_type: ProviderType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider_type: ProviderType::None,
            model: None,
            api_key_env: None,
        }
    }
}

/// Supported provider types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderType {
    #[serde(rename = "openai")]
    OpenAi,
    Anthropic,
    None,
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderType::OpenAi => write!(f, "openai"),
            ProviderType::Anthropic => write!(f, "anthropic"),
            ProviderType::None => write!(f, "none"),
        }
    }
}

/// Document store endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    pub base_url: String,
    pub data_source: String,
    pub database: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            data_source: String::new(),
            database: "assessment".to_string(),
            api_key_env: None,
        }
    }
}

impl StoreConfig {
    /// Resolve the store API key from the configured environment variable.
    pub fn api_key(&self) -> Option<String> {
        let env = self.api_key_env.as_deref().unwrap_or("SKILLFORGE_STORE_KEY");
        std::env::var(env).ok().filter(|k| !k.is_empty())
    }
}

/// Ids of the pre-seeded prompt templates in the `prompt` collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TemplateIds {
    pub details: String,
    pub assessment: String,
    pub scenario_base: String,
    pub follow_up: String,
}

impl ForgeConfig {
    /// Path to the user config file (~/.skill-forge.toml).
    pub fn path() -> Result<PathBuf> {
        let home = std::env::var("HOME")
            .ok()
            .map(PathBuf::from)
            .filter(|p| p.is_absolute())
            .ok_or_else(|| {
                ConfigSnafu {
                    message: "HOME is not set".to_string(),
                }
                .build()
            })?;
        Ok(home.join(".skill-forge.toml"))
    }

    /// Load user config from ~/.skill-forge.toml.
    /// Returns Ok(None) if the file does not exist.
    pub fn load() -> Result<Option<Self>> {
        let path = Self::path()?;
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(Self::load_from(&path)?))
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).context(IoSnafu)?;
        toml::from_str(&contents).map_err(|e| {
            ConfigSnafu {
                message: format!("{}: {e}", path.display()),
            }
            .build()
        })
    }

}

/// Assemble the effective config: user file (if any) plus environment
/// overrides for the store endpoint.
pub fn load_config() -> Result<ForgeConfig> {
    let mut config = ForgeConfig::load()?.unwrap_or_default();

    let non_empty = |var: &str| std::env::var(var).ok().filter(|v| !v.is_empty());

    if let Some(url) = non_empty("SKILLFORGE_STORE_URL") {
        config.store.base_url = url;
    }
    if let Some(source) = non_empty("SKILLFORGE_STORE_SOURCE") {
        config.store.data_source = source;
    }
    if let Some(db) = non_empty("SKILLFORGE_DB") {
        config.store.database = db;
    }

    Ok(config)
}
