use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;

/// Top-level scraper configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ScraperConfig {
    /// Page fetch timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// User agent sent with page fetches
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// AI fallback configuration
    #[serde(default)]
    pub ai: AiConfig,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            user_agent: default_user_agent(),
            ai: AiConfig::default(),
        }
    }
}

/// Configuration for the AI fallback
#[derive(Debug, Deserialize, Clone)]
pub struct AiConfig {
    /// Whether the AI fallback may be used at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Provider used for the fallback
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Request timeout in seconds
    #[serde(default = "default_ai_timeout")]
    pub timeout: u64,
    /// Map of provider name to provider configuration
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            default_provider: default_provider(),
            timeout: default_ai_timeout(),
            providers: HashMap::new(),
        }
    }
}

impl AiConfig {
    /// Configuration for the default provider, synthesised when not configured
    pub fn default_provider_config(&self) -> ProviderConfig {
        self.providers
            .get(&self.default_provider)
            .cloned()
            .unwrap_or_else(|| ProviderConfig::for_provider(&self.default_provider))
    }
}

/// Configuration for a specific AI provider
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Whether this provider is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Model identifier (e.g., "gpt-5-nano", "claude-sonnet-4-5")
    pub model: String,
    /// Temperature for generation, omitted from requests when unset
    #[serde(default)]
    pub temperature: Option<f32>,
    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// API key for authentication (can also be set via environment variable)
    pub api_key: Option<String>,
    /// Base URL for API endpoint (for custom or proxy endpoints)
    pub base_url: Option<String>,
}

impl ProviderConfig {
    /// Defaults for a provider that has no explicit configuration
    pub fn for_provider(name: &str) -> Self {
        let model = match name {
            "anthropic" => "claude-sonnet-4-5",
            _ => "gpt-5-nano",
        };

        Self {
            enabled: true,
            model: model.to_string(),
            temperature: None,
            max_tokens: default_max_tokens(),
            api_key: None,
            base_url: None,
        }
    }
}

// Default value functions
fn default_timeout() -> u64 {
    30
}

pub(crate) fn default_ai_timeout() -> u64 {
    120
}

pub(crate) fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string()
}

fn default_enabled() -> bool {
    true
}

fn default_provider() -> String {
    "openai".to_string()
}

fn default_max_tokens() -> u32 {
    4000
}

impl ScraperConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// Load configuration from file and environment variables
///
/// Configuration is loaded with the following priority (highest to lowest):
/// 1. Environment variables with RECIPE_SCRAPER prefix
/// 2. recipe-scraper.toml file in current directory
/// 3. Default values
///
/// Environment variable format: RECIPE_SCRAPER__AI__PROVIDERS__OPENAI__API_KEY
pub fn load_config() -> Result<ScraperConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("recipe-scraper").required(false))
        .add_source(
            Environment::with_prefix("RECIPE_SCRAPER")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
