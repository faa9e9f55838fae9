use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

pub const GOOGLE_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Configuration for the prompt bridge and its collaborators
#[derive(Debug, Deserialize, Clone)]
pub struct BridgeConfig {
    /// Gemini model identifier (e.g., "gemini-2.0-flash")
    #[serde(default = "default_model")]
    pub model: String,
    /// Base URL of the generative endpoint, or of a proxy that holds the key
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// API key for authentication (can also be set via GOOGLE_API_KEY)
    pub api_key: Option<String>,
    /// Request timeout in seconds; no timeout when unset
    pub timeout_secs: Option<u64>,
    /// Sampling temperature forwarded in generationConfig
    pub temperature: Option<f32>,
    /// Output token cap forwarded in generationConfig
    pub max_output_tokens: Option<u32>,
    /// Images handed out to generated recipes in rotation
    #[serde(default = "default_placeholder_images")]
    pub placeholder_images: Vec<String>,
    /// Application id used to scope saved recipes
    #[serde(default = "default_app_id")]
    pub app_id: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: None,
            temperature: None,
            max_output_tokens: None,
            placeholder_images: default_placeholder_images(),
            app_id: default_app_id(),
        }
    }
}

// Default value functions
fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_base_url() -> String {
    GOOGLE_BASE_URL.to_string()
}

fn default_app_id() -> String {
    "default-app-id".to_string()
}

pub(crate) fn default_placeholder_images() -> Vec<String> {
    [
        "https://images.unsplash.com/photo-1540189549336-e6e99c3679fe?q=80&w=1887&auto=format&fit=crop",
        "https://images.unsplash.com/photo-1565299624946-b28f40a0ae38?q=80&w=1981&auto=format&fit=crop",
        "https://images.unsplash.com/photo-1567620905732-2d1ec7ab7445?q=80&w=1980&auto=format&fit=crop",
        "https://images.unsplash.com/photo-1484723051597-63b8a9c88697?q=80&w=1887&auto=format&fit=crop",
        "https://images.unsplash.com/photo-1482049016688-2d3e1b311543?q=80&w=1910&auto=format&fit=crop",
        "https://images.unsplash.com/photo-1529042410759-befb1204b468?q=80&w=1887&auto=format&fit=crop",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl BridgeConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_IDEAS__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE_IDEAS__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    /// The configured key, falling back to the GOOGLE_API_KEY environment variable
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| std::env::var("GOOGLE_API_KEY").ok())
            .filter(|key| !key.trim().is_empty())
    }
}

/// Load configuration from file and environment variables
///
/// See [`BridgeConfig::load`] for the priority order.
pub fn load_config() -> Result<BridgeConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("config").required(false))
        // Use double underscore for nested: RECIPE_IDEAS__API_KEY
        .add_source(
            Environment::with_prefix("RECIPE_IDEAS")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
