use std::sync::Arc;
use std::time::Duration;

use crate::bridge::PromptBridge;
use crate::config::BridgeConfig;
use crate::error::{BridgeError, Result};
use crate::providers::{GoogleProvider, LlmProvider};

/// Builder for configuring a [`PromptBridge`]
///
/// Unset values fall back to [`BridgeConfig::default`].
#[derive(Default)]
pub struct PromptBridgeBuilder {
    config: Option<BridgeConfig>,
    provider: Option<Arc<dyn LlmProvider>>,
    timeout: Option<Duration>,
    api_key: Option<String>,
    model: Option<String>,
    base_url: Option<String>,
    temperature: Option<f32>,
    max_output_tokens: Option<u32>,
}

impl PromptBridgeBuilder {
    /// Start from a loaded configuration instead of the defaults
    ///
    /// # Example
    /// ```no_run
    /// use recipe_ideas::{BridgeConfig, PromptBridge};
    ///
    /// let config = BridgeConfig::load()?;
    /// let bridge = PromptBridge::builder().config(config).build()?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn config(mut self, config: BridgeConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Use a custom transport instead of Gemini
    ///
    /// Every other setting is ignored when a provider is given.
    pub fn provider(mut self, provider: impl LlmProvider + 'static) -> Self {
        self.provider = Some(Arc::new(provider));
        self
    }

    /// Set the API key
    ///
    /// This allows passing the API key directly instead of relying on
    /// environment variables or config files.
    ///
    /// # Example
    /// ```
    /// use recipe_ideas::PromptBridge;
    ///
    /// let bridge = PromptBridge::builder()
    ///     .api_key("your-api-key")
    ///     .build();
    /// assert!(bridge.is_ok());
    /// ```
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the model name
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Point at a different endpoint, e.g. a proxy that holds the key
    ///
    /// # Example
    /// ```
    /// use recipe_ideas::PromptBridge;
    ///
    /// let bridge = PromptBridge::builder()
    ///     .base_url("https://recipes.example.com/ai")
    ///     .build();
    /// assert!(bridge.is_ok());
    /// ```
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set a timeout for HTTP requests
    ///
    /// # Example
    /// ```
    /// use recipe_ideas::PromptBridge;
    /// use std::time::Duration;
    ///
    /// let builder = PromptBridge::builder()
    ///     .api_key("your-api-key")
    ///     .timeout(Duration::from_secs(30));
    /// ```
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn max_output_tokens(mut self, tokens: u32) -> Self {
        self.max_output_tokens = Some(tokens);
        self
    }

    /// Build the bridge
    ///
    /// # Errors
    /// Returns `BridgeError` if:
    /// - No API key is available and the default endpoint is used
    /// - The timeout is zero
    /// - The HTTP client cannot be created
    pub fn build(self) -> Result<PromptBridge> {
        if let Some(provider) = self.provider {
            return Ok(PromptBridge::from_shared(provider));
        }

        let mut config = self.config.unwrap_or_default();

        if let Some(timeout) = self.timeout {
            if timeout.is_zero() {
                return Err(BridgeError::Builder(
                    "Timeout must be greater than zero".to_string(),
                ));
            }
            // Sub-second timeouts round up to one second
            config.timeout_secs = Some(timeout.as_secs().max(1));
        }
        if let Some(key) = self.api_key {
            config.api_key = Some(key);
        }
        if let Some(model) = self.model {
            config.model = model;
        }
        if let Some(url) = self.base_url {
            config.base_url = url;
        }
        if self.temperature.is_some() {
            config.temperature = self.temperature;
        }
        if self.max_output_tokens.is_some() {
            config.max_output_tokens = self.max_output_tokens;
        }

        Ok(PromptBridge::new(GoogleProvider::new(&config)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::PromptRequest;
    use async_trait::async_trait;

    struct Echo;

    #[async_trait]
    impl LlmProvider for Echo {
        fn provider_name(&self) -> &str {
            "echo"
        }

        async fn complete(&self, request: &PromptRequest) -> Result<String> {
            Ok(request.prompt().to_string())
        }
    }

    #[test]
    fn test_custom_provider() {
        let bridge = PromptBridge::builder().provider(Echo).build().unwrap();
        assert_eq!(bridge.provider_name(), "echo");
    }

    #[test]
    fn test_api_key_builds_google_bridge() {
        let bridge = PromptBridge::builder()
            .api_key("test-key")
            .model("gemini-2.5-flash")
            .timeout(Duration::from_millis(1500))
            .build()
            .unwrap();
        assert_eq!(bridge.provider_name(), "google");
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let result = PromptBridge::builder()
            .api_key("test-key")
            .timeout(Duration::ZERO)
            .build();
        assert!(matches!(result, Err(BridgeError::Builder(_))));
    }

    #[test]
    fn test_proxy_needs_no_key() {
        let bridge = PromptBridge::builder()
            .base_url("http://127.0.0.1:9000")
            .build();
        assert!(bridge.is_ok());
    }
}
