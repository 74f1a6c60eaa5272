//! Completion API providers for Sommelier.
//!
//! All providers implement the `sommelier_core::Provider` trait. Only the
//! OpenAI-compatible chat-completions protocol is supported, which covers
//! OpenAI itself plus OpenRouter, Groq, Ollama, vLLM and friends.

pub mod openai_compat;

pub use openai_compat::OpenAiCompatProvider;

use std::sync::Arc;
use std::time::Duration;

use sommelier_core::error::ProviderError;
use sommelier_core::provider::Provider;

/// Build the configured completion provider.
///
/// Fails with `NotConfigured` when no API key is available; the gateway
/// treats that as "agent unavailable" rather than refusing to start.
pub fn build_from_config(
    config: &sommelier_config::AppConfig,
) -> Result<Arc<dyn Provider>, ProviderError> {
    let api_key = config.provider.api_key.clone().ok_or_else(|| {
        ProviderError::NotConfigured("OPENAI_API_KEY is not set".into())
    })?;

    let provider = OpenAiCompatProvider::new(
        &config.provider.name,
        &config.provider.base_url,
        api_key,
    )
    .with_timeout(Duration::from_secs(config.timeouts.completion_secs))?;

    Ok(Arc::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_not_configured() {
        let config = sommelier_config::AppConfig::default();
        let err = build_from_config(&config).err().unwrap();
        assert!(matches!(err, ProviderError::NotConfigured(_)));
    }

    #[test]
    fn builds_with_key() {
        let mut config = sommelier_config::AppConfig::default();
        config.provider.api_key = Some("sk-test".into());
        let provider = build_from_config(&config).unwrap();
        assert_eq!(provider.name(), "openai");
    }
}
