//! The chat entry point shared by the gateway and the CLI.

use crate::generator::ResponseGenerator;
use crate::router::ContextRouter;
use sommelier_config::AppConfig;
use sommelier_core::error::{Error, Result};
use sommelier_tools::{KnowledgeStore, SearchClient, WeatherClient};
use std::sync::Arc;
use tracing::info;

/// Router plus generator. Built once at startup and shared behind `Arc`.
pub struct ChatService {
    router: ContextRouter,
    generator: ResponseGenerator,
}

impl ChatService {
    pub fn new(router: ContextRouter, generator: ResponseGenerator) -> Self {
        Self { router, generator }
    }

    /// Wire the real tools and completion provider from configuration.
    ///
    /// Fails when the configuration is invalid or the completion API key is
    /// missing; the gateway then runs without an agent and answers chat
    /// requests with 503.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        config.validate()?;
        let provider = sommelier_providers::build_from_config(config)?;

        let knowledge = Arc::new(KnowledgeStore::load(&config.knowledge.path));
        let weather = WeatherClient::from_config(config)?;
        let weather_location = weather.primary_location();
        let search = SearchClient::from_config(config)?;
        let max_results = search.max_results();

        let router = ContextRouter::new(knowledge, Arc::new(weather), Arc::new(search), weather_location)
            .with_max_results(max_results);

        let generator = ResponseGenerator::new(
            provider,
            &config.provider.model,
            config.provider.temperature,
        )
        .with_max_tokens(config.provider.max_tokens)
        .with_winery_name(&config.winery_name);

        info!(
            model = %config.provider.model,
            knowledge = %config.knowledge.path.display(),
            "Wine concierge ready"
        );
        Ok(Self::new(router, generator))
    }

    /// Answer one message. Empty or whitespace-only input is rejected.
    pub async fn chat(&self, message: &str) -> Result<String> {
        let message = message.trim();
        if message.is_empty() {
            return Err(Error::EmptyMessage);
        }

        let context = self.router.route(message).await;
        Ok(self.generator.generate(message, &context).await)
    }
}
