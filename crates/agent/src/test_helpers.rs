//! Shared test doubles for router, generator, and service tests.

use async_trait::async_trait;
use sommelier_core::error::{ProviderError, ToolError};
use sommelier_core::message::Message;
use sommelier_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use sommelier_core::tool::{KnowledgeLookup, Location, WeatherLookup, WebSearch};
use std::sync::Mutex;

/// Answers every request with the same text and remembers what it was sent.
pub struct ScriptedProvider {
    reply: Result<String, ProviderError>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: ProviderError) -> Self {
        Self {
            reply: Err(error),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let model = request.model.clone();
        self.requests.lock().unwrap().push(request);
        let text = self.reply.clone()?;
        Ok(ProviderResponse {
            message: Message::assistant(text),
            usage: Some(Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
            model,
        })
    }
}

pub struct StubKnowledge;

#[async_trait]
impl KnowledgeLookup for StubKnowledge {
    async fn lookup(&self, query: &str) -> Result<String, ToolError> {
        Ok(format!("knowledge for: {query}"))
    }

    async fn full_info(&self) -> Result<String, ToolError> {
        Ok("the whole document".into())
    }
}

pub struct FailingKnowledge;

#[async_trait]
impl KnowledgeLookup for FailingKnowledge {
    async fn lookup(&self, _query: &str) -> Result<String, ToolError> {
        Err(ToolError::NotConfigured("knowledge".into()))
    }

    async fn full_info(&self) -> Result<String, ToolError> {
        Err(ToolError::NotConfigured("knowledge".into()))
    }
}

#[derive(Default)]
pub struct StubWeather {
    calls: Mutex<Vec<Location>>,
}

impl StubWeather {
    pub fn calls(&self) -> Vec<Location> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl WeatherLookup for StubWeather {
    async fn current_weather(&self, location: &Location) -> Result<String, ToolError> {
        self.calls.lock().unwrap().push(location.clone());
        Ok(format!("weather in {location}"))
    }
}

#[derive(Default)]
pub struct StubSearch {
    calls: Mutex<Vec<(String, usize)>>,
}

impl StubSearch {
    pub fn calls(&self) -> Vec<(String, usize)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl WebSearch for StubSearch {
    async fn search(&self, query: &str, max_results: usize) -> Result<String, ToolError> {
        self.calls.lock().unwrap().push((query.to_string(), max_results));
        Ok(format!("results for: {query}"))
    }
}
