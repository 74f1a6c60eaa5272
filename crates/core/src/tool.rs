//! Tool traits: the three capabilities the context router chooses between.
//!
//! Each tool answers with text that goes straight into the prompt.
//! Expected upstream failures (bad status, no geocoding match, empty search)
//! are already rendered as apology text by the implementation; `Err` is
//! reserved for failures the implementation could not describe itself, and
//! the router replaces those with a generic notice.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::error::ToolError;

/// Where to look up the weather.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Location {
    /// A coordinate pair, used as-is.
    Coordinates { lat: f64, lon: f64 },
    /// A place name ("Napa, CA", "Sonoma"), resolved by geocoding unless it
    /// is the configured primary location.
    Named(String),
}

impl Location {
    pub fn named(name: impl Into<String>) -> Self {
        Location::Named(name.into())
    }

    /// Label used in the weather sentence.
    pub fn label(&self) -> String {
        match self {
            Location::Named(name) => name.clone(),
            Location::Coordinates { lat, lon } => format!("{lat}, {lon}"),
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

/// Lookup into the winery's own business document.
#[async_trait]
pub trait KnowledgeLookup: Send + Sync {
    /// Lines of the document matching `query`.
    async fn lookup(&self, query: &str) -> Result<String, ToolError>;

    /// The whole document.
    async fn full_info(&self) -> Result<String, ToolError>;
}

/// Current conditions for a location.
#[async_trait]
pub trait WeatherLookup: Send + Sync {
    async fn current_weather(&self, location: &Location) -> Result<String, ToolError>;
}

/// Web search returning formatted top results.
#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> Result<String, ToolError>;
}
