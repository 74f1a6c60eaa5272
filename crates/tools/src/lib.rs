//! Tool implementations for Sommelier.
//!
//! Each tool gives the concierge one source of context:
//! the winery's business document, current weather, and the web.
//! Outbound HTTP calls share one timeout policy and one error mapping.

pub mod knowledge;
pub mod weather;
pub mod web_search;

pub use knowledge::KnowledgeStore;
pub use weather::{WeatherClient, WeatherReading};
pub use web_search::{SearchClient, SearchHit};

use sommelier_core::error::ToolError;
use std::time::Duration;

/// Build an HTTP client whose every request is bounded by `timeout`.
pub(crate) fn http_client(tool_name: &str, timeout: Duration) -> Result<reqwest::Client, ToolError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("sommelier/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ToolError::NotConfigured(format!("{tool_name} HTTP client: {e}")))
}

/// Map a transport failure onto the tool error taxonomy.
pub(crate) fn request_error(tool_name: &str, timeout: Duration, e: reqwest::Error) -> ToolError {
    if e.is_timeout() {
        ToolError::Timeout {
            tool_name: tool_name.into(),
            timeout_secs: timeout.as_secs(),
        }
    } else if e.is_decode() {
        ToolError::Malformed {
            tool_name: tool_name.into(),
            reason: e.to_string(),
        }
    } else {
        ToolError::Request {
            tool_name: tool_name.into(),
            reason: e.to_string(),
        }
    }
}
