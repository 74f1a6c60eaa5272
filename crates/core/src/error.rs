//! Error types for the Sommelier domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Tool and provider failures have their own enums so each boundary can
//! turn them into user-facing text without losing the detail in logs.

use thiserror::Error;

/// The top-level error type for all Sommelier operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Tool errors ---
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Request errors ---
    #[error("Please provide a message")]
    EmptyMessage,
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Clone, Error)]
pub enum ToolError {
    #[error("{tool_name} returned HTTP {status}")]
    UpstreamStatus { tool_name: String, status: u16 },

    #[error("{tool_name} request failed: {reason}")]
    Request { tool_name: String, reason: String },

    #[error("{tool_name} timed out after {timeout_secs}s")]
    Timeout { tool_name: String, timeout_secs: u64 },

    #[error("{tool_name} returned an unreadable payload: {reason}")]
    Malformed { tool_name: String, reason: String },

    #[error("No coordinates found for {0}")]
    LocationNotFound(String),

    #[error("Tool not configured: {0}")]
    NotConfigured(String),
}
